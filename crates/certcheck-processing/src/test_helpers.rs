//! Test helpers shared with dependent crates through the `test-helpers` feature

use crate::classifier::{ClassifyError, DocumentClassifier};
use crate::imaging::ImageTensor;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Classifier that ignores its input and always returns the same score
#[derive(Debug)]
pub struct FixedScoreClassifier {
    score: f32,
    calls: AtomicUsize,
}

impl FixedScoreClassifier {
    pub fn new(score: f32) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DocumentClassifier for FixedScoreClassifier {
    fn name(&self) -> &str {
        "fixed-score"
    }

    fn score(&self, input: ImageTensor) -> Result<f32, ClassifyError> {
        let side = self.input_size() as usize;
        if input.shape() != [1, side, side, 3] {
            return Err(ClassifyError::Inference(format!(
                "unexpected input shape {:?}",
                input.shape()
            )));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.score)
    }
}

pub fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
    ImageBuffer::from_pixel(width, height, Rgb(rgb))
}

pub fn encode_png(img: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

/// A small, decodable PNG document
pub fn sample_png() -> Vec<u8> {
    encode_png(&solid_image(32, 24, [240, 240, 230]))
}
