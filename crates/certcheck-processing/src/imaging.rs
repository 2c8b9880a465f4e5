//! Image decoding and tensor preparation for the document classifier

use crate::classifier::ClassifyError;
use image::imageops::{self, FilterType};
use image::ImageReader;
use std::io::Cursor;
use tract_onnx::prelude::tract_ndarray::Array4;

/// Preprocessed image batch in NHWC layout
pub type ImageTensor = Array4<f32>;

/// Decode `data`, resize it to `size`x`size` and lay it out as a
/// `[1, size, size, 3]` tensor with values in `[0, 1]`.
///
/// Channels are ordered blue, green, red to match how the model was trained.
/// Aspect ratio is not preserved.
pub fn preprocess(data: &[u8], size: u32) -> Result<ImageTensor, ClassifyError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ClassifyError::Decode(e.to_string()))?;
    let img = reader
        .decode()
        .map_err(|e| ClassifyError::Decode(e.to_string()))?;

    let rgb = img.to_rgb8();
    let resized = imageops::resize(&rgb, size, size, FilterType::Triangle);

    let side = size as usize;
    Ok(Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
        let px = resized.get_pixel(x as u32, y as u32);
        px[2 - c] as f32 / 255.0
    }))
}
