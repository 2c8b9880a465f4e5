//! Document classifier adapter
//!
//! Wraps the pre-trained binary model behind [`DocumentClassifier`] so the
//! upload flow depends only on a score, and thresholds that score into a
//! [`Verdict`].

use crate::imaging::{preprocess, ImageTensor};
use certcheck_core::constants::CLASSIFIER_INPUT_SIZE;
use certcheck_core::{ClassificationOutcome, Verdict};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tract_onnx::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to load model from {path}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A model that scores a preprocessed image.
///
/// Implementations return the single sigmoid output of the network, where
/// values near 1 mean the document looks genuine.
pub trait DocumentClassifier: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Side length of the square input the model expects
    fn input_size(&self) -> u32 {
        CLASSIFIER_INPUT_SIZE
    }

    fn score(&self, input: ImageTensor) -> Result<f32, ClassifyError>;
}

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// ONNX model executed with tract
pub struct OnnxClassifier {
    path: PathBuf,
    input_size: u32,
    plan: OnnxPlan,
}

impl fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("path", &self.path)
            .field("input_size", &self.input_size)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Load and optimize the model at `path` for a `[1, 224, 224, 3]` input.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifyError> {
        Self::load_with_size(path, CLASSIFIER_INPUT_SIZE)
    }

    pub fn load_with_size(path: impl AsRef<Path>, input_size: u32) -> Result<Self, ClassifyError> {
        let path = path.as_ref().to_path_buf();
        let start = Instant::now();
        let side = input_size as usize;

        let plan = tract_onnx::onnx()
            .model_for_path(&path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, side, side, 3]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifyError::ModelLoad {
                path: path.clone(),
                message: e.to_string(),
            })?;

        tracing::info!(
            path = %path.display(),
            input_size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Classifier model loaded"
        );

        Ok(Self {
            path,
            input_size,
            plan,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentClassifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn input_size(&self) -> u32 {
        self.input_size
    }

    fn score(&self, input: ImageTensor) -> Result<f32, ClassifyError> {
        let tensor: Tensor = input.into();
        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| ClassifyError::Inference("model produced no outputs".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;

        view.iter()
            .next()
            .copied()
            .ok_or_else(|| ClassifyError::Inference("model output is empty".to_string()))
    }
}

/// Runs the classifier off the async runtime and thresholds its score
#[derive(Clone)]
pub struct ClassificationService {
    classifier: Arc<dyn DocumentClassifier>,
    threshold: f32,
}

impl ClassificationService {
    pub fn new(classifier: Arc<dyn DocumentClassifier>, threshold: f32) -> Self {
        Self {
            classifier,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Classify an encoded image held in memory.
    #[tracing::instrument(skip(self, data), fields(classifier = %self.classifier.name(), size_bytes = data.len()))]
    pub async fn classify_bytes(&self, data: Vec<u8>) -> Result<ClassificationOutcome, ClassifyError> {
        let classifier = Arc::clone(&self.classifier);
        let threshold = self.threshold;
        let start = Instant::now();

        let outcome = tokio::task::spawn_blocking(move || {
            let input = preprocess(&data, classifier.input_size())?;
            let score = classifier.score(input)?;
            Ok::<_, ClassifyError>(ClassificationOutcome::from_score(score, threshold))
        })
        .await
        .map_err(|e| ClassifyError::Inference(format!("classifier task failed: {}", e)))??;

        tracing::info!(
            score = outcome.score,
            verdict = %outcome.verdict,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Document classified"
        );

        Ok(outcome)
    }

    /// Classify the image stored at `path`.
    pub async fn classify_file(&self, path: &Path) -> Result<ClassificationOutcome, ClassifyError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| ClassifyError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        self.classify_bytes(data).await
    }

    /// Only the verdict for the image at `path`.
    pub async fn predict(&self, path: &Path) -> Result<Verdict, ClassifyError> {
        Ok(self.classify_file(path).await?.verdict)
    }
}

impl fmt::Debug for ClassificationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationService")
            .field("classifier", &self.classifier)
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{encode_png, solid_image, FixedScoreClassifier};
    use tempfile::tempdir;

    fn service(score: f32) -> ClassificationService {
        ClassificationService::new(Arc::new(FixedScoreClassifier::new(score)), 0.5)
    }

    #[tokio::test]
    async fn test_score_above_threshold_is_real() {
        let png = encode_png(&solid_image(16, 16, [200, 200, 200]));

        let outcome = service(0.9).classify_bytes(png).await.unwrap();

        assert_eq!(outcome.verdict, Verdict::Real);
        assert_eq!(outcome.score, 0.9);
    }

    #[tokio::test]
    async fn test_score_at_or_below_threshold_is_fake() {
        let png = encode_png(&solid_image(16, 16, [200, 200, 200]));

        assert_eq!(
            service(0.5).classify_bytes(png.clone()).await.unwrap().verdict,
            Verdict::Fake
        );
        assert_eq!(
            service(0.1).classify_bytes(png).await.unwrap().verdict,
            Verdict::Fake
        );
    }

    #[tokio::test]
    async fn test_classify_file_and_predict() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cert.png");
        std::fs::write(&path, encode_png(&solid_image(30, 20, [0, 0, 0]))).unwrap();

        let outcome = service(0.75).classify_file(&path).await.unwrap();
        assert_eq!(outcome.verdict, Verdict::Real);
        assert_eq!(service(0.2).predict(&path).await.unwrap(), Verdict::Fake);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = service(0.9).classify_file(&dir.path().join("missing.png")).await;
        assert!(matches!(result, Err(ClassifyError::Io { .. })));
    }

    #[tokio::test]
    async fn test_undecodable_upload_is_decode_error() {
        let result = service(0.9).classify_bytes(b"not an image".to_vec()).await;
        assert!(matches!(result, Err(ClassifyError::Decode(_))));
    }

    #[test]
    fn test_missing_model_is_load_error() {
        let dir = tempdir().unwrap();
        let result = OnnxClassifier::load(dir.path().join("model.onnx"));
        assert!(matches!(result, Err(ClassifyError::ModelLoad { .. })));
    }
}
