use certcheck_services::{ClassifyError, DocumentClassifier, ImageTensor};
use std::path::PathBuf;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Stand-in for commands that never classify, such as `list` and `delete`.
///
/// Scoring fails with [`ClassifyError::ModelLoad`] so a misuse is reported
/// instead of producing a verdict.
#[derive(Debug, Clone)]
pub struct UnloadedClassifier {
    path: PathBuf,
}

impl UnloadedClassifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentClassifier for UnloadedClassifier {
    fn name(&self) -> &str {
        "unloaded"
    }

    fn score(&self, _input: ImageTensor) -> Result<f32, ClassifyError> {
        Err(ClassifyError::ModelLoad {
            path: self.path.clone(),
            message: "model not loaded for this command".to_string(),
        })
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_exact() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_multibyte() {
        assert_eq!(truncate_string("Zoë Ångström", 6), "Zoë...");
    }

    #[test]
    fn unloaded_classifier_refuses_to_score() {
        let classifier = UnloadedClassifier::new("model.onnx");
        let input = ImageTensor::zeros((1, 224, 224, 3));

        let result = classifier.score(input);

        assert!(matches!(result, Err(ClassifyError::ModelLoad { .. })));
        assert_eq!(classifier.input_size(), 224);
    }
}
