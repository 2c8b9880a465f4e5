//! Defaults used when the environment leaves a setting unset.

pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const DEFAULT_UPLOAD_FOLDER: &str = "static/uploads";
pub const DEFAULT_DETAILS_FILE: &str = "details.json";
pub const DEFAULT_MODEL_PATH: &str = "model.onnx";
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];
pub const DEFAULT_CLASSIFIER_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 16;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Spatial resolution the classifier was trained on.
pub const CLASSIFIER_INPUT_SIZE: u32 = 224;

/// URL prefix under which stored uploads are served.
pub const UPLOADS_URL_PREFIX: &str = "/static/uploads";
