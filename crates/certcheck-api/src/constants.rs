/// Room for the text fields and multipart framing on top of the file itself
pub const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Default server-wide cap on in-flight requests
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1024;

pub const STYLESHEET_PATH: &str = "/static/style.css";
