use certcheck_core::{Config, ExtensionMatch};

/// Reasons an upload is refused before anything is written
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No file was provided")]
    MissingFile,

    #[error("Missing form field: {0}")]
    MissingField(String),

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

/// Upload validator
///
/// Checks a client filename against the extension allowlist and the file size
/// against the configured limit.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    allowed_extensions: Vec<String>,
    extension_match: ExtensionMatch,
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(
        allowed_extensions: Vec<String>,
        extension_match: ExtensionMatch,
        max_file_size: usize,
    ) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            extension_match,
            max_file_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.allowed_extensions.clone(),
            config.extension_match,
            config.max_file_size_bytes,
        )
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// The lowercased extension of `filename` under the configured policy,
    /// or `None` if it contains no `.`.
    pub fn extension_of(&self, filename: &str) -> Option<String> {
        let split = match self.extension_match {
            ExtensionMatch::FirstDot => filename.split_once('.'),
            ExtensionMatch::LastDot => filename.rsplit_once('.'),
        };
        split.map(|(_, ext)| ext.to_lowercase())
    }

    /// True iff `filename` has an extension that is on the allowlist.
    pub fn is_allowed(&self, filename: &str) -> bool {
        self.extension_of(filename)
            .is_some_and(|ext| self.allowed_extensions.contains(&ext))
    }

    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let extension = self
            .extension_of(filename)
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate extension first, then size
    pub fn validate(&self, filename: &str, size: usize) -> Result<String, ValidationError> {
        let extension = self.validate_extension(filename)?;
        self.validate_file_size(size)?;
        Ok(extension)
    }
}
