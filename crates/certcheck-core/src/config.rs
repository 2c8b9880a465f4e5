//! Configuration module
//!
//! Configuration is read from the process environment (and a `.env` file when
//! present). Every setting has a default matching the stock deployment layout,
//! so an empty environment yields a working server.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_CLASSIFIER_THRESHOLD, DEFAULT_DETAILS_FILE,
    DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_MODEL_PATH, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SERVER_PORT, DEFAULT_UPLOAD_FOLDER,
};

/// Which part of a filename is treated as its extension when checking the allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtensionMatch {
    /// Everything after the first `.`; `archive.tar.png` yields `tar.png`.
    #[default]
    FirstDot,
    /// Everything after the last `.`; `archive.tar.png` yields `png`.
    LastDot,
}

impl FromStr for ExtensionMatch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first-dot" | "first_dot" | "first" => Ok(ExtensionMatch::FirstDot),
            "last-dot" | "last_dot" | "last" => Ok(ExtensionMatch::LastDot),
            other => Err(anyhow::anyhow!(
                "EXTENSION_MATCH must be 'first-dot' or 'last-dot', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for ExtensionMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionMatch::FirstDot => f.write_str("first-dot"),
            ExtensionMatch::LastDot => f.write_str("last-dot"),
        }
    }
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub request_timeout_secs: u64,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    /// Directory holding uploaded files
    pub upload_folder: PathBuf,
    /// JSON file holding the submission records
    pub details_file: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub extension_match: ExtensionMatch,
    /// Pre-trained classifier artifact (ONNX)
    pub model_path: PathBuf,
    pub classifier_threshold: f32,
    pub max_file_size_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: DEFAULT_SERVER_PORT,
                environment: "development".to_string(),
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            upload_folder: PathBuf::from(DEFAULT_UPLOAD_FOLDER),
            details_file: PathBuf::from(DEFAULT_DETAILS_FILE),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extension_match: ExtensionMatch::default(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            classifier_threshold: DEFAULT_CLASSIFIER_THRESHOLD,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.base.environment);

        let server_port = match lookup("SERVER_PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("SERVER_PORT '{}' is not a valid port: {}", v, e))?,
            None => defaults.base.server_port,
        };

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|e| {
                anyhow::anyhow!("REQUEST_TIMEOUT_SECS '{}' is not a whole number: {}", v, e)
            })?,
            None => defaults.base.request_timeout_secs,
        };

        let allowed_extensions = match lookup("ALLOWED_EXTENSIONS") {
            Some(v) => v
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.allowed_extensions,
        };

        let extension_match = match lookup("EXTENSION_MATCH") {
            Some(v) => v.parse()?,
            None => defaults.extension_match,
        };

        let classifier_threshold = match lookup("CLASSIFIER_THRESHOLD") {
            Some(v) => v.trim().parse::<f32>().map_err(|e| {
                anyhow::anyhow!("CLASSIFIER_THRESHOLD '{}' is not a number: {}", v, e)
            })?,
            None => defaults.classifier_threshold,
        };

        let max_file_size_mb = match lookup("MAX_FILE_SIZE_MB") {
            Some(v) => v.trim().parse::<usize>().map_err(|e| {
                anyhow::anyhow!("MAX_FILE_SIZE_MB '{}' is not a whole number: {}", v, e)
            })?,
            None => DEFAULT_MAX_FILE_SIZE_MB,
        };
        let max_file_size_bytes = max_file_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB {} is too large", max_file_size_mb))?;

        let config = Config {
            base: BaseConfig {
                server_port,
                environment,
                request_timeout_secs,
            },
            upload_folder: lookup("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_folder),
            details_file: lookup("DETAILS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.details_file),
            allowed_extensions,
            extension_match,
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            classifier_threshold,
            max_file_size_bytes,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must list at least one extension"));
        }

        if !(self.classifier_threshold > 0.0 && self.classifier_threshold < 1.0) {
            return Err(anyhow::anyhow!(
                "CLASSIFIER_THRESHOLD must be strictly between 0 and 1, got {}",
                self.classifier_threshold
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        // No buffer can hold more than isize::MAX bytes.
        if self.max_file_size_bytes > isize::MAX as usize {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB is too large: {} bytes",
                self.max_file_size_bytes
            ));
        }

        if self.base.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_stock_layout() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.upload_folder, PathBuf::from("static/uploads"));
        assert_eq!(config.details_file, PathBuf::from("details.json"));
        assert_eq!(config.allowed_extensions, vec!["png", "jpg", "jpeg", "gif"]);
        assert_eq!(config.extension_match, ExtensionMatch::FirstDot);
        assert_eq!(config.classifier_threshold, 0.5);
        assert_eq!(config.server_port(), 5000);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "8080"),
            ("UPLOAD_FOLDER", "/data/uploads"),
            ("ALLOWED_EXTENSIONS", "PNG, webp"),
            ("EXTENSION_MATCH", "last-dot"),
            ("ENVIRONMENT", "production"),
            ("MAX_FILE_SIZE_MB", "2"),
        ]))
        .unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.upload_folder, PathBuf::from("/data/uploads"));
        assert_eq!(config.allowed_extensions, vec!["png", "webp"]);
        assert_eq!(config.extension_match, ExtensionMatch::LastDot);
        assert_eq!(config.max_file_size_bytes, 2 * 1024 * 1024);
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("EXTENSION_MATCH", "middle")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("CLASSIFIER_THRESHOLD", "1.5")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ALLOWED_EXTENSIONS", " , ")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SERVER_PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("MAX_FILE_SIZE_MB", "16MB")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("MAX_FILE_SIZE_MB", "-1")])).is_err());
    }

    #[test]
    fn test_oversized_upload_limit_rejected() {
        let err = Config::from_lookup(lookup_from(&[(
            "MAX_FILE_SIZE_MB",
            "18446744073709551615",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("MAX_FILE_SIZE_MB"));

        let config = Config {
            max_file_size_bytes: usize::MAX,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
