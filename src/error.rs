use thiserror::Error;

/// Unified error type for release-ci operations
#[derive(Error, Debug)]
pub enum CiError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Invalid base version: {0}")]
    InvalidBaseVersion(String),

    #[error("Manifest parsing error: {0}")]
    Manifest(String),

    /// `expected` is the computed version, `actual` the one supplied
    #[error("version check failed: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-ci
pub type Result<T> = std::result::Result<T, CiError>;

impl CiError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        CiError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        CiError::Version(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        CiError::Manifest(msg.into())
    }

    pub fn template(msg: impl Into<String>) -> Self {
        CiError::Template(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        CiError::Http(msg.into())
    }

    /// Create a mismatch error for the verify-* commands
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        CiError::Mismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl From<reqwest::Error> for CiError {
    fn from(err: reqwest::Error) -> Self {
        CiError::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CiError::config("missing ssh key");
        assert_eq!(err.to_string(), "Configuration error: missing ssh key");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CiError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_mismatch_message() {
        let err = CiError::mismatch("v1.2.5", "1.2.5");
        assert_eq!(
            err.to_string(),
            "version check failed: expected v1.2.5, got 1.2.5"
        );
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (CiError::config("x"), "Configuration error"),
            (CiError::version("x"), "Version parsing error"),
            (CiError::manifest("x"), "Manifest parsing error"),
            (CiError::InvalidBaseVersion("x".into()), "Invalid base version"),
            (CiError::template("x"), "Template error"),
            (CiError::http("x"), "HTTP request failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_empty_messages() {
        let errors = vec![
            CiError::config(""),
            CiError::version(""),
            CiError::manifest(""),
        ];

        for err in errors {
            // Even with empty message, the error type prefix should be present
            assert!(!err.to_string().is_empty());
        }
    }
}
