//! Common error types
//!
//! Module-specific errors should compose with `CommonError` rather than
//! duplicating its variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum StoreError {
//!     #[error("Datasource not found: {0}")]
//!     Missing(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//! ```

use thiserror::Error;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Common error variants that appear across multiple modules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// Invalid or missing settings
    #[error("Configuration error in field '{field}': {message}")]
    Config { field: String, message: String },

    /// Input rejected before processing
    #[error("Validation error for field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Encoding or decoding failure (base64, hex, UTF-8)
    #[error("Serialization error ({format}): {message}")]
    Serialization { format: String, message: String },

    /// Encryption or decryption failure
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl CommonError {
    /// Create a configuration error for a specific field
    pub fn config<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }

    /// Create a validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create a serialization error with format information
    pub fn serialization<F: Into<String>, S: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { format: format.into(), message: message.into() }
    }

    pub fn crypto<S: Into<String>>(message: S) -> Self {
        Self::Crypto(message.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_field() {
        let err = CommonError::config("encryption.key", "must be exactly 32 bytes");
        assert_eq!(
            err.to_string(),
            "Configuration error in field 'encryption.key': must be exactly 32 bytes"
        );
        assert!(err.is_config());
    }

    #[test]
    fn serialization_display_names_format() {
        let err = CommonError::serialization("base64", "invalid padding");
        assert_eq!(err.to_string(), "Serialization error (base64): invalid padding");
    }
}
