//! Error types for extraction
//!
//! Malformed rows and unconvertible cells are never errors: they are dropped
//! or defaulted and show up in [`ExtractStats`](crate::ExtractStats). What
//! remains is configuration problems, detected before the first read, and
//! I/O failures from the source stream, which end extraction.

use thiserror::Error;

/// Errors raised while configuring or running an extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Reading the source stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid extraction settings
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the settings
        reason: String,
    },

    /// Encoding label that is unknown or cannot be scanned byte-wise
    #[error("unsupported encoding '{label}'")]
    UnsupportedEncoding {
        /// The label as given by the caller
        label: String,
    },

    /// Schema that parsed but does not describe a usable extraction
    #[error("invalid schema: {reason}")]
    InvalidSchema {
        /// What was wrong with the schema
        reason: String,
    },

    /// Schema text that is not valid TOML for a schema
    #[error("failed to parse schema: {source}")]
    SchemaParse {
        /// Underlying TOML error
        #[from]
        source: toml::de::Error,
    },

    /// Requested preset does not exist
    #[error("unknown preset '{name}'")]
    UnknownPreset {
        /// Requested preset name
        name: String,
    },

    /// Record filter that cannot be applied
    #[error("invalid filter '{expr}': {reason}")]
    InvalidFilter {
        /// The expression as given
        expr: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_keeps_kind() {
        let err: ExtractError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        match err {
            ExtractError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::NotFound),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_display_messages() {
        let err = ExtractError::UnsupportedEncoding {
            label: "utf-16le".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported encoding 'utf-16le'");

        let err = ExtractError::InvalidFilter {
            expr: "vehicle".to_string(),
            reason: "expected field=value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid filter 'vehicle': expected field=value"
        );
    }
}
