//! Extraction settings

use crate::error::{ExtractError, Result};
use encoding_rs::Encoding;

/// Default read size in bytes (32KB)
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Default document encoding label
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Settings that control how a document is read.
///
/// Neither setting changes which records come out: `chunk_size` only sets the
/// I/O granularity and `encoding` only how row bytes turn into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Maximum number of bytes requested per read
    pub chunk_size: usize,
    /// WHATWG label of the document encoding
    pub encoding: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl ExtractConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read size in bytes
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the document encoding label
    pub fn with_encoding<S: Into<String>>(mut self, encoding: S) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Check the settings without resolving anything else
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ExtractError::InvalidConfig {
                reason: "chunk size must be at least 1 byte".to_string(),
            });
        }
        self.resolve_encoding().map(|_| ())
    }

    /// Resolve the encoding label.
    ///
    /// Markers are located by byte search, so only encodings that keep ASCII
    /// bytes as ASCII are accepted.
    pub fn resolve_encoding(&self) -> Result<&'static Encoding> {
        let encoding = Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            ExtractError::UnsupportedEncoding {
                label: self.encoding.clone(),
            }
        })?;

        if !encoding.is_ascii_compatible() {
            return Err(ExtractError::UnsupportedEncoding {
                label: self.encoding.clone(),
            });
        }

        Ok(encoding)
    }
}
