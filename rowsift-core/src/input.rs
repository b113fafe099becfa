//! Document sources
//!
//! The extractor only needs something readable; `Input` collects the usual
//! ways a caller holds a document and opens them uniformly.

use crate::error::Result;
use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::PathBuf;

/// A document to extract from
pub enum Input {
    /// File on disk, opened lazily
    File(PathBuf),
    /// In-memory bytes
    Bytes(Vec<u8>),
    /// In-memory text
    Text(String),
    /// Any reader (stdin, a decompressor, a socket...)
    Reader(Box<dyn Read + Send>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f
                .debug_tuple("Bytes")
                .field(&format!("<{} bytes>", bytes.len()))
                .finish(),
            Input::Text(text) => f
                .debug_tuple("Text")
                .field(&format!("<{} bytes>", text.len()))
                .finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<Reader>").finish(),
        }
    }
}

impl Input {
    /// Create input from a file path
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Self {
        Input::File(path.into())
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    /// Open the document for reading.
    ///
    /// File errors (not found, permission) are returned unchanged.
    pub fn open(self) -> Result<Box<dyn Read + Send>> {
        Ok(match self {
            Input::File(path) => Box::new(File::open(path)?),
            Input::Bytes(bytes) => Box::new(Cursor::new(bytes)),
            Input::Text(text) => Box::new(Cursor::new(text.into_bytes())),
            Input::Reader(reader) => reader,
        })
    }

    /// Size of the document if known without reading it
    pub fn estimated_size(&self) -> Option<u64> {
        match self {
            Input::File(path) => fs::metadata(path).ok().map(|m| m.len()),
            Input::Bytes(bytes) => Some(bytes.len() as u64),
            Input::Text(text) => Some(text.len() as u64),
            Input::Reader(_) => None,
        }
    }
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Input::File(path)
    }
}

impl From<Vec<u8>> for Input {
    fn from(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}
