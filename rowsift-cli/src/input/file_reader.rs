//! File opening utilities

use crate::error::CliError;
use anyhow::{Context, Result};
use rowsift_core::Input;
use std::io::Read;
use std::path::Path;

/// Opens documents for streaming extraction
pub struct FileReader;

impl FileReader {
    /// Open a file as a byte stream; nothing is read yet
    pub fn open(path: &Path) -> Result<Box<dyn Read + Send>> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }

        Input::from_file(path)
            .open()
            .with_context(|| format!("Failed to open file: {}", path.display()))
    }
}
