//! Configuration module

use crate::error::CliError;
use anyhow::{Context, Result};
use rowsift_core::ExtractConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Extraction-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Read size (KB)
    pub chunk_kb: u64,

    /// Document encoding label
    pub encoding: String,

    /// Preset used when no schema is given
    pub default_preset: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            chunk_kb: 32,
            encoding: "utf-8".to_string(),
            default_preset: "stop-events".to_string(),
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            pretty_json: true,
        }
    }
}

impl CliConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&text)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;

        if config.extraction.chunk_kb == 0 {
            return Err(CliError::ConfigError("chunk_kb must be positive".to_string()).into());
        }

        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Extraction settings, with command-line overrides applied
    pub fn extract_config(
        &self,
        chunk_size: Option<usize>,
        encoding: Option<&str>,
    ) -> ExtractConfig {
        let chunk_size =
            chunk_size.unwrap_or_else(|| (self.extraction.chunk_kb as usize).saturating_mul(1024));
        ExtractConfig::new()
            .with_chunk_size(chunk_size)
            .with_encoding(encoding.unwrap_or(&self.extraction.encoding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_extractor_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.extract_config(None, None), ExtractConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[extraction]\nchunk_kb = 4\n").unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.extraction.chunk_kb, 4);
        assert_eq!(config.extraction.encoding, "utf-8");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_overrides_win() {
        let config = CliConfig::default();
        let extract = config.extract_config(Some(7), Some("latin1"));
        assert_eq!(extract.chunk_size, 7);
        assert_eq!(extract.encoding, "latin1");
    }

    #[test]
    fn test_zero_chunk_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[extraction]\nchunk_kb = 0\n").unwrap();

        let err = CliConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("chunk_kb must be positive"));
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::load(Path::new("/nonexistent/rowsift.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
