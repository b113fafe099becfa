//! Schema source management for CLI

use crate::error::CliError;
use anyhow::Result;
use rowsift_core::Schema;
use std::path::PathBuf;

/// Where the extraction schema comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// Embedded preset
    Preset(String),
    /// External schema file
    External(PathBuf),
}

impl SchemaSource {
    /// Pick the source: an explicit file wins over a preset name
    pub fn select(schema: Option<PathBuf>, preset: Option<String>, default_preset: &str) -> Self {
        match (schema, preset) {
            (Some(path), _) => SchemaSource::External(path),
            (None, Some(name)) => SchemaSource::Preset(name),
            (None, None) => SchemaSource::Preset(default_preset.to_string()),
        }
    }

    /// Load and validate the schema
    pub fn load(&self) -> Result<Schema> {
        let schema = match self {
            SchemaSource::Preset(name) => rowsift_core::preset(name),
            SchemaSource::External(path) => Schema::from_file(path),
        };
        schema.map_err(|e| CliError::SchemaError(format!("{}: {e}", self.display_name())).into())
    }

    /// Get the display name for the schema source
    pub fn display_name(&self) -> String {
        match self {
            SchemaSource::Preset(name) => format!("Preset: {name}"),
            SchemaSource::External(path) => format!("External: {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_precedence() {
        let external = SchemaSource::select(
            Some(PathBuf::from("s.toml")),
            Some("race-results".to_string()),
            "stop-events",
        );
        assert_eq!(external, SchemaSource::External(PathBuf::from("s.toml")));

        let preset = SchemaSource::select(None, Some("race-results".to_string()), "stop-events");
        assert_eq!(preset, SchemaSource::Preset("race-results".to_string()));

        let default = SchemaSource::select(None, None, "stop-events");
        assert_eq!(default.display_name(), "Preset: stop-events");
    }

    #[test]
    fn test_load_preset() {
        let schema = SchemaSource::Preset("stop-events".to_string()).load().unwrap();
        assert_eq!(schema.fields.len(), 6);
    }

    #[test]
    fn test_load_errors_are_schema_errors() {
        let err = SchemaSource::Preset("nope".to_string()).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::SchemaError(_))
        ));

        let err = SchemaSource::External(PathBuf::from("/nonexistent/schema.toml"))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("External: /nonexistent/schema.toml"));
    }
}
