//! Positional field extraction schema
//!
//! Rows carry no field names, so a schema maps cell positions to output names
//! and types. Schemas are plain TOML; a few are embedded as presets.

use crate::error::{ExtractError, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Semantic type of an extracted field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Cell text as-is
    #[default]
    Text,
    /// Signed whole number
    Integer,
    /// Floating point number
    Float,
    /// Integer seconds since midnight
    Seconds,
    /// `H:MM:SS` or `MM:SS` elapsed time, converted to minutes
    Clock,
}

impl FieldType {
    /// Name as written in schema files
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Seconds => "seconds",
            FieldType::Clock => "clock",
        }
    }

    /// Whether values of this type are numeric
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldType::Text)
    }
}

/// One output field: which cell it comes from and how to convert it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Output name
    pub name: String,
    /// Zero-based cell position within the row
    pub index: usize,
    /// Conversion applied to the cell text
    #[serde(rename = "type", default)]
    pub kind: FieldType,
    /// Value used when conversion fails, written in the field's own syntax.
    /// Absent means null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FieldSpec {
    /// Create a field without a default
    pub fn new<S: Into<String>>(name: S, index: usize, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            index,
            kind,
            default: None,
        }
    }

    /// Set the fallback value
    pub fn with_default<S: Into<String>>(mut self, default: S) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Resolve the declared default into a value
    pub fn default_value(&self) -> Result<Value> {
        match &self.default {
            None => Ok(Value::Null),
            Some(raw) => Value::parse(self.kind, raw).ok_or_else(|| ExtractError::InvalidSchema {
                reason: format!(
                    "default '{}' of field '{}' is not a valid {}",
                    raw,
                    self.name,
                    self.kind.as_str()
                ),
            }),
        }
    }
}

/// Row and cell delimiters of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMarkers {
    /// Literal that opens a row
    #[serde(default = "default_row_start")]
    pub row_start: String,
    /// Literal that closes a row
    #[serde(default = "default_row_end")]
    pub row_end: String,
    /// Tag name of data cells
    #[serde(default = "default_cell_tag")]
    pub cell_tag: String,
}

fn default_row_start() -> String {
    "<tr".to_string()
}

fn default_row_end() -> String {
    "</tr>".to_string()
}

fn default_cell_tag() -> String {
    "td".to_string()
}

impl Default for RowMarkers {
    fn default() -> Self {
        Self {
            row_start: default_row_start(),
            row_end: default_row_end(),
            cell_tag: default_cell_tag(),
        }
    }
}

/// Static mapping from cell positions to typed output fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Document delimiters
    #[serde(default)]
    pub markers: RowMarkers,
    /// Output fields, in output order
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Create a schema with default markers
    pub fn new<S: Into<String>>(name: S, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            markers: RowMarkers::default(),
            fields,
        }
    }

    /// Replace the markers
    pub fn with_markers(mut self, markers: RowMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Parse and validate a schema from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let schema: Schema = toml::from_str(text)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load and validate a schema file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ExtractError::InvalidSchema {
            reason: e.to_string(),
        })
    }

    /// Check that the schema describes a usable extraction
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(ExtractError::InvalidSchema { reason });

        if self.fields.is_empty() {
            return invalid("schema has no fields".to_string());
        }
        if self.markers.row_start.is_empty() || self.markers.row_end.is_empty() {
            return invalid("row markers must not be empty".to_string());
        }
        let (start, end) = (&self.markers.row_start, &self.markers.row_end);
        if start.contains(end.as_str()) || end.contains(start.as_str()) {
            return invalid(format!(
                "row markers '{start}' and '{end}' overlap; neither may contain the other"
            ));
        }
        if self.markers.cell_tag.is_empty()
            || !self.markers.cell_tag.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return invalid(format!(
                "cell tag '{}' must be an alphanumeric tag name",
                self.markers.cell_tag
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return invalid(format!("field at index {} has an empty name", field.index));
            }
            if !seen.insert(field.name.as_str()) {
                return invalid(format!("duplicate field name '{}'", field.name));
            }
            field.default_value()?;
        }

        Ok(())
    }

    /// Highest cell position referenced by any field
    pub fn max_index(&self) -> usize {
        self.fields.iter().map(|f| f.index).max().unwrap_or(0)
    }

    /// Fewest cells a row needs to be accepted
    pub fn min_cells(&self) -> usize {
        self.max_index() + 1
    }

    /// Output names in order
    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub(crate) fn shared_names(&self) -> Arc<[String]> {
        self.names().into()
    }

    pub(crate) fn resolved_defaults(&self) -> Result<Vec<Value>> {
        self.fields.iter().map(FieldSpec::default_value).collect()
    }
}

macro_rules! embed_schema {
    ($name:expr, $path:expr) => {
        ($name, include_str!($path))
    };
}

static PRESETS: OnceLock<std::result::Result<BTreeMap<&'static str, Schema>, String>> =
    OnceLock::new();

fn load_embedded_presets() -> std::result::Result<BTreeMap<&'static str, Schema>, String> {
    let embedded = [
        embed_schema!("stop-events", "../configs/schemas/stop_events.toml"),
        embed_schema!("race-results", "../configs/schemas/race_results.toml"),
    ];

    let mut presets = BTreeMap::new();
    for (name, text) in embedded {
        let schema = Schema::from_toml_str(text)
            .map_err(|e| format!("failed to load preset {name}: {e}"))?;
        if schema.name != name {
            return Err(format!(
                "preset name mismatch: expected {}, got {}",
                name, schema.name
            ));
        }
        presets.insert(name, schema);
    }

    Ok(presets)
}

fn presets() -> Result<&'static BTreeMap<&'static str, Schema>> {
    PRESETS
        .get_or_init(load_embedded_presets)
        .as_ref()
        .map_err(|reason| ExtractError::InvalidSchema {
            reason: reason.clone(),
        })
}

/// Look up an embedded schema by name
pub fn preset(name: &str) -> Result<Schema> {
    presets()?
        .get(name)
        .cloned()
        .ok_or_else(|| ExtractError::UnknownPreset {
            name: name.to_string(),
        })
}

/// Names of the embedded schemas, sorted
pub fn list_presets() -> Vec<&'static str> {
    presets()
        .map(|p| p.keys().copied().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_events_preset() {
        let schema = preset("stop-events").unwrap();
        assert_eq!(schema.min_cells(), 15);
        assert_eq!(
            schema.names(),
            vec!["vehicle_number", "trip_id", "arrive_time", "location_id", "ons", "offs"]
        );
        let defaults = schema.resolved_defaults().unwrap();
        assert_eq!(defaults[2], Value::Null);
        assert_eq!(defaults[4], Value::Float(0.0));
    }

    #[test]
    fn test_list_presets_sorted() {
        assert_eq!(list_presets(), vec!["race-results", "stop-events"]);
    }

    #[test]
    fn test_unknown_preset() {
        match preset("nonexistent") {
            Err(ExtractError::UnknownPreset { name }) => assert_eq!(name, "nonexistent"),
            other => panic!("expected UnknownPreset, got {other:?}"),
        }
    }

    #[test]
    fn test_markers_default_when_omitted() {
        let schema = Schema::from_toml_str(
            r#"
name = "t"

[[fields]]
name = "a"
index = 2
"#,
        )
        .unwrap();
        assert_eq!(schema.markers, RowMarkers::default());
        assert_eq!(schema.fields[0].kind, FieldType::Text);
        assert_eq!(schema.min_cells(), 3);
    }

    #[test]
    fn test_bad_default_rejected() {
        let schema = Schema::new(
            "t",
            vec![FieldSpec::new("n", 0, FieldType::Integer).with_default("zero")],
        );
        assert!(matches!(
            schema.validate(),
            Err(ExtractError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let schema = Schema::new(
            "t",
            vec![
                FieldSpec::new("a", 0, FieldType::Text),
                FieldSpec::new("a", 1, FieldType::Text),
            ],
        );
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate field name 'a'"));
    }

    #[test]
    fn test_empty_schema_and_markers_rejected() {
        assert!(Schema::new("t", vec![]).validate().is_err());

        let schema = Schema::new("t", vec![FieldSpec::new("a", 0, FieldType::Text)])
            .with_markers(RowMarkers {
                cell_tag: "t d".to_string(),
                ..RowMarkers::default()
            });
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_overlapping_markers_rejected() {
        let with = |row_start: &str, row_end: &str| {
            Schema::new("t", vec![FieldSpec::new("a", 0, FieldType::Text)]).with_markers(
                RowMarkers {
                    row_start: row_start.to_string(),
                    row_end: row_end.to_string(),
                    ..RowMarkers::default()
                },
            )
        };

        let err = with("|", "|").validate().unwrap_err();
        assert!(err.to_string().contains("overlap"));
        assert!(with("<row", "<row>").validate().is_err());
        assert!(with("</r></r>", "</r>").validate().is_err());
        assert!(with("<row", "</row>").validate().is_ok());
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let result = Schema::from_toml_str(
            r#"
name = "t"

[[fields]]
name = "a"
index = 0
type = "date"
"#,
        );
        assert!(matches!(result, Err(ExtractError::SchemaParse { .. })));
    }

    #[test]
    fn test_toml_round_trip_of_preset() {
        let schema = preset("race-results").unwrap();
        let text = schema.to_toml_string().unwrap();
        assert_eq!(Schema::from_toml_str(&text).unwrap(), schema);
    }
}
