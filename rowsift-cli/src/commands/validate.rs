//! Validate command implementation

use anyhow::Result;
use clap::Args;
use rowsift_core::Schema;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the schema file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub schema: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating schema: {}", self.schema.display());

        match Schema::from_file(&self.schema) {
            Ok(schema) => {
                println!("✓ Schema is valid!");
                println!("  Name: {}", schema.name);
                println!("  Fields: {}", schema.names().join(", "));
                println!(
                    "  Rows: {}...{} with at least {} <{}> cells",
                    schema.markers.row_start,
                    schema.markers.row_end,
                    schema.min_cells(),
                    schema.markers.cell_tag
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Schema is invalid!");
                println!("  Error: {e}");
                Err(anyhow::anyhow!("Validation failed: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn schema_file(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_validate_args_debug() {
        let args = ValidateArgs {
            schema: PathBuf::from("test.toml"),
        };

        let debug_str = format!("{:?}", args);
        assert!(debug_str.contains("ValidateArgs"));
        assert!(debug_str.contains("test.toml"));
    }

    #[test]
    fn test_validate_valid_schema() {
        let file = schema_file(
            r#"
name = "people"

[[fields]]
name = "age"
index = 2
type = "integer"
default = "0"
"#,
        );

        let args = ValidateArgs {
            schema: file.path().to_path_buf(),
        };
        assert!(args.execute().is_ok());
    }

    #[test]
    fn test_validate_bad_default() {
        let file = schema_file(
            r#"
name = "people"

[[fields]]
name = "age"
index = 2
type = "integer"
default = "unknown"
"#,
        );

        let args = ValidateArgs {
            schema: file.path().to_path_buf(),
        };
        let err = args.execute().unwrap_err();
        assert!(err.to_string().starts_with("Validation failed"));
    }

    #[test]
    fn test_validate_unknown_type() {
        let file = schema_file(
            r#"
name = "people"

[[fields]]
name = "age"
index = 2
type = "decimal"
"#,
        );

        let args = ValidateArgs {
            schema: file.path().to_path_buf(),
        };
        assert!(args.execute().is_err());
    }
}
