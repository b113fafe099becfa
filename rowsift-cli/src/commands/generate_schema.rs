//! Generate schema command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-schema command
#[derive(Debug, Args)]
pub struct GenerateSchemaArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Name recorded in the schema
    #[arg(short, long, value_name = "NAME", default_value = "custom")]
    pub name: String,
}

impl GenerateSchemaArgs {
    /// Execute the generate-schema command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating schema template...");
        println!("  Name: {}", self.name);
        println!("  Output file: {}", self.output.display());

        let template = self.generate_template();

        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Schema template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the field list to match your table's columns");
        println!("2. Validate your schema:");
        println!("   rowsift validate --schema {}", self.output.display());
        println!("3. Use it for extraction:");
        println!(
            "   rowsift extract -i input.html --schema {}",
            self.output.display()
        );

        Ok(())
    }

    /// Generate template schema content
    fn generate_template(&self) -> String {
        format!(
            r#"# Extraction schema: {name}

name = "{name}"
description = "Describe the table this schema reads"

# How rows and cells are recognized in the document
[markers]
# Text that opens a row; "<tr" also matches "<tr class=...>"
row_start = "<tr"
# Text that closes a row
row_end = "</tr>"
# Tag of the cells that count as columns; <th> header cells are ignored
cell_tag = "td"

# One entry per output field, in output order.
#
# index   - zero-based cell position in the row; rows with fewer cells
#           than the highest index + 1 are dropped
# type    - text, integer, float, seconds (seconds since midnight)
#           or clock (H:MM:SS / MM:SS, reported in minutes)
# default - used when the cell does not convert; without one the
#           field is left empty (null)

[[fields]]
name = "id"
index = 0
type = "text"

[[fields]]
name = "count"
index = 1
type = "integer"
default = "0"

[[fields]]
name = "start_time"
index = 2
type = "seconds"
"#,
            name = self.name
        )
    }
}
