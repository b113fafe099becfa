//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod extract;
pub mod generate_schema;
pub mod source;
pub mod summarize;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract typed records from HTML table dumps
    Extract(extract::ExtractArgs),

    /// Summarize extracted records without writing them out
    Summarize(summarize::SummarizeArgs),

    /// Validate a schema file
    Validate(validate::ValidateArgs),

    /// Generate a schema template
    GenerateSchema(generate_schema::GenerateSchemaArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List embedded schema presets
    Presets,

    /// List available output formats
    Formats,
}

/// Print the embedded presets with their fields
pub fn list_presets() -> Result<()> {
    println!("Available presets:");
    for name in rowsift_core::list_presets() {
        let schema = rowsift_core::preset(name)?;
        println!("  {:<14} {}", name, schema.description);
        println!(
            "  {:<14} fields: {} (rows need {} cells)",
            "",
            schema.names().join(", "),
            schema.min_cells()
        );
    }
    Ok(())
}

/// Print the output formats
pub fn list_formats() {
    println!("Available output formats:");
    println!("  text      - Tab-separated values with a header line");
    println!("  json      - JSON array of records");
    println!("  markdown  - Markdown table");
}

/// Initialize logging based on verbosity level
pub fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // A second initialization (tests, repeated calls) keeps the first logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}
