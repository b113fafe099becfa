//! rowsift command-line entry point

use anyhow::Result;
use clap::Parser;
use rowsift_cli::commands::{Commands, ListCommands};

/// Stream typed records out of large HTML table dumps
#[derive(Debug, Parser)]
#[command(name = "rowsift", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => args.execute(),
        Commands::Summarize(args) => args.execute(),
        Commands::Validate(args) => args.execute(),
        Commands::GenerateSchema(args) => args.execute(),
        Commands::List { subcommand } => match subcommand {
            ListCommands::Presets => rowsift_cli::commands::list_presets(),
            ListCommands::Formats => {
                rowsift_cli::commands::list_formats();
                Ok(())
            }
        },
    }
}
