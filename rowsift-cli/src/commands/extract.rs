//! Extract command implementation

use super::init_logging;
use super::source::{RunReport, SourceArgs};
use crate::error::CliError;
use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Arguments for the extract command
#[derive(Debug, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from config, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated values with a header line
    Text,
    /// JSON array of records
    Json,
    /// Markdown table
    Markdown,
}

impl ExtractArgs {
    /// Execute the extract command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.source.verbose, self.source.quiet);

        log::info!("Starting extraction");
        log::debug!("Arguments: {:?}", self);

        let session = self.source.prepare()?;
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_str(&session.config.output.default_format, true)
                .map_err(|_| {
                    CliError::ConfigError(format!(
                        "unknown output format '{}'",
                        session.config.output.default_format
                    ))
                })?,
        };

        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            )),
            None => Box::new(BufWriter::new(io::stdout())),
        };

        let mut formatter: Box<dyn OutputFormatter> = match format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => {
                Box::new(JsonFormatter::new(writer, session.config.output.pretty_json))
            }
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        };

        let report = session.run(|record| formatter.format_record(&record))?;
        formatter.finish()?;

        if !self.source.quiet {
            print_report(&mut io::stderr(), &report)?;
        }

        Ok(())
    }
}

/// Write the processing report
pub fn print_report(w: &mut impl Write, report: &RunReport) -> io::Result<()> {
    let stats = &report.stats;
    writeln!(
        w,
        "Processed {} file(s), {} bytes in {:.2}s",
        report.files,
        stats.bytes_read,
        report.elapsed.as_secs_f64()
    )?;
    writeln!(w, "  rows:      {}", stats.rows_seen)?;
    writeln!(w, "  accepted:  {}", stats.rows_emitted)?;
    writeln!(w, "  short:     {}", stats.rows_short)?;
    writeln!(w, "  defaults:  {}", stats.defaults_applied)?;
    writeln!(w, "  rows/sec:  {:.0}", report.rows_per_sec())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsift_core::ExtractStats;
    use std::time::Duration;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(
            OutputFormat::from_str("JSON", true).unwrap(),
            OutputFormat::Json
        );
        assert!(OutputFormat::from_str("csv", true).is_err());
    }

    #[test]
    fn test_print_report() {
        let report = RunReport {
            stats: ExtractStats {
                rows_seen: 12,
                rows_emitted: 10,
                rows_short: 1,
                header_skipped: true,
                defaults_applied: 3,
                ..ExtractStats::default()
            },
            files: 1,
            elapsed: Duration::from_secs(2),
        };

        let mut out = Vec::new();
        print_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Processed 1 file(s)"));
        assert!(text.contains("accepted:  10"));
        assert!(text.contains("short:     1"));
        assert!(text.contains("rows/sec:  6"));
    }
}
