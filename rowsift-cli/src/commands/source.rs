//! Input options shared by the extracting commands

use crate::config::CliConfig;
use crate::input::{resolve_patterns, FileReader};
use crate::progress::ProgressReporter;
use crate::schema_source::SchemaSource;
use anyhow::{Context, Result};
use clap::Args;
use rowsift_core::{ExtractConfig, ExtractStats, Input, Record, RowExtractor, Schema};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Where records come from and how they are read
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Embedded schema preset (see `rowsift list presets`)
    #[arg(short, long, value_name = "NAME", conflicts_with = "schema")]
    pub preset: Option<String>,

    /// External schema file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Bytes per read (overrides the config file)
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Document encoding label, e.g. utf-8 or windows-1252
    #[arg(short, long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Everything resolved before the first read
#[derive(Debug)]
pub struct Session {
    /// Loaded CLI configuration
    pub config: CliConfig,
    /// Schema applied to every file
    pub schema: Schema,
    /// Read settings
    pub extract: ExtractConfig,
    /// Input files in processing order
    pub files: Vec<PathBuf>,
    quiet: bool,
}

/// Totals over all files of one run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Merged extraction counters
    pub stats: ExtractStats,
    /// Files processed
    pub files: usize,
    /// Wall time
    pub elapsed: Duration,
}

impl RunReport {
    /// Rows scanned per second of wall time
    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.stats.rows_seen as f64 / secs
        } else {
            0.0
        }
    }
}

impl SourceArgs {
    /// Resolve inputs, configuration and schema
    pub fn prepare(&self) -> Result<Session> {
        let config = CliConfig::load_or_default(self.config.as_deref())?;
        let source = SchemaSource::select(
            self.schema.clone(),
            self.preset.clone(),
            &config.extraction.default_preset,
        );
        log::info!("Using schema {}", source.display_name());
        let schema = source.load()?;

        let extract = config.extract_config(self.chunk_size, self.encoding.as_deref());
        extract
            .validate()
            .context("Invalid extraction settings")?;

        let files = resolve_patterns(&self.input)?;
        log::info!("Found {} file(s) to process", files.len());

        Ok(Session {
            config,
            schema,
            extract,
            files,
            quiet: self.quiet,
        })
    }
}

impl Session {
    /// Extract every file in order, handing each record to `on_record`.
    ///
    /// Each file is its own document, so each has its own header row.
    pub fn run<F>(&self, mut on_record: F) -> Result<RunReport>
    where
        F: FnMut(Record) -> Result<()>,
    {
        let start = Instant::now();
        let mut report = RunReport::default();
        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(self.files.len() as u64);

        for path in &self.files {
            match Input::from_file(path).estimated_size() {
                Some(size) => log::debug!("Extracting {} ({} bytes)", path.display(), size),
                None => log::debug!("Extracting {}", path.display()),
            }
            let reader = FileReader::open(path)?;
            let mut extractor = RowExtractor::new(reader, &self.schema, &self.extract)
                .with_context(|| format!("Failed to start extraction of {}", path.display()))?;

            for record in &mut extractor {
                let record =
                    record.with_context(|| format!("Failed to read {}", path.display()))?;
                on_record(record)?;
            }

            let stats = extractor.into_stats();
            log::debug!(
                "{}: {} rows, {} accepted, {} short",
                path.display(),
                stats.rows_seen,
                stats.rows_emitted,
                stats.rows_short
            );
            report.stats.absorb(&stats);
            report.files += 1;

            let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
            progress.file_completed(&name);
        }

        progress.finish();
        report.elapsed = start.elapsed();
        Ok(report)
    }
}
