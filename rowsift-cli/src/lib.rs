//! rowsift CLI library
//!
//! This library provides the command-line interface for streaming
//! extraction of typed records from large HTML table dumps.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;
pub mod schema_source;

pub use error::{CliError, CliResult};
