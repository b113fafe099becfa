//! Streaming extraction of typed records from large row-delimited documents
//!
//! This crate reads HTML table dumps (or anything shaped like them) in
//! fixed-size chunks, reassembles rows that straddle chunk seams, skips the
//! header row, and converts the cells of every other row into typed values
//! according to a positional [`Schema`]. Memory is bounded by the unconsumed
//! tail of the stream, not by the document size.

#![warn(missing_docs)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod input;
pub mod row;
pub mod schema;
pub mod summary;
pub mod value;

// Re-export key types
pub use config::ExtractConfig;
pub use error::{ExtractError, Result};
pub use extractor::{extract, extract_all, ExtractStats, RowExtractor};
pub use input::Input;
pub use schema::{list_presets, preset, FieldSpec, FieldType, RowMarkers, Schema};
pub use summary::{FieldSummary, Filter, Summary, SummaryBuilder};
pub use value::{Record, Value};
