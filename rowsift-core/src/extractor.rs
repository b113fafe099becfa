//! Chunked row extractor
//!
//! Reads a document forward in fixed-size chunks, reassembles rows that
//! straddle chunk seams, and turns each data row into a typed [`Record`].
//! Memory stays bounded by the unconsumed tail of the stream plus the
//! records of the current chunk.
//!
//! # Example
//!
//! ```
//! use rowsift_core::{extract, FieldSpec, FieldType, Schema};
//!
//! let doc = "<tr><th>A</th><th>B</th></tr>\
//!            <tr><td>1</td><td>x</td></tr>\
//!            <tr><td>2</td><td>y</td></tr>";
//! let schema = Schema::new(
//!     "demo",
//!     vec![
//!         FieldSpec::new("a", 0, FieldType::Integer),
//!         FieldSpec::new("b", 1, FieldType::Text),
//!     ],
//! );
//!
//! let records: Vec<_> = extract(doc.as_bytes(), 5, schema)?
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].get("b").unwrap().as_str(), Some("y"));
//! # Ok::<(), rowsift_core::ExtractError>(())
//! ```

use crate::buffer::{CarryBuffer, RowScanner};
use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::row::CellSplitter;
use crate::schema::{FieldSpec, Schema};
use crate::value::{Record, Value};
use encoding_rs::Encoding;
use serde::Serialize;
use std::collections::VecDeque;
use std::io::Read;
use std::sync::Arc;

/// Counters describing one extraction.
///
/// `rows_seen` always equals the header row (if any) plus emitted and short
/// rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    /// Reads that returned data
    pub chunks_read: u64,
    /// Total bytes read from the source
    pub bytes_read: u64,
    /// Complete rows found, header included
    pub rows_seen: u64,
    /// Whether the header row was found and skipped
    pub header_skipped: bool,
    /// Rows converted into records
    pub rows_emitted: u64,
    /// Rows dropped for having too few cells
    pub rows_short: u64,
    /// Fields that fell back to their default
    pub defaults_applied: u64,
    /// Incomplete bytes left over at end of stream
    pub trailing_bytes: u64,
}

impl ExtractStats {
    /// Add another extraction's counters to these
    pub fn absorb(&mut self, other: &ExtractStats) {
        self.chunks_read += other.chunks_read;
        self.bytes_read += other.bytes_read;
        self.rows_seen += other.rows_seen;
        self.header_skipped |= other.header_skipped;
        self.rows_emitted += other.rows_emitted;
        self.rows_short += other.rows_short;
        self.defaults_applied += other.defaults_applied;
        self.trailing_bytes += other.trailing_bytes;
    }
}

/// Turns row markup into records according to a schema
#[derive(Debug)]
struct RowConverter {
    fields: Vec<FieldSpec>,
    defaults: Vec<Value>,
    names: Arc<[String]>,
    min_cells: usize,
    cells: CellSplitter,
    encoding: &'static Encoding,
}

impl RowConverter {
    fn new(schema: &Schema, encoding: &'static Encoding) -> Result<Self> {
        Ok(Self {
            fields: schema.fields.clone(),
            defaults: schema.resolved_defaults()?,
            names: schema.shared_names(),
            min_cells: schema.min_cells(),
            cells: CellSplitter::new(&schema.markers.cell_tag)?,
            encoding,
        })
    }

    /// Convert one row; `None` if it has too few cells
    fn convert(&self, row: &[u8], stats: &mut ExtractStats) -> Option<Record> {
        let (text, _) = self.encoding.decode_without_bom_handling(row);
        let cells = self.cells.split(&text);

        if cells.len() < self.min_cells {
            log::trace!(
                "dropping row with {} cells (need {})",
                cells.len(),
                self.min_cells
            );
            return None;
        }

        let values = self
            .fields
            .iter()
            .zip(&self.defaults)
            .map(|(field, default)| {
                Value::parse(field.kind, &cells[field.index]).unwrap_or_else(|| {
                    stats.defaults_applied += 1;
                    default.clone()
                })
            })
            .collect();

        Some(Record::new(Arc::clone(&self.names), values))
    }
}

/// Lazy, forward-only sequence of records from a row-delimited document.
///
/// Yields `Err` at most once, for a failed read, and nothing after it.
/// Rows with too few cells and cells that fail conversion never produce
/// errors; see [`ExtractStats`] for how many rows were accepted.
#[derive(Debug)]
pub struct RowExtractor<R: Read> {
    reader: R,
    chunk_size: usize,
    buffer: CarryBuffer,
    scanner: RowScanner,
    converter: RowConverter,
    pending: VecDeque<Record>,
    header_pending: bool,
    finished: bool,
    stats: ExtractStats,
}

impl<R: Read> RowExtractor<R> {
    /// Validate `schema` and `config` and prepare to read from `reader`
    pub fn new(reader: R, schema: &Schema, config: &ExtractConfig) -> Result<Self> {
        config.validate()?;
        schema.validate()?;

        Ok(Self {
            reader,
            chunk_size: config.chunk_size,
            buffer: CarryBuffer::new(),
            scanner: RowScanner::new(&schema.markers)?,
            converter: RowConverter::new(schema, config.resolve_encoding()?)?,
            pending: VecDeque::new(),
            header_pending: true,
            finished: false,
            stats: ExtractStats::default(),
        })
    }

    /// Counters so far; final once the iterator is exhausted
    pub fn stats(&self) -> &ExtractStats {
        &self.stats
    }

    /// Consume the extractor, returning its counters
    pub fn into_stats(self) -> ExtractStats {
        self.stats
    }

    /// Read one chunk and queue the records of every row it completes.
    ///
    /// Returns `false` at end of stream.
    fn read_chunk(&mut self) -> Result<bool> {
        let bytes_read = self.buffer.fill(&mut self.reader, self.chunk_size)?;
        if bytes_read == 0 {
            // A leftover without a row start is inter-row noise, not data
            if self.scanner.opens_row(self.buffer.remaining()) {
                self.stats.trailing_bytes = self.buffer.len() as u64;
                log::debug!(
                    "discarding {} bytes of incomplete trailing row",
                    self.buffer.len()
                );
            }
            self.buffer.reset();
            return Ok(false);
        }

        self.stats.chunks_read += 1;
        self.stats.bytes_read += bytes_read as u64;

        let scan = self.buffer.scan_rows(&self.scanner);
        log::trace!(
            "chunk {}: {} bytes buffered, {} complete rows",
            self.stats.chunks_read,
            self.buffer.len(),
            scan.rows.len()
        );

        let Self {
            buffer,
            converter,
            pending,
            header_pending,
            stats,
            ..
        } = self;

        for range in scan.rows {
            stats.rows_seen += 1;

            if *header_pending {
                *header_pending = false;
                stats.header_skipped = true;
                log::debug!("skipping header row ({} bytes)", range.len());
                continue;
            }

            match converter.convert(buffer.row(range), stats) {
                Some(record) => {
                    stats.rows_emitted += 1;
                    pending.push_back(record);
                }
                None => stats.rows_short += 1,
            }
        }

        buffer.consume(scan.consumed);
        Ok(true)
    }
}

impl<R: Read> Iterator for RowExtractor<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }

            match self.read_chunk() {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    log::debug!(
                        "extraction complete: {} rows seen, {} emitted, {} short",
                        self.stats.rows_seen,
                        self.stats.rows_emitted,
                        self.stats.rows_short
                    );
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for RowExtractor<R> {}

/// Extract records from `source`, reading `chunk_size` bytes at a time
pub fn extract<R: Read>(source: R, chunk_size: usize, schema: Schema) -> Result<RowExtractor<R>> {
    RowExtractor::new(
        source,
        &schema,
        &ExtractConfig::new().with_chunk_size(chunk_size),
    )
}

/// Extract every record, returning them with the final counters
pub fn extract_all<R: Read>(
    source: R,
    schema: &Schema,
    config: &ExtractConfig,
) -> Result<(Vec<Record>, ExtractStats)> {
    let mut extractor = RowExtractor::new(source, schema, config)?;
    let records = extractor
        .by_ref()
        .collect::<std::result::Result<Vec<_>, ExtractError>>()?;
    Ok((records, extractor.into_stats()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use std::io::{self, Cursor};

    fn two_field_schema() -> Schema {
        Schema::new(
            "t",
            vec![
                FieldSpec::new("n", 0, FieldType::Integer).with_default("0"),
                FieldSpec::new("s", 1, FieldType::Text),
            ],
        )
    }

    #[test]
    fn test_stats_add_up() {
        let doc = "<tr><td>h</td><td>h</td></tr>\
                   <tr><td>1</td><td>a</td></tr>\
                   <tr><td>short</td></tr>\
                   <tr><td>x</td><td>b</td></tr>\
                   <tr><td>3";
        let (records, stats) =
            extract_all(doc.as_bytes(), &two_field_schema(), &ExtractConfig::new()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(stats.rows_seen, 4);
        assert!(stats.header_skipped);
        assert_eq!(stats.rows_emitted, 2);
        assert_eq!(stats.rows_short, 1);
        assert_eq!(stats.defaults_applied, 1);
        assert_eq!(stats.trailing_bytes, "<tr><td>3".len() as u64);
        assert_eq!(stats.bytes_read, doc.len() as u64);
    }

    #[test]
    fn test_invalid_config_fails_before_reading() {
        let result = RowExtractor::new(
            Cursor::new(Vec::new()),
            &two_field_schema(),
            &ExtractConfig::new().with_chunk_size(0),
        );
        assert!(matches!(result, Err(ExtractError::InvalidConfig { .. })));
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.served = true;
            let data = b"<tr><td>h</td></tr><tr><td>1</td><td>a</td></tr>";
            let n = data.len().min(buf.len());
            buf[..n].copy_from_slice(&data[..n]);
            Ok(n)
        }
    }

    #[test]
    fn test_io_error_propagates_once() {
        let mut extractor = extract(FailingReader { served: false }, 4096, two_field_schema())
            .unwrap();

        assert!(matches!(extractor.next(), Some(Ok(_))));
        match extractor.next() {
            Some(Err(ExtractError::Io(e))) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("expected I/O error, got {other:?}"),
        }
        assert!(extractor.next().is_none());
    }

    #[test]
    fn test_latin1_rows_decoded() {
        let mut doc = b"<tr><td>h</td><td>h</td></tr><tr><td>1</td><td>".to_vec();
        doc.push(0xE9); // é in windows-1252
        doc.extend_from_slice(b"</td></tr>");

        let config = ExtractConfig::new().with_encoding("latin1").with_chunk_size(3);
        let (records, _) = extract_all(doc.as_slice(), &two_field_schema(), &config).unwrap();
        assert_eq!(records[0].get("s"), Some(&Value::Text("é".to_string())));
    }

    #[test]
    fn test_absorb_sums_counters() {
        let mut total = ExtractStats::default();
        let one = ExtractStats {
            chunks_read: 2,
            bytes_read: 100,
            rows_seen: 4,
            header_skipped: true,
            rows_emitted: 2,
            rows_short: 1,
            defaults_applied: 3,
            trailing_bytes: 5,
        };
        total.absorb(&one);
        total.absorb(&one);

        assert_eq!(total.rows_seen, 8);
        assert_eq!(total.rows_emitted, 4);
        assert_eq!(total.bytes_read, 200);
        assert!(total.header_skipped);
    }

    #[test]
    fn test_empty_document() {
        let (records, stats) =
            extract_all(io::empty(), &two_field_schema(), &ExtractConfig::new()).unwrap();
        assert!(records.is_empty());
        assert!(!stats.header_skipped);
        assert_eq!(stats.chunks_read, 0);
    }
}
