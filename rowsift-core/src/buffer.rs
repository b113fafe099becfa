//! Carry-over buffer for reading row-delimited documents in fixed-size chunks
//!
//! Rows do not line up with reads, so every scan covers the whole retained
//! buffer: a marker split across the previous and the current chunk is only
//! visible once both halves are present.

use crate::error::{ExtractError, Result};
use crate::schema::RowMarkers;
use regex::bytes::Regex;
use std::io::{self, Read};
use std::ops::Range;

/// Compiled row start/end markers
#[derive(Debug, Clone)]
pub struct RowScanner {
    start: Regex,
    end: Regex,
    start_len: usize,
}

impl RowScanner {
    /// Compile the row markers as literal byte patterns
    pub fn new(markers: &RowMarkers) -> Result<Self> {
        let literal = |marker: &str| {
            Regex::new(&regex::escape(marker)).map_err(|e| ExtractError::InvalidSchema {
                reason: format!("bad row marker '{marker}': {e}"),
            })
        };

        Ok(Self {
            start: literal(&markers.row_start)?,
            end: literal(&markers.row_end)?,
            start_len: markers.row_start.len(),
        })
    }

    /// Whether `data` contains a row start marker
    pub fn opens_row(&self, data: &[u8]) -> bool {
        self.start.is_match(data)
    }
}

/// Result of scanning the buffer for complete rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowScan {
    /// Complete rows in document order, relative to the unconsumed data
    pub rows: Vec<Range<usize>>,
    /// Bytes that can be dropped once the rows are processed
    pub consumed: usize,
}

/// Holds the unconsumed tail of the stream between reads
#[derive(Debug, Default)]
pub struct CarryBuffer {
    /// Retained bytes; everything before `position` is already consumed
    data: Vec<u8>,
    /// Start of the unconsumed data
    position: usize,
    /// Read target, reused across fills
    scratch: Vec<u8>,
}

impl CarryBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Read up to `chunk_size` bytes and append them.
    ///
    /// Returns the number of bytes read; 0 means end of stream.
    pub fn fill(&mut self, reader: &mut impl Read, chunk_size: usize) -> io::Result<usize> {
        // Drop what previous scans consumed before growing
        if self.position > 0 {
            self.data.drain(..self.position);
            self.position = 0;
        }

        self.scratch.resize(chunk_size, 0);
        let bytes_read = loop {
            match reader.read(&mut self.scratch) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };

        self.data.extend_from_slice(&self.scratch[..bytes_read]);
        Ok(bytes_read)
    }

    /// Find complete rows in the unconsumed data.
    ///
    /// The i-th start marker is paired with the i-th end marker; a pair counts
    /// as a row only when the start comes first. The consumed count ends after
    /// the last complete row, extended past any end marker that no start
    /// marker precedes, and past inter-row bytes when no row has opened.
    pub fn scan_rows(&self, scanner: &RowScanner) -> RowScan {
        let data = self.remaining();
        let mut rows = Vec::new();
        let mut base = 0;

        loop {
            let window = &data[base..];
            let starts: Vec<usize> = scanner.start.find_iter(window).map(|m| m.start()).collect();
            let ends: Vec<usize> = scanner.end.find_iter(window).map(|m| m.end()).collect();

            let mut cut = 0;
            for (&start, &end) in starts.iter().zip(ends.iter()) {
                if start < end {
                    rows.push(base + start..base + end);
                    cut = end;
                }
            }

            // An end marker with no start before it would shift every later
            // pairing, so drop it and pair again from there
            let next_start = starts
                .iter()
                .copied()
                .find(|&s| s >= cut)
                .unwrap_or(window.len());
            let dangling = ends
                .iter()
                .copied()
                .filter(|&e| e > cut && e <= next_start)
                .last();

            match dangling {
                Some(end) => base += end,
                None => {
                    base += cut;
                    break;
                }
            }
        }

        if !scanner.opens_row(&data[base..]) {
            // Only a split start marker can matter here
            let keep = scanner.start_len.saturating_sub(1);
            base = base.max(data.len().saturating_sub(keep));
        }

        RowScan {
            rows,
            consumed: base,
        }
    }

    /// Mark `n` bytes of the unconsumed data as consumed
    pub fn consume(&mut self, n: usize) {
        self.position = (self.position + n).min(self.data.len());
    }

    /// Unconsumed data
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.position..]
    }

    /// Bytes of one scanned row
    pub fn row(&self, range: Range<usize>) -> &[u8] {
        &self.remaining()[range]
    }

    /// Number of unconsumed bytes
    pub fn len(&self) -> usize {
        self.data.len() - self.position
    }

    /// Whether nothing is left unconsumed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard everything
    pub fn reset(&mut self) {
        self.data.clear();
        self.position = 0;
    }
}
