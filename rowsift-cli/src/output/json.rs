//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use rowsift_core::Record;
use std::io::Write;

/// JSON formatter - outputs records as a JSON array of objects.
///
/// Records are written as they arrive, so output size does not grow memory.
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    records: usize,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            records: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_record(&mut self, record: &Record) -> Result<()> {
        let separator = if self.records == 0 { "[" } else { "," };
        writeln!(self.writer, "{separator}")?;

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, record)?;
        } else {
            serde_json::to_writer(&mut self.writer, record)?;
        }
        self.records += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.records == 0 {
            writeln!(self.writer, "[]")?;
        } else {
            writeln!(self.writer)?;
            writeln!(self.writer, "]")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
