//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use rowsift_core::Record;
use std::io::Write;

/// Plain text formatter - tab-separated values under a header line
pub struct TextFormatter<W: Write> {
    writer: W,
    wrote_header: bool,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            wrote_header: false,
        }
    }
}

/// Keep one record per line
fn clean(field: &str) -> String {
    field.replace(['\t', '\n', '\r'], " ")
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_record(&mut self, record: &Record) -> Result<()> {
        if !self.wrote_header {
            writeln!(self.writer, "{}", record.names().join("\t"))?;
            self.wrote_header = true;
        }

        let line: Vec<String> = record.values().iter().map(|v| clean(&v.to_string())).collect();
        writeln!(self.writer, "{}", line.join("\t"))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
