//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use rowsift_core::Record;
use std::io::Write;

/// Markdown formatter - outputs records as a markdown table
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    record_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            record_count: 0,
        }
    }
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\n', '\r'], " ")
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_record(&mut self, record: &Record) -> Result<()> {
        if self.record_count == 0 {
            let names: Vec<String> = record.names().iter().map(|n| escape(n)).collect();
            writeln!(self.writer, "| {} |", names.join(" | "))?;
            writeln!(self.writer, "|{}", "---|".repeat(names.len()))?;
        }

        let cells: Vec<String> = record
            .values()
            .iter()
            .map(|v| escape(&v.to_string()))
            .collect();
        writeln!(self.writer, "| {} |", cells.join(" | "))?;
        self.record_count += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total rows: {}*", self.record_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
