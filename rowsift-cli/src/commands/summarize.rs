//! Summarize command implementation

use super::init_logging;
use super::source::{RunReport, SourceArgs};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use rowsift_core::{FieldSummary, FieldType, Filter, Summary, SummaryBuilder, Value};
use std::io::{self, Write};

/// Arguments for the summarize command
#[derive(Debug, Args)]
pub struct SummarizeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Keep only records whose field equals VALUE (repeatable, all must match)
    #[arg(long = "where", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Service date used to show seconds fields as timestamps
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub service_date: Option<NaiveDate>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl SummarizeArgs {
    /// Execute the summarize command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.source.verbose, self.source.quiet);

        let filters = self
            .filters
            .iter()
            .map(|expr| expr.parse::<Filter>())
            .collect::<Result<Vec<_>, _>>()?;

        let session = self.source.prepare()?;
        let mut builder = SummaryBuilder::new(&session.schema, filters)?;

        let report = session.run(|record| {
            builder.push(&record);
            Ok(())
        })?;
        let summary = builder.finish();

        let stdout = io::stdout();
        let mut out = stdout.lock();
        if self.json {
            let doc = serde_json::json!({
                "schema": session.schema.name,
                "files": report.files,
                "service_date": self.service_date.map(|d| d.to_string()),
                "stats": report.stats,
                "summary": summary,
            });
            serde_json::to_writer_pretty(&mut out, &doc)
                .context("Failed to write summary")?;
            writeln!(out)?;
        } else {
            render_text(&mut out, &session.schema.name, &report, &summary, self.service_date)?;
        }

        Ok(())
    }
}

fn render_value(value: Option<&Value>, kind: FieldType, date: Option<NaiveDate>) -> String {
    match (value, kind, date) {
        (None, _, _) => "-".to_string(),
        (Some(v), FieldType::Seconds, Some(date)) => v
            .timestamp_on(date)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| v.to_string()),
        (Some(v), _, _) => v.to_string(),
    }
}

fn render_count(count: Option<u64>) -> String {
    count.map_or_else(|| "-".to_string(), |c| c.to_string())
}

fn render_field(field: &FieldSummary, date: Option<NaiveDate>) -> String {
    format!(
        "  {:<16} {:<8} {:>9} {:>7} {:>9} {:>12} {:>8}  {} .. {}",
        field.name,
        field.kind.as_str(),
        field.present,
        field.nulls,
        render_count(field.distinct),
        field.sum.map_or_else(|| "-".to_string(), |s| format!("{s:.2}")),
        render_count(field.at_least_one),
        render_value(field.min.as_ref(), field.kind, date),
        render_value(field.max.as_ref(), field.kind, date),
    )
}

/// Write the summary as an aligned table
pub fn render_text(
    w: &mut impl Write,
    schema: &str,
    report: &RunReport,
    summary: &Summary,
    service_date: Option<NaiveDate>,
) -> io::Result<()> {
    writeln!(w, "Schema:   {schema}")?;
    writeln!(w, "Files:    {}", report.files)?;
    writeln!(
        w,
        "Records:  {} matched of {} extracted ({} rows, {} short)",
        summary.matched, summary.scanned, report.stats.rows_seen, report.stats.rows_short
    )?;
    if let Some(date) = service_date {
        writeln!(w, "Service:  {date}")?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "  {:<16} {:<8} {:>9} {:>7} {:>9} {:>12} {:>8}  range",
        "field", "type", "present", "nulls", "distinct", "sum", ">=1"
    )?;
    for field in &summary.fields {
        writeln!(w, "{}", render_field(field, service_date))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsift_core::{extract, preset};

    fn stop_row(vehicle: &str, arrive: &str, ons: &str) -> String {
        let mut cells = vec!["0"; 16];
        cells[0] = vehicle;
        cells[8] = arrive;
        cells[13] = ons;
        let cells: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<tr>{cells}</tr>\n")
    }

    fn summary_for(filters: Vec<Filter>) -> (Summary, RunReport) {
        let schema = preset("stop-events").unwrap();
        let doc = format!(
            "<tr><th>vehicle_number</th></tr>\n{}{}{}",
            stop_row("4062", "26125", "2"),
            stop_row("4062", "90000", "0"),
            stop_row("3010", "-", "5")
        );
        let mut builder = SummaryBuilder::new(&schema, filters).unwrap();
        let mut extractor = extract(doc.as_bytes(), 16, schema).unwrap();
        for record in &mut extractor {
            builder.push(&record.unwrap());
        }
        let report = RunReport {
            stats: extractor.into_stats(),
            files: 1,
            ..RunReport::default()
        };
        (builder.finish(), report)
    }

    #[test]
    fn test_render_text_with_service_date() {
        let (summary, report) = summary_for(vec!["vehicle_number=4062".parse().unwrap()]);
        let date = NaiveDate::from_ymd_opt(2022, 4, 1);

        let mut out = Vec::new();
        render_text(&mut out, "stop-events", &report, &summary, date).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Records:  2 matched of 3 extracted"));
        assert!(text.contains("Service:  2022-04-01"));
        assert!(text.contains("2022-04-01 07:15:25 .. 2022-04-02 01:00:00"));
    }

    #[test]
    fn test_render_text_without_date_uses_clock_text() {
        let (summary, report) = summary_for(Vec::new());

        let mut out = Vec::new();
        render_text(&mut out, "stop-events", &report, &summary, None).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("07:15:25 .. 25:00:00"));
        assert!(!text.contains("Service:"));
    }

    #[test]
    fn test_render_value_missing() {
        assert_eq!(render_value(None, FieldType::Float, None), "-");
        assert_eq!(render_count(None), "-");
    }
}
