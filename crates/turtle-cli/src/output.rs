pub mod stream_writer;

use std::io::{self, Write};

use serde_json::Value;
use turtle_core::{EventSink, ScanEvent, TracingSink};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::metadata::Envelope;

/// Column-aligned text table for the console format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut widths = self.headers.iter().map(|h| h.len()).collect::<Vec<_>>();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let headers = self.headers.iter().map(|h| (*h).to_owned()).collect::<Vec<_>>();
        write_row(out, &headers, &widths)?;
        let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
        write_row(out, &rule, &widths)?;
        for row in &self.rows {
            write_row(out, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}

pub fn render(
    envelope: &Envelope<Value>,
    table: &Table,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => {
            for warning in &envelope.meta.warnings {
                writeln!(out, "warning: {warning}")?;
            }
            table.write_to(&mut out)?;
        }
    }

    Ok(())
}

/// Prints stage headers and detections as console lines; per-ticker noise
/// goes to the log instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: ScanEvent) {
        match event {
            ScanEvent::Progress { .. } | ScanEvent::Skipped { .. } | ScanEvent::NoCandidates => {
                TracingSink.emit(event)
            }
            ScanEvent::StageStarted { .. } => println!("\n{event}"),
            _ => println!("{event}"),
        }
    }
}
