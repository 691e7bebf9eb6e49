mod cli;
mod commands;
mod error;
mod metadata;
mod output;

use std::io;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use turtle_core::{EventSink, TracingSink};

use crate::cli::{Cli, OutputFormat};
use crate::commands::CommandResult;
use crate::error::CliError;
use crate::metadata::{Envelope, Metadata};
use crate::output::stream_writer::{NdjsonEventSink, NdjsonStreamWriter, StreamEventError};
use crate::output::ConsoleSink;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.stream {
        return run_stream(cli).await;
    }

    let started = Instant::now();
    let sink: &dyn EventSink = match cli.format {
        OutputFormat::Table => &ConsoleSink,
        OutputFormat::Json => &TracingSink,
    };

    let result = commands::run(cli, sink).await?;
    let table = result.table.clone();
    let envelope = into_envelope(result, started);
    output::render(&envelope, &table, cli.format, cli.pretty)
}

async fn run_stream(cli: &Cli) -> Result<(), CliError> {
    let started = Instant::now();
    let writer = Arc::new(Mutex::new(NdjsonStreamWriter::new(io::stdout())));
    let sink = NdjsonEventSink::new(writer.clone());

    with_writer(&writer, |w| w.emit_start(None))?;

    match commands::run(cli, &sink).await {
        Ok(result) => {
            let warning_count = result.warnings.len();
            let envelope = into_envelope(result, started);
            let chunk = serde_json::to_value(&envelope)?;
            with_writer(&writer, |w| w.emit_chunk(Some(chunk)))?;
            with_writer(&writer, |w| {
                w.emit_end(Some(json!({
                    "status": "ok",
                    "warning_count": warning_count,
                })))
            })
        }
        Err(error) => {
            let stream_error = StreamEventError::new(error.code(), error.to_string());
            with_writer(&writer, |w| w.emit_error(stream_error, None))?;
            with_writer(&writer, |w| w.emit_end(Some(json!({ "status": "error" }))))?;
            Err(error)
        }
    }
}

fn with_writer<F>(
    writer: &Mutex<NdjsonStreamWriter<io::Stdout>>,
    f: F,
) -> Result<(), CliError>
where
    F: FnOnce(&mut NdjsonStreamWriter<io::Stdout>) -> Result<(), CliError>,
{
    match writer.lock() {
        Ok(mut guard) => f(&mut guard),
        Err(poisoned) => f(&mut poisoned.into_inner()),
    }
}

fn into_envelope(result: CommandResult, started: Instant) -> Envelope<serde_json::Value> {
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = Metadata::new(latency_ms);
    for warning in result.warnings {
        meta.push_warning(warning);
    }

    Envelope {
        meta,
        data: result.data,
    }
}
