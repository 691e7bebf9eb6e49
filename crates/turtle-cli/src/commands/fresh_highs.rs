use serde::Serialize;
use turtle_core::{load_universe, EventSink, ScanEvent, Screener, ScreenerConfig, Stage, Ticker};

use crate::cli::UniverseArgs;
use crate::error::CliError;
use crate::output::Table;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct FreshHighsData {
    universe_size: usize,
    candidates: Vec<Ticker>,
}

pub async fn run(
    args: &UniverseArgs,
    config: &ScreenerConfig,
    screener: &Screener,
    sink: &dyn EventSink,
) -> Result<CommandResult, CliError> {
    let tickers = load_universe(&args.universe, &config.ticker_column)?;

    sink.emit(ScanEvent::UniverseLoaded {
        total: tickers.len(),
    });
    sink.emit(ScanEvent::StageStarted {
        stage: Stage::FreshHigh,
    });
    let candidates = screener.fresh_highs(&tickers, sink).await;

    let mut table = Table::new(vec!["Ticker"]);
    for ticker in &candidates {
        table.push_row(vec![ticker.to_string()]);
    }

    let data = FreshHighsData {
        universe_size: tickers.len(),
        candidates,
    };
    let result = CommandResult::ok(&data, table)?;

    if data.candidates.is_empty() {
        sink.emit(ScanEvent::NoCandidates);
        return Ok(result.with_warning("No Fresh ATH Stocks Found"));
    }
    Ok(result)
}
