use tracing::info;
use turtle_core::{load_universe, EventSink, ScanReport, Screener, ScreenerConfig};

use crate::cli::UniverseArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{percent, yes_no, CommandResult};

pub async fn run(
    args: &UniverseArgs,
    config: &ScreenerConfig,
    screener: &Screener,
    sink: &dyn EventSink,
) -> Result<CommandResult, CliError> {
    let tickers = load_universe(&args.universe, &config.ticker_column)?;
    info!(universe = %args.universe.display(), tickers = tickers.len(), "starting scan");

    let report = screener.run(&tickers, sink).await;

    let mut result = CommandResult::ok(&report, ranked_table(&report))?;
    if report.candidates.is_empty() {
        result = result.with_warning("No Fresh ATH Stocks Found");
    } else if report.benchmark_return.is_none() {
        result = result.with_warning(format!(
            "benchmark {} return unavailable; outperformance not scored",
            report.benchmark
        ));
    }
    Ok(result)
}

fn ranked_table(report: &ScanReport) -> Table {
    let mut table = Table::new(vec![
        "Ticker",
        "ATH Price",
        "ATH Profit",
        "Outperformance",
        "Score",
    ]);
    for row in &report.rows {
        table.push_row(vec![
            row.ticker().to_string(),
            yes_no(row.ath_price()),
            yes_no(row.ath_profit()),
            yes_no(row.outperformance()),
            row.score().to_string(),
        ]);
    }

    if report.benchmark_return.is_some() {
        table.push_row(Vec::new());
        table.push_row(vec![
            format!("Benchmark {}", report.benchmark),
            String::new(),
            String::new(),
            percent(report.benchmark_return),
        ]);
    }
    table
}
