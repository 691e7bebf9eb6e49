use serde::Serialize;
use tracing::debug;
use turtle_core::screen::outperforms;
use turtle_core::{Screener, Ticker};

use crate::cli::TickerArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{percent, yes_no, CommandResult};

#[derive(Debug, Serialize)]
struct PerformanceData {
    ticker: Ticker,
    ticker_return: f64,
    benchmark: Ticker,
    benchmark_return: Option<f64>,
    outperformance: bool,
}

pub async fn run(args: &TickerArgs, screener: &Screener) -> Result<CommandResult, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    let ticker_return = screener.one_year_return(&ticker).await?;

    let mut warning = None;
    let benchmark_return = match screener.benchmark_return().await {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(benchmark = %screener.benchmark(), %error, "benchmark return unavailable");
            warning = Some(format!(
                "benchmark {} return unavailable: {error}",
                screener.benchmark()
            ));
            None
        }
    };

    let data = PerformanceData {
        outperformance: outperforms(Some(ticker_return), benchmark_return),
        ticker,
        ticker_return,
        benchmark: screener.benchmark().clone(),
        benchmark_return,
    };

    let mut table = Table::new(vec!["Ticker", "1Y Return"]);
    table.push_row(vec![data.ticker.to_string(), percent(Some(data.ticker_return))]);
    table.push_row(vec![data.benchmark.to_string(), percent(data.benchmark_return)]);
    table.push_row(Vec::new());
    table.push_row(vec![String::from("Outperformance"), yes_no(data.outperformance)]);

    let result = CommandResult::ok(&data, table)?;
    Ok(match warning {
        Some(warning) => result.with_warning(warning),
        None => result,
    })
}
