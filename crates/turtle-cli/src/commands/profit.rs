use serde::Serialize;
use turtle_core::{ProfitRecord, Screener, Ticker};

use crate::cli::TickerArgs;
use crate::error::CliError;
use crate::output::Table;

use super::{yes_no, CommandResult};

#[derive(Debug, Serialize)]
struct ProfitData {
    ticker: Ticker,
    record: ProfitRecord,
    ttm: Option<f64>,
    max: Option<f64>,
    ttm_peak: bool,
}

pub async fn run(args: &TickerArgs, screener: &Screener) -> Result<CommandResult, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    let record = screener.profit_record(&ticker).await?;

    let data = ProfitData {
        ttm: record.ttm(),
        max: record.max_value(),
        ttm_peak: record.is_ttm_peak(),
        ticker,
        record,
    };

    let result = CommandResult::ok(&data, profit_table(&data))?;
    if data.ttm.is_none() {
        return Ok(result.with_warning(format!("{}: TTM net profit unavailable", data.ticker)));
    }
    Ok(result)
}

fn profit_table(data: &ProfitData) -> Table {
    let mut table = Table::new(vec!["Period", "Net Profit"]);
    for period in &data.record.periods {
        table.push_row(vec![
            period.period.clone(),
            period
                .net_profit
                .map_or_else(|| String::from("-"), |value| value.to_string()),
        ]);
    }
    table.push_row(Vec::new());
    table.push_row(vec![String::from("ATH Profit"), yes_no(data.ttm_peak)]);
    table
}
