use crate::data_source::{MarketData, SourceError};
use crate::{PriceSeries, Ticker};

/// Percent change from `first` to `last`.
///
/// `None` when the starting price cannot anchor a return.
pub fn percent_return(first: f64, last: f64) -> Option<f64> {
    if !first.is_finite() || !last.is_finite() || first <= 0.0 {
        return None;
    }

    Some((last / first - 1.0) * 100.0)
}

/// Return between the first and last bar with a close, chronologically.
pub fn series_return(series: &PriceSeries) -> Option<f64> {
    let first = series.bars.iter().find_map(|bar| bar.return_close())?;
    let last = series.bars.iter().rev().find_map(|bar| bar.return_close())?;
    percent_return(first, last)
}

/// Trailing one-year percent return of `ticker`.
pub async fn one_year_return(market: &dyn MarketData, ticker: &Ticker) -> Result<f64, SourceError> {
    let series = market.one_year(ticker).await?;
    if series.is_empty() {
        return Err(SourceError::no_data(format!("no one-year closes for {ticker}")));
    }

    series_return(&series)
        .ok_or_else(|| SourceError::no_data(format!("one-year return undefined for {ticker}")))
}

/// Candidate beats the benchmark only when both returns are known.
pub fn outperforms(candidate: Option<f64>, benchmark: Option<f64>) -> bool {
    matches!((candidate, benchmark), (Some(candidate), Some(benchmark)) if candidate > benchmark)
}
