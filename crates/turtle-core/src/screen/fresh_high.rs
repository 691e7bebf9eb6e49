use tracing::debug;

use crate::data_source::MarketData;
use crate::events::{EventSink, ScanEvent};
use crate::{Bar, Ticker};

/// Latest high compared with the highest high before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighCheck {
    pub today_high: f64,
    pub previous_ath: f64,
}

impl HighCheck {
    /// A tie with the previous all-time high is not fresh.
    pub fn is_fresh(&self) -> bool {
        self.today_high > self.previous_ath
    }
}

/// Compare the last bar's high with every earlier high.
///
/// Returns `None` with fewer than two bars, since there is nothing to
/// compare against.
pub fn check_fresh_high(bars: &[Bar]) -> Option<HighCheck> {
    let (today, previous) = bars.split_last()?;
    let previous_ath = previous
        .iter()
        .map(|bar| bar.high)
        .reduce(f64::max)?;

    Some(HighCheck {
        today_high: today.high,
        previous_ath,
    })
}

/// Tickers whose most recent high is a new all-time high, in input order.
///
/// History for the whole universe is requested in one batch. Tickers without
/// usable data are skipped; a progress event follows every ticker.
pub async fn detect_fresh_highs(
    tickers: &[Ticker],
    market: &dyn MarketData,
    sink: &dyn EventSink,
) -> Vec<Ticker> {
    let total = tickers.len();
    if total == 0 {
        return Vec::new();
    }

    let batch = market.full_history(tickers).await;
    let mut fresh = Vec::new();

    for (index, ticker) in tickers.iter().enumerate() {
        match batch.get(ticker) {
            None => skip(sink, ticker, String::from("no data returned")),
            Some(Err(error)) => skip(sink, ticker, error.to_string()),
            Some(Ok(series)) => match check_fresh_high(&series.bars) {
                None => skip(
                    sink,
                    ticker,
                    format!("{} bar(s), need at least 2", series.len()),
                ),
                Some(check) if check.is_fresh() => {
                    sink.emit(ScanEvent::FreshHigh {
                        ticker: ticker.clone(),
                        today_high: check.today_high,
                        previous_ath: check.previous_ath,
                    });
                    fresh.push(ticker.clone());
                }
                Some(_) => {}
            },
        }

        sink.emit(ScanEvent::Progress {
            processed: index + 1,
            total,
        });
    }

    fresh
}

fn skip(sink: &dyn EventSink, ticker: &Ticker, reason: String) {
    debug!(%ticker, %reason, "skipping ticker in fresh-high scan");
    sink.emit(ScanEvent::Skipped {
        ticker: ticker.clone(),
        reason,
    });
}
