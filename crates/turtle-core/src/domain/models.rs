use serde::{Deserialize, Serialize};

use crate::{Ticker, UtcDateTime, ValidationError};

/// Daily OHLCV bar.
///
/// Only `high` is required: chart providers leave individual cells null, and
/// a bar with a known high still counts toward the all-time high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: UtcDateTime,
    pub open: Option<f64>,
    pub high: f64,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
    /// Split/dividend adjusted close, when the provider reports one.
    pub adj_close: Option<f64>,
}

impl Bar {
    /// Complete bar with every price present.
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
        adj_close: Option<f64>,
    ) -> Result<Self, ValidationError> {
        Self::from_parts(ts, Some(open), high, Some(low), Some(close), volume, adj_close)
    }

    /// Bar whose open, low and close may be missing. Present values are
    /// validated the same way as in [`Bar::new`].
    pub fn from_parts(
        ts: UtcDateTime,
        open: Option<f64>,
        high: f64,
        low: Option<f64>,
        close: Option<f64>,
        volume: Option<u64>,
        adj_close: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("high", high)?;
        for (field, value) in [
            ("open", open),
            ("low", low),
            ("close", close),
            ("adj_close", adj_close),
        ] {
            if let Some(value) = value {
                validate_non_negative(field, value)?;
            }
        }

        if low.is_some_and(|low| high < low) {
            return Err(ValidationError::InvalidBarRange);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
            adj_close,
        })
    }

    /// Bar carrying only its high.
    pub fn high_only(ts: UtcDateTime, high: f64) -> Result<Self, ValidationError> {
        Self::from_parts(ts, None, high, None, None, None, None)
    }

    /// Close used for return calculations: adjusted when available.
    pub fn return_close(&self) -> Option<f64> {
        self.adj_close.or(self.close)
    }
}

/// Daily bars for one ticker, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: Ticker,
    pub bars: Vec<Bar>,
}

impl PriceSeries {
    /// Bars are sorted ascending by timestamp on construction.
    pub fn new(ticker: Ticker, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.ts);
        Self { ticker, bars }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
