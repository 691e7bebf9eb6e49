//! Upstream source traits and the error type they share.
//!
//! | Trait | Operation | Response |
//! |-------|-----------|----------|
//! | [`MarketData`] | [`full_history`](MarketData::full_history) | [`HistoryBatch`] |
//! | [`MarketData`] | [`one_year`](MarketData::one_year) | [`PriceSeries`] |
//! | [`FundamentalsSource`] | [`net_profit`](FundamentalsSource::net_profit) | [`RawProfitTable`] |
//!
//! Sources are best effort. Every failure is reported as a [`SourceError`]
//! and the screening stages decide whether to skip the ticker or the signal.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::http_client::HttpError;
use crate::{PriceSeries, RawProfitTable, Ticker};

/// Per-ticker failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure, timeout or non-success status.
    Unavailable,
    /// The upstream answered but had nothing usable for the ticker.
    NoData,
    /// The upstream answered with a payload that could not be decoded.
    Parse,
}

/// Structured upstream error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Parse,
            message: message.into(),
        }
    }

    /// Map a transport failure from `source` into an `Unavailable` error.
    pub fn transport(source: &str, error: &HttpError) -> Self {
        if error.timed_out() {
            Self::unavailable(format!("{source} request timed out: {}", error.message()))
        } else {
            Self::unavailable(format!("{source} transport error: {}", error.message()))
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::Parse => "source.parse",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Outcome of one batched history request, one entry per distinct ticker.
#[derive(Debug, Clone, Default)]
pub struct HistoryBatch {
    series: HashMap<Ticker, Result<PriceSeries, SourceError>>,
}

impl HistoryBatch {
    /// `None` when the provider returned nothing at all for `ticker`.
    pub fn get(&self, ticker: &Ticker) -> Option<&Result<PriceSeries, SourceError>> {
        self.series.get(ticker)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<(Ticker, Result<PriceSeries, SourceError>)> for HistoryBatch {
    fn from_iter<T: IntoIterator<Item = (Ticker, Result<PriceSeries, SourceError>)>>(
        iter: T,
    ) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

/// Market-data provider contract.
pub trait MarketData: Send + Sync {
    fn name(&self) -> &'static str;

    /// Daily bars covering all available history for every ticker.
    ///
    /// Never fails as a whole; each ticker carries its own outcome.
    fn full_history<'a>(
        &'a self,
        tickers: &'a [Ticker],
    ) -> Pin<Box<dyn Future<Output = HistoryBatch> + Send + 'a>>;

    /// Daily bars for the trailing one-year window.
    fn one_year<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;
}

/// Fundamentals provider contract.
pub trait FundamentalsSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw net profit cells by reporting period for `ticker`.
    fn net_profit<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<RawProfitTable, SourceError>> + Send + 'a>>;
}
