//! # Domain Models
//!
//! Canonical types shared by every stage of the screener.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Exchange-qualified ticker symbol |
//! | [`Bar`] | Daily OHLCV bar |
//! | [`PriceSeries`] | Bars for one ticker, oldest first |
//! | [`RawProfitTable`] | Scraped net profit cells keyed by period |
//! | [`ProfitRecord`] | Cleaned net profit series with TTM helpers |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Construction validates invariants: a [`Ticker`] is never blank and a
//! [`Bar`] never carries non-finite or inverted prices.

mod models;
mod profit;
mod ticker;
mod timestamp;

pub use models::{Bar, PriceSeries};
pub use profit::{clean_number, ProfitPeriod, ProfitRecord, RawProfitTable, TTM_PERIOD};
pub use ticker::Ticker;
pub use timestamp::UtcDateTime;
