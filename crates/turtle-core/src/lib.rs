//! # Turtle Core
//!
//! Screening pipeline for equities making fresh all-time highs.
//!
//! ## Overview
//!
//! A scan runs four stages over a fixed ticker universe:
//!
//! 1. **Fresh-high detection**: batched full-history download, keeping tickers
//!    whose latest daily high beats every earlier high
//! 2. **Profit peak**: scraped net profit table, flagging tickers whose TTM
//!    profit ties or exceeds every reported period
//! 3. **Outperformance**: trailing one-year return against a benchmark index
//! 4. **Scoring**: one point per signal, ranked descending
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo Finance and screener.in adapters |
//! | [`config`] | Screener settings and defaults |
//! | [`data_source`] | Source traits and [`SourceError`] |
//! | [`domain`] | Tickers, bars, profit records |
//! | [`error`] | Validation and universe errors |
//! | [`events`] | Scan events and sinks |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`screen`] | Detection, evaluation, scoring, pipeline |
//! | [`universe`] | CSV universe loader |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use turtle_core::{load_universe, ScreenerConfig, Screener, TracingSink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScreenerConfig::default();
//!     let tickers = load_universe(Path::new("nse_tickers.csv"), &config.ticker_column)?;
//!
//!     let report = Screener::from_config(&config).run(&tickers, &TracingSink).await;
//!     for row in &report.rows {
//!         println!("{} {}", row.ticker(), row.score());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Only universe loading is fatal ([`DataSourceError`]). Per-ticker upstream
//! failures surface as [`SourceError`] values and the pipeline skips the
//! affected ticker or signal:
//!
//! ```rust
//! use turtle_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::NoData => "nothing published for this ticker",
//!         SourceErrorKind::Parse => "upstream format changed",
//!         SourceErrorKind::Unavailable => "network or upstream failure",
//!     }
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod events;
pub mod http_client;
pub mod screen;
pub mod universe;

pub use adapters::{ScreenerAdapter, YahooAdapter};

pub use config::ScreenerConfig;

pub use data_source::{FundamentalsSource, HistoryBatch, MarketData, SourceError, SourceErrorKind};

pub use domain::{
    clean_number, Bar, PriceSeries, ProfitPeriod, ProfitRecord, RawProfitTable, Ticker,
    UtcDateTime, TTM_PERIOD,
};

pub use error::{DataSourceError, ValidationError};

pub use events::{ChannelSink, EventSink, ScanEvent, Stage, TracingSink};

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use screen::{CandidateRow, ScanReport, Screener};

pub use universe::{load_universe, read_universe};
