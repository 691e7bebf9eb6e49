//! Screening stages and the pipeline that chains them.
//!
//! | Stage | Module | Signal |
//! |-------|--------|--------|
//! | Fresh all-time high | [`fresh_high`] | `ath_price` |
//! | TTM profit peak | [`pipeline`] via [`ProfitRecord`](crate::ProfitRecord) | `ath_profit` |
//! | One-year outperformance | [`performance`] | `outperformance` |
//! | Ranking | [`scoring`] | `score` |

pub mod fresh_high;
pub mod performance;
pub mod pipeline;
pub mod scoring;

pub use fresh_high::{check_fresh_high, detect_fresh_highs, HighCheck};
pub use performance::{one_year_return, outperforms, percent_return, series_return};
pub use pipeline::{ScanReport, Screener};
pub use scoring::{rank, CandidateRow};
