//! Production adapters for the upstream sources.
//!
//! | Adapter | Trait | Upstream |
//! |---------|-------|----------|
//! | [`YahooAdapter`] | [`MarketData`](crate::MarketData) | Yahoo Finance chart API |
//! | [`ScreenerAdapter`] | [`FundamentalsSource`](crate::FundamentalsSource) | screener.in company pages |

pub mod screener;
pub mod yahoo;

pub use screener::{parse_net_profit, ScreenerAdapter};
pub use yahoo::{parse_chart_response, ChartWindow, YahooAdapter};
