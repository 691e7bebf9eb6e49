//! Screener settings shared by the adapters and the pipeline.

use crate::http_client::BROWSER_USER_AGENT;
use crate::{Ticker, ValidationError};

pub const DEFAULT_BENCHMARK: &str = "BSE-500.BO";
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".NS";
pub const DEFAULT_TICKER_COLUMN: &str = "Ticker";
pub const DEFAULT_FUNDAMENTALS_BASE_URL: &str = "https://www.screener.in";
pub const DEFAULT_MARKET_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_HISTORY_CONCURRENCY: usize = 8;

/// Runtime configuration for a screening run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenerConfig {
    /// Index whose one-year return candidates must beat.
    pub benchmark: Ticker,
    /// Suffix removed from tickers before querying the fundamentals source.
    pub exchange_suffix: String,
    /// Universe CSV column holding the tickers.
    pub ticker_column: String,
    pub fundamentals_base_url: String,
    pub market_base_url: String,
    pub fundamentals_timeout_ms: u64,
    pub market_timeout_ms: u64,
    /// Upper bound on in-flight history requests.
    pub history_concurrency: usize,
    pub user_agent: String,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            benchmark: Ticker::from_static(DEFAULT_BENCHMARK),
            exchange_suffix: String::from(DEFAULT_EXCHANGE_SUFFIX),
            ticker_column: String::from(DEFAULT_TICKER_COLUMN),
            fundamentals_base_url: String::from(DEFAULT_FUNDAMENTALS_BASE_URL),
            market_base_url: String::from(DEFAULT_MARKET_BASE_URL),
            fundamentals_timeout_ms: DEFAULT_TIMEOUT_MS,
            market_timeout_ms: DEFAULT_TIMEOUT_MS,
            history_concurrency: DEFAULT_HISTORY_CONCURRENCY,
            user_agent: String::from(BROWSER_USER_AGENT),
        }
    }
}

impl ScreenerConfig {
    pub fn with_benchmark(mut self, benchmark: &str) -> Result<Self, ValidationError> {
        self.benchmark = Ticker::parse(benchmark)?;
        Ok(self)
    }

    pub fn with_exchange_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exchange_suffix = suffix.into();
        self
    }

    pub fn with_ticker_column(mut self, column: impl Into<String>) -> Self {
        self.ticker_column = column.into();
        self
    }

    pub fn with_fundamentals_base_url(mut self, url: impl Into<String>) -> Self {
        self.fundamentals_base_url = trim_trailing_slash(url.into());
        self
    }

    pub fn with_market_base_url(mut self, url: impl Into<String>) -> Self {
        self.market_base_url = trim_trailing_slash(url.into());
        self
    }

    pub fn with_fundamentals_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.fundamentals_timeout_ms = timeout_ms;
        self
    }

    pub fn with_market_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.market_timeout_ms = timeout_ms;
        self
    }

    /// Zero is treated as one.
    pub fn with_history_concurrency(mut self, concurrency: usize) -> Self {
        self.history_concurrency = concurrency.max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
