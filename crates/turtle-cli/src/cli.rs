//! CLI argument definitions for the `turtle` screener.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | Full pipeline: fresh highs, profit peak, outperformance, ranking |
//! | `fresh-highs` | Fresh all-time-high detection only |
//! | `profit` | Net profit series and TTM-peak verdict for one ticker |
//! | `performance` | One-year return against the benchmark for one ticker |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--stream` | `false` | Emit scan events as NDJSON |
//! | `--benchmark` | `BSE-500.BO` | Benchmark index ticker |
//! | `--exchange-suffix` | `.NS` | Suffix stripped for fundamentals lookups |
//!
//! # Examples
//!
//! ```bash
//! # Screen the default universe
//! turtle scan
//!
//! # Screen another universe, JSON output
//! turtle scan --universe midcaps.csv --format json --pretty
//!
//! # Inspect a single ticker
//! turtle profit TCS.NS
//! turtle performance TCS.NS --benchmark ^NSEI
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use turtle_core::config::{
    DEFAULT_BENCHMARK, DEFAULT_EXCHANGE_SUFFIX, DEFAULT_FUNDAMENTALS_BASE_URL,
    DEFAULT_HISTORY_CONCURRENCY, DEFAULT_MARKET_BASE_URL, DEFAULT_TICKER_COLUMN,
    DEFAULT_TIMEOUT_MS,
};
use turtle_core::http_client::BROWSER_USER_AGENT;
use turtle_core::{ScreenerConfig, ValidationError};

/// Turtle Wealth fresh all-time-high screener
#[derive(Debug, Parser)]
#[command(
    name = "turtle",
    author,
    version,
    about = "Fresh all-time-high stock screener",
    long_about = "Screens a ticker universe for stocks making a fresh all-time high today, \
then scores each one on two more signals:\n\
\n\
  • TTM net profit at its all-time high (screener.in)\n\
  • One-year return above the benchmark index (Yahoo Finance)\n\
\n\
Use 'turtle <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Emit scan events as newline-delimited JSON on stdout.
    ///
    /// Each line is one event (start, progress, chunk, end, error); the final
    /// result arrives as a chunk.
    #[arg(long, global = true, default_value_t = false)]
    pub stream: bool,

    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Screener settings, one flag per configuration field.
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Benchmark index whose one-year return candidates must beat.
    #[arg(long, global = true, default_value = DEFAULT_BENCHMARK)]
    pub benchmark: String,

    /// Exchange suffix removed before querying screener.in.
    #[arg(long, global = true, default_value = DEFAULT_EXCHANGE_SUFFIX)]
    pub exchange_suffix: String,

    /// Universe CSV column holding the tickers.
    #[arg(long, global = true, default_value = DEFAULT_TICKER_COLUMN)]
    pub ticker_column: String,

    #[arg(long, global = true, default_value = DEFAULT_FUNDAMENTALS_BASE_URL)]
    pub fundamentals_url: String,

    #[arg(long, global = true, default_value = DEFAULT_MARKET_BASE_URL)]
    pub market_url: String,

    /// Fundamentals page request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub fundamentals_timeout_ms: u64,

    /// Market-data request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub market_timeout_ms: u64,

    /// Maximum number of history downloads in flight.
    #[arg(long, global = true, default_value_t = DEFAULT_HISTORY_CONCURRENCY)]
    pub concurrency: usize,

    #[arg(long, global = true, default_value = BROWSER_USER_AGENT)]
    pub user_agent: String,
}

impl SettingsArgs {
    pub fn to_config(&self) -> Result<ScreenerConfig, ValidationError> {
        Ok(ScreenerConfig::default()
            .with_benchmark(&self.benchmark)?
            .with_exchange_suffix(self.exchange_suffix.as_str())
            .with_ticker_column(self.ticker_column.as_str())
            .with_fundamentals_base_url(self.fundamentals_url.as_str())
            .with_market_base_url(self.market_url.as_str())
            .with_fundamentals_timeout_ms(self.fundamentals_timeout_ms)
            .with_market_timeout_ms(self.market_timeout_ms)
            .with_history_concurrency(self.concurrency)
            .with_user_agent(self.user_agent.as_str()))
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Console lines and an aligned result table.
    Table,
    /// Single JSON envelope.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full screen and print the ranked candidates.
    ///
    /// # Examples
    ///
    ///   turtle scan
    ///   turtle scan --universe nifty500.csv --format json
    Scan(UniverseArgs),

    /// List tickers whose latest daily high is a new all-time high.
    FreshHighs(UniverseArgs),

    /// Show the net profit series of one ticker and whether TTM is the peak.
    ///
    /// # Examples
    ///
    ///   turtle profit RELIANCE.NS
    Profit(TickerArgs),

    /// Compare the one-year return of one ticker against the benchmark.
    ///
    /// # Examples
    ///
    ///   turtle performance INFY.NS
    Performance(TickerArgs),
}

/// Arguments for commands that screen a universe file.
#[derive(Debug, Args)]
pub struct UniverseArgs {
    /// CSV file listing the tickers to screen.
    #[arg(long, default_value = "nse_tickers.csv")]
    pub universe: PathBuf,
}

/// Arguments for single-ticker commands.
#[derive(Debug, Args)]
pub struct TickerArgs {
    /// Exchange-qualified ticker (e.g., TCS.NS).
    pub ticker: String,
}
