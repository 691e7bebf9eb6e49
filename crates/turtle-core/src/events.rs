//! Scan events and the sinks that consume them.
//!
//! The pipeline never talks to a display directly. It reports what it is doing
//! as [`ScanEvent`]s through an [`EventSink`]; the CLI turns them into log
//! lines or NDJSON, tests collect them.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::Ticker;

/// Pipeline stage announced before its work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    FreshHigh,
    ProfitPeak,
    Outperformance,
}

impl Stage {
    pub const fn title(self) -> &'static str {
        match self {
            Self::FreshHigh => "Checking Fresh ATH Stocks...",
            Self::ProfitPeak => "Checking ATH Profit...",
            Self::Outperformance => "Checking Outperformance vs Benchmark...",
        }
    }
}

/// Something the scan wants the outside world to know.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScanEvent {
    UniverseLoaded {
        total: usize,
    },
    StageStarted {
        stage: Stage,
    },
    /// Emitted after every ticker of the fresh-high scan, skipped ones included.
    Progress {
        processed: usize,
        total: usize,
    },
    FreshHigh {
        ticker: Ticker,
        today_high: f64,
        previous_ath: f64,
    },
    Skipped {
        ticker: Ticker,
        reason: String,
    },
    ProfitPeak {
        ticker: Ticker,
        ttm_net_profit: f64,
    },
    Outperformance {
        ticker: Ticker,
        ticker_return: f64,
        benchmark_return: f64,
    },
    NoCandidates,
}

impl ScanEvent {
    /// Completed share of the fresh-high scan, for progress events.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            Self::Progress { total: 0, .. } => Some(1.0),
            Self::Progress { processed, total } => Some(*processed as f64 / *total as f64),
            _ => None,
        }
    }
}

impl Display for ScanEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UniverseLoaded { total } => write!(f, "Total Stocks in Universe: {total}"),
            Self::StageStarted { stage } => f.write_str(stage.title()),
            Self::Progress { processed, total } => write!(f, "Progress: {processed}/{total}"),
            Self::FreshHigh {
                ticker,
                today_high,
                previous_ath,
            } => write!(
                f,
                "Fresh ATH: {ticker} - Today's High: {today_high:.2}, Previous ATH: {previous_ath:.2}"
            ),
            Self::Skipped { ticker, reason } => write!(f, "Skipped {ticker}: {reason}"),
            Self::ProfitPeak {
                ticker,
                ttm_net_profit,
            } => write!(f, "ATH Profit Found: {ticker} - TTM Net Profit: {ttm_net_profit}"),
            Self::Outperformance {
                ticker,
                ticker_return,
                benchmark_return,
            } => write!(
                f,
                "Outperformance Found: {ticker} - 1Y Return: {ticker_return:.2}%, Benchmark Return: {benchmark_return:.2}%"
            ),
            Self::NoCandidates => f.write_str("No Fresh ATH Stocks Found"),
        }
    }
}

/// Consumer of scan events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ScanEvent);
}

impl<F> EventSink for F
where
    F: Fn(ScanEvent) + Send + Sync,
{
    fn emit(&self, event: ScanEvent) {
        self(event)
    }
}

/// Writes events as log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ScanEvent) {
        match &event {
            ScanEvent::Progress { .. } | ScanEvent::Skipped { .. } => debug!("{event}"),
            ScanEvent::NoCandidates => warn!("{event}"),
            _ => info!("{event}"),
        }
    }
}

/// Forwards events to an unbounded channel. Events sent after the receiver is
/// dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<ScanEvent>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<ScanEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: ScanEvent) {
        let _ = self.sender.send(event);
    }
}
