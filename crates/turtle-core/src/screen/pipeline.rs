use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::adapters::{ScreenerAdapter, YahooAdapter};
use crate::data_source::{FundamentalsSource, MarketData, SourceError};
use crate::events::{EventSink, ScanEvent, Stage};
use crate::{ProfitRecord, ScreenerConfig, Ticker};

use super::fresh_high::detect_fresh_highs;
use super::performance::one_year_return;
use super::scoring::{rank, CandidateRow};

/// Result of a full screening run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub universe_size: usize,
    pub benchmark: Ticker,
    /// Fresh all-time-high tickers in universe order.
    pub candidates: Vec<Ticker>,
    /// `None` when the benchmark return could not be computed or no
    /// candidate needed it.
    pub benchmark_return: Option<f64>,
    /// Candidates ranked by descending score.
    pub rows: Vec<CandidateRow>,
}

/// Screening pipeline over a market-data and a fundamentals source.
#[derive(Clone)]
pub struct Screener {
    market: Arc<dyn MarketData>,
    fundamentals: Arc<dyn FundamentalsSource>,
    benchmark: Ticker,
}

impl Screener {
    pub fn new(
        market: Arc<dyn MarketData>,
        fundamentals: Arc<dyn FundamentalsSource>,
        benchmark: Ticker,
    ) -> Self {
        Self {
            market,
            fundamentals,
            benchmark,
        }
    }

    /// Screener backed by Yahoo Finance and screener.in.
    pub fn from_config(config: &ScreenerConfig) -> Self {
        Self::new(
            Arc::new(YahooAdapter::new(config)),
            Arc::new(ScreenerAdapter::new(config)),
            config.benchmark.clone(),
        )
    }

    pub fn benchmark(&self) -> &Ticker {
        &self.benchmark
    }

    pub async fn fresh_highs(&self, tickers: &[Ticker], sink: &dyn EventSink) -> Vec<Ticker> {
        detect_fresh_highs(tickers, self.market.as_ref(), sink).await
    }

    /// Cleaned net profit series of `ticker`.
    pub async fn profit_record(&self, ticker: &Ticker) -> Result<ProfitRecord, SourceError> {
        let raw = self.fundamentals.net_profit(ticker).await?;
        Ok(ProfitRecord::from_raw(&raw))
    }

    pub async fn one_year_return(&self, ticker: &Ticker) -> Result<f64, SourceError> {
        one_year_return(self.market.as_ref(), ticker).await
    }

    pub async fn benchmark_return(&self) -> Result<f64, SourceError> {
        self.one_year_return(&self.benchmark).await
    }

    /// Run every stage over `tickers` and rank the fresh-high candidates.
    pub async fn run(&self, tickers: &[Ticker], sink: &dyn EventSink) -> ScanReport {
        info!(
            market = self.market.name(),
            fundamentals = self.fundamentals.name(),
            benchmark = %self.benchmark,
            "scan started"
        );
        sink.emit(ScanEvent::UniverseLoaded {
            total: tickers.len(),
        });

        sink.emit(ScanEvent::StageStarted {
            stage: Stage::FreshHigh,
        });
        let candidates = self.fresh_highs(tickers, sink).await;
        info!(
            universe = tickers.len(),
            candidates = candidates.len(),
            "fresh-high scan complete"
        );

        if candidates.is_empty() {
            sink.emit(ScanEvent::NoCandidates);
            return ScanReport {
                universe_size: tickers.len(),
                benchmark: self.benchmark.clone(),
                candidates,
                benchmark_return: None,
                rows: Vec::new(),
            };
        }

        sink.emit(ScanEvent::StageStarted {
            stage: Stage::ProfitPeak,
        });
        let mut profit_flags = Vec::with_capacity(candidates.len());
        for ticker in &candidates {
            profit_flags.push(self.profit_peak(ticker, sink).await);
        }

        sink.emit(ScanEvent::StageStarted {
            stage: Stage::Outperformance,
        });
        let benchmark_return = match self.benchmark_return().await {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(benchmark = %self.benchmark, %error, "benchmark return unavailable");
                None
            }
        };
        let mut outperformance_flags = Vec::with_capacity(candidates.len());
        for ticker in &candidates {
            outperformance_flags.push(self.outperformance(ticker, benchmark_return, sink).await);
        }

        let rows = candidates
            .iter()
            .zip(profit_flags)
            .zip(outperformance_flags)
            .map(|((ticker, ath_profit), outperformance)| {
                CandidateRow::new(ticker.clone(), ath_profit, outperformance)
            })
            .collect();

        ScanReport {
            universe_size: tickers.len(),
            benchmark: self.benchmark.clone(),
            candidates,
            benchmark_return,
            rows: rank(rows),
        }
    }

    async fn profit_peak(&self, ticker: &Ticker, sink: &dyn EventSink) -> bool {
        let record = match self.profit_record(ticker).await {
            Ok(record) => record,
            Err(error) => {
                debug!(%ticker, %error, "net profit unavailable");
                return false;
            }
        };

        match record.ttm() {
            Some(ttm_net_profit) if record.is_ttm_peak() => {
                sink.emit(ScanEvent::ProfitPeak {
                    ticker: ticker.clone(),
                    ttm_net_profit,
                });
                true
            }
            _ => false,
        }
    }

    async fn outperformance(
        &self,
        ticker: &Ticker,
        benchmark_return: Option<f64>,
        sink: &dyn EventSink,
    ) -> bool {
        let ticker_return = match self.one_year_return(ticker).await {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(%ticker, %error, "one-year return unavailable");
                None
            }
        };

        match (ticker_return, benchmark_return) {
            (Some(ticker_return), Some(benchmark_return))
                if ticker_return > benchmark_return =>
            {
                sink.emit(ScanEvent::Outperformance {
                    ticker: ticker.clone(),
                    ticker_return,
                    benchmark_return,
                });
                true
            }
            _ => false,
        }
    }
}
