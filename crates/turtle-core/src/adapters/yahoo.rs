use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::debug;

use crate::data_source::{HistoryBatch, MarketData, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{Bar, PriceSeries, ScreenerConfig, Ticker, UtcDateTime};

/// Earliest `period1` accepted by the chart API (1900-01-01).
const EARLIEST_PERIOD_START: i64 = -2_208_994_789;

/// Chart window requested from Yahoo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartWindow {
    /// Every daily bar Yahoo has for the symbol.
    Max,
    /// Trailing one year of daily bars.
    OneYear,
}

/// Yahoo Finance chart-API adapter.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    user_agent: String,
    concurrency: usize,
}

impl YahooAdapter {
    pub fn new(config: &ScreenerConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::with_user_agent(&config.user_agent));
        Self::with_http_client(http_client, config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &ScreenerConfig) -> Self {
        Self {
            http_client,
            base_url: config.market_base_url.clone(),
            timeout_ms: config.market_timeout_ms,
            user_agent: config.user_agent.clone(),
            concurrency: config.history_concurrency.max(1),
        }
    }

    pub fn chart_url(&self, ticker: &Ticker, window: ChartWindow) -> String {
        let range = match window {
            ChartWindow::Max => format!(
                "period1={EARLIEST_PERIOD_START}&period2={}",
                UtcDateTime::now().unix_timestamp()
            ),
            ChartWindow::OneYear => String::from("range=1y"),
        };

        format!(
            "{}/v8/finance/chart/{}?{range}&interval=1d&includeAdjustedClose=true",
            self.base_url,
            urlencoding::encode(ticker.as_str()),
        )
    }

    pub async fn fetch_chart(
        &self,
        ticker: &Ticker,
        window: ChartWindow,
    ) -> Result<PriceSeries, SourceError> {
        let request = HttpRequest::get(self.chart_url(ticker, window))
            .with_user_agent(self.user_agent.as_str())
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| SourceError::transport("yahoo", &error))?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {} for {ticker}",
                response.status
            )));
        }

        parse_chart_response(ticker, &response.body)
    }
}

impl MarketData for YahooAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn full_history<'a>(
        &'a self,
        tickers: &'a [Ticker],
    ) -> Pin<Box<dyn Future<Output = HistoryBatch> + Send + 'a>> {
        Box::pin(async move {
            let mut seen = HashSet::new();
            let unique = tickers
                .iter()
                .filter(|ticker| seen.insert(*ticker))
                .collect::<Vec<_>>();

            let outcomes = stream::iter(unique.into_iter().cloned())
                .map(|ticker: Ticker| async move {
                    let outcome = self.fetch_chart(&ticker, ChartWindow::Max).await;
                    if let Err(error) = &outcome {
                        debug!(%ticker, %error, "history request failed");
                    }
                    (ticker, outcome)
                })
                .buffer_unordered(self.concurrency)
                .collect::<Vec<_>>()
                .await;

            outcomes.into_iter().collect()
        })
    }

    fn one_year<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_chart(ticker, ChartWindow::OneYear))
    }
}

/// Decode a chart payload into a series.
///
/// Only rows without a valid `high` are dropped. Null or inconsistent
/// open/low/close cells leave a bar that carries just what could be
/// validated. A payload without timestamps is an empty series.
pub fn parse_chart_response(ticker: &Ticker, body: &str) -> Result<PriceSeries, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::parse(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = &chart_response.chart.error {
        return Err(SourceError::no_data(format!(
            "yahoo chart error for {ticker}: {}",
            error.describe()
        )));
    }

    let result = chart_response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::no_data(format!("no chart data for {ticker}")))?;

    let Some(timestamps) = result.timestamp else {
        return Ok(PriceSeries::new(ticker.clone(), Vec::new()));
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|series| series.adjclose)
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut dropped = 0_usize;
    for (i, &seconds) in timestamps.iter().enumerate() {
        let Some(high) = cell(&quote.high, i) else {
            dropped += 1;
            continue;
        };
        let Ok(ts) = UtcDateTime::from_unix_timestamp(seconds) else {
            dropped += 1;
            continue;
        };

        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .and_then(|v| u64::try_from(v).ok());
        let adj_close = adjclose.get(i).copied().flatten();

        let bar = Bar::from_parts(
            ts,
            cell(&quote.open, i),
            high,
            cell(&quote.low, i),
            cell(&quote.close, i),
            volume,
            adj_close,
        )
        .or_else(|_| Bar::high_only(ts, high));
        match bar {
            Ok(bar) => bars.push(bar),
            Err(_) => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(%ticker, dropped, kept = bars.len(), "dropped chart rows without a usable high");
    }

    Ok(PriceSeries::new(ticker.clone(), bars))
}

fn cell(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooChartError {
    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => String::from("unknown error"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::screen::check_fresh_high;
    use crate::http_client::{HttpError, HttpResponse};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn responding(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .iter()
                .map(|request| request.url.clone())
                .collect()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704153600, 1704240000, 1704326400],
                "indicators": {
                    "quote": [{
                        "open":   [100.0, 101.0, null],
                        "high":   [102.0, 104.5, 106.0],
                        "low":    [99.0, 100.5, 103.0],
                        "close":  [101.0, 104.0, 105.0],
                        "volume": [1000, 1200, 900]
                    }],
                    "adjclose": [{ "adjclose": [100.5, 103.8, 104.9] }]
                }
            }],
            "error": null
        }
    }"#;

    fn ticker(symbol: &str) -> Ticker {
        Ticker::parse(symbol).expect("valid ticker")
    }

    #[test]
    fn parses_chart_and_keeps_rows_with_a_high() {
        let series = parse_chart_response(&ticker("TCS.NS"), CHART).expect("chart should parse");

        assert_eq!(series.len(), 3);
        assert_eq!(series.bars[1].high, 104.5);
        assert_eq!(series.bars[1].adj_close, Some(103.8));
        assert_eq!(series.bars[0].volume, Some(1000));
        assert_eq!(series.bars[2].open, None);
        assert_eq!(series.bars[2].high, 106.0);
    }

    #[test]
    fn rows_without_a_high_are_dropped() {
        let body = r#"{"chart":{"result":[{
            "timestamp": [1704153600, 1704240000],
            "indicators": {"quote": [{
                "open": [100.0, 101.0],
                "high": [null, 104.0],
                "low": [99.0, 100.0],
                "close": [100.5, 103.0]
            }]}
        }],"error":null}}"#;
        let series = parse_chart_response(&ticker("TCS.NS"), body).expect("chart should parse");

        assert_eq!(series.len(), 1);
        assert_eq!(series.bars[0].high, 104.0);
    }

    #[test]
    fn inconsistent_row_still_contributes_its_high() {
        let body = r#"{"chart":{"result":[{
            "timestamp": [1704153600, 1704240000],
            "indicators": {"quote": [{
                "open": [100.0, 101.0],
                "high": [150.0, 120.0],
                "low": [160.0, 100.0],
                "close": [155.0, 118.0]
            }]}
        }],"error":null}}"#;
        let series = parse_chart_response(&ticker("TCS.NS"), body).expect("chart should parse");

        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].high, 150.0);
        assert_eq!(series.bars[0].low, None);
        assert_eq!(series.bars[0].close, None);
    }

    #[test]
    fn null_open_bar_keeps_the_all_time_high() {
        let body = r#"{"chart":{"result":[{
            "timestamp": [1704153600, 1704240000, 1704326400],
            "indicators": {"quote": [{
                "open": [100.0, null, 140.0],
                "high": [102.0, 200.0, 150.0],
                "low": [99.0, 180.0, 138.0],
                "close": [101.0, 190.0, 149.0]
            }]}
        }],"error":null}}"#;
        let series = parse_chart_response(&ticker("TCS.NS"), body).expect("chart should parse");
        let check = check_fresh_high(&series.bars).expect("enough bars");

        assert_eq!(series.len(), 3);
        assert_eq!(check.previous_ath, 200.0);
        assert!(!check.is_fresh());
    }

    #[test]
    fn chart_error_is_no_data() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let error = parse_chart_response(&ticker("GONE.NS"), body).expect_err("must fail");

        assert_eq!(error.kind(), SourceErrorKind::NoData);
        assert!(error.message().contains("symbol may be delisted"));
    }

    #[test]
    fn chart_without_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        let series = parse_chart_response(&ticker("NEW.NS"), body).expect("should parse");
        assert!(series.is_empty());
    }

    #[test]
    fn garbage_body_is_a_parse_error() {
        let error = parse_chart_response(&ticker("TCS.NS"), "<html>").expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Parse);
    }

    #[test]
    fn chart_urls_cover_requested_window() {
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::ok(CHART))));
        let adapter = YahooAdapter::with_http_client(client, &ScreenerConfig::default());

        let max = adapter.chart_url(&ticker("M&M.NS"), ChartWindow::Max);
        assert!(max.starts_with("https://query1.finance.yahoo.com/v8/finance/chart/M%26M.NS?"));
        assert!(max.contains("period1=-2208994789"));
        assert!(max.contains("interval=1d"));

        let year = adapter.chart_url(&ticker("BSE-500.BO"), ChartWindow::OneYear);
        assert!(year.contains("range=1y"));
    }

    #[tokio::test]
    async fn full_history_fetches_duplicates_once() {
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::ok(CHART))));
        let adapter =
            YahooAdapter::with_http_client(client.clone(), &ScreenerConfig::default());
        let tickers = vec![ticker("TCS.NS"), ticker("INFY.NS"), ticker("TCS.NS")];

        let batch = adapter.full_history(&tickers).await;

        assert_eq!(batch.len(), 2);
        assert_eq!(client.recorded_urls().len(), 2);
        assert!(matches!(batch.get(&ticker("INFY.NS")), Some(Ok(series)) if series.len() == 3));
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::new(
            429,
            "Too Many Requests",
        ))));
        let adapter = YahooAdapter::with_http_client(client, &ScreenerConfig::default());

        let error = adapter
            .one_year(&ticker("TCS.NS"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("429"));
    }

    #[tokio::test]
    async fn timeouts_are_unavailable() {
        let client = Arc::new(RecordingHttpClient::responding(Err(HttpError::timeout(
            "deadline elapsed",
        ))));
        let adapter = YahooAdapter::with_http_client(client, &ScreenerConfig::default());

        let error = adapter
            .one_year(&ticker("TCS.NS"))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("timed out"));
    }
}
