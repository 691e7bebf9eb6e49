//! Behaviour tests for the Yahoo chart adapter.
//!
//! The transport is scripted per symbol so each test controls exactly what
//! the upstream returns.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use turtle_core::adapters::ChartWindow;
use turtle_core::screen::{check_fresh_high, detect_fresh_highs};
use turtle_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, MarketData, ScreenerConfig,
    SourceErrorKind, TracingSink, YahooAdapter,
};
use turtle_tests::ticker;

/// Scripted transport keyed by the encoded symbol in the chart path.
#[derive(Default)]
struct ScriptedClient {
    responses: HashMap<String, Result<HttpResponse, HttpError>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedClient {
    fn respond(mut self, symbol: &str, response: Result<HttpResponse, HttpError>) -> Self {
        self.responses.insert(symbol.to_owned(), response);
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("not poisoned").clone()
    }
}

impl HttpClient for ScriptedClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let symbol = request
            .url
            .split("/chart/")
            .nth(1)
            .and_then(|rest| rest.split('?').next())
            .unwrap_or_default()
            .to_owned();
        self.requests.lock().expect("not poisoned").push(request);

        let response = self
            .responses
            .get(&symbol)
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "")));
        Box::pin(async move { response })
    }
}

fn chart(highs: &[f64]) -> String {
    let timestamps = (0..highs.len())
        .map(|day| 1_704_153_600 + day as i64 * 86_400)
        .collect::<Vec<_>>();
    let lows = highs.iter().map(|high| high - 1.0).collect::<Vec<_>>();
    serde_json::json!({
        "chart": {
            "result": [{
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{
                        "open": lows,
                        "high": highs,
                        "low": lows,
                        "close": highs,
                        "volume": vec![1_000; highs.len()]
                    }]
                }
            }],
            "error": null
        }
    })
    .to_string()
}

fn adapter(client: Arc<ScriptedClient>) -> YahooAdapter {
    let config = ScreenerConfig::default()
        .with_market_base_url("http://market.test/")
        .with_market_timeout_ms(2_500)
        .with_history_concurrency(2);
    YahooAdapter::with_http_client(client, &config)
}

#[tokio::test]
async fn batch_history_reports_each_ticker_independently() {
    // Given: one healthy symbol, one rejected symbol, one timing out
    let client = Arc::new(
        ScriptedClient::default()
            .respond("TCS.NS", Ok(HttpResponse::ok(chart(&[10.0, 11.0, 12.0]))))
            .respond("BAD.NS", Ok(HttpResponse::new(500, "oops")))
            .respond("SLOW.NS", Err(HttpError::timeout("deadline elapsed"))),
    );
    let market = adapter(client.clone());
    let universe = vec![ticker("TCS.NS"), ticker("BAD.NS"), ticker("SLOW.NS")];

    // When: full history is requested for the batch
    let batch = market.full_history(&universe).await;

    // Then: the batch holds one outcome per ticker
    assert_eq!(batch.len(), 3);

    let series = batch
        .get(&ticker("TCS.NS"))
        .expect("present")
        .as_ref()
        .expect("healthy symbol loads");
    assert_eq!(series.len(), 3);
    assert_eq!(series.bars.last().map(|bar| bar.high), Some(12.0));

    let rejected = batch.get(&ticker("BAD.NS")).expect("present");
    assert_eq!(
        rejected.as_ref().map_err(|error| error.kind()).err(),
        Some(SourceErrorKind::Unavailable)
    );

    let timed_out = batch.get(&ticker("SLOW.NS")).expect("present");
    assert!(timed_out.is_err());
}

#[tokio::test]
async fn partially_null_history_rows_still_set_the_all_time_high() {
    // Given: the peak day was reported with its high but without open or close
    let body = serde_json::json!({
        "chart": {
            "result": [{
                "timestamp": [1_704_153_600, 1_704_240_000, 1_704_326_400],
                "indicators": {
                    "quote": [{
                        "open": [100.0, null, 140.0],
                        "high": [102.0, 200.0, 150.0],
                        "low": [99.0, null, 138.0],
                        "close": [101.0, null, 149.0]
                    }]
                }
            }],
            "error": null
        }
    })
    .to_string();
    let client =
        Arc::new(ScriptedClient::default().respond("TCS.NS", Ok(HttpResponse::ok(body))));
    let market = adapter(client);
    let universe = vec![ticker("TCS.NS")];

    // When: full history is loaded and screened
    let batch = market.full_history(&universe).await;
    let series = batch
        .get(&ticker("TCS.NS"))
        .expect("present")
        .as_ref()
        .expect("history loads");
    let fresh = detect_fresh_highs(&universe, &market, &TracingSink).await;

    // Then: the partial bar keeps its high, so today's 150 is not a fresh high
    assert_eq!(series.len(), 3);
    let check = check_fresh_high(&series.bars).expect("enough history");
    assert_eq!(check.previous_ath, 200.0);
    assert!(!check.is_fresh());
    assert!(fresh.is_empty());
}

#[tokio::test]
async fn duplicate_tickers_are_fetched_once() {
    let client = Arc::new(
        ScriptedClient::default().respond("TCS.NS", Ok(HttpResponse::ok(chart(&[1.0, 2.0])))),
    );
    let market = adapter(client.clone());

    let batch = market
        .full_history(&[ticker("TCS.NS"), ticker("TCS.NS")])
        .await;

    assert_eq!(batch.len(), 1);
    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn requests_carry_browser_headers_and_configured_timeout() {
    let client = Arc::new(
        ScriptedClient::default().respond("TCS.NS", Ok(HttpResponse::ok(chart(&[1.0, 2.0])))),
    );
    let market = adapter(client.clone());

    market.one_year(&ticker("TCS.NS")).await.expect("loads");

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.url.starts_with("http://market.test/v8/finance/chart/TCS.NS?"));
    assert!(request.url.contains("range=1y"));
    assert!(request.url.contains("interval=1d"));
    assert_eq!(request.timeout_ms, 2_500);
    assert_eq!(
        request.headers.get("user-agent").map(String::as_str),
        Some("Mozilla/5.0")
    );
}

#[tokio::test]
async fn full_history_asks_for_the_whole_record() {
    let market = adapter(Arc::new(ScriptedClient::default()));

    let url = market.chart_url(&ticker("BSE-500.BO"), ChartWindow::Max);

    assert!(url.contains("/v8/finance/chart/BSE-500.BO?"));
    assert!(url.contains("period1=-2208994789"));
    assert!(!url.contains("range="));
}

#[tokio::test]
async fn upstream_chart_error_is_no_data() {
    let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
    let client = Arc::new(
        ScriptedClient::default().respond("GONE.NS", Ok(HttpResponse::ok(body))),
    );
    let market = adapter(client);

    let error = market
        .one_year(&ticker("GONE.NS"))
        .await
        .expect_err("delisted symbol");

    assert_eq!(error.kind(), SourceErrorKind::NoData);
}

#[tokio::test]
async fn garbled_payload_is_a_parse_error() {
    let client = Arc::new(
        ScriptedClient::default().respond("TCS.NS", Ok(HttpResponse::ok("<html>captcha</html>"))),
    );
    let market = adapter(client);

    let error = market
        .one_year(&ticker("TCS.NS"))
        .await
        .expect_err("not json");

    assert_eq!(error.kind(), SourceErrorKind::Parse);
    assert_eq!(error.code(), "source.parse");
}
