use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};

use crate::data_source::{FundamentalsSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{RawProfitTable, ScreenerConfig, Ticker};

/// Label prefix of the profit row in the profit-and-loss table.
const NET_PROFIT_LABEL: &str = "Net Profit";

/// Scraper for screener.in company pages.
#[derive(Clone)]
pub struct ScreenerAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    user_agent: String,
    exchange_suffix: String,
}

impl ScreenerAdapter {
    pub fn new(config: &ScreenerConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::with_user_agent(&config.user_agent));
        Self::with_http_client(http_client, config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &ScreenerConfig) -> Self {
        Self {
            http_client,
            base_url: config.fundamentals_base_url.clone(),
            timeout_ms: config.fundamentals_timeout_ms,
            user_agent: config.user_agent.clone(),
            exchange_suffix: config.exchange_suffix.clone(),
        }
    }

    /// Company page URL; the page is keyed by bare symbol.
    pub fn company_url(&self, ticker: &Ticker) -> String {
        format!(
            "{}/company/{}/",
            self.base_url,
            urlencoding::encode(ticker.bare_symbol(&self.exchange_suffix))
        )
    }

    async fn fetch_page(&self, ticker: &Ticker) -> Result<String, SourceError> {
        let request = HttpRequest::get(self.company_url(ticker))
            .with_user_agent(self.user_agent.as_str())
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| SourceError::transport("screener", &error))?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "screener returned status {} for {ticker}",
                response.status
            )));
        }

        Ok(response.body)
    }
}

impl FundamentalsSource for ScreenerAdapter {
    fn name(&self) -> &'static str {
        "screener"
    }

    fn net_profit<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<RawProfitTable, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let page = self.fetch_page(ticker).await?;
            parse_net_profit(&page)
        })
    }
}

/// Extract the net profit row of the profit-and-loss table.
///
/// Column headers after the first give the period labels; the first body row
/// whose label cell contains "Net Profit" gives the values.
pub fn parse_net_profit(html: &str) -> Result<RawProfitTable, SourceError> {
    let document = Html::parse_document(html);

    let section = document
        .select(&selector("section#profit-loss")?)
        .next()
        .ok_or_else(|| SourceError::no_data("profit-loss section not found"))?;

    let table = section
        .select(&selector("table.data-table")?)
        .next()
        .ok_or_else(|| SourceError::no_data("profit-loss data table not found"))?;

    let cell = selector("td")?;
    let row = table
        .select(&selector("tbody tr")?)
        .find(|row| {
            row.select(&cell)
                .next()
                .is_some_and(|label| element_text(label).contains(NET_PROFIT_LABEL))
        })
        .ok_or_else(|| SourceError::no_data("net profit row not found"))?;

    let periods = table
        .select(&selector("thead th")?)
        .skip(1)
        .map(element_text)
        .collect();
    let values = row.select(&cell).skip(1).map(element_text).collect();

    let table = RawProfitTable::zip(periods, values);
    if table.is_empty() {
        return Err(SourceError::no_data("net profit row has no values"));
    }
    Ok(table)
}

fn selector(css: &'static str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::parse(format!("invalid selector '{css}': {e:?}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;

    const PAGE: &str = r#"
        <html><body>
        <section id="quarters"><table class="data-table"><tbody>
            <tr><td class="text">Net Profit</td><td>1</td></tr>
        </tbody></table></section>
        <section id="profit-loss">
          <table class="data-table responsive-text-nowrap">
            <thead><tr><th class="text"></th><th>Mar 2022</th><th>Mar 2023</th><th>TTM</th></tr></thead>
            <tbody>
              <tr><td class="text">Sales&nbsp;+</td><td>1,000</td><td>1,200</td><td>1,300</td></tr>
              <tr><td class="text"><button>Net Profit&nbsp;<span>+</span></button></td><td>100</td><td>1,234.5</td><td> 1,300 </td></tr>
              <tr><td class="text">Net Profit Margin</td><td>5%</td><td>6%</td><td>7%</td></tr>
            </tbody>
          </table>
        </section>
        </body></html>
    "#;

    #[test]
    fn extracts_first_net_profit_row_of_profit_loss_section() {
        let table = parse_net_profit(PAGE).expect("table should parse");

        assert_eq!(
            table.entries,
            vec![
                (String::from("Mar 2022"), String::from("100")),
                (String::from("Mar 2023"), String::from("1,234.5")),
                (String::from("TTM"), String::from("1,300")),
            ]
        );
    }

    #[test]
    fn missing_section_is_no_data() {
        let error = parse_net_profit("<html><body><p>Login</p></body></html>").expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
        assert!(error.message().contains("section"));
    }

    #[test]
    fn missing_table_is_no_data() {
        let html = r#"<section id="profit-loss"><p>No data</p></section>"#;
        let error = parse_net_profit(html).expect_err("must fail");
        assert!(error.message().contains("data table"));
    }

    #[test]
    fn missing_row_is_no_data() {
        let html = r#"<section id="profit-loss"><table class="data-table">
            <thead><tr><th></th><th>TTM</th></tr></thead>
            <tbody><tr><td>Sales</td><td>10</td></tr></tbody>
        </table></section>"#;
        let error = parse_net_profit(html).expect_err("must fail");
        assert!(error.message().contains("net profit row"));
    }

    #[test]
    fn label_only_row_is_no_data() {
        let html = r#"<section id="profit-loss"><table class="data-table">
            <thead><tr><th></th></tr></thead>
            <tbody><tr><td>Net Profit</td></tr></tbody>
        </table></section>"#;
        let error = parse_net_profit(html).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
        assert!(error.message().contains("no values"));
    }

    #[test]
    fn company_url_strips_exchange_suffix() {
        let config = ScreenerConfig::default().with_fundamentals_base_url("http://fundamentals.test/");
        let adapter = ScreenerAdapter::new(&config);
        let ticker = Ticker::parse("RELIANCE.NS").expect("valid");

        assert_eq!(
            adapter.company_url(&ticker),
            "http://fundamentals.test/company/RELIANCE/"
        );
    }
}
