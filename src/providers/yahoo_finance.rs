use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::price::{PriceProvider, PriceResult, PriceSource};

const USER_AGENT: &str = "fintrack/0.1";

/// Opens Yahoo Finance chart API sessions.
pub struct YahooFinanceSource {
    base_url: String,
    timeout: Duration,
}

impl YahooFinanceSource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        YahooFinanceSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

impl PriceSource for YahooFinanceSource {
    fn open(&self, symbols: &[String]) -> Result<Arc<dyn PriceProvider>> {
        Url::parse(&self.base_url)
            .with_context(|| format!("Invalid Yahoo Finance base URL: {}", self.base_url))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        debug!("Opened Yahoo Finance session for {} symbols", symbols.len());
        Ok(Arc::new(YahooFinanceProvider {
            base_url: self.base_url.clone(),
            client,
        }))
    }
}

/// A single lookup session sharing one HTTP client.
pub struct YahooFinanceProvider {
    base_url: String,
    client: Client,
}

#[derive(Deserialize, Debug)]
struct YahooPriceResponse {
    chart: PriceChartResult,
}

#[derive(Deserialize, Debug)]
struct PriceChartResult {
    #[serde(default)]
    result: Option<Vec<PriceChartItem>>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct PriceChartItem {
    meta: PriceChartMeta,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct PriceChartMeta {
    #[serde(alias = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    currency: Option<String>,
}

/// Latest daily close, or the regular market price when there are no bars.
fn latest_price(item: &PriceChartItem) -> Option<f64> {
    item.indicators
        .as_ref()
        .and_then(|inds| inds.quote.first())
        .and_then(|q| q.close.as_ref())
        .and_then(|closes| closes.iter().rev().find_map(|c| *c))
        .or(item.meta.regular_market_price)
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooPriceFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_price(&self, symbol: &str) -> Result<PriceResult> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&range=5d",
            self.base_url, symbol
        );
        debug!("Requesting price data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let data = response
            .json::<YahooPriceResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let item = data
            .chart
            .result
            .as_ref()
            .and_then(|r| r.first())
            .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        let price =
            latest_price(item).ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        Ok(PriceResult {
            price,
            currency: item.meta.currency.clone(),
        })
    }
}
