//! Resolves a batch of symbols to prices.
//!
//! Live resolution degrades in two separate ways:
//! - a symbol whose lookup fails, times out or returns garbage is priced at 0.0
//!   while the rest of the batch keeps its live prices;
//! - a batch whose lookup session cannot even be opened is priced entirely
//!   from the offline mock table.
use crate::core::price::{PriceMode, PriceProvider, PriceSource};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum lookups in flight at once
const MAX_CONCURRENT_LOOKUPS: usize = 5;

const MOCK_BASE_PRICE: f64 = 20.0;
const MOCK_PRICE_STEP: f64 = 5.0;
const KNOWN_MOCK_PRICES: [(&str, f64); 4] = [
    ("AAPL", 160.0),
    ("TSLA", 220.0),
    ("BTC-USD", 60000.0),
    ("ETH-USD", 3500.0),
];

#[derive(Debug, Clone, Copy)]
pub struct LookupOptions {
    pub timeout: Duration,
    pub max_concurrent: usize,
}

impl Default for LookupOptions {
    fn default() -> Self {
        LookupOptions {
            timeout: DEFAULT_LOOKUP_TIMEOUT,
            max_concurrent: MAX_CONCURRENT_LOOKUPS,
        }
    }
}

/// Deterministic offline prices. Well-known symbols use a fixed table; any
/// other symbol is priced from its position in `symbols`.
pub fn mock_prices(symbols: &[String]) -> HashMap<String, f64> {
    symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            let price = KNOWN_MOCK_PRICES
                .iter()
                .find(|(known, _)| *known == symbol.as_str())
                .map_or(MOCK_BASE_PRICE + i as f64 * MOCK_PRICE_STEP, |(_, p)| *p);
            (symbol.clone(), price)
        })
        .collect()
}

pub async fn resolve_prices(
    symbols: &[String],
    mode: PriceMode,
    source: &dyn PriceSource,
    options: &LookupOptions,
    on_progress: &(dyn Fn() + Send + Sync),
) -> HashMap<String, f64> {
    if mode == PriceMode::Offline {
        debug!("Using offline prices for {} symbols", symbols.len());
        return mock_prices(symbols);
    }

    match source.open(symbols) {
        Ok(provider) => fetch_live(provider.as_ref(), symbols, options, on_progress).await,
        Err(e) => {
            warn!("Price lookup unavailable, using offline prices: {e}");
            mock_prices(symbols)
        }
    }
}

async fn lookup_price(provider: &dyn PriceProvider, symbol: &str, timeout: Duration) -> f64 {
    match tokio::time::timeout(timeout, provider.fetch_price(symbol)).await {
        Ok(Ok(result)) if result.price.is_finite() && result.price >= 0.0 => {
            debug!(
                "Resolved {} to {} {}",
                symbol,
                result.price,
                result.currency.as_deref().unwrap_or("(no currency)")
            );
            result.price
        }
        Ok(Ok(result)) => {
            debug!("Discarding invalid price {} for {}", result.price, symbol);
            0.0
        }
        Ok(Err(e)) => {
            debug!("Price lookup failed for {}: {}", symbol, e);
            0.0
        }
        Err(_) => {
            debug!("Price lookup timed out for {} after {:?}", symbol, timeout);
            0.0
        }
    }
}

async fn fetch_live(
    provider: &dyn PriceProvider,
    symbols: &[String],
    options: &LookupOptions,
    on_progress: &(dyn Fn() + Send + Sync),
) -> HashMap<String, f64> {
    info!("Fetching live prices for {} symbols", symbols.len());

    let lookups = symbols.iter().map(|symbol| async move {
        let price = lookup_price(provider, symbol, options.timeout).await;
        on_progress();
        (symbol.clone(), price)
    });

    stream::iter(lookups)
        .buffer_unordered(options.max_concurrent.max(1))
        .collect::<HashMap<String, f64>>()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::PriceResult;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    struct FailingSource;

    impl PriceSource for FailingSource {
        fn open(&self, _symbols: &[String]) -> Result<Arc<dyn PriceProvider>> {
            Err(anyhow!("network unreachable"))
        }
    }

    struct MockProvider {
        prices: HashMap<String, f64>,
    }

    #[async_trait]
    impl PriceProvider for MockProvider {
        async fn fetch_price(&self, symbol: &str) -> Result<PriceResult> {
            if symbol == "SLOW" {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            self.prices
                .get(symbol)
                .map(|p| PriceResult {
                    price: *p,
                    currency: Some("USD".to_string()),
                })
                .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))
        }
    }

    struct MockSource {
        prices: HashMap<String, f64>,
    }

    impl PriceSource for MockSource {
        fn open(&self, _symbols: &[String]) -> Result<Arc<dyn PriceProvider>> {
            Ok(Arc::new(MockProvider {
                prices: self.prices.clone(),
            }))
        }
    }

    #[test]
    fn test_mock_prices() {
        let prices = mock_prices(&symbols(&["AAPL", "UNKNOWN", "ETH-USD", "XYZ"]));
        assert_eq!(prices["AAPL"], 160.0);
        assert_eq!(prices["UNKNOWN"], 25.0);
        assert_eq!(prices["ETH-USD"], 3500.0);
        assert_eq!(prices["XYZ"], 35.0);
    }

    #[tokio::test]
    async fn test_offline_is_deterministic() {
        let syms = symbols(&["FOO", "TSLA", "BAR"]);
        let source = FailingSource;
        let options = LookupOptions::default();

        let first = resolve_prices(&syms, PriceMode::Offline, &source, &options, &|| ()).await;
        let second = resolve_prices(&syms, PriceMode::Offline, &source, &options, &|| ()).await;
        assert_eq!(first, second);
        assert_eq!(first["FOO"], 20.0);
        assert_eq!(first["TSLA"], 220.0);
        assert_eq!(first["BAR"], 30.0);
    }

    #[tokio::test]
    async fn test_batch_failure_falls_back_to_mock_prices() {
        let syms = symbols(&["AAPL", "MSFT", "BTC-USD"]);
        let prices = resolve_prices(
            &syms,
            PriceMode::Live,
            &FailingSource,
            &LookupOptions::default(),
            &|| (),
        )
        .await;
        assert_eq!(prices, mock_prices(&syms));
    }

    #[tokio::test]
    async fn test_per_symbol_failure_resolves_to_zero() {
        let source = MockSource {
            prices: HashMap::from([("AAPL".to_string(), 189.5), ("BAD".to_string(), -3.0)]),
        };
        let syms = symbols(&["AAPL", "MISSING", "BAD"]);
        let calls = AtomicUsize::new(0);

        let prices = resolve_prices(
            &syms,
            PriceMode::Live,
            &source,
            &LookupOptions::default(),
            &|| {
                calls.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await;

        assert_eq!(prices.len(), 3);
        assert_eq!(prices["AAPL"], 189.5);
        assert_eq!(prices["MISSING"], 0.0);
        assert_eq!(prices["BAD"], 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_resolves_to_zero() {
        let source = MockSource {
            prices: HashMap::from([("SLOW".to_string(), 10.0), ("FAST".to_string(), 11.0)]),
        };
        let options = LookupOptions {
            timeout: Duration::from_millis(50),
            max_concurrent: 2,
        };

        let prices = resolve_prices(
            &symbols(&["SLOW", "FAST"]),
            PriceMode::Live,
            &source,
            &options,
            &|| (),
        )
        .await;
        assert_eq!(prices["SLOW"], 0.0);
        assert_eq!(prices["FAST"], 11.0);
    }
}
