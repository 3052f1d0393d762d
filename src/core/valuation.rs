//! Values a set of holdings against resolved prices.
use crate::core::price::{PriceMode, PriceSource};
use crate::core::pricing::{self, LookupOptions};
use crate::core::records::Holding;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A holding with its resolved price and market value.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingValue {
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioValue {
    pub holdings: Vec<HoldingValue>,
    pub total: f64,
}

/// Distinct symbols in order of first appearance.
pub fn distinct_symbols(holdings: &[Holding]) -> Vec<String> {
    let mut seen = HashSet::new();
    holdings
        .iter()
        .filter(|h| seen.insert(h.symbol.as_str()))
        .map(|h| h.symbol.clone())
        .collect()
}

/// Prices each holding from `prices`, treating an unknown symbol as 0.0.
/// The total is accumulated unrounded, in holding order.
pub fn apply_prices(holdings: Vec<Holding>, prices: &HashMap<String, f64>) -> PortfolioValue {
    let mut total = 0.0;
    let holdings = holdings
        .into_iter()
        .map(|holding| {
            let price = prices.get(&holding.symbol).copied().unwrap_or(0.0);
            let value = price * holding.quantity;
            total += value;
            HoldingValue {
                symbol: holding.symbol,
                quantity: holding.quantity,
                price,
                value,
            }
        })
        .collect();

    PortfolioValue { holdings, total }
}

pub async fn value_portfolio(
    holdings: Vec<Holding>,
    mode: PriceMode,
    source: &dyn PriceSource,
    options: &LookupOptions,
    on_progress: &(dyn Fn() + Send + Sync),
) -> PortfolioValue {
    let symbols = distinct_symbols(&holdings);
    debug!("Valuing {} holdings over {} symbols", holdings.len(), symbols.len());

    let prices = pricing::resolve_prices(&symbols, mode, source, options, on_progress).await;
    apply_prices(holdings, &prices)
}

/// Cash balances plus portfolio value.
pub fn net_worth(balances: &[f64], portfolio_value: f64) -> f64 {
    balances.iter().sum::<f64>() + portfolio_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::PriceProvider;
    use anyhow::{Result, anyhow};
    use std::sync::Arc;

    struct UnreachableSource;

    impl PriceSource for UnreachableSource {
        fn open(&self, _symbols: &[String]) -> Result<Arc<dyn PriceProvider>> {
            Err(anyhow!("offline"))
        }
    }

    fn holding(symbol: &str, quantity: f64) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_offline_valuation_example() {
        let holdings = vec![holding("AAPL", 2.0), holding("UNKNOWN", 10.0)];

        let value = value_portfolio(
            holdings,
            PriceMode::Offline,
            &UnreachableSource,
            &LookupOptions::default(),
            &|| (),
        )
        .await;

        assert_eq!(value.holdings[0].price, 160.0);
        assert_eq!(value.holdings[0].value, 320.0);
        assert_eq!(value.holdings[1].price, 25.0);
        assert_eq!(value.holdings[1].value, 250.0);
        assert_eq!(value.total, 2.0 * 160.0 + 10.0 * 25.0);
    }

    #[test]
    fn test_total_is_exact_sum_of_values() {
        let prices = HashMap::from([
            ("A".to_string(), 0.1),
            ("B".to_string(), 33.333),
            ("C".to_string(), 1e-3),
        ]);
        let holdings = vec![holding("A", 3.0), holding("B", 0.7), holding("C", 12345.678)];

        let value = apply_prices(holdings, &prices);
        let expected: f64 = value.holdings.iter().map(|h| h.price * h.quantity).sum();
        assert_eq!(value.total, expected);
    }

    #[test]
    fn test_missing_price_is_zero() {
        let value = apply_prices(vec![holding("GONE", 4.0)], &HashMap::new());
        assert_eq!(value.holdings[0].price, 0.0);
        assert_eq!(value.holdings[0].value, 0.0);
        assert_eq!(value.total, 0.0);
    }

    #[test]
    fn test_distinct_symbols_keeps_first_occurrence() {
        let holdings = vec![
            holding("VTI", 1.0),
            holding("AAPL", 1.0),
            holding("VTI", 2.0),
            holding("BND", 1.0),
        ];
        assert_eq!(distinct_symbols(&holdings), vec!["VTI", "AAPL", "BND"]);
    }

    #[tokio::test]
    async fn test_duplicate_symbols_share_a_price() {
        let holdings = vec![holding("VTI", 1.0), holding("AAPL", 1.0), holding("VTI", 3.0)];
        let value = value_portfolio(
            holdings,
            PriceMode::Offline,
            &UnreachableSource,
            &LookupOptions::default(),
            &|| (),
        )
        .await;
        assert_eq!(value.holdings.len(), 3);
        assert_eq!(value.holdings[0].price, 20.0);
        assert_eq!(value.holdings[1].price, 160.0);
        assert_eq!(value.holdings[2].price, 20.0);
        assert_eq!(value.total, 20.0 + 160.0 + 60.0);
    }

    #[test]
    fn test_net_worth() {
        assert_eq!(net_worth(&[100.0, -25.5, 400.0], 1000.0), 1474.5);
        assert_eq!(net_worth(&[], 12.0), 12.0);
    }
}
