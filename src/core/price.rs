//! Pricing abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;

/// Whether prices come from the market-data provider or the offline table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceMode {
    #[default]
    Live,
    Offline,
}

impl Display for PriceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PriceMode::Live => "live",
                PriceMode::Offline => "offline",
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct PriceResult {
    pub price: f64,
    pub currency: Option<String>,
}

/// Looks up the latest price of a single symbol.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceResult>;
}

/// Opens a lookup session for a batch of symbols.
///
/// An error here means no symbol could be looked up at all, and the resolver
/// falls back to offline prices for the whole batch.
pub trait PriceSource: Send + Sync {
    fn open(&self, symbols: &[String]) -> Result<Arc<dyn PriceProvider>>;
}
