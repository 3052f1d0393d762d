//! Core business logic: ingestion, aggregation and valuation

pub mod cashflow;
pub mod categories;
pub mod config;
pub mod log;
pub mod price;
pub mod pricing;
pub mod projection;
pub mod records;
pub mod valuation;

// Re-export main types for cleaner imports
pub use price::{PriceMode, PriceProvider, PriceResult, PriceSource};
pub use records::{DataFiles, Holding, Transaction};
