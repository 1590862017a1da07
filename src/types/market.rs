//! Market Types
//!
//! Static stock metadata and the quote shape the simulator produces.

use serde::{Deserialize, Serialize};

/// Market capitalization tier; drives simulated volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCapTier {
    Large,
    Mid,
    Small,
}

impl MarketCapTier {
    /// Per-tick volatility as a decimal fraction of price.
    pub fn volatility(&self) -> f64 {
        match self {
            MarketCapTier::Large => 0.02,
            MarketCapTier::Mid => 0.04,
            MarketCapTier::Small => 0.08,
        }
    }
}

impl std::fmt::Display for MarketCapTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketCapTier::Large => write!(f, "large"),
            MarketCapTier::Mid => write!(f, "mid"),
            MarketCapTier::Small => write!(f, "small"),
        }
    }
}

/// A listed stock in the simulator's directory.
#[derive(Debug, Clone, Copy)]
pub struct StockListing {
    pub symbol: &'static str,
    pub name: &'static str,
    pub sector: &'static str,
    pub tier: MarketCapTier,
    pub base_price: f64,
}

/// A price quote for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Symbol (e.g., "AAPL")
    pub symbol: String,
    /// Current price
    pub price: f64,
    /// Absolute change since the previous tick
    pub change: f64,
    /// Percentage change since the previous tick
    pub change_percent: f64,
    /// When the quote was produced (ms)
    pub updated_at: i64,
}

impl Quote {
    /// Build a quote from the previous and current price.
    pub fn from_tick(symbol: &str, previous: f64, price: f64) -> Self {
        let change = price - previous;
        let change_percent = if previous > 0.0 {
            change / previous * 100.0
        } else {
            0.0
        };
        Self {
            symbol: symbol.to_string(),
            price,
            change,
            change_percent,
            updated_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
