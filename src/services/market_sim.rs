//! Market Simulator
//!
//! A collaborator, not part of the ledger core: supplies the stock directory
//! (symbol, name, sector, cap tier) and a seedable random-walk quote feed.
//! The ticker task polls it periodically and pushes the quote map into the
//! account store's revaluation.

use crate::services::quests::SectorLookup;
use crate::types::{MarketCapTier, Quote, StockListing};
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// The listed universe. Prices are starting values for the walk.
pub const STOCK_DIRECTORY: &[StockListing] = &[
    StockListing { symbol: "AAPL", name: "Apple Inc.", sector: "Technology", tier: MarketCapTier::Large, base_price: 175.5 },
    StockListing { symbol: "MSFT", name: "Microsoft Corporation", sector: "Technology", tier: MarketCapTier::Large, base_price: 338.2 },
    StockListing { symbol: "GOOGL", name: "Alphabet Inc.", sector: "Technology", tier: MarketCapTier::Large, base_price: 125.8 },
    StockListing { symbol: "NVDA", name: "NVIDIA Corporation", sector: "Technology", tier: MarketCapTier::Large, base_price: 485.2 },
    StockListing { symbol: "AMZN", name: "Amazon.com Inc.", sector: "Consumer Discretionary", tier: MarketCapTier::Large, base_price: 142.3 },
    StockListing { symbol: "TSLA", name: "Tesla Inc.", sector: "Consumer Discretionary", tier: MarketCapTier::Large, base_price: 248.9 },
    StockListing { symbol: "HD", name: "Home Depot Inc.", sector: "Consumer Discretionary", tier: MarketCapTier::Large, base_price: 345.8 },
    StockListing { symbol: "JPM", name: "JPMorgan Chase & Co.", sector: "Financial Services", tier: MarketCapTier::Large, base_price: 158.4 },
    StockListing { symbol: "V", name: "Visa Inc.", sector: "Financial Services", tier: MarketCapTier::Large, base_price: 245.6 },
    StockListing { symbol: "MA", name: "Mastercard Inc.", sector: "Financial Services", tier: MarketCapTier::Large, base_price: 398.7 },
    StockListing { symbol: "JNJ", name: "Johnson & Johnson", sector: "Healthcare", tier: MarketCapTier::Large, base_price: 162.8 },
    StockListing { symbol: "UNH", name: "UnitedHealth Group Inc.", sector: "Healthcare", tier: MarketCapTier::Large, base_price: 512.4 },
    StockListing { symbol: "PG", name: "Procter & Gamble Co.", sector: "Consumer Staples", tier: MarketCapTier::Large, base_price: 155.3 },
    StockListing { symbol: "DIS", name: "Walt Disney Co.", sector: "Communication Services", tier: MarketCapTier::Large, base_price: 95.8 },
    StockListing { symbol: "NFLX", name: "Netflix Inc.", sector: "Communication Services", tier: MarketCapTier::Large, base_price: 485.2 },
    StockListing { symbol: "UBER", name: "Uber Technologies Inc.", sector: "Technology", tier: MarketCapTier::Mid, base_price: 62.8 },
    StockListing { symbol: "ROKU", name: "Roku Inc.", sector: "Technology", tier: MarketCapTier::Mid, base_price: 58.4 },
    StockListing { symbol: "SNAP", name: "Snap Inc.", sector: "Technology", tier: MarketCapTier::Mid, base_price: 11.2 },
    StockListing { symbol: "SQ", name: "Block Inc.", sector: "Financial Services", tier: MarketCapTier::Mid, base_price: 68.9 },
    StockListing { symbol: "SHOP", name: "Shopify Inc.", sector: "Technology", tier: MarketCapTier::Mid, base_price: 72.3 },
    StockListing { symbol: "PTON", name: "Peloton Interactive Inc.", sector: "Consumer Discretionary", tier: MarketCapTier::Mid, base_price: 4.8 },
    StockListing { symbol: "PLTR", name: "Palantir Technologies Inc.", sector: "Technology", tier: MarketCapTier::Small, base_price: 18.9 },
    StockListing { symbol: "BB", name: "BlackBerry Limited", sector: "Technology", tier: MarketCapTier::Small, base_price: 2.85 },
    StockListing { symbol: "CLOV", name: "Clover Health Investments", sector: "Healthcare", tier: MarketCapTier::Small, base_price: 2.4 },
    StockListing { symbol: "SPCE", name: "Virgin Galactic Holdings", sector: "Industrials", tier: MarketCapTier::Small, base_price: 1.85 },
    StockListing { symbol: "NOK", name: "Nokia Corporation", sector: "Technology", tier: MarketCapTier::Small, base_price: 4.2 },
];

/// Find a listing by symbol.
pub fn listing(symbol: &str) -> Option<&'static StockListing> {
    STOCK_DIRECTORY.iter().find(|s| s.symbol == symbol)
}

/// One step of the price walk: a uniform move within the tier's volatility
/// band, floored at one cent. Pure given the RNG, so a seeded run is fully
/// deterministic.
pub fn next_price(current: f64, tier: MarketCapTier, rng: &mut impl Rng) -> f64 {
    let pct = rng.gen_range(-1.0..1.0) * tier.volatility();
    (current * (1.0 + pct)).max(0.01)
}

/// Random-walk quote feed over the stock directory.
pub struct MarketSimulator {
    quotes: DashMap<String, Quote>,
    rng: Mutex<StdRng>,
}

impl MarketSimulator {
    /// Create a simulator. A `None` seed uses OS entropy; tests pass a fixed
    /// seed for reproducible walks.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let quotes = DashMap::new();
        for stock in STOCK_DIRECTORY {
            quotes.insert(
                stock.symbol.to_string(),
                Quote::from_tick(stock.symbol, stock.base_price, stock.base_price),
            );
        }

        Self {
            quotes,
            rng: Mutex::new(rng),
        }
    }

    /// Advance every listed price one step and return the new quote map.
    pub fn tick(&self) -> HashMap<String, Quote> {
        let mut rng = self.rng.lock().unwrap();
        let mut snapshot = HashMap::with_capacity(STOCK_DIRECTORY.len());

        for stock in STOCK_DIRECTORY {
            let previous = self
                .quotes
                .get(stock.symbol)
                .map(|q| q.price)
                .unwrap_or(stock.base_price);
            let price = next_price(previous, stock.tier, &mut *rng);
            let quote = Quote::from_tick(stock.symbol, previous, price);
            self.quotes.insert(stock.symbol.to_string(), quote.clone());
            snapshot.insert(stock.symbol.to_string(), quote);
        }

        debug!("Market tick: {} symbols updated", snapshot.len());
        snapshot
    }

    /// Latest quote for a symbol, if listed.
    pub fn quote(&self, symbol: &str) -> Option<Quote> {
        self.quotes.get(symbol).map(|q| q.clone())
    }

    /// Latest quotes for the whole directory.
    pub fn all_quotes(&self) -> HashMap<String, Quote> {
        self.quotes
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

impl SectorLookup for MarketSimulator {
    fn sector_of(&self, symbol: &str) -> Option<&'static str> {
        listing(symbol).map(|s| s.sector)
    }
}
