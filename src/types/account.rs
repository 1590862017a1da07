//! Account Types
//!
//! The player account aggregate: cash balance, holdings, progression state,
//! and the counters the quest engine reads.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A held position in a single symbol.
///
/// A position with zero quantity is removed from the account's holdings map
/// rather than kept as an empty row, so the cost basis of a fully closed
/// position is discarded and a later re-buy starts fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Symbol (e.g., "AAPL")
    pub symbol: String,
    /// Current share count
    pub quantity: f64,
    /// Weighted-average purchase price per share; recomputed on buys only
    pub average_cost: f64,
    /// Most recent quote applied, used for unrealized valuation
    pub last_price: f64,
    /// When the position was opened (ms)
    pub opened_at: i64,
    /// When the position was last updated (ms)
    pub updated_at: i64,
}

impl Position {
    /// Open a new position from an initial purchase.
    pub fn open(symbol: String, quantity: f64, price: f64) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            symbol,
            quantity,
            average_cost: price,
            last_price: price,
            opened_at: now,
            updated_at: now,
        }
    }

    /// Current market value at the last known price.
    pub fn market_value(&self) -> f64 {
        self.quantity * self.last_price
    }

    /// Paper profit/loss against the average cost basis.
    pub fn unrealized_pnl(&self) -> f64 {
        (self.last_price - self.average_cost) * self.quantity
    }
}

/// A badge the player has earned, with its acquisition timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeAward {
    /// Badge id from the catalog
    pub id: String,
    /// When the badge was earned (ms)
    pub earned_at: i64,
}

/// The root aggregate, one per local player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account ID
    pub id: String,
    /// Local player identity this account belongs to
    pub player_key: String,
    /// Initial cash balance
    pub starting_balance: f64,
    /// Cash available for purchases; never negative
    pub cash_balance: f64,
    /// Market value of all holdings at last known prices
    pub portfolio_value: f64,
    /// Paper P&L on currently held shares
    pub unrealized_pnl: f64,
    /// P&L locked in by sells, against average cost
    pub realized_pnl: f64,
    /// Realized plus unrealized P&L; quest-progress input
    pub total_pnl: f64,
    /// Cumulative experience points; never decreases
    pub experience_points: u64,
    /// Derived from experience points, never set directly
    pub level: u32,
    /// Open positions keyed by symbol
    pub holdings: BTreeMap<String, Position>,
    /// Quest ids granted so far, each at most once
    pub completed_quest_ids: BTreeSet<String>,
    /// Badges earned so far, each at most once
    pub earned_badges: Vec<BadgeAward>,
    /// Total number of executed buys and sells
    pub trade_count: u64,
    /// Largest single trade by notional value
    pub largest_trade_value: f64,
    /// Learning modules completed, each counted once
    pub completed_module_ids: BTreeSet<String>,
    /// When the account was created (ms)
    pub created_at: i64,
    /// When the account was last updated (ms)
    pub updated_at: i64,
}

impl Account {
    /// Create a fresh account with the given starting balance and no history.
    pub fn new(player_key: String, starting_balance: f64) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            player_key,
            starting_balance,
            cash_balance: starting_balance,
            portfolio_value: 0.0,
            unrealized_pnl: 0.0,
            realized_pnl: 0.0,
            total_pnl: 0.0,
            experience_points: 0,
            level: 1,
            holdings: BTreeMap::new(),
            completed_quest_ids: BTreeSet::new(),
            earned_badges: Vec::new(),
            trade_count: 0,
            largest_trade_value: 0.0,
            completed_module_ids: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute derived valuation figures from holdings. Call after any
    /// change to holdings or prices.
    pub fn recalculate(&mut self) {
        self.portfolio_value = self.holdings.values().map(Position::market_value).sum();
        self.unrealized_pnl = self.holdings.values().map(Position::unrealized_pnl).sum();
        self.total_pnl = self.realized_pnl + self.unrealized_pnl;
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Total equity (cash plus holdings at market).
    pub fn equity(&self) -> f64 {
        self.cash_balance + self.portfolio_value
    }

    /// Number of open positions.
    pub fn position_count(&self) -> usize {
        self.holdings.len()
    }

    /// Whether a badge has already been earned.
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.earned_badges.iter().any(|b| b.id == badge_id)
    }
}
