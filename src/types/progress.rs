//! Progression Types
//!
//! Quest and badge catalog definitions and the metrics they track.

use serde::{Deserialize, Serialize};

/// Whether a catalog entry is a quest or a badge.
///
/// Both are one-time rewards; badges additionally record an earned-at
/// timestamp for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardKind {
    Quest,
    Badge,
}

impl std::fmt::Display for AwardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AwardKind::Quest => write!(f, "quest"),
            AwardKind::Badge => write!(f, "badge"),
        }
    }
}

/// The account metric a catalog entry measures progress against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMetric {
    /// Total executed buys and sells
    TradeCount,
    /// Distinct sectors among currently held symbols
    UniqueSectorCount,
    /// Realized plus unrealized P&L
    CumulativePnl,
    /// Number of open positions
    PositionCount,
    /// Largest single trade by notional value
    SingleTradeValue,
    /// Completed learning modules
    CompletedModuleCount,
    /// Current level derived from experience points
    Level,
}

impl std::fmt::Display for ProgressMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressMetric::TradeCount => write!(f, "trade_count"),
            ProgressMetric::UniqueSectorCount => write!(f, "unique_sector_count"),
            ProgressMetric::CumulativePnl => write!(f, "cumulative_pnl"),
            ProgressMetric::PositionCount => write!(f, "position_count"),
            ProgressMetric::SingleTradeValue => write!(f, "single_trade_value"),
            ProgressMetric::CompletedModuleCount => write!(f, "completed_module_count"),
            ProgressMetric::Level => write!(f, "level"),
        }
    }
}

/// A quest or badge definition in the fixed catalog.
#[derive(Debug, Clone, Copy)]
pub struct QuestDef {
    /// Stable id, unique across quests and badges
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    /// Display description
    pub description: &'static str,
    pub kind: AwardKind,
    /// Metric this entry measures
    pub metric: ProgressMetric,
    /// Progress threshold that completes the entry
    pub target: f64,
    /// Experience granted on completion; zero skips the grant
    pub xp_reward: u64,
}
