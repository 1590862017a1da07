//! Quest/Badge Engine
//!
//! Holds the fixed catalog of quest and badge definitions, evaluates it
//! against account state after every mutation, and grants each reward
//! exactly once. Idempotence of grants is the load-bearing property here:
//! re-evaluating an already-met condition must never re-award experience.

use crate::services::progression;
use crate::types::{Account, AwardKind, BadgeAward, ProgressMetric, QuestDef};
use std::collections::HashSet;
use tracing::info;

/// Resolves a symbol to its sector. Implemented by the stock directory;
/// the engine itself owns no market metadata.
pub trait SectorLookup: Send + Sync {
    fn sector_of(&self, symbol: &str) -> Option<&'static str>;
}

/// The canonical quest and badge catalog.
///
/// Merged from the two shipped rule sets; `diversify` counts distinct held
/// sectors, not distinct symbols.
pub const CATALOG: &[QuestDef] = &[
    QuestDef {
        id: "first-trade",
        title: "First Trade",
        description: "Make your first stock purchase to get started!",
        kind: AwardKind::Quest,
        metric: ProgressMetric::TradeCount,
        target: 1.0,
        xp_reward: 100,
    },
    QuestDef {
        id: "active-trader",
        title: "Active Trader",
        description: "Complete 10 trades",
        kind: AwardKind::Quest,
        metric: ProgressMetric::TradeCount,
        target: 10.0,
        xp_reward: 250,
    },
    QuestDef {
        id: "diversify",
        title: "Diversify Portfolio",
        description: "Own stocks from at least 3 different sectors",
        kind: AwardKind::Quest,
        metric: ProgressMetric::UniqueSectorCount,
        target: 3.0,
        xp_reward: 200,
    },
    QuestDef {
        id: "profit-maker",
        title: "Profit Maker",
        description: "Achieve $500 in total profits",
        kind: AwardKind::Quest,
        metric: ProgressMetric::CumulativePnl,
        target: 500.0,
        xp_reward: 300,
    },
    QuestDef {
        id: "big-spender",
        title: "Big Spender",
        description: "Place a single trade worth $2,500 or more",
        kind: AwardKind::Quest,
        metric: ProgressMetric::SingleTradeValue,
        target: 2_500.0,
        xp_reward: 150,
    },
    QuestDef {
        id: "collector",
        title: "Collector",
        description: "Hold 5 positions at the same time",
        kind: AwardKind::Quest,
        metric: ProgressMetric::PositionCount,
        target: 5.0,
        xp_reward: 150,
    },
    QuestDef {
        id: "scholar",
        title: "Scholar",
        description: "Complete 3 learning modules",
        kind: AwardKind::Quest,
        metric: ProgressMetric::CompletedModuleCount,
        target: 3.0,
        xp_reward: 200,
    },
    QuestDef {
        id: "first-trade-badge",
        title: "First Trade",
        description: "Completed your first stock trade",
        kind: AwardKind::Badge,
        metric: ProgressMetric::TradeCount,
        target: 1.0,
        xp_reward: 25,
    },
    QuestDef {
        id: "diversified-badge",
        title: "Diversified Investor",
        description: "Built a diversified portfolio",
        kind: AwardKind::Badge,
        metric: ProgressMetric::UniqueSectorCount,
        target: 3.0,
        xp_reward: 50,
    },
    QuestDef {
        id: "profit-badge",
        title: "Profit Master",
        description: "Achieved significant profits",
        kind: AwardKind::Badge,
        metric: ProgressMetric::CumulativePnl,
        target: 500.0,
        xp_reward: 50,
    },
    QuestDef {
        id: "level-up-badge",
        title: "Level Up",
        description: "Reached Level 2",
        kind: AwardKind::Badge,
        metric: ProgressMetric::Level,
        target: 2.0,
        xp_reward: 0,
    },
];

/// Look up a catalog entry by id.
pub fn entry(id: &str) -> Option<&'static QuestDef> {
    CATALOG.iter().find(|def| def.id == id)
}

/// What an evaluation pass granted.
#[derive(Debug, Default, Clone)]
pub struct EvaluationOutcome {
    /// Quest ids newly completed in this pass
    pub completed_quests: Vec<String>,
    /// Badge ids newly earned in this pass
    pub earned_badges: Vec<String>,
    /// Total experience awarded across all grants
    pub xp_awarded: u64,
}

impl EvaluationOutcome {
    pub fn is_empty(&self) -> bool {
        self.completed_quests.is_empty() && self.earned_badges.is_empty()
    }
}

/// Current progress of an account against a metric.
pub fn metric_value(account: &Account, metric: ProgressMetric, sectors: &dyn SectorLookup) -> f64 {
    match metric {
        ProgressMetric::TradeCount => account.trade_count as f64,
        ProgressMetric::UniqueSectorCount => {
            let held: HashSet<&str> = account
                .holdings
                .keys()
                .filter_map(|symbol| sectors.sector_of(symbol))
                .collect();
            held.len() as f64
        }
        ProgressMetric::CumulativePnl => account.total_pnl,
        ProgressMetric::PositionCount => account.position_count() as f64,
        ProgressMetric::SingleTradeValue => account.largest_trade_value,
        ProgressMetric::CompletedModuleCount => account.completed_module_ids.len() as f64,
        ProgressMetric::Level => account.level as f64,
    }
}

/// Evaluate the full catalog against the account, granting every newly met
/// entry exactly once.
///
/// Runs to a fixed point: experience granted by one entry can push the level
/// over a level-badge threshold within the same call, so passes repeat until
/// nothing new qualifies. Entries already granted are skipped outright, which
/// makes repeated evaluation a no-op.
pub fn evaluate(
    account: &mut Account,
    sectors: &dyn SectorLookup,
    level_threshold: u64,
) -> EvaluationOutcome {
    let mut outcome = EvaluationOutcome::default();

    loop {
        let mut granted_this_pass = false;

        for def in CATALOG {
            let already_granted = match def.kind {
                AwardKind::Quest => account.completed_quest_ids.contains(def.id),
                AwardKind::Badge => account.has_badge(def.id),
            };
            if already_granted {
                continue;
            }

            if metric_value(account, def.metric, sectors) < def.target {
                continue;
            }

            match def.kind {
                AwardKind::Quest => {
                    account.completed_quest_ids.insert(def.id.to_string());
                    outcome.completed_quests.push(def.id.to_string());
                }
                AwardKind::Badge => {
                    account.earned_badges.push(BadgeAward {
                        id: def.id.to_string(),
                        earned_at: chrono::Utc::now().timestamp_millis(),
                    });
                    outcome.earned_badges.push(def.id.to_string());
                }
            }

            if def.xp_reward > 0 {
                // Non-negative by construction, so the grant cannot fail.
                let _ = progression::grant_xp(account, def.xp_reward as i64, level_threshold);
                outcome.xp_awarded += def.xp_reward;
            }

            info!("{} unlocked: {} (+{} XP)", def.kind, def.id, def.xp_reward);
            granted_this_pass = true;
        }

        if !granted_this_pass {
            break;
        }
    }

    outcome
}
