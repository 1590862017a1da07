//! Account Store
//!
//! Owns the single local player account behind a lock and runs every
//! mutation as one atomic sequence: ledger operation, experience grant,
//! quest evaluation, snapshot save. Readers get clones; nothing hands out
//! a reference into the locked state.

use crate::config::GameConfig;
use crate::error::GameError;
use crate::services::ledger;
use crate::services::progression;
use crate::services::quests::{self, EvaluationOutcome, SectorLookup};
use crate::services::snapshot_store::SnapshotStore;
use crate::types::{Account, Quote};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Result of a state-changing operation: the account after the mutation and
/// whatever the quest evaluation granted along the way.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub account: Account,
    pub progress: EvaluationOutcome,
}

pub struct AccountStore {
    account: Mutex<Account>,
    snapshots: Arc<dyn SnapshotStore>,
    sectors: Arc<dyn SectorLookup>,
    game: GameConfig,
    player_key: String,
}

impl AccountStore {
    /// Open the store: restore the snapshot for the player key, or create a
    /// fresh account with the configured starting balance if none exists.
    pub fn open(
        player_key: String,
        game: GameConfig,
        snapshots: Arc<dyn SnapshotStore>,
        sectors: Arc<dyn SectorLookup>,
    ) -> Self {
        let account = match snapshots.load(&player_key) {
            Some(account) => {
                info!(
                    "Restored account {} (level {}, {} trades)",
                    account.id, account.level, account.trade_count
                );
                account
            }
            None => {
                let account = Account::new(player_key.clone(), game.starting_balance);
                info!(
                    "Created fresh account {} with starting balance {}",
                    account.id, game.starting_balance
                );
                account
            }
        };

        Self {
            account: Mutex::new(account),
            snapshots,
            sectors,
            game,
            player_key,
        }
    }

    /// Snapshot of the current account state.
    pub fn account(&self) -> Account {
        self.account.lock().unwrap().clone()
    }

    /// Buy shares at the given price. On success the trade XP is granted,
    /// quests are re-evaluated, and the snapshot is saved.
    pub fn buy(&self, symbol: &str, quantity: f64, price: f64) -> Result<MutationOutcome, GameError> {
        let mut account = self.account.lock().unwrap();
        ledger::buy(&mut account, symbol, quantity, price)?;
        let progress = self.settle(&mut account)?;
        Ok(MutationOutcome {
            account: account.clone(),
            progress,
        })
    }

    /// Sell shares at the given price, realizing P&L against average cost.
    pub fn sell(
        &self,
        symbol: &str,
        quantity: f64,
        price: f64,
    ) -> Result<MutationOutcome, GameError> {
        let mut account = self.account.lock().unwrap();
        ledger::sell(&mut account, symbol, quantity, price)?;
        let progress = self.settle(&mut account)?;
        Ok(MutationOutcome {
            account: account.clone(),
            progress,
        })
    }

    /// Grant experience directly, outside of trading and learning. Negative
    /// amounts are rejected before any state changes.
    pub fn grant_xp(&self, amount: i64) -> Result<MutationOutcome, GameError> {
        let mut account = self.account.lock().unwrap();
        progression::grant_xp(&mut account, amount, self.game.level_threshold)?;
        let progress = self.evaluate(&mut account);
        self.persist(&account);
        Ok(MutationOutcome {
            account: account.clone(),
            progress,
        })
    }

    /// Mark a learning module complete. Repeating a module is a no-op; the
    /// module XP is granted only the first time.
    pub fn complete_module(&self, module_id: &str) -> Result<MutationOutcome, GameError> {
        let mut account = self.account.lock().unwrap();

        let progress = if account.completed_module_ids.insert(module_id.to_string()) {
            progression::grant_xp(
                &mut account,
                self.game.xp_per_module as i64,
                self.game.level_threshold,
            )?;
            let progress = self.evaluate(&mut account);
            self.persist(&account);
            progress
        } else {
            EvaluationOutcome::default()
        };

        Ok(MutationOutcome {
            account: account.clone(),
            progress,
        })
    }

    /// Apply fresh quotes to held positions and re-evaluate quests; price
    /// moves can complete P&L-based quests without a trade.
    pub fn revalue(&self, quotes: &HashMap<String, Quote>) -> MutationOutcome {
        let mut account = self.account.lock().unwrap();
        ledger::revalue(&mut account, quotes);
        let progress = self.evaluate(&mut account);
        self.persist(&account);
        MutationOutcome {
            account: account.clone(),
            progress,
        }
    }

    /// Post-trade settlement: trade XP, quest evaluation, snapshot save.
    fn settle(&self, account: &mut Account) -> Result<EvaluationOutcome, GameError> {
        progression::grant_xp(
            account,
            self.game.xp_per_trade as i64,
            self.game.level_threshold,
        )?;
        let progress = self.evaluate(account);
        self.persist(account);
        Ok(progress)
    }

    fn evaluate(&self, account: &mut Account) -> EvaluationOutcome {
        quests::evaluate(account, self.sectors.as_ref(), self.game.level_threshold)
    }

    /// Save failures are logged but do not fail the operation; the in-memory
    /// state is authoritative and the next successful save catches up.
    fn persist(&self, account: &Account) {
        if let Err(e) = self.snapshots.save(&self.player_key, account) {
            warn!("Failed to save account snapshot: {}", e);
        }
    }
}
