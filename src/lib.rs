//! NestEgg - Simulated investing game server
//!
//! A paper-money portfolio ledger with a progression layer on top: trades
//! and learning modules grant experience, and a fixed quest/badge catalog
//! is re-evaluated after every mutation. Prices come from a seedable
//! random-walk market simulator, and the single local account is persisted
//! as a versioned JSON snapshot in SQLite.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use config::Config;
use services::{AccountStore, MarketSimulator};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<AccountStore>,
    pub market: Arc<MarketSimulator>,
}

// Re-export commonly used types
pub use error::{GameError, Result};
pub use types::*;
