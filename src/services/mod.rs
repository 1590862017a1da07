pub mod account_store;
pub mod ledger;
pub mod market_sim;
pub mod progression;
pub mod quests;
pub mod snapshot_store;

pub use account_store::{AccountStore, MutationOutcome};
pub use market_sim::{MarketSimulator, STOCK_DIRECTORY};
pub use quests::{EvaluationOutcome, SectorLookup, CATALOG};
pub use snapshot_store::{SnapshotStore, SqliteSnapshotStore, SNAPSHOT_SCHEMA_VERSION};
