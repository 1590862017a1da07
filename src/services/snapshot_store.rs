//! SQLite persistence for account snapshots.
//!
//! A single serialized snapshot per player, keyed by the fixed player key,
//! rewritten after every mutation and loaded on startup. No history is kept;
//! the equity curve is derivable client-side if ever needed.

use crate::error::GameError;
use crate::types::Account;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Bump when the snapshot layout changes. Snapshots written under a
/// different version are discarded on load and the account starts fresh.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Port for snapshot persistence; the account store saves through this after
/// every successful mutation, decoupled from the mutation logic itself.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot for a player, if a compatible one exists.
    fn load(&self, player_key: &str) -> Option<Account>;

    /// Persist the snapshot for a player, replacing any previous one.
    fn save(&self, player_key: &str, account: &Account) -> Result<(), GameError>;
}

/// SQLite-backed snapshot store.
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    /// Create a new store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("Snapshot store initialized");
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn new_in_memory() -> Result<Self, GameError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory snapshot store initialized");
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), GameError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS account_snapshots (
                player_key TEXT PRIMARY KEY,
                schema_version INTEGER NOT NULL,
                snapshot_json TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self, player_key: &str) -> Option<Account> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT schema_version, snapshot_json
             FROM account_snapshots WHERE player_key = ?1",
            params![player_key],
            |row| {
                let version: u32 = row.get(0)?;
                let json: String = row.get(1)?;
                Ok((version, json))
            },
        );

        match result {
            Ok((version, _)) if version != SNAPSHOT_SCHEMA_VERSION => {
                warn!(
                    "Discarding snapshot for {} with schema version {} (current {})",
                    player_key, version, SNAPSHOT_SCHEMA_VERSION
                );
                None
            }
            Ok((_, json)) => match serde_json::from_str(&json) {
                Ok(account) => Some(account),
                Err(e) => {
                    error!("Corrupt snapshot for {}: {}", player_key, e);
                    None
                }
            },
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                error!("Error loading snapshot: {}", e);
                None
            }
        }
    }

    fn save(&self, player_key: &str, account: &Account) -> Result<(), GameError> {
        let conn = self.conn.lock().unwrap();
        let json = serde_json::to_string(account)?;
        let now = chrono::Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO account_snapshots (player_key, schema_version, snapshot_json, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(player_key) DO UPDATE SET
                schema_version = excluded.schema_version,
                snapshot_json = excluded.snapshot_json,
                updated_at = excluded.updated_at",
            params![player_key, SNAPSHOT_SCHEMA_VERSION, json, now],
        )?;

        debug!("Saved snapshot for {}", player_key);
        Ok(())
    }
}
