use std::env;

/// Gameplay tuning constants.
///
/// These are configuration, not business logic: the ledger and progression
/// engines read whatever values are supplied here.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Cash balance a fresh account starts with.
    pub starting_balance: f64,
    /// Experience granted for every executed buy or sell.
    pub xp_per_trade: u64,
    /// Experience granted for completing a learning module.
    pub xp_per_module: u64,
    /// Experience required per level: level = xp / threshold + 1.
    pub level_threshold: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 10_000.0,
            xp_per_trade: 50,
            xp_per_module: 50,
            level_threshold: 1_000,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database path for account snapshots.
    pub db_path: String,
    /// Fixed storage key identifying the local player.
    pub player_key: String,
    /// Seconds between simulated market ticks.
    pub tick_interval_secs: u64,
    /// Optional seed for the price walk (deterministic runs).
    pub market_seed: Option<u64>,
    /// Gameplay constants.
    pub game: GameConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let game = GameConfig {
            starting_balance: env::var("STARTING_BALANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000.0),
            xp_per_trade: env::var("XP_PER_TRADE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            xp_per_module: env::var("XP_PER_MODULE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            level_threshold: env::var("LEVEL_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "nestegg.db".to_string()),
            player_key: env::var("PLAYER_KEY").unwrap_or_else(|_| "local-player".to_string()),
            tick_interval_secs: env::var("TICK_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            market_seed: env::var("MARKET_SEED").ok().and_then(|v| v.parse().ok()),
            game,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
