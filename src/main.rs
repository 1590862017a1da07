use nestegg::config::Config;
use nestegg::services::{AccountStore, MarketSimulator, SectorLookup, SqliteSnapshotStore};
use nestegg::{api, AppState};

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nestegg=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting NestEgg server on {}:{}", config.host, config.port);

    // Open the snapshot store and restore (or create) the player account
    let snapshots = Arc::new(SqliteSnapshotStore::new(&config.db_path)?);
    let market = Arc::new(MarketSimulator::new(config.market_seed));
    let sectors: Arc<dyn SectorLookup> = market.clone();
    let store = Arc::new(AccountStore::open(
        config.player_key.clone(),
        config.game.clone(),
        snapshots,
        sectors,
    ));

    // Start the market ticker: advance prices and revalue the account
    {
        let market = market.clone();
        let store = store.clone();
        let interval = config.tick_interval_secs;
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(tokio::time::Duration::from_secs(interval.max(1)));
            loop {
                ticker.tick().await;
                let quotes = market.tick();
                let outcome = store.revalue(&quotes);
                if !outcome.progress.is_empty() {
                    info!(
                        "Market move granted rewards: quests {:?}, badges {:?}",
                        outcome.progress.completed_quests, outcome.progress.earned_badges
                    );
                }
            }
        });
    }

    // Create application state
    let state = AppState {
        config: config.clone(),
        store,
        market,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("NestEgg server listening on {}", addr);

    if config.market_seed.is_some() {
        warn!("Running with a fixed market seed; prices are deterministic");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
