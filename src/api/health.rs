//! Health API
//!
//! Reports server liveness plus enough game state to see at a glance
//! whether the market ticker and the account snapshot are alive: the
//! number of quoted symbols and the timestamp of the freshest quote.

use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Symbols currently carrying a quote
    symbols: usize,
    /// Most recent quote timestamp (ms); stale means the ticker stopped
    last_quote_at: i64,
    /// Level of the restored player account
    account_level: u32,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let quotes = state.market.all_quotes();
    let last_quote_at = quotes.values().map(|q| q.updated_at).max().unwrap_or(0);

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        symbols: quotes.len(),
        last_quote_at,
        account_level: state.store.account().level,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
