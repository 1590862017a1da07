//! Account API
//!
//! The local player's account and everything that mutates it:
//!
//! - GET /api/account - Current account state
//! - POST /api/account/buy - Buy shares at the current market price
//! - POST /api/account/sell - Sell shares at the current market price
//! - POST /api/account/learn - Mark a learning module complete
//! - GET /api/account/quests - Quest catalog with progress
//! - GET /api/account/badges - Badge catalog with earned state
//!
//! Trades always execute at the simulator's latest quote; the client never
//! supplies a price.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::services::account_store::MutationOutcome;
use crate::services::quests::{self, CATALOG};
use crate::types::{Account, AwardKind};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_account))
        .route("/buy", post(buy))
        .route("/sell", post(sell))
        .route("/learn", post(learn))
        .route("/quests", get(get_quests))
        .route("/badges", get(get_badges))
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub symbol: String,
    pub quantity: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnRequest {
    pub module_id: String,
}

/// Account state after a mutation, with the rewards it triggered.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationView {
    pub account: Account,
    pub completed_quests: Vec<String>,
    pub earned_badges: Vec<String>,
    pub xp_awarded: u64,
}

impl From<MutationOutcome> for MutationView {
    fn from(outcome: MutationOutcome) -> Self {
        Self {
            account: outcome.account,
            completed_quests: outcome.progress.completed_quests,
            earned_badges: outcome.progress.earned_badges,
            xp_awarded: outcome.progress.xp_awarded,
        }
    }
}

/// A quest with the player's current progress toward it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestView {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub target: f64,
    pub progress: f64,
    pub completed: bool,
    pub xp_reward: u64,
}

/// A badge with its earned state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeView {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub earned: bool,
    pub earned_at: Option<i64>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/account
async fn get_account(State(state): State<AppState>) -> Json<ApiResponse<Account>> {
    Json(ApiResponse {
        data: state.store.account(),
    })
}

/// POST /api/account/buy
async fn buy(
    State(state): State<AppState>,
    Json(request): Json<TradeRequest>,
) -> Result<Json<ApiResponse<MutationView>>, GameError> {
    let quote = state
        .market
        .quote(&request.symbol)
        .ok_or_else(|| GameError::NoPriceData(request.symbol.clone()))?;

    let outcome = state.store.buy(&request.symbol, request.quantity, quote.price)?;
    Ok(Json(ApiResponse {
        data: outcome.into(),
    }))
}

/// POST /api/account/sell
async fn sell(
    State(state): State<AppState>,
    Json(request): Json<TradeRequest>,
) -> Result<Json<ApiResponse<MutationView>>, GameError> {
    let quote = state
        .market
        .quote(&request.symbol)
        .ok_or_else(|| GameError::NoPriceData(request.symbol.clone()))?;

    let outcome = state.store.sell(&request.symbol, request.quantity, quote.price)?;
    Ok(Json(ApiResponse {
        data: outcome.into(),
    }))
}

/// POST /api/account/learn
async fn learn(
    State(state): State<AppState>,
    Json(request): Json<LearnRequest>,
) -> Result<Json<ApiResponse<MutationView>>, GameError> {
    let outcome = state.store.complete_module(&request.module_id)?;
    Ok(Json(ApiResponse {
        data: outcome.into(),
    }))
}

/// GET /api/account/quests
async fn get_quests(State(state): State<AppState>) -> Json<ApiResponse<Vec<QuestView>>> {
    let account = state.store.account();

    let data = CATALOG
        .iter()
        .filter(|def| def.kind == AwardKind::Quest)
        .map(|def| {
            let progress = quests::metric_value(&account, def.metric, state.market.as_ref());
            QuestView {
                id: def.id,
                title: def.title,
                description: def.description,
                target: def.target,
                progress: progress.min(def.target),
                completed: account.completed_quest_ids.contains(def.id),
                xp_reward: def.xp_reward,
            }
        })
        .collect();

    Json(ApiResponse { data })
}

/// GET /api/account/badges
async fn get_badges(State(state): State<AppState>) -> Json<ApiResponse<Vec<BadgeView>>> {
    let account = state.store.account();

    let data = CATALOG
        .iter()
        .filter(|def| def.kind == AwardKind::Badge)
        .map(|def| {
            let award = account.earned_badges.iter().find(|b| b.id == def.id);
            BadgeView {
                id: def.id,
                title: def.title,
                description: def.description,
                earned: award.is_some(),
                earned_at: award.map(|b| b.earned_at),
            }
        })
        .collect();

    Json(ApiResponse { data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_request_deserialization() {
        let request: TradeRequest =
            serde_json::from_str(r#"{"symbol":"AAPL","quantity":2.5}"#).unwrap();
        assert_eq!(request.symbol, "AAPL");
        assert_eq!(request.quantity, 2.5);
    }

    #[test]
    fn test_quest_view_serialization() {
        let view = QuestView {
            id: "first-trade",
            title: "First Trade",
            description: "Make your first stock purchase to get started!",
            target: 1.0,
            progress: 0.0,
            completed: false,
            xp_reward: 100,
        };

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"xpReward\":100"));
        assert!(json.contains("\"completed\":false"));
    }

    #[test]
    fn test_badge_view_serialization() {
        let view = BadgeView {
            id: "first-trade-badge",
            title: "First Trade",
            description: "Completed your first stock trade",
            earned: true,
            earned_at: Some(1_700_000_000_000),
        };

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"earnedAt\":1700000000000"));
    }
}
