//! Market API
//!
//! - GET /api/market/stocks - List the stock directory with live quotes
//! - GET /api/market/stocks/:symbol - Get a single stock with its quote

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::account::ApiResponse;
use crate::error::GameError;
use crate::services::market_sim::{listing, STOCK_DIRECTORY};
use crate::types::MarketCapTier;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stocks", get(list_stocks))
        .route("/stocks/:symbol", get(get_stock))
}

/// A directory entry joined with its latest quote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockView {
    pub symbol: &'static str,
    pub name: &'static str,
    pub sector: &'static str,
    pub market_cap: MarketCapTier,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// GET /api/market/stocks
async fn list_stocks(State(state): State<AppState>) -> Json<ApiResponse<Vec<StockView>>> {
    let quotes = state.market.all_quotes();

    let stocks = STOCK_DIRECTORY
        .iter()
        .map(|stock| {
            let quote = quotes.get(stock.symbol);
            StockView {
                symbol: stock.symbol,
                name: stock.name,
                sector: stock.sector,
                market_cap: stock.tier,
                price: quote.map(|q| q.price).unwrap_or(stock.base_price),
                change: quote.map(|q| q.change).unwrap_or(0.0),
                change_percent: quote.map(|q| q.change_percent).unwrap_or(0.0),
            }
        })
        .collect();

    Json(ApiResponse { data: stocks })
}

/// GET /api/market/stocks/:symbol
async fn get_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<StockView>>, GameError> {
    let stock = listing(&symbol).ok_or_else(|| GameError::NoPriceData(symbol.clone()))?;
    let quote = state
        .market
        .quote(stock.symbol)
        .ok_or_else(|| GameError::NoPriceData(symbol))?;

    Ok(Json(ApiResponse {
        data: StockView {
            symbol: stock.symbol,
            name: stock.name,
            sector: stock.sector,
            market_cap: stock.tier,
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
        },
    }))
}
