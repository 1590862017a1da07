use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Ledger and progression errors.
///
/// All trade rejections are local and recoverable: the operation is refused
/// as a whole and account state is left untouched. Nothing is clamped to
/// "what you can afford".
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(f64),

    #[error("Price must be non-negative and finite, got {0}")]
    InvalidPrice(f64),

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("Insufficient shares of {symbol}: requested {requested}, hold {held}")]
    InsufficientShares {
        symbol: String,
        requested: f64,
        held: f64,
    },

    #[error("No position held in {0}")]
    UnknownPosition(String),

    #[error("XP grant must be non-negative, got {0}")]
    InvalidXpGrant(i64),

    #[error("No price data available for {0}")]
    NoPriceData(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl GameError {
    /// Stable machine-readable error code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidQuantity(_) => "INVALID_QUANTITY",
            GameError::InvalidPrice(_) => "INVALID_PRICE",
            GameError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            GameError::InsufficientShares { .. } => "INSUFFICIENT_SHARES",
            GameError::UnknownPosition(_) => "UNKNOWN_POSITION",
            GameError::InvalidXpGrant(_) => "INVALID_XP_GRANT",
            GameError::NoPriceData(_) => "NO_PRICE_DATA",
            GameError::Storage(_) => "STORAGE_ERROR",
            GameError::SerdeJson(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = match &self {
            GameError::InvalidQuantity(_)
            | GameError::InvalidPrice(_)
            | GameError::InsufficientFunds { .. }
            | GameError::InsufficientShares { .. }
            | GameError::InvalidXpGrant(_) => StatusCode::BAD_REQUEST,
            GameError::UnknownPosition(_) => StatusCode::NOT_FOUND,
            GameError::NoPriceData(_) => StatusCode::SERVICE_UNAVAILABLE,
            GameError::Storage(_) | GameError::SerdeJson(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            GameError::InsufficientFunds {
                needed: 100.0,
                available: 50.0
            }
            .code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(GameError::InvalidQuantity(0.0).code(), "INVALID_QUANTITY");
        assert_eq!(GameError::InvalidPrice(-3.0).code(), "INVALID_PRICE");
        assert_eq!(
            GameError::UnknownPosition("AAPL".to_string()).code(),
            "UNKNOWN_POSITION"
        );
    }

    #[test]
    fn test_error_messages_include_amounts() {
        let err = GameError::InsufficientShares {
            symbol: "TSLA".to_string(),
            requested: 10.0,
            held: 4.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("TSLA"));
        assert!(msg.contains("10"));
        assert!(msg.contains("4"));
    }
}
