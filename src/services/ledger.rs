//! Ledger Engine
//!
//! Owns the cash balance and holdings of an account under buy/sell
//! operations, and recomputes valuation after price updates.
//!
//! Every operation validates its preconditions before touching the account,
//! so a rejected trade leaves state exactly as it was.

use crate::error::GameError;
use crate::types::{Account, Position, Quote};
use std::collections::HashMap;
use tracing::debug;

/// Execute a buy: debit cash and merge shares into the position at a
/// weighted-average cost basis.
///
/// Returns the notional value of the trade.
pub fn buy(account: &mut Account, symbol: &str, quantity: f64, price: f64) -> Result<f64, GameError> {
    if quantity <= 0.0 || !quantity.is_finite() {
        return Err(GameError::InvalidQuantity(quantity));
    }
    if price < 0.0 || !price.is_finite() {
        return Err(GameError::InvalidPrice(price));
    }

    let cost = price * quantity;
    if cost > account.cash_balance {
        return Err(GameError::InsufficientFunds {
            needed: cost,
            available: account.cash_balance,
        });
    }

    account.cash_balance -= cost;

    match account.holdings.get_mut(symbol) {
        Some(position) => {
            let total_quantity = position.quantity + quantity;
            position.average_cost =
                (position.average_cost * position.quantity + price * quantity) / total_quantity;
            position.quantity = total_quantity;
            position.last_price = price;
            position.updated_at = chrono::Utc::now().timestamp_millis();
        }
        None => {
            account
                .holdings
                .insert(symbol.to_string(), Position::open(symbol.to_string(), quantity, price));
        }
    }

    record_trade(account, cost);
    account.recalculate();

    debug!("Bought {} {} @ {} (cost {})", quantity, symbol, price, cost);
    Ok(cost)
}

/// Execute a sell: credit cash and realize P&L against the average cost.
///
/// The average cost is never changed by a sell; a position sold down to zero
/// is removed from the holdings map entirely. Returns the realized P&L.
pub fn sell(
    account: &mut Account,
    symbol: &str,
    quantity: f64,
    price: f64,
) -> Result<f64, GameError> {
    if quantity <= 0.0 || !quantity.is_finite() {
        return Err(GameError::InvalidQuantity(quantity));
    }
    if price < 0.0 || !price.is_finite() {
        return Err(GameError::InvalidPrice(price));
    }

    let position = account
        .holdings
        .get_mut(symbol)
        .ok_or_else(|| GameError::UnknownPosition(symbol.to_string()))?;

    if quantity > position.quantity {
        return Err(GameError::InsufficientShares {
            symbol: symbol.to_string(),
            requested: quantity,
            held: position.quantity,
        });
    }

    let proceeds = price * quantity;
    let realized = (price - position.average_cost) * quantity;

    position.quantity -= quantity;
    position.last_price = price;
    position.updated_at = chrono::Utc::now().timestamp_millis();

    if position.quantity <= 0.0 {
        account.holdings.remove(symbol);
    }

    account.cash_balance += proceeds;
    account.realized_pnl += realized;

    record_trade(account, proceeds);
    account.recalculate();

    debug!(
        "Sold {} {} @ {} (proceeds {}, realized {})",
        quantity, symbol, price, proceeds, realized
    );
    Ok(realized)
}

/// Apply the latest quotes to held positions and refresh valuation.
///
/// Idempotent; symbols without a quote keep their last known price, and
/// quotes for symbols not held are ignored.
pub fn revalue(account: &mut Account, quotes: &HashMap<String, Quote>) {
    let now = chrono::Utc::now().timestamp_millis();
    for (symbol, position) in account.holdings.iter_mut() {
        if let Some(quote) = quotes.get(symbol) {
            position.last_price = quote.price;
            position.updated_at = now;
        }
    }
    account.recalculate();
}

/// Bump the per-trade counters shared by buys and sells.
fn record_trade(account: &mut Account, notional: f64) {
    account.trade_count += 1;
    if notional > account.largest_trade_value {
        account.largest_trade_value = notional;
    }
}
