use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Liquidity role of a fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    /// Added liquidity to the book
    Maker,
    /// Removed liquidity from the book
    Taker,
}

/// Ledger entry for a fee charged against an order. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRecord {
    pub asset_id: String,
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub fee_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fee_rate: Decimal,
    pub trade_type: TradeType,
    pub order_id: String,
    pub created_at: DateTime<Utc>,
}
