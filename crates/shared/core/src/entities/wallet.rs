use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Wallet a transfer moves funds between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletType {
    Spot,
    Futures,
}

/// Spot wallet snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub withdrawable: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub invested: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub rewards: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub coin_investable: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub coinset_investable: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub vault_investable: Decimal,
}

/// Futures wallet snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesBalance {
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    /// Held as margin by open positions and orders
    #[serde(with = "rust_decimal::serde::str")]
    pub locked_amount: Decimal,
    pub first_time_user: bool,
}

impl FuturesBalance {
    /// Balance not locked as margin
    pub fn available(&self) -> ModelResult<Decimal> {
        self.balance
            .checked_sub(self.locked_amount)
            .ok_or(ModelError::Overflow("available balance"))
    }
}

/// Outcome of a spot <-> futures transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub transaction_id: String,
    pub success: bool,
}
