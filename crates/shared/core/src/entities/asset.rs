use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TradeType;
use crate::error::{ModelError, ModelResult};

/// Tradable instrument metadata, refreshed periodically from the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: String,
    pub symbol: String,
    pub base_currency: String,
    pub quote_currency: String,

    #[serde(with = "rust_decimal::serde::str")]
    pub min_quantity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub max_quantity: Decimal,
    /// Order quantities must be a multiple of this (zero = unrestricted)
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity_step: Decimal,

    #[serde(with = "rust_decimal::serde::str")]
    pub min_leverage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub max_leverage: Decimal,

    /// Fee rate for orders that add liquidity
    #[serde(with = "rust_decimal::serde::str")]
    pub maker_fee: Decimal,
    /// Fee rate for orders that remove liquidity
    #[serde(with = "rust_decimal::serde::str")]
    pub taker_fee: Decimal,

    pub is_active: bool,
}

impl Asset {
    /// Check a quantity against the asset's bounds and step size
    pub fn validate_quantity(&self, quantity: Decimal) -> ModelResult<()> {
        if quantity <= Decimal::ZERO {
            return Err(ModelError::InvalidQuantity(quantity));
        }
        if quantity < self.min_quantity || quantity > self.max_quantity {
            return Err(ModelError::QuantityOutOfRange {
                quantity,
                min: self.min_quantity,
                max: self.max_quantity,
            });
        }
        if !self.quantity_step.is_zero() {
            let rem = quantity
                .checked_rem(self.quantity_step)
                .ok_or(ModelError::Overflow("quantity step check"))?;
            if !rem.is_zero() {
                return Err(ModelError::QuantityStep {
                    quantity,
                    step: self.quantity_step,
                });
            }
        }
        Ok(())
    }

    /// Check a leverage against the asset's allowed range
    pub fn validate_leverage(&self, leverage: Decimal) -> ModelResult<()> {
        if leverage < self.min_leverage || leverage > self.max_leverage {
            return Err(ModelError::LeverageOutOfRange {
                leverage,
                min: self.min_leverage,
                max: self.max_leverage,
            });
        }
        Ok(())
    }

    /// Fee rate charged for the given liquidity role
    pub fn fee_rate(&self, trade_type: TradeType) -> Decimal {
        match trade_type {
            TradeType::Maker => self.maker_fee,
            TradeType::Taker => self.taker_fee,
        }
    }
}

/// One page of the asset listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetListResponse {
    pub assets: Vec<Asset>,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl AssetListResponse {
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    /// Find an asset on this page by symbol
    pub fn find(&self, symbol: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.symbol == symbol)
    }
}
