use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Margin mode of a futures position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarginType {
    /// Isolated margin - each position has its own margin
    Isolated,
}

/// Leverage setting for an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leverage {
    pub asset_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub leverage: Decimal,
    pub margin_type: MarginType,
}

impl Leverage {
    pub fn isolated(asset_id: impl Into<String>, leverage: Decimal) -> Self {
        Self {
            asset_id: asset_id.into(),
            leverage,
            margin_type: MarginType::Isolated,
        }
    }
}
