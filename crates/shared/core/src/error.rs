use rust_decimal::Decimal;
use thiserror::Error;

/// Domain-level errors for lifecycle transitions and request validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid {entity} transition from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Fill of {fill} exceeds remaining quantity {remaining}")]
    Overfill { fill: Decimal, remaining: Decimal },

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    #[error("Price must be positive, got {0}")]
    InvalidPrice(Decimal),

    #[error("Quantity {quantity} outside allowed range [{min}, {max}]")]
    QuantityOutOfRange {
        quantity: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Quantity {quantity} is not a multiple of step {step}")]
    QuantityStep { quantity: Decimal, step: Decimal },

    #[error("Leverage {leverage} outside allowed range [{min}, {max}]")]
    LeverageOutOfRange {
        leverage: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Limit order requires a price")]
    MissingPrice,

    #[error("Invalid {kind} price {price}: {reason}")]
    InvalidRiskPrice {
        kind: &'static str,
        price: Decimal,
        reason: &'static str,
    },

    #[error("Asset is not active: {0}")]
    AssetInactive(String),

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
