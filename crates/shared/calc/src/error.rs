use thiserror::Error;

/// Calculator failures. Never replaced by a default value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Invalid decimal: {0:?}")]
    InvalidDecimal(String),

    #[error("Division by zero: {0} is zero")]
    DivisionByZero(&'static str),

    #[error("Overflow: {0} exceeds representable precision")]
    Overflow(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("Order is for asset {order}, fee schedule is for {asset}")]
    AssetMismatch { asset: String, order: String },
}

pub type CalcResult<T> = std::result::Result<T, CalcError>;
