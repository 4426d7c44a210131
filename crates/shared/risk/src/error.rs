use mudrex_calc::CalcError;
use mudrex_core::ModelError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Calculation failed: {0}")]
    Calc(#[from] CalcError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Position {0} is not open")]
    PositionNotOpen(String),
}

pub type RiskResult<T> = std::result::Result<T, RiskError>;
