use std::collections::HashMap;
use std::path::Path;

use mudrex_calc::DecimalFormat;
use mudrex_calc::decimal::MAX_SCALE;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Risk thresholds for position monitoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Default maintenance margin rate
    pub maintenance_margin_rate: Decimal,
    /// Margin call when equity / maintenance requirement drops below this
    pub margin_call_ratio: Decimal,
    /// Per-symbol maintenance margin rates
    pub maintenance_margin_rates: HashMap<String, Decimal>,
    /// Rounding applied to reported figures
    pub output: DecimalFormat,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            maintenance_margin_rate: dec!(0.005),
            margin_call_ratio: dec!(1.5),
            maintenance_margin_rates: HashMap::new(),
            output: DecimalFormat::default(),
        }
    }
}

impl RiskConfig {
    /// Maintenance margin rate for a symbol, falling back to the default
    pub fn maintenance_rate_for(&self, symbol: &str) -> Decimal {
        self.maintenance_margin_rates
            .get(symbol)
            .copied()
            .unwrap_or(self.maintenance_margin_rate)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = std::iter::once(("default", &self.maintenance_margin_rate)).chain(
            self.maintenance_margin_rates
                .iter()
                .map(|(symbol, rate)| (symbol.as_str(), rate)),
        );
        for (name, rate) in rates {
            if *rate < Decimal::ZERO || *rate >= Decimal::ONE {
                return Err(ConfigError::Invalid(format!(
                    "maintenance margin rate for {name} must be in [0, 1), got {rate}"
                )));
            }
        }
        if self.margin_call_ratio < Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "margin_call_ratio must be at least 1, got {}",
                self.margin_call_ratio
            )));
        }
        if self.output.scale > MAX_SCALE {
            return Err(ConfigError::Invalid(format!(
                "output scale must be at most {MAX_SCALE}, got {}",
                self.output.scale
            )));
        }
        Ok(())
    }
}

/// Load and validate risk configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RiskConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load and validate risk configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<RiskConfig, ConfigError> {
    let config: RiskConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<RiskConfig, ConfigError> {
    let default_config = include_str!("risk_config.json");
    load_config_from_str(default_config)
}
