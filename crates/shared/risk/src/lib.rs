//! Mudrex Position Risk
//!
//! Mark-to-market monitoring for isolated-margin futures positions:
//!
//! - **Metrics**: unrealized P&L, return on margin, margin ratio, liquidation price
//! - **Health**: healthy / margin call / liquidatable classification
//! - **Triggers**: stop-loss and take-profit orders crossed by the mark price
//! - **Config**: JSON-loadable maintenance margin rates and thresholds
//!
//! ```text
//!   mark price tick
//!         │
//!         ▼
//!  ┌──────────────┐   metrics   ┌──────────────────┐
//!  │   Position   │ ──────────► │ MarginCalculator │
//!  └──────────────┘             └──────────────────┘
//!         │                              │
//!         ▼                              ▼
//!   RiskOrder triggers          health vs RiskConfig
//!         └──────────► PositionReport ◄──┘
//! ```

pub mod config;
pub mod error;
pub mod monitor;

pub use config::{
    ConfigError, RiskConfig, load_config, load_config_from_str, load_default_config,
};
pub use error::{RiskError, RiskResult};
pub use monitor::{AccountRisk, PositionHealth, PositionMonitor, PositionReport};
