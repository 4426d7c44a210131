//! Mudrex Decimal Financial Calculator
//!
//! Precision-safe P&L, margin and liquidation math over decimal strings.
//!
//! - **Parsing**: strict decimal-string grammar, exact conversion
//! - **P&L**: unrealized P&L and return on margin
//! - **Margin**: notional, margin ratio, initial margin, liquidation price
//! - **Fees**: maker/taker fee ledger entries
//! - **Formatting**: one rounding step at output, half-even by default
//!
//! Every function is pure and stateless; all types are `Send + Sync`.
//! Arithmetic is checked, so overflow surfaces as [`CalcError::Overflow`]
//! instead of a panic.

pub mod calculator;
pub mod decimal;
pub mod error;
pub mod fees;
pub mod margin;
pub mod pnl;
pub mod strings;

pub use calculator::{
    MarginCalculator, PositionAnalytics, PositionMetrics, StandardMarginCalculator,
};
pub use decimal::{DecimalFormat, Rounding, format_decimal, parse_decimal};
pub use error::{CalcError, CalcResult};
pub use fees::{charge_fee, fee_amount};
pub use margin::{
    initial_margin, liquidation_price, margin_ratio, notional, position_margin_ratio,
};
pub use pnl::{pnl_percentage, unrealized_pnl};
pub use strings::StringCalculator;
