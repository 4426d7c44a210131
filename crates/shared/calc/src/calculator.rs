//! Position-level margin calculations.

use log::trace;
use mudrex_core::Position;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::DecimalFormat;
use crate::error::CalcResult;
use crate::{margin, pnl};

/// Mark-to-market snapshot of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionMetrics {
    #[serde(with = "rust_decimal::serde::str")]
    pub unrealized_pnl: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub pnl_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub notional: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub margin_ratio: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub liquidation_price: Decimal,
}

impl PositionMetrics {
    /// Write the exchange-reported fields back onto the position
    pub fn apply_to(&self, position: &mut Position) {
        position.unrealized_pnl = self.unrealized_pnl;
        position.margin_ratio = self.margin_ratio;
    }

    /// Round every field for output
    pub fn rounded(&self, format: &DecimalFormat) -> Self {
        Self {
            unrealized_pnl: format.round(self.unrealized_pnl),
            pnl_percentage: format.round(self.pnl_percentage),
            notional: format.round(self.notional),
            margin_ratio: format.round(self.margin_ratio),
            liquidation_price: format.round(self.liquidation_price),
        }
    }
}

/// Trait for margin calculations - allows different margin models
pub trait MarginCalculator: Send + Sync {
    /// Calculate unrealized P&L for a position
    fn unrealized_pnl(&self, position: &Position) -> CalcResult<Decimal>;

    /// Calculate margin ratio for a position
    fn margin_ratio(&self, position: &Position) -> CalcResult<Decimal>;

    /// Calculate liquidation price for a position
    fn liquidation_price(
        &self,
        position: &Position,
        maintenance_margin_rate: Decimal,
    ) -> CalcResult<Decimal>;

    /// Full mark-to-market snapshot
    fn metrics(
        &self,
        position: &Position,
        maintenance_margin_rate: Decimal,
    ) -> CalcResult<PositionMetrics> {
        let unrealized_pnl = self.unrealized_pnl(position)?;
        let metrics = PositionMetrics {
            unrealized_pnl,
            pnl_percentage: pnl::pnl_percentage(unrealized_pnl, position.margin)?,
            notional: margin::notional(position.quantity, position.mark_price)?,
            margin_ratio: self.margin_ratio(position)?,
            liquidation_price: self.liquidation_price(position, maintenance_margin_rate)?,
        };
        trace!("Metrics for {}: {:?}", position.position_id, metrics);
        Ok(metrics)
    }
}

/// Standard isolated-margin calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMarginCalculator;

impl MarginCalculator for StandardMarginCalculator {
    fn unrealized_pnl(&self, position: &Position) -> CalcResult<Decimal> {
        pnl::unrealized_pnl(
            position.entry_price,
            position.mark_price,
            position.quantity,
            position.side,
        )
    }

    fn margin_ratio(&self, position: &Position) -> CalcResult<Decimal> {
        margin::position_margin_ratio(position.margin, position.quantity, position.mark_price)
    }

    fn liquidation_price(
        &self,
        position: &Position,
        maintenance_margin_rate: Decimal,
    ) -> CalcResult<Decimal> {
        margin::liquidation_price(
            position.entry_price,
            position.leverage,
            position.side,
            maintenance_margin_rate,
        )
    }
}

/// Calculator-backed views on a [`Position`]
pub trait PositionAnalytics {
    /// Unrealized P&L at the current mark price
    fn current_pnl(&self) -> CalcResult<Decimal>;

    /// Unrealized P&L as a percentage of margin
    fn pnl_percentage(&self) -> CalcResult<Decimal>;

    /// Gross value at the current mark price
    fn notional_value(&self) -> CalcResult<Decimal>;
}

impl PositionAnalytics for Position {
    fn current_pnl(&self) -> CalcResult<Decimal> {
        StandardMarginCalculator.unrealized_pnl(self)
    }

    fn pnl_percentage(&self) -> CalcResult<Decimal> {
        pnl::pnl_percentage(self.current_pnl()?, self.margin)
    }

    fn notional_value(&self) -> CalcResult<Decimal> {
        margin::notional(self.quantity, self.mark_price)
    }
}
