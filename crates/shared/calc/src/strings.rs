//! Decimal-string façade over the calculator.
//!
//! Inputs are wire strings as delivered by the transport layer; outputs are
//! canonical strings rounded once by the configured [`DecimalFormat`].

use mudrex_core::OrderType;

use crate::decimal::{DecimalFormat, parse_decimal};
use crate::error::CalcResult;
use crate::{margin, pnl};

/// String-in, string-out calculator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringCalculator {
    format: DecimalFormat,
}

impl StringCalculator {
    pub fn new(format: DecimalFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &DecimalFormat {
        &self.format
    }

    pub fn unrealized_pnl(
        &self,
        entry_price: &str,
        mark_price: &str,
        quantity: &str,
        side: OrderType,
    ) -> CalcResult<String> {
        let value = pnl::unrealized_pnl(
            parse_decimal(entry_price)?,
            parse_decimal(mark_price)?,
            parse_decimal(quantity)?,
            side,
        )?;
        Ok(self.format.format(value))
    }

    pub fn pnl_percentage(&self, unrealized_pnl: &str, margin: &str) -> CalcResult<String> {
        let value = pnl::pnl_percentage(parse_decimal(unrealized_pnl)?, parse_decimal(margin)?)?;
        Ok(self.format.format(value))
    }

    pub fn notional(&self, quantity: &str, mark_price: &str) -> CalcResult<String> {
        let value = margin::notional(parse_decimal(quantity)?, parse_decimal(mark_price)?)?;
        Ok(self.format.format(value))
    }

    pub fn margin_ratio(&self, margin: &str, position_notional: &str) -> CalcResult<String> {
        let value = margin::margin_ratio(parse_decimal(margin)?, parse_decimal(position_notional)?)?;
        Ok(self.format.format(value))
    }

    pub fn position_margin_ratio(
        &self,
        margin: &str,
        quantity: &str,
        mark_price: &str,
    ) -> CalcResult<String> {
        let value = margin::position_margin_ratio(
            parse_decimal(margin)?,
            parse_decimal(quantity)?,
            parse_decimal(mark_price)?,
        )?;
        Ok(self.format.format(value))
    }

    pub fn liquidation_price(
        &self,
        entry_price: &str,
        leverage: &str,
        side: OrderType,
        maintenance_margin_rate: &str,
    ) -> CalcResult<String> {
        let value = margin::liquidation_price(
            parse_decimal(entry_price)?,
            parse_decimal(leverage)?,
            side,
            parse_decimal(maintenance_margin_rate)?,
        )?;
        Ok(self.format.format(value))
    }
}
