//! Profit and loss

use mudrex_core::OrderType;
use rust_decimal::Decimal;

use crate::error::{CalcError, CalcResult};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Unrealized P&L of a position at `mark_price`.
///
/// Long: `(mark - entry) * quantity`. Short: `(entry - mark) * quantity`.
pub fn unrealized_pnl(
    entry_price: Decimal,
    mark_price: Decimal,
    quantity: Decimal,
    side: OrderType,
) -> CalcResult<Decimal> {
    let price_diff = match side {
        OrderType::Long => mark_price.checked_sub(entry_price),
        OrderType::Short => entry_price.checked_sub(mark_price),
    }
    .ok_or(CalcError::Overflow("price difference"))?;

    price_diff
        .checked_mul(quantity)
        .ok_or(CalcError::Overflow("unrealized pnl"))
}

/// Return on margin in percent: `unrealized_pnl / margin * 100`
pub fn pnl_percentage(unrealized_pnl: Decimal, margin: Decimal) -> CalcResult<Decimal> {
    if margin.is_zero() {
        return Err(CalcError::DivisionByZero("margin"));
    }
    // Scale before dividing so the only inexact step is the final division,
    // unless scaling alone would overflow
    match unrealized_pnl.checked_mul(HUNDRED) {
        Some(scaled) => scaled.checked_div(margin),
        None => unrealized_pnl
            .checked_div(margin)
            .and_then(|ratio| ratio.checked_mul(HUNDRED)),
    }
    .ok_or(CalcError::Overflow("pnl percentage"))
}
