//! Notional, margin ratio and liquidation price

use mudrex_core::OrderType;
use rust_decimal::Decimal;

use crate::error::{CalcError, CalcResult};

/// Gross value of a position: `quantity * mark_price`
pub fn notional(quantity: Decimal, mark_price: Decimal) -> CalcResult<Decimal> {
    quantity
        .checked_mul(mark_price)
        .ok_or(CalcError::Overflow("notional"))
}

/// `margin / notional`
pub fn margin_ratio(margin: Decimal, position_notional: Decimal) -> CalcResult<Decimal> {
    if position_notional.is_zero() {
        return Err(CalcError::DivisionByZero("notional"));
    }
    margin
        .checked_div(position_notional)
        .ok_or(CalcError::Overflow("margin ratio"))
}

/// `margin / (quantity * mark_price)`
pub fn position_margin_ratio(
    margin: Decimal,
    quantity: Decimal,
    mark_price: Decimal,
) -> CalcResult<Decimal> {
    margin_ratio(margin, notional(quantity, mark_price)?)
}

/// Margin needed to open `quantity` at `price`: `quantity * price / leverage`
pub fn initial_margin(quantity: Decimal, price: Decimal, leverage: Decimal) -> CalcResult<Decimal> {
    check_leverage(leverage)?;
    notional(quantity, price)?
        .checked_div(leverage)
        .ok_or(CalcError::Overflow("initial margin"))
}

/// Price at which the position is liquidated.
///
/// Long: `entry * (1 - 1/leverage + mmr)`.
/// Short: `entry * (1 + 1/leverage - mmr)`.
/// Floored at zero.
pub fn liquidation_price(
    entry_price: Decimal,
    leverage: Decimal,
    side: OrderType,
    maintenance_margin_rate: Decimal,
) -> CalcResult<Decimal> {
    check_leverage(leverage)?;

    // entry * (L -/+ 1 +/- mmr*L) / L keeps a single inexact division at the end
    let mmr_scaled = maintenance_margin_rate
        .checked_mul(leverage)
        .ok_or(CalcError::Overflow("maintenance margin"))?;
    let factor = match side {
        OrderType::Long => leverage
            .checked_sub(Decimal::ONE)
            .and_then(|f| f.checked_add(mmr_scaled)),
        OrderType::Short => leverage
            .checked_add(Decimal::ONE)
            .and_then(|f| f.checked_sub(mmr_scaled)),
    }
    .ok_or(CalcError::Overflow("liquidation factor"))?;

    let price = entry_price
        .checked_mul(factor)
        .and_then(|p| p.checked_div(leverage))
        .ok_or(CalcError::Overflow("liquidation price"))?;
    Ok(price.max(Decimal::ZERO))
}

fn check_leverage(leverage: Decimal) -> CalcResult<()> {
    if leverage.is_zero() {
        return Err(CalcError::DivisionByZero("leverage"));
    }
    if leverage.is_sign_negative() {
        return Err(CalcError::Negative("leverage"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_notional() {
        assert_eq!(notional(dec!(2), dec!(110)).unwrap(), dec!(220));
    }

    #[test]
    fn test_margin_ratio() {
        assert_eq!(margin_ratio(dec!(22), dec!(220)).unwrap(), dec!(0.1));
        assert_eq!(
            position_margin_ratio(dec!(5000), dec!(1), dec!(50000)).unwrap(),
            dec!(0.1)
        );
    }

    #[test]
    fn test_margin_ratio_zero_notional() {
        assert_eq!(
            margin_ratio(dec!(10), Decimal::ZERO),
            Err(CalcError::DivisionByZero("notional"))
        );
        assert_eq!(
            position_margin_ratio(dec!(10), Decimal::ZERO, dec!(100)),
            Err(CalcError::DivisionByZero("notional"))
        );
    }

    #[test]
    fn test_initial_margin() {
        assert_eq!(
            initial_margin(dec!(1), dec!(50000), dec!(10)).unwrap(),
            dec!(5000)
        );
    }

    #[test]
    fn test_long_liquidation_price() {
        // 50000 * (1 - 0.10 + 0.05) = 47500
        let liq = liquidation_price(dec!(50000), dec!(10), OrderType::Long, dec!(0.05)).unwrap();
        assert_eq!(liq, dec!(47500));
    }

    #[test]
    fn test_short_liquidation_price() {
        // 50000 * (1 + 0.10 - 0.05) = 52500
        let liq = liquidation_price(dec!(50000), dec!(10), OrderType::Short, dec!(0.05)).unwrap();
        assert_eq!(liq, dec!(52500));
    }

    #[test]
    fn test_liquidation_with_non_terminating_inverse() {
        // 300 * (1 - 1/3 + 0) = 200, exact despite 1/3
        let liq = liquidation_price(dec!(300), dec!(3), OrderType::Long, Decimal::ZERO).unwrap();
        assert_eq!(liq, dec!(200));
    }

    #[test]
    fn test_liquidation_zero_leverage() {
        assert_eq!(
            liquidation_price(dec!(100), Decimal::ZERO, OrderType::Long, dec!(0.005)),
            Err(CalcError::DivisionByZero("leverage"))
        );
        assert_eq!(
            liquidation_price(dec!(100), dec!(-2), OrderType::Long, dec!(0.005)),
            Err(CalcError::Negative("leverage"))
        );
    }

    #[test]
    fn test_one_x_long_floor() {
        // 1x long with no maintenance requirement can only be liquidated at zero
        let liq = liquidation_price(dec!(100), dec!(1), OrderType::Long, Decimal::ZERO).unwrap();
        assert_eq!(liq, Decimal::ZERO);
    }
}
