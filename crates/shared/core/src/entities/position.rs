use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OrderType;
use crate::error::{ModelError, ModelResult};

/// Position lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Open,
    Closed,
    Liquidated,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Open => "OPEN",
            PositionStatus::Closed => "CLOSED",
            PositionStatus::Liquidated => "LIQUIDATED",
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open or closed futures exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub position_id: String,
    pub symbol: String,
    pub asset_id: String,

    /// Average entry price
    #[serde(with = "rust_decimal::serde::str")]
    pub entry_price: Decimal,

    /// Current position quantity (always positive)
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,

    pub side: OrderType,
    pub status: PositionStatus,

    #[serde(with = "rust_decimal::serde::str")]
    pub leverage: Decimal,

    #[serde(with = "rust_decimal::serde::str")]
    pub unrealized_pnl: Decimal,

    /// Profit/loss locked in by reductions
    #[serde(with = "rust_decimal::serde::str")]
    pub realized_pnl: Decimal,

    /// Isolated margin backing this position
    #[serde(with = "rust_decimal::serde::str")]
    pub margin: Decimal,

    #[serde(with = "rust_decimal::serde::str")]
    pub margin_ratio: Decimal,

    #[serde(with = "rust_decimal::serde::str")]
    pub mark_price: Decimal,

    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub stop_loss: Option<Decimal>,

    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub take_profit: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    /// Open a new position at the given fill
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        position_id: impl Into<String>,
        symbol: impl Into<String>,
        asset_id: impl Into<String>,
        side: OrderType,
        quantity: Decimal,
        entry_price: Decimal,
        leverage: Decimal,
        margin: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            position_id: position_id.into(),
            symbol: symbol.into(),
            asset_id: asset_id.into(),
            entry_price,
            quantity,
            side,
            status: PositionStatus::Open,
            leverage,
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            margin,
            margin_ratio: Decimal::ZERO,
            mark_price: entry_price,
            stop_loss: None,
            take_profit: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    /// Apply a mark-price tick
    pub fn update_mark_price(
        &mut self,
        mark_price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> ModelResult<()> {
        self.ensure_open(PositionStatus::Open)?;
        if mark_price <= Decimal::ZERO {
            return Err(ModelError::InvalidPrice(mark_price));
        }
        self.mark_price = mark_price;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Increase position size from a fill, averaging the entry price
    pub fn increase(
        &mut self,
        quantity: Decimal,
        price: Decimal,
        added_margin: Decimal,
        timestamp: DateTime<Utc>,
    ) -> ModelResult<()> {
        self.ensure_open(PositionStatus::Open)?;
        if quantity <= Decimal::ZERO {
            return Err(ModelError::InvalidQuantity(quantity));
        }
        if price <= Decimal::ZERO {
            return Err(ModelError::InvalidPrice(price));
        }

        let old_notional = self
            .quantity
            .checked_mul(self.entry_price)
            .ok_or(ModelError::Overflow("position notional"))?;
        let new_notional = quantity
            .checked_mul(price)
            .ok_or(ModelError::Overflow("fill notional"))?;
        let total_quantity = self
            .quantity
            .checked_add(quantity)
            .ok_or(ModelError::Overflow("position quantity"))?;
        let entry_price = old_notional
            .checked_add(new_notional)
            .and_then(|n| n.checked_div(total_quantity))
            .ok_or(ModelError::Overflow("average entry price"))?;
        let margin = self
            .margin
            .checked_add(added_margin)
            .ok_or(ModelError::Overflow("position margin"))?;

        self.entry_price = entry_price;
        self.quantity = total_quantity;
        self.margin = margin;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Reduce position size from an opposing fill.
    /// Returns the realized P&L of the reduced portion; margin is released
    /// pro rata and the position closes when nothing remains.
    pub fn reduce(
        &mut self,
        quantity: Decimal,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> ModelResult<Decimal> {
        self.ensure_open(PositionStatus::Closed)?;
        if quantity <= Decimal::ZERO {
            return Err(ModelError::InvalidQuantity(quantity));
        }
        if price <= Decimal::ZERO {
            return Err(ModelError::InvalidPrice(price));
        }
        if quantity > self.quantity {
            return Err(ModelError::Overfill {
                fill: quantity,
                remaining: self.quantity,
            });
        }

        let pnl = self.pnl_at(price, quantity)?;
        let released = self
            .margin
            .checked_mul(quantity)
            .and_then(|m| m.checked_div(self.quantity))
            .ok_or(ModelError::Overflow("released margin"))?;
        let realized_pnl = self
            .realized_pnl
            .checked_add(pnl)
            .ok_or(ModelError::Overflow("realized pnl"))?;

        self.realized_pnl = realized_pnl;
        self.quantity -= quantity;
        self.margin -= released;
        if self.quantity.is_zero() {
            self.margin = Decimal::ZERO;
            self.unrealized_pnl = Decimal::ZERO;
            self.status = PositionStatus::Closed;
        }
        self.updated_at = timestamp;
        Ok(pnl)
    }

    /// Close the whole position at its current mark price.
    /// Returns the P&L realized by the close.
    pub fn close(&mut self, timestamp: DateTime<Utc>) -> ModelResult<Decimal> {
        self.ensure_open(PositionStatus::Closed)?;
        let pnl = self.pnl_at(self.mark_price, self.quantity)?;
        self.realized_pnl = self
            .realized_pnl
            .checked_add(pnl)
            .ok_or(ModelError::Overflow("realized pnl"))?;
        self.quantity = Decimal::ZERO;
        self.margin = Decimal::ZERO;
        self.unrealized_pnl = Decimal::ZERO;
        self.status = PositionStatus::Closed;
        self.updated_at = timestamp;
        Ok(pnl)
    }

    /// Terminal forced close; the isolated margin is forfeited
    pub fn liquidate(&mut self, timestamp: DateTime<Utc>) -> ModelResult<()> {
        self.ensure_open(PositionStatus::Liquidated)?;
        self.realized_pnl = self
            .realized_pnl
            .checked_sub(self.margin)
            .ok_or(ModelError::Overflow("realized pnl"))?;
        self.unrealized_pnl = Decimal::ZERO;
        self.margin = Decimal::ZERO;
        self.status = PositionStatus::Liquidated;
        self.updated_at = timestamp;
        Ok(())
    }

    /// P&L of `quantity` against the entry price if exited at `price`
    fn pnl_at(&self, price: Decimal, quantity: Decimal) -> ModelResult<Decimal> {
        match self.side {
            OrderType::Long => price.checked_sub(self.entry_price),
            OrderType::Short => self.entry_price.checked_sub(price),
        }
        .and_then(|diff| diff.checked_mul(quantity))
        .ok_or(ModelError::Overflow("realized pnl"))
    }

    fn ensure_open(&self, to: PositionStatus) -> ModelResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ModelError::InvalidTransition {
                entity: "position",
                from: self.status.to_string(),
                to: to.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn create_test_position(side: OrderType) -> Position {
        Position::open(
            "pos-1",
            "BTCUSDT",
            "btc-usdt",
            side,
            dec!(1.0),
            dec!(50000.0),
            dec!(10),
            dec!(5000.0),
            t0(),
        )
    }

    #[test]
    fn test_open_position_marks_at_entry() {
        let pos = create_test_position(OrderType::Long);
        assert_eq!(pos.mark_price, dec!(50000));
        assert_eq!(pos.status, PositionStatus::Open);
        assert!(pos.stop_loss.is_none());
    }

    #[test]
    fn test_position_increase() {
        let mut pos = create_test_position(OrderType::Long);

        pos.increase(dec!(1.0), dec!(52000.0), dec!(5200), t0())
            .unwrap();

        assert_eq!(pos.quantity, dec!(2.0));
        // Average price: (50000 + 52000) / 2 = 51000
        assert_eq!(pos.entry_price, dec!(51000.0));
        assert_eq!(pos.margin, dec!(10200));
    }

    #[test]
    fn test_long_reduce_realizes_profit() {
        let mut pos = create_test_position(OrderType::Long);

        let pnl = pos.reduce(dec!(0.5), dec!(55000.0), t0()).unwrap();

        // 0.5 * (55000 - 50000) = 2500
        assert_eq!(pnl, dec!(2500.0));
        assert_eq!(pos.realized_pnl, dec!(2500.0));
        assert_eq!(pos.quantity, dec!(0.5));
        assert_eq!(pos.margin, dec!(2500));
        assert!(pos.is_open());
    }

    #[test]
    fn test_short_reduce_to_zero_closes() {
        let mut pos = create_test_position(OrderType::Short);

        let pnl = pos.reduce(dec!(1.0), dec!(48000.0), t0()).unwrap();

        assert_eq!(pnl, dec!(2000));
        assert_eq!(pos.status, PositionStatus::Closed);
        assert_eq!(pos.margin, Decimal::ZERO);
    }

    #[test]
    fn test_reduce_more_than_held_rejected() {
        let mut pos = create_test_position(OrderType::Long);
        assert!(matches!(
            pos.reduce(dec!(2), dec!(50000), t0()),
            Err(ModelError::Overfill { .. })
        ));
    }

    #[test]
    fn test_terminal_positions_reject_ticks() {
        let mut pos = create_test_position(OrderType::Long);
        pos.liquidate(t0()).unwrap();
        assert_eq!(pos.status, PositionStatus::Liquidated);
        assert_eq!(pos.realized_pnl, dec!(-5000));

        assert!(matches!(
            pos.update_mark_price(dec!(49000), t0()),
            Err(ModelError::InvalidTransition { .. })
        ));
        assert!(pos.close(t0()).is_err());
    }

    #[test]
    fn test_close_realizes_at_mark() {
        let mut pos = create_test_position(OrderType::Long);
        pos.update_mark_price(dec!(51200), t0()).unwrap();
        // Stored figure is stale; the close prices off the mark
        pos.unrealized_pnl = dec!(7);

        let pnl = pos.close(t0()).unwrap();

        assert_eq!(pnl, dec!(1200));
        assert_eq!(pos.realized_pnl, dec!(1200));
        assert_eq!(pos.unrealized_pnl, Decimal::ZERO);
        assert_eq!(pos.quantity, Decimal::ZERO);
        assert_eq!(pos.margin, Decimal::ZERO);
        assert_eq!(pos.status, PositionStatus::Closed);
    }

    #[test]
    fn test_increase_overflow_is_an_error() {
        let mut pos = create_test_position(OrderType::Long);
        let before = pos.clone();

        assert_eq!(
            pos.increase(Decimal::MAX, dec!(1), Decimal::ZERO, t0()),
            Err(ModelError::Overflow("position quantity"))
        );
        assert_eq!(pos, before);

        assert_eq!(
            pos.increase(dec!(1), dec!(1), Decimal::MAX, t0()),
            Err(ModelError::Overflow("position margin"))
        );
        assert_eq!(pos, before);
    }

    #[test]
    fn test_position_wire_shape() {
        let mut pos = create_test_position(OrderType::Short);
        pos.stop_loss = Some(dec!(52000));

        let value = serde_json::to_value(&pos).unwrap();
        assert_eq!(value["side"], "SHORT");
        assert_eq!(value["status"], "OPEN");
        assert_eq!(value["stop_loss"], "52000");
        assert!(value.get("take_profit").is_none());

        let back: Position = serde_json::from_value(value).unwrap();
        assert_eq!(back, pos);
    }
}
