use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderStatus, OrderType};

/// Kind of protective order attached to a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskOrderType {
    StopLoss,
    TakeProfit,
}

/// Stop-loss or take-profit order attached to a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskOrder {
    pub order_id: String,
    pub position_id: String,
    pub order_type: RiskOrderType,
    #[serde(with = "rust_decimal::serde::str")]
    pub trigger_price: Decimal,
    /// Set once the order has executed
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_price: Option<Decimal>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RiskOrder {
    pub fn new(
        order_id: impl Into<String>,
        position_id: impl Into<String>,
        order_type: RiskOrderType,
        trigger_price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            position_id: position_id.into(),
            order_type,
            trigger_price,
            execution_price: None,
            status: OrderStatus::Open,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether a mark price crosses this order's trigger for a position on `side`.
    ///
    /// Long: stop-loss at or below the trigger, take-profit at or above.
    /// Short: the reverse.
    pub fn is_triggered_by(&self, side: OrderType, mark_price: Decimal) -> bool {
        match (side, self.order_type) {
            (OrderType::Long, RiskOrderType::StopLoss)
            | (OrderType::Short, RiskOrderType::TakeProfit) => mark_price <= self.trigger_price,
            (OrderType::Long, RiskOrderType::TakeProfit)
            | (OrderType::Short, RiskOrderType::StopLoss) => mark_price >= self.trigger_price,
        }
    }
}
