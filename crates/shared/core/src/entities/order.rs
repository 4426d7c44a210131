use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Asset, OrderStatus, OrderType, TriggerType};
use crate::error::{ModelError, ModelResult};

/// Order submission payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub leverage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    pub order_type: OrderType,
    pub trigger_type: TriggerType,
    /// Required for Limit orders
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(
        rename = "stoploss_price",
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub stop_loss_price: Option<Decimal>,
    #[serde(
        rename = "takeprofit_price",
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub take_profit_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reduce_only: bool,
}

impl OrderRequest {
    /// Market order request
    pub fn market(order_type: OrderType, quantity: Decimal, leverage: Decimal) -> Self {
        Self {
            leverage,
            quantity,
            order_type,
            trigger_type: TriggerType::Market,
            price: None,
            stop_loss_price: None,
            take_profit_price: None,
            reduce_only: false,
        }
    }

    /// Limit order request
    pub fn limit(
        order_type: OrderType,
        quantity: Decimal,
        price: Decimal,
        leverage: Decimal,
    ) -> Self {
        Self {
            trigger_type: TriggerType::Limit,
            price: Some(price),
            ..Self::market(order_type, quantity, leverage)
        }
    }

    /// Attach a stop-loss price
    pub fn with_stop_loss(mut self, price: Decimal) -> Self {
        self.stop_loss_price = Some(price);
        self
    }

    /// Attach a take-profit price
    pub fn with_take_profit(mut self, price: Decimal) -> Self {
        self.take_profit_price = Some(price);
        self
    }

    /// Only allow the order to shrink an existing position
    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = true;
        self
    }

    /// Validate the request on its own
    pub fn validate(&self) -> ModelResult<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(ModelError::InvalidQuantity(self.quantity));
        }
        if self.leverage <= Decimal::ZERO {
            return Err(ModelError::LeverageOutOfRange {
                leverage: self.leverage,
                min: Decimal::ZERO,
                max: Decimal::MAX,
            });
        }

        let reference = match (self.trigger_type, self.price) {
            (TriggerType::Limit, None) => return Err(ModelError::MissingPrice),
            (TriggerType::Limit, Some(price)) if price <= Decimal::ZERO => {
                return Err(ModelError::InvalidPrice(price));
            }
            (TriggerType::Limit, Some(price)) => Some(price),
            // Market orders fill at an unknown price; only sign checks apply
            (TriggerType::Market, _) => None,
        };

        if let Some(sl) = self.stop_loss_price {
            check_risk_price("stop-loss", sl, reference, self.order_type, true)?;
        }
        if let Some(tp) = self.take_profit_price {
            check_risk_price("take-profit", tp, reference, self.order_type, false)?;
        }
        Ok(())
    }

    /// Validate the request against the asset it targets
    pub fn validate_against(&self, asset: &Asset) -> ModelResult<()> {
        if !asset.is_active {
            return Err(ModelError::AssetInactive(asset.symbol.clone()));
        }
        self.validate()?;
        asset.validate_quantity(self.quantity)?;
        asset.validate_leverage(self.leverage)
    }
}

/// A stop-loss must sit on the losing side of the reference price and a
/// take-profit on the winning side.
fn check_risk_price(
    kind: &'static str,
    price: Decimal,
    reference: Option<Decimal>,
    side: OrderType,
    is_stop_loss: bool,
) -> ModelResult<()> {
    if price <= Decimal::ZERO {
        return Err(ModelError::InvalidRiskPrice {
            kind,
            price,
            reason: "must be positive",
        });
    }
    let Some(reference) = reference else {
        return Ok(());
    };
    let below_required = matches!(
        (side, is_stop_loss),
        (OrderType::Long, true) | (OrderType::Short, false)
    );
    if below_required && price >= reference {
        return Err(ModelError::InvalidRiskPrice {
            kind,
            price,
            reason: "must be below the order price",
        });
    }
    if !below_required && price <= reference {
        return Err(ModelError::InvalidRiskPrice {
            kind,
            price,
            reason: "must be above the order price",
        });
    }
    Ok(())
}

/// Full order details as reported by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub symbol: String,
    pub asset_id: String,
    pub order_type: OrderType,
    pub trigger_type: TriggerType,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub filled_quantity: Decimal,
    /// Volume-weighted average of all fills so far
    #[serde(with = "rust_decimal::serde::str")]
    pub avg_filled_price: Decimal,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::str")]
    pub leverage: Decimal,
    #[serde(
        rename = "stoploss_price",
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub stop_loss_price: Option<Decimal>,
    #[serde(
        rename = "takeprofit_price",
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub take_profit_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reduce_only: bool,
}

impl Order {
    /// Create an open order from an accepted request
    pub fn from_request(
        order_id: impl Into<String>,
        asset: &Asset,
        request: &OrderRequest,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            symbol: asset.symbol.clone(),
            asset_id: asset.asset_id.clone(),
            order_type: request.order_type,
            trigger_type: request.trigger_type,
            price: request.price.unwrap_or(Decimal::ZERO),
            quantity: request.quantity,
            filled_quantity: Decimal::ZERO,
            avg_filled_price: Decimal::ZERO,
            status: OrderStatus::Open,
            leverage: request.leverage,
            stop_loss_price: request.stop_loss_price,
            take_profit_price: request.take_profit_price,
            created_at: timestamp,
            updated_at: timestamp,
            reduce_only: request.reduce_only,
        }
    }

    /// Returns remaining quantity to be filled
    pub fn remaining_quantity(&self) -> Decimal {
        self.quantity - self.filled_quantity
    }

    /// Returns true if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.filled_quantity >= self.quantity
    }

    /// Record an execution against this order
    pub fn apply_fill(
        &mut self,
        quantity: Decimal,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> ModelResult<()> {
        if self.status.is_terminal() {
            return Err(self.transition_error(OrderStatus::PartiallyFilled));
        }
        if quantity <= Decimal::ZERO {
            return Err(ModelError::InvalidQuantity(quantity));
        }
        if price <= Decimal::ZERO {
            return Err(ModelError::InvalidPrice(price));
        }
        let remaining = self.remaining_quantity();
        if quantity > remaining {
            return Err(ModelError::Overfill {
                fill: quantity,
                remaining,
            });
        }

        let filled_value = self
            .avg_filled_price
            .checked_mul(self.filled_quantity)
            .and_then(|v| v.checked_add(price.checked_mul(quantity)?))
            .ok_or(ModelError::Overflow("fill value"))?;
        let total = self.filled_quantity + quantity;
        self.avg_filled_price = filled_value
            .checked_div(total)
            .ok_or(ModelError::Overflow("average fill price"))?;
        self.filled_quantity = total;

        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        self.updated_at = timestamp;
        Ok(())
    }

    /// Cancel the unfilled remainder
    pub fn cancel(&mut self, timestamp: DateTime<Utc>) -> ModelResult<()> {
        self.finish(OrderStatus::Cancelled, timestamp)
    }

    /// Expire the unfilled remainder
    pub fn expire(&mut self, timestamp: DateTime<Utc>) -> ModelResult<()> {
        self.finish(OrderStatus::Expired, timestamp)
    }

    fn finish(&mut self, status: OrderStatus, timestamp: DateTime<Utc>) -> ModelResult<()> {
        if !self.status.is_active() {
            return Err(self.transition_error(status));
        }
        self.status = status;
        self.updated_at = timestamp;
        Ok(())
    }

    fn transition_error(&self, to: OrderStatus) -> ModelError {
        ModelError::InvalidTransition {
            entity: "order",
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}
