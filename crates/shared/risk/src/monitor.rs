//! Mark-to-market position monitoring.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use mudrex_calc::{CalcError, MarginCalculator, PositionMetrics, StandardMarginCalculator};
use mudrex_core::{OrderType, Position, RiskOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;
use crate::error::{RiskError, RiskResult};

/// Health of a single position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionHealth {
    Healthy,
    /// Equity close to the maintenance requirement
    MarginCall,
    /// Mark price has crossed the liquidation price
    Liquidatable,
}

/// Result of evaluating one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub position_id: String,
    pub symbol: String,
    pub health: PositionHealth,
    /// Exact figures
    pub metrics: PositionMetrics,
    /// Figures rounded for output
    pub display: PositionMetrics,
    /// Active risk orders whose trigger the mark price has crossed
    pub triggered: Vec<RiskOrder>,
}

impl PositionReport {
    pub fn should_liquidate(&self) -> bool {
        self.health == PositionHealth::Liquidatable
    }
}

/// Aggregate view over several positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRisk {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_unrealized_pnl: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_margin: Decimal,
    pub margin_calls: Vec<String>,
    pub liquidatable: Vec<String>,
}

/// Evaluates positions against a [`RiskConfig`]
pub struct PositionMonitor<M: MarginCalculator = StandardMarginCalculator> {
    calculator: M,
    config: RiskConfig,
}

impl PositionMonitor<StandardMarginCalculator> {
    /// Create a monitor with the standard calculator
    pub fn new(config: RiskConfig) -> Self {
        Self::with_calculator(StandardMarginCalculator, config)
    }
}

impl Default for PositionMonitor<StandardMarginCalculator> {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}

impl<M: MarginCalculator> PositionMonitor<M> {
    pub fn with_calculator(calculator: M, config: RiskConfig) -> Self {
        Self { calculator, config }
    }

    /// Get the risk configuration
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Evaluate an open position at its current mark price
    pub fn evaluate(
        &self,
        position: &Position,
        risk_orders: &[RiskOrder],
    ) -> RiskResult<PositionReport> {
        if !position.is_open() {
            return Err(RiskError::PositionNotOpen(position.position_id.clone()));
        }

        let mmr = self.config.maintenance_rate_for(&position.symbol);
        let metrics = self.calculator.metrics(position, mmr)?;
        let health = self.classify(position, &metrics, mmr)?;

        let triggered: Vec<RiskOrder> = risk_orders
            .iter()
            .filter(|o| o.position_id == position.position_id && o.is_active())
            .filter(|o| o.is_triggered_by(position.side, position.mark_price))
            .cloned()
            .collect();

        debug!(
            "Evaluated {} {} @ {}: pnl={} ratio={} liq={} health={:?}",
            position.symbol,
            position.side,
            position.mark_price,
            metrics.unrealized_pnl,
            metrics.margin_ratio,
            metrics.liquidation_price,
            health
        );
        match health {
            PositionHealth::Liquidatable => warn!(
                "Position {} liquidatable: mark {} crossed {}",
                position.position_id, position.mark_price, metrics.liquidation_price
            ),
            PositionHealth::MarginCall => warn!(
                "Position {} margin call: ratio {}",
                position.position_id, metrics.margin_ratio
            ),
            PositionHealth::Healthy => {}
        }
        for order in &triggered {
            info!(
                "Risk order {} ({:?}) triggered at {} for position {}",
                order.order_id, order.order_type, position.mark_price, position.position_id
            );
        }

        Ok(PositionReport {
            position_id: position.position_id.clone(),
            symbol: position.symbol.clone(),
            health,
            metrics,
            display: metrics.rounded(&self.config.output),
            triggered,
        })
    }

    /// Apply a mark-price tick, write the recomputed fields back and report.
    /// On error the position is left untouched.
    pub fn on_mark_price(
        &self,
        position: &mut Position,
        mark_price: Decimal,
        timestamp: DateTime<Utc>,
        risk_orders: &[RiskOrder],
    ) -> RiskResult<PositionReport> {
        let mut ticked = position.clone();
        ticked.update_mark_price(mark_price, timestamp)?;
        let report = self.evaluate(&ticked, risk_orders)?;
        report.metrics.apply_to(&mut ticked);
        *position = ticked;
        Ok(report)
    }

    /// Aggregate P&L, margin and problem positions across open positions
    pub fn summarize<'a>(
        &self,
        positions: impl IntoIterator<Item = &'a Position>,
    ) -> RiskResult<AccountRisk> {
        let mut summary = AccountRisk {
            total_unrealized_pnl: Decimal::ZERO,
            total_margin: Decimal::ZERO,
            margin_calls: Vec::new(),
            liquidatable: Vec::new(),
        };

        for position in positions.into_iter().filter(|p| p.is_open()) {
            let report = self.evaluate(position, &[])?;
            summary.total_unrealized_pnl = summary
                .total_unrealized_pnl
                .checked_add(report.metrics.unrealized_pnl)
                .ok_or(CalcError::Overflow("total unrealized pnl"))?;
            summary.total_margin = summary
                .total_margin
                .checked_add(position.margin)
                .ok_or(CalcError::Overflow("total margin"))?;
            match report.health {
                PositionHealth::Liquidatable => summary.liquidatable.push(report.position_id),
                PositionHealth::MarginCall => summary.margin_calls.push(report.position_id),
                PositionHealth::Healthy => {}
            }
        }
        Ok(summary)
    }

    fn classify(
        &self,
        position: &Position,
        metrics: &PositionMetrics,
        mmr: Decimal,
    ) -> RiskResult<PositionHealth> {
        let crossed = match position.side {
            OrderType::Long => position.mark_price <= metrics.liquidation_price,
            OrderType::Short => position.mark_price >= metrics.liquidation_price,
        };
        if crossed {
            return Ok(PositionHealth::Liquidatable);
        }

        let maintenance = metrics
            .notional
            .checked_mul(mmr)
            .ok_or(CalcError::Overflow("maintenance requirement"))?;
        if maintenance.is_zero() {
            return Ok(PositionHealth::Healthy);
        }
        let equity = position
            .margin
            .checked_add(metrics.unrealized_pnl)
            .ok_or(CalcError::Overflow("position equity"))?;
        let coverage = equity
            .checked_div(maintenance)
            .ok_or(CalcError::Overflow("margin coverage"))?;

        if coverage < self.config.margin_call_ratio {
            Ok(PositionHealth::MarginCall)
        } else {
            Ok(PositionHealth::Healthy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mudrex_core::RiskOrderType;
    use rust_decimal_macros::dec;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn config() -> RiskConfig {
        RiskConfig {
            maintenance_margin_rate: dec!(0.05),
            ..Default::default()
        }
    }

    fn position(side: OrderType) -> Position {
        Position::open(
            "pos-1",
            "BTCUSDT",
            "btc-usdt",
            side,
            dec!(1),
            dec!(50000),
            dec!(10),
            dec!(5000),
            t0(),
        )
    }

    #[test]
    fn test_healthy_at_entry() {
        let monitor = PositionMonitor::new(config());
        let report = monitor.evaluate(&position(OrderType::Long), &[]).unwrap();
        assert_eq!(report.health, PositionHealth::Healthy);
        assert_eq!(report.metrics.unrealized_pnl, Decimal::ZERO);
        assert!(report.triggered.is_empty());
    }

    #[test]
    fn test_long_liquidation_check() {
        let monitor = PositionMonitor::new(config());
        let mut pos = position(OrderType::Long);

        // Liquidation: 50000 * (1 - 0.10 + 0.05) = 47500
        let report = monitor.on_mark_price(&mut pos, dec!(48000), t0(), &[]).unwrap();
        assert!(!report.should_liquidate());

        let report = monitor.on_mark_price(&mut pos, dec!(47500), t0(), &[]).unwrap();
        assert!(report.should_liquidate());
    }

    #[test]
    fn test_short_liquidation_check() {
        let monitor = PositionMonitor::new(config());
        let mut pos = position(OrderType::Short);

        let report = monitor.on_mark_price(&mut pos, dec!(51000), t0(), &[]).unwrap();
        assert_ne!(report.health, PositionHealth::Liquidatable);

        let report = monitor.on_mark_price(&mut pos, dec!(52500), t0(), &[]).unwrap();
        assert!(report.should_liquidate());
    }

    #[test]
    fn test_margin_call_before_liquidation() {
        let monitor = PositionMonitor::new(config());
        let mut pos = position(OrderType::Long);

        // equity = 5000 - 1200 = 3800; maintenance = 48800 * 0.05 = 2440; 3800/2440 ~ 1.56
        let report = monitor.on_mark_price(&mut pos, dec!(48800), t0(), &[]).unwrap();
        assert_eq!(report.health, PositionHealth::Healthy);

        // equity = 5000 - 1700 = 3300; maintenance = 2415; 3300/2415 ~ 1.37
        let report = monitor.on_mark_price(&mut pos, dec!(48300), t0(), &[]).unwrap();
        assert_eq!(report.health, PositionHealth::MarginCall);
    }

    #[test]
    fn test_tick_writes_back_fields() {
        let monitor = PositionMonitor::new(config());
        let mut pos = position(OrderType::Long);
        monitor.on_mark_price(&mut pos, dec!(52000), t0(), &[]).unwrap();

        assert_eq!(pos.mark_price, dec!(52000));
        assert_eq!(pos.unrealized_pnl, dec!(2000));
        assert_eq!(pos.margin_ratio, dec!(5000) / dec!(52000));
    }

    #[test]
    fn test_failed_tick_leaves_position_unchanged() {
        let monitor = PositionMonitor::new(config());
        let mut pos = Position::open(
            "pos-0",
            "BTCUSDT",
            "btc-usdt",
            OrderType::Long,
            dec!(1),
            dec!(100),
            dec!(10),
            Decimal::ZERO,
            t0(),
        );
        let before = pos.clone();

        let result = monitor.on_mark_price(&mut pos, dec!(90), t0(), &[]);
        assert!(matches!(
            result,
            Err(RiskError::Calc(CalcError::DivisionByZero("margin")))
        ));
        assert_eq!(pos, before);
    }

    #[test]
    fn test_triggered_risk_orders() {
        let monitor = PositionMonitor::new(config());
        let mut pos = position(OrderType::Long);
        let sl = RiskOrder::new("sl-1", "pos-1", RiskOrderType::StopLoss, dec!(49000), t0());
        let tp = RiskOrder::new("tp-1", "pos-1", RiskOrderType::TakeProfit, dec!(55000), t0());
        let other = RiskOrder::new("sl-2", "pos-2", RiskOrderType::StopLoss, dec!(49500), t0());
        let orders = [sl, tp, other];

        let report = monitor.on_mark_price(&mut pos, dec!(48900), t0(), &orders).unwrap();
        let ids: Vec<&str> = report.triggered.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["sl-1"]);

        let report = monitor.on_mark_price(&mut pos, dec!(56000), t0(), &orders).unwrap();
        let ids: Vec<&str> = report.triggered.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["tp-1"]);
    }

    #[test]
    fn test_inactive_risk_orders_ignored() {
        let monitor = PositionMonitor::new(config());
        let pos = position(OrderType::Long);
        let mut sl = RiskOrder::new("sl-1", "pos-1", RiskOrderType::StopLoss, dec!(51000), t0());
        sl.status = mudrex_core::OrderStatus::Cancelled;

        let report = monitor.evaluate(&pos, &[sl]).unwrap();
        assert!(report.triggered.is_empty());
    }

    #[test]
    fn test_closed_position_rejected() {
        let monitor = PositionMonitor::new(config());
        let mut pos = position(OrderType::Long);
        pos.close(t0()).unwrap();

        assert!(matches!(
            monitor.evaluate(&pos, &[]),
            Err(RiskError::PositionNotOpen(_))
        ));
        assert!(matches!(
            monitor.on_mark_price(&mut pos, dec!(50000), t0(), &[]),
            Err(RiskError::Model(_))
        ));
    }

    #[test]
    fn test_display_is_rounded() {
        let monitor = PositionMonitor::new(config());
        let mut pos = position(OrderType::Long);
        let report = monitor.on_mark_price(&mut pos, dec!(55000), t0(), &[]).unwrap();
        assert_eq!(report.display.margin_ratio, dec!(0.09090909));
        assert_ne!(report.metrics.margin_ratio, report.display.margin_ratio);
    }
}
