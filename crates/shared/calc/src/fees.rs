//! Maker/taker fee computation

use chrono::{DateTime, Utc};
use log::debug;
use mudrex_core::{Asset, FeeRecord, Order, TradeType};
use rust_decimal::Decimal;

use crate::error::{CalcError, CalcResult};
use crate::margin::notional;

/// Fee for a trade of the given notional. Negative rates are rebates.
pub fn fee_amount(notional: Decimal, rate: Decimal) -> CalcResult<Decimal> {
    notional
        .checked_mul(rate)
        .ok_or(CalcError::Overflow("fee amount"))
}

/// Build the fee ledger entry for everything filled on `order` so far.
/// `asset` must be the instrument the order was placed on.
pub fn charge_fee(
    asset: &Asset,
    order: &Order,
    trade_type: TradeType,
    timestamp: DateTime<Utc>,
) -> CalcResult<FeeRecord> {
    if asset.asset_id != order.asset_id {
        return Err(CalcError::AssetMismatch {
            asset: asset.asset_id.clone(),
            order: order.asset_id.clone(),
        });
    }
    let rate = asset.fee_rate(trade_type);
    let filled_notional = notional(order.filled_quantity, order.avg_filled_price)?;
    let amount = fee_amount(filled_notional, rate)?;

    debug!(
        "Fee for order {}: {} x {} = {} ({:?})",
        order.order_id, filled_notional, rate, amount, trade_type
    );

    Ok(FeeRecord {
        asset_id: order.asset_id.clone(),
        symbol: order.symbol.clone(),
        fee_amount: amount,
        fee_rate: rate,
        trade_type,
        order_id: order.order_id.clone(),
        created_at: timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mudrex_core::{OrderRequest, OrderType};
    use rust_decimal_macros::dec;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn asset() -> Asset {
        Asset {
            asset_id: "btc-usdt".to_string(),
            symbol: "BTCUSDT".to_string(),
            base_currency: "BTC".to_string(),
            quote_currency: "USDT".to_string(),
            min_quantity: dec!(0.001),
            max_quantity: dec!(100),
            quantity_step: dec!(0.001),
            min_leverage: dec!(1),
            max_leverage: dec!(50),
            maker_fee: dec!(0.0002),
            taker_fee: dec!(0.0005),
            is_active: true,
        }
    }

    #[test]
    fn test_fee_amount() {
        // 10000 * 0.001 = 10
        assert_eq!(fee_amount(dec!(10000), dec!(0.001)).unwrap(), dec!(10));
    }

    #[test]
    fn test_negative_maker_fee_rebate() {
        assert_eq!(fee_amount(dec!(10000), dec!(-0.0001)).unwrap(), dec!(-1));
    }

    #[test]
    fn test_charge_taker_fee_on_filled_portion() {
        let asset = asset();
        let req = OrderRequest::market(OrderType::Long, dec!(2), dec!(10));
        let mut order = Order::from_request("ord-7", &asset, &req, t0());
        order.apply_fill(dec!(1), dec!(50000), t0()).unwrap();

        let record = charge_fee(&asset, &order, TradeType::Taker, t0()).unwrap();

        // 1 * 50000 * 0.0005 = 25
        assert_eq!(record.fee_amount, dec!(25));
        assert_eq!(record.fee_rate, dec!(0.0005));
        assert_eq!(record.order_id, "ord-7");
        assert_eq!(record.symbol, "BTCUSDT");
    }

    #[test]
    fn test_charge_maker_fee() {
        let asset = asset();
        let req = OrderRequest::limit(OrderType::Short, dec!(0.5), dec!(60000), dec!(5));
        let mut order = Order::from_request("ord-8", &asset, &req, t0());
        order.apply_fill(dec!(0.5), dec!(60000), t0()).unwrap();

        let record = charge_fee(&asset, &order, TradeType::Maker, t0()).unwrap();

        // 0.5 * 60000 * 0.0002 = 6
        assert_eq!(record.fee_amount, dec!(6));
        assert_eq!(record.trade_type, TradeType::Maker);
    }

    #[test]
    fn test_charge_fee_rejects_other_asset() {
        let btc = asset();
        let eth = Asset {
            asset_id: "eth-usdt".to_string(),
            symbol: "ETHUSDT".to_string(),
            taker_fee: dec!(0.01),
            ..asset()
        };
        let req = OrderRequest::market(OrderType::Long, dec!(1), dec!(10));
        let mut order = Order::from_request("ord-9", &btc, &req, t0());
        order.apply_fill(dec!(1), dec!(50000), t0()).unwrap();

        assert_eq!(
            charge_fee(&eth, &order, TradeType::Taker, t0()),
            Err(CalcError::AssetMismatch {
                asset: "eth-usdt".to_string(),
                order: "btc-usdt".to_string(),
            })
        );
    }
}
