mod asset;
mod fee;
mod leverage;
mod order;
mod order_status;
mod order_type;
mod position;
mod risk_order;
mod wallet;

pub use asset::{Asset, AssetListResponse};
pub use fee::{FeeRecord, TradeType};
pub use leverage::{Leverage, MarginType};
pub use order::{Order, OrderRequest};
pub use order_status::OrderStatus;
pub use order_type::{OrderType, TriggerType};
pub use position::{Position, PositionStatus};
pub use risk_order::{RiskOrder, RiskOrderType};
pub use wallet::{FuturesBalance, TransferResult, WalletBalance, WalletType};
