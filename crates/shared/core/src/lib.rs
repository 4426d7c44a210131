//! Mudrex Core Domain
//!
//! Pure data model for the Mudrex futures trading API.
//! Monetary fields are exact decimals that travel on the wire as strings.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod envelope;
pub mod error;

// Re-export commonly used types at crate root
pub use entities::{
    // Reference data
    Asset,
    AssetListResponse,
    // Fee ledger
    FeeRecord,
    // Wallet projections
    FuturesBalance,
    Leverage,
    MarginType,
    // Core trading entities
    Order,
    OrderRequest,
    OrderStatus,
    OrderType,
    Position,
    PositionStatus,
    RiskOrder,
    RiskOrderType,
    TradeType,
    TransferResult,
    TriggerType,
    WalletBalance,
    WalletType,
};
pub use envelope::{ApiError, ApiResponse};
pub use error::{ModelError, ModelResult};
