use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of an order, and the side of the position it opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Profit when price rises
    Long,
    /// Profit when price falls
    Short,
}

impl OrderType {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            OrderType::Long => OrderType::Short,
            OrderType::Short => OrderType::Long,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Long => "LONG",
            OrderType::Short => "SHORT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an order is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    /// Execute at current market price
    Market,
    /// Execute at specified price or better
    Limit,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::Market => "MARKET",
            TriggerType::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&OrderType::Long).unwrap(), "\"LONG\"");
        assert_eq!(
            serde_json::from_str::<TriggerType>("\"LIMIT\"").unwrap(),
            TriggerType::Limit
        );
    }

    #[test]
    fn test_unknown_wire_value_rejected() {
        assert!(serde_json::from_str::<OrderType>("\"SIDEWAYS\"").is_err());
        assert!(serde_json::from_str::<TriggerType>("\"market\"").is_err());
    }

    #[test]
    fn test_opposite() {
        assert_eq!(OrderType::Long.opposite(), OrderType::Short);
        assert_eq!(OrderType::Short.opposite(), OrderType::Long);
    }
}
