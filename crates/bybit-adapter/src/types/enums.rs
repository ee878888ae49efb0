/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Limit => "Limit",
            OrderType::Market => "Market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    GoodTillCancel,
    ImmediateOrCancel,
    FillOrKill,
    PostOnly,
}

impl TimeInForce {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeInForce::GoodTillCancel => "GoodTillCancel",
            TimeInForce::ImmediateOrCancel => "ImmediateOrCancel",
            TimeInForce::FillOrKill => "FillOrKill",
            TimeInForce::PostOnly => "PostOnly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Created,
    New,
    Rejected,
    PartiallyFilled,
    Filled,
    Cancelled,
    PendingCancel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(Side::Buy.as_str(), "Buy");
        assert_eq!(OrderType::Market.as_str(), "Market");
        assert_eq!(TimeInForce::GoodTillCancel.as_str(), "GoodTillCancel");
    }

    #[test]
    fn test_enum_serde_matches_as_str() {
        let side: Side = serde_json::from_str("\"Sell\"").unwrap();
        assert_eq!(side, Side::Sell);
        assert_eq!(
            serde_json::to_string(&TimeInForce::PostOnly).unwrap(),
            "\"PostOnly\""
        );
    }

    #[test]
    fn test_order_status_deserializes() {
        let status: OrderStatus = serde_json::from_str("\"PartiallyFilled\"").unwrap();
        assert_eq!(status, OrderStatus::PartiallyFilled);
    }
}
