/*
[INPUT]:  Order parameters from application code
[OUTPUT]: Request structs flattened into signable parameter maps
[POS]:    Data layer - request types for private endpoints
[UPDATE]: When API schema changes or new types added
*/

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderType, Side, TimeInForce};

/// Parameters for POST /v2/private/order/create
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::str")]
    pub qty: Decimal,
    #[serde(default)]
    #[serde(with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    pub time_in_force: TimeInForce,
    #[serde(default)]
    pub reduce_only: Option<bool>,
    #[serde(default)]
    pub close_on_trigger: Option<bool>,
    #[serde(default)]
    pub order_link_id: Option<String>,
}

impl PlaceOrderRequest {
    /// Limit order with the mandatory fields filled in
    pub fn limit(symbol: &str, side: Side, qty: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Limit,
            qty,
            price: Some(price),
            time_in_force: TimeInForce::GoodTillCancel,
            reduce_only: None,
            close_on_trigger: None,
            order_link_id: None,
        }
    }

    /// Market order with the mandatory fields filled in
    pub fn market(symbol: &str, side: Side, qty: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Market,
            qty,
            price: None,
            time_in_force: TimeInForce::ImmediateOrCancel,
            reduce_only: None,
            close_on_trigger: None,
            order_link_id: None,
        }
    }

    /// Flatten into the string map the request signer operates on
    pub fn into_params(self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("symbol".to_string(), self.symbol);
        params.insert("side".to_string(), self.side.as_str().to_string());
        params.insert(
            "order_type".to_string(),
            self.order_type.as_str().to_string(),
        );
        params.insert("qty".to_string(), self.qty.to_string());
        if let Some(price) = self.price {
            params.insert("price".to_string(), price.to_string());
        }
        params.insert(
            "time_in_force".to_string(),
            self.time_in_force.as_str().to_string(),
        );
        if let Some(reduce_only) = self.reduce_only {
            params.insert("reduce_only".to_string(), reduce_only.to_string());
        }
        if let Some(close_on_trigger) = self.close_on_trigger {
            params.insert(
                "close_on_trigger".to_string(),
                close_on_trigger.to_string(),
            );
        }
        if let Some(order_link_id) = self.order_link_id {
            params.insert("order_link_id".to_string(), order_link_id);
        }
        params
    }
}

/// Parameters for POST /v2/private/order/cancel
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CancelOrderRequest {
    pub symbol: String,
    pub order_id: String,
}

impl CancelOrderRequest {
    pub fn into_params(self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("symbol".to_string(), self.symbol);
        params.insert("order_id".to_string(), self.order_id);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_order_params() {
        let req = PlaceOrderRequest::limit(
            "BTCUSD",
            Side::Buy,
            "100".parse().unwrap(),
            "50000.5".parse().unwrap(),
        );
        let params = req.into_params();

        assert_eq!(params.get("symbol").map(String::as_str), Some("BTCUSD"));
        assert_eq!(params.get("side").map(String::as_str), Some("Buy"));
        assert_eq!(params.get("order_type").map(String::as_str), Some("Limit"));
        assert_eq!(params.get("qty").map(String::as_str), Some("100"));
        assert_eq!(params.get("price").map(String::as_str), Some("50000.5"));
        assert_eq!(
            params.get("time_in_force").map(String::as_str),
            Some("GoodTillCancel")
        );
    }

    #[test]
    fn test_market_order_omits_price() {
        let req = PlaceOrderRequest::market("BTCUSD", Side::Sell, "10".parse().unwrap());
        let params = req.into_params();

        assert!(!params.contains_key("price"));
        assert_eq!(
            params.get("time_in_force").map(String::as_str),
            Some("ImmediateOrCancel")
        );
    }
}
