/*
[INPUT]:  Raw JSON response bodies
[OUTPUT]: Typed response envelopes and payloads
[POS]:    Data layer - response types for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::http::{BybitError, Result};
use crate::types::{OrderStatus, OrderType, Side, TimeInForce};

/// Envelope wrapping every REST response
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub ret_code: i64,
    pub ret_msg: String,
    #[serde(default)]
    pub ext_code: Option<String>,
    #[serde(default)]
    pub ext_info: Option<String>,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub time_now: Option<String>,
}

/// Server clock, epoch seconds with fractional part as a string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerTime {
    pub time_now: String,
}

impl ServerTime {
    /// Server clock as epoch milliseconds
    pub fn epoch_ms(&self) -> Result<i64> {
        let seconds: f64 = self.time_now.parse().map_err(|_| {
            BybitError::InvalidResponse(format!("unparseable time_now: {}", self.time_now))
        })?;
        Ok((seconds * 1000.0) as i64)
    }
}

/// Order as returned by the private order endpoints
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Order {
    pub order_id: String,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Decimal,
    pub qty: Decimal,
    pub time_in_force: TimeInForce,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub order_link_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Paged order listing from GET /v2/private/order/list
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderList {
    pub data: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_time_epoch_ms() {
        let time = ServerTime {
            time_now: "1577444332.192859".to_string(),
        };
        assert_eq!(time.epoch_ms().unwrap(), 1_577_444_332_192);
    }

    #[test]
    fn test_server_time_rejects_garbage() {
        let time = ServerTime {
            time_now: "not-a-clock".to_string(),
        };
        assert!(matches!(
            time.epoch_ms(),
            Err(BybitError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_envelope_with_missing_result() {
        let raw = r#"{"ret_code":0,"ret_msg":"OK","ext_code":"","ext_info":"","time_now":"1577444332.192859"}"#;
        let envelope: ApiResponse<Order> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.ret_code, 0);
        assert!(envelope.result.is_none());
    }
}
