/*
[INPUT]:  Raw JSON frames from the streaming transport
[OUTPUT]: Outbound control frames and inbound frame classification
[POS]:    WebSocket layer - wire frame construction and dispatch rules
[UPDATE]: When the exchange changes its frame format
*/

use serde_json::{Value, json};

/// `{"op": "ping"}`
pub fn ping() -> Value {
    json!({ "op": "ping" })
}

/// `{"op": "subscribe", "args": [...]}`
pub fn subscribe(topics: Vec<String>) -> Value {
    json!({ "op": "subscribe", "args": topics })
}

/// `{"op": "unsubscribe", "args": [...]}`
pub fn unsubscribe(topics: Vec<String>) -> Value {
    json!({ "op": "unsubscribe", "args": topics })
}

/// How an inbound frame is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundKind {
    /// Heartbeat reply, swallowed by the connection manager
    Pong,
    /// Control-channel response (subscription acks, auth failures)
    Response,
    /// Data update carrying a `topic`
    Update,
    /// Unrecognized, logged and dropped
    Unhandled,
}

/// Classify an inbound frame.
///
/// Frames carrying a `success` field are control responses; the subset
/// recognized as heartbeat replies is swallowed rather than forwarded.
/// A bare `ping`/`pong` field also counts as a heartbeat reply, which is
/// permissive enough to misroute unrelated frames using those names -
/// kept for compatibility with the live feed.
pub fn classify(frame: &Value) -> InboundKind {
    if frame.get("success").is_some() {
        if is_heartbeat_reply(frame) {
            InboundKind::Pong
        } else {
            InboundKind::Response
        }
    } else if frame.get("ping").is_some() || frame.get("pong").is_some() {
        InboundKind::Pong
    } else if frame.get("topic").is_some() {
        InboundKind::Update
    } else {
        InboundKind::Unhandled
    }
}

fn is_heartbeat_reply(frame: &Value) -> bool {
    let success = frame
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if success {
        if frame.get("ret_msg").and_then(Value::as_str) == Some("pong") {
            return true;
        }
        if frame.pointer("/request/op").and_then(Value::as_str) == Some("ping") {
            return true;
        }
    }
    frame.get("ping").is_some() || frame.get("pong").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_frames() {
        assert_eq!(ping().to_string(), r#"{"op":"ping"}"#);
        assert_eq!(
            subscribe(vec!["trade.BTCUSD".to_string()]),
            json!({"op": "subscribe", "args": ["trade.BTCUSD"]})
        );
        assert_eq!(
            unsubscribe(vec!["trade.BTCUSD".to_string()]),
            json!({"op": "unsubscribe", "args": ["trade.BTCUSD"]})
        );
    }

    #[test]
    fn test_pong_reply_with_ret_msg() {
        let frame = json!({
            "success": true,
            "ret_msg": "pong",
            "conn_id": "abc",
            "request": {"op": "ping", "args": null}
        });
        assert_eq!(classify(&frame), InboundKind::Pong);
    }

    #[test]
    fn test_pong_reply_with_echoed_request() {
        let frame = json!({"success": true, "ret_msg": "", "request": {"op": "ping"}});
        assert_eq!(classify(&frame), InboundKind::Pong);
    }

    #[test]
    fn test_bare_marker_counts_as_pong() {
        // Permissive compatibility rule: a lone ping/pong field qualifies
        // even without a success field.
        assert_eq!(classify(&json!({"ping": 1691200000})), InboundKind::Pong);
        assert_eq!(classify(&json!({"pong": 1691200000})), InboundKind::Pong);
    }

    #[test]
    fn test_subscribe_ack_is_response_not_pong() {
        let frame = json!({
            "success": true,
            "ret_msg": "",
            "request": {"op": "subscribe", "args": ["trade.BTCUSD"]}
        });
        assert_eq!(classify(&frame), InboundKind::Response);
    }

    #[test]
    fn test_failed_control_response() {
        let frame = json!({"success": false, "ret_msg": "error:invalid api_key"});
        assert_eq!(classify(&frame), InboundKind::Response);
    }

    #[test]
    fn test_topic_frame_is_update() {
        let frame = json!({"topic": "trade.BTCUSD", "data": []});
        assert_eq!(classify(&frame), InboundKind::Update);
    }

    #[test]
    fn test_unknown_frame_is_unhandled() {
        assert_eq!(classify(&json!({"hello": "world"})), InboundKind::Unhandled);
    }
}
