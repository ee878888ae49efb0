/*
[INPUT]:  Connection lifecycle transitions and forwarded frames
[OUTPUT]: Broadcast notifications consumed by application code
[POS]:    WebSocket layer - public event surface
[UPDATE]: When adding event kinds or changing delivery semantics
*/

use serde_json::Value;

use crate::ws::subscription::WsKey;

/// Buffer size of the broadcast channel behind `BybitWebSocket::events`.
/// Slow listeners observe `Lagged` instead of blocking emitters.
pub(crate) const EVENT_BUFFER: usize = 256;

/// Notifications emitted by the connection manager.
///
/// Delivery is fire-and-forget over a `tokio::sync::broadcast` channel:
/// any number of listeners, no return value awaited, emission never fails.
#[derive(Debug, Clone)]
pub enum WsEvent {
    /// First successful open of a connection key
    Open { key: WsKey },
    /// Successful open after a disconnect
    Reconnected { key: WsKey },
    /// Connection lost, a delayed retry is scheduled
    Reconnecting { key: WsKey },
    /// Connection closed on explicit request
    Close { key: WsKey },
    /// Transport failure on an established connection
    Error { key: WsKey, message: String },
    /// Control-channel response (subscription acks, auth failures)
    Response { key: WsKey, frame: Value },
    /// Data update carrying a topic payload
    Update { key: WsKey, frame: Value },
}

impl WsEvent {
    /// Connection key the event belongs to
    pub fn key(&self) -> WsKey {
        match self {
            WsEvent::Open { key }
            | WsEvent::Reconnected { key }
            | WsEvent::Reconnecting { key }
            | WsEvent::Close { key }
            | WsEvent::Error { key, .. }
            | WsEvent::Response { key, .. }
            | WsEvent::Update { key, .. } => *key,
        }
    }
}
