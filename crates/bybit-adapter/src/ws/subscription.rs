/*
[INPUT]:  Desired topics and connection lifecycle transitions
[OUTPUT]: Per-key connection records (state, topics, socket handle)
[POS]:    WebSocket layer - subscription and connection state registry
[UPDATE]: When adding connection keys or changing the record shape
*/

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::ws::manager::Command;

/// Lifecycle state of a single connection key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Initial,
    Connecting,
    Connected,
    Closing,
    Reconnecting,
}

/// Identifier of an independent logical channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WsKey {
    /// Single channel carrying both market and account topics
    Inverse,
    /// Linear market data channel
    LinearPublic,
    /// Linear account event channel
    LinearPrivate,
}

impl WsKey {
    /// Whether the connection URL for this key carries auth parameters
    pub fn wants_auth(self) -> bool {
        match self {
            WsKey::Inverse | WsKey::LinearPrivate => true,
            WsKey::LinearPublic => false,
        }
    }
}

impl fmt::Display for WsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WsKey::Inverse => "inverse",
            WsKey::LinearPublic => "linearPublic",
            WsKey::LinearPrivate => "linearPrivate",
        };
        f.write_str(name)
    }
}

/// Account topics that route to the private linear channel
const LINEAR_PRIVATE_TOPICS: &[&str] = &["position", "execution", "order", "stop_order", "wallet"];

/// Resolve the connection key a topic belongs to
pub fn route_topic(linear: bool, topic: &str) -> WsKey {
    if !linear {
        return WsKey::Inverse;
    }
    let name = topic.split('.').next().unwrap_or(topic);
    if LINEAR_PRIVATE_TOPICS.contains(&name) {
        WsKey::LinearPrivate
    } else {
        WsKey::LinearPublic
    }
}

#[derive(Debug, Default)]
struct ConnectionRecord {
    state: ConnectionState,
    topics: BTreeSet<String>,
    sender: Option<mpsc::UnboundedSender<Command>>,
}

/// Registry of desired topics and connection state, one record per key.
///
/// Pure bookkeeping: never performs I/O. Topic sets survive disconnects;
/// only an explicit unsubscribe removes entries.
#[derive(Debug, Default)]
pub struct SubscriptionStore {
    records: Mutex<HashMap<WsKey, ConnectionRecord>>,
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a topic; returns false if it was already present
    pub fn add_topic(&self, key: WsKey, topic: &str) -> bool {
        let mut records = self.records.lock().unwrap();
        records.entry(key).or_default().topics.insert(topic.to_string())
    }

    /// Remove a topic; returns false if it was absent
    pub fn remove_topic(&self, key: WsKey, topic: &str) -> bool {
        let mut records = self.records.lock().unwrap();
        records.entry(key).or_default().topics.remove(topic)
    }

    /// Snapshot of the desired topics for a key, used for replay
    pub fn topics_for(&self, key: WsKey) -> Vec<String> {
        let records = self.records.lock().unwrap();
        records
            .get(&key)
            .map(|record| record.topics.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Current state, `Initial` for unknown keys
    pub fn state(&self, key: WsKey) -> ConnectionState {
        let records = self.records.lock().unwrap();
        records.get(&key).map(|record| record.state).unwrap_or_default()
    }

    pub(crate) fn set_state(&self, key: WsKey, state: ConnectionState) {
        let mut records = self.records.lock().unwrap();
        records.entry(key).or_default().state = state;
    }

    /// Handle to the live connection task, if any
    pub(crate) fn socket(&self, key: WsKey) -> Option<mpsc::UnboundedSender<Command>> {
        let records = self.records.lock().unwrap();
        records.get(&key).and_then(|record| record.sender.clone())
    }

    pub(crate) fn clear_socket(&self, key: WsKey) {
        let mut records = self.records.lock().unwrap();
        records.entry(key).or_default().sender = None;
    }

    /// Idempotent-connect guard: atomically claims the key and hands back
    /// the command mailbox for the new connection task. `None` means a
    /// task already owns the key (connecting, connected, closing, or
    /// waiting to reconnect).
    pub(crate) fn try_begin_connect(
        &self,
        key: WsKey,
    ) -> Option<mpsc::UnboundedReceiver<Command>> {
        let mut records = self.records.lock().unwrap();
        let record = records.entry(key).or_default();
        if record.sender.is_some() || record.state != ConnectionState::Initial {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        record.sender = Some(tx);
        record.state = ConnectionState::Connecting;
        Some(rx)
    }
}
