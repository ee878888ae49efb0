/*
[INPUT]:  Streaming configuration, desired topics, inbound frames
[OUTPUT]: Maintained connections with liveness checks and replayed subscriptions
[POS]:    WebSocket layer - connection lifecycle state machine
[UPDATE]: When changing reconnect, heartbeat, or dispatch behavior
*/

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, sleep};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use crate::auth::{HmacAuthProvider, WsAuthProvider};
use crate::http::{BybitClient, Result};
use crate::ws::config::WsConfig;
use crate::ws::event::{EVENT_BUFFER, WsEvent};
use crate::ws::frame::{self, InboundKind};
use crate::ws::subscription::{ConnectionState, SubscriptionStore, WsKey, route_topic};

/// Mailbox messages for a connection task
#[derive(Debug)]
pub enum Command {
    /// Write a text frame to the transport
    Send(String),
    /// Close the connection and stop reconnecting
    Close,
}

/// How a single connection attempt ended
enum Outcome {
    /// Explicitly closed, stop the task
    Finished,
    /// Connection failed or dropped, retry after the configured delay
    Retry,
}

struct WsInner {
    config: WsConfig,
    store: SubscriptionStore,
    auth: Arc<dyn WsAuthProvider>,
    events: broadcast::Sender<WsEvent>,
}

impl WsInner {
    fn emit(&self, event: WsEvent) {
        // Fire-and-forget: no listeners is not an error.
        let _ = self.events.send(event);
    }

    /// Send guard: transport-level failures are logged, never surfaced.
    fn send_raw(&self, key: WsKey, frame: Value) {
        let Some(sender) = self.store.socket(key) else {
            warn!(%key, "frame dropped, no live connection");
            return;
        };
        if sender.send(Command::Send(frame.to_string())).is_err() {
            warn!(%key, "frame dropped, connection task stopped");
        }
    }

    /// Replay path and incremental-subscribe path are the same wire
    /// message: the full desired topic set for the key.
    fn send_topic_snapshot(&self, key: WsKey) {
        let topics = self.store.topics_for(key);
        if topics.is_empty() {
            return;
        }
        info!(%key, count = topics.len(), "subscribing to topics");
        self.send_raw(key, frame::subscribe(topics));
    }
}

/// Streaming client: maintains one long-lived connection per logical
/// channel, authenticates it, tracks desired subscriptions, probes
/// liveness, and recovers from disconnects by replaying subscription
/// intent.
#[derive(Clone)]
pub struct BybitWebSocket {
    inner: Arc<WsInner>,
}

impl BybitWebSocket {
    /// Create a client with the default HMAC auth provider. The provider
    /// probes server time through the REST API to correct auth expiry for
    /// clock drift.
    pub fn new(config: WsConfig) -> Result<Self> {
        let rest = BybitClient::new(config.livenet)?;
        let provider = HmacAuthProvider::new(config.credentials.clone(), config.auth_skew)
            .with_time_source(Arc::new(rest));
        Ok(Self::with_auth_provider(config, Arc::new(provider)))
    }

    /// Create a client with a custom auth provider
    pub fn with_auth_provider(config: WsConfig, auth: Arc<dyn WsAuthProvider>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: Arc::new(WsInner {
                config,
                store: SubscriptionStore::new(),
                auth,
                events,
            }),
        }
    }

    /// Subscribe to lifecycle and data events. Every receiver sees every
    /// event emitted after this call.
    pub fn events(&self) -> broadcast::Receiver<WsEvent> {
        self.inner.events.subscribe()
    }

    /// Connect the channels implied by the configuration: the single
    /// inverse channel, or the linear public channel plus the private one
    /// when credentials are available.
    pub fn connect(&self) {
        if self.inner.config.linear {
            self.connect_key(WsKey::LinearPublic);
            if self.inner.config.credentials.is_some() {
                self.connect_key(WsKey::LinearPrivate);
            } else {
                info!("no credentials configured, skipping private channel");
            }
        } else {
            self.connect_key(WsKey::Inverse);
        }
    }

    /// Connect one channel. A no-op while a connection task already owns
    /// the key (connecting, connected, closing, or waiting to reconnect).
    pub fn connect_key(&self, key: WsKey) {
        let Some(mailbox) = self.inner.store.try_begin_connect(key) else {
            debug!(%key, state = ?self.inner.store.state(key), "connect ignored, connection already managed");
            return;
        };
        let inner = self.inner.clone();
        tokio::spawn(run_connection(inner, key, mailbox));
    }

    /// Request an orderly close. The connection will not be retried.
    pub fn close(&self, key: WsKey) {
        let Some(sender) = self.inner.store.socket(key) else {
            debug!(%key, "close ignored, no connection");
            return;
        };
        self.inner.store.set_state(key, ConnectionState::Closing);
        let _ = sender.send(Command::Close);
    }

    /// Record subscription intent and, for every affected connected
    /// channel, push the updated topic snapshot to the wire. Desired
    /// state is updated regardless of connection state.
    pub fn subscribe<I, S>(&self, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut touched = BTreeSet::new();
        for topic in topics {
            let topic = topic.into();
            let key = route_topic(self.inner.config.linear, &topic);
            self.inner.store.add_topic(key, &topic);
            touched.insert(key);
        }
        for key in touched {
            if self.inner.store.state(key) == ConnectionState::Connected {
                self.inner.send_topic_snapshot(key);
            }
        }
    }

    /// Drop subscription intent and tell every affected connected channel
    /// which topics were removed.
    pub fn unsubscribe<I, S>(&self, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut removed: BTreeMap<WsKey, Vec<String>> = BTreeMap::new();
        for topic in topics {
            let topic = topic.into();
            let key = route_topic(self.inner.config.linear, &topic);
            if self.inner.store.remove_topic(key, &topic) {
                removed.entry(key).or_default().push(topic);
            }
        }
        for (key, topics) in removed {
            if self.inner.store.state(key) == ConnectionState::Connected {
                self.inner.send_raw(key, frame::unsubscribe(topics));
            }
        }
    }

    /// Current lifecycle state of a channel
    pub fn state(&self, key: WsKey) -> ConnectionState {
        self.inner.store.state(key)
    }

    /// Snapshot of the desired topics for a channel
    pub fn topics(&self, key: WsKey) -> Vec<String> {
        self.inner.store.topics_for(key)
    }
}

/// Connection task: owns the socket for one key, loops connect ->
/// established -> retry until explicitly closed. Timers and the socket
/// live on this task, so tearing one down can never race a replacement.
async fn run_connection(
    inner: Arc<WsInner>,
    key: WsKey,
    mut mailbox: mpsc::UnboundedReceiver<Command>,
) {
    let mut attempt: u64 = 0;
    loop {
        inner.store.set_state(key, ConnectionState::Connecting);
        match connect_once(&inner, key, attempt, &mut mailbox).await {
            Outcome::Finished => break,
            Outcome::Retry => {
                attempt += 1;
                inner.store.set_state(key, ConnectionState::Reconnecting);
                inner.emit(WsEvent::Reconnecting { key });
                info!(%key, delay_ms = inner.config.reconnect_timeout.as_millis() as u64, "reconnecting after delay");

                let delay = sleep(inner.config.reconnect_timeout);
                tokio::pin!(delay);
                loop {
                    tokio::select! {
                        _ = &mut delay => break,
                        command = mailbox.recv() => match command {
                            Some(Command::Close) | None => {
                                inner.store.set_state(key, ConnectionState::Initial);
                                inner.store.clear_socket(key);
                                inner.emit(WsEvent::Close { key });
                                return;
                            }
                            Some(Command::Send(_)) => {
                                debug!(%key, "frame dropped while reconnecting");
                            }
                        },
                    }
                }
            }
        }
    }
    inner.store.set_state(key, ConnectionState::Initial);
    inner.store.clear_socket(key);
    inner.emit(WsEvent::Close { key });
}

async fn compose_url(inner: &WsInner, key: WsKey) -> Result<String> {
    let base = inner
        .config
        .ws_url
        .clone()
        .unwrap_or_else(|| inner.config.endpoint(key).to_string());
    if !key.wants_auth() {
        return Ok(base);
    }
    match inner.auth.ws_auth_query().await? {
        Some(query) => Ok(format!("{base}?{query}")),
        None => {
            info!(%key, "no credentials configured, connecting unauthenticated");
            Ok(base)
        }
    }
}

async fn connect_once(
    inner: &Arc<WsInner>,
    key: WsKey,
    attempt: u64,
    mailbox: &mut mpsc::UnboundedReceiver<Command>,
) -> Outcome {
    let url = match compose_url(inner, key).await {
        Ok(url) => url,
        Err(err) => {
            error!(%key, error = %err, "auth parameter retrieval failed");
            return Outcome::Retry;
        }
    };

    let (ws_stream, _response) = match connect_async(url.as_str()).await {
        Ok(connected) => connected,
        Err(err) => {
            error!(%key, error = %err, "connect failed");
            return Outcome::Retry;
        }
    };

    let (mut write, mut read) = ws_stream.split();
    inner.store.set_state(key, ConnectionState::Connected);
    if attempt == 0 {
        info!(%key, "connection open");
        inner.emit(WsEvent::Open { key });
    } else {
        info!(%key, attempt, "connection reopened");
        inner.emit(WsEvent::Reconnected { key });
    }
    inner.send_topic_snapshot(key);

    // Liveness probe: a ping is scheduled XOR a pong is awaited.
    let ping_timer = sleep(inner.config.ping_interval);
    tokio::pin!(ping_timer);
    let pong_deadline = sleep(inner.config.pong_timeout);
    tokio::pin!(pong_deadline);
    let mut awaiting_pong = false;
    let mut closing = false;

    loop {
        tokio::select! {
            _ = &mut ping_timer, if !awaiting_pong && !closing => {
                if let Err(err) = write.send(WsMessage::Text(frame::ping().to_string().into())).await {
                    warn!(%key, error = %err, "ping send failed");
                }
                awaiting_pong = true;
                pong_deadline.as_mut().reset(Instant::now() + inner.config.pong_timeout);
            }
            _ = &mut pong_deadline, if awaiting_pong && !closing => {
                warn!(%key, timeout_ms = inner.config.pong_timeout.as_millis() as u64, "pong timeout, forcing close");
                let _ = write.send(WsMessage::Close(None)).await;
                return Outcome::Retry;
            }
            command = mailbox.recv() => match command {
                Some(Command::Send(text)) => {
                    if closing {
                        debug!(%key, "frame dropped while closing");
                    } else if let Err(err) = write.send(WsMessage::Text(text.into())).await {
                        warn!(%key, error = %err, "send failed");
                    }
                }
                Some(Command::Close) | None => {
                    inner.store.set_state(key, ConnectionState::Closing);
                    closing = true;
                    if write.send(WsMessage::Close(None)).await.is_err() {
                        return Outcome::Finished;
                    }
                }
            },
            incoming = read.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    handle_frame(inner, key, text.as_str(), &mut awaiting_pong, |deadline| {
                        ping_timer.as_mut().reset(Instant::now() + deadline);
                    });
                }
                Some(Ok(WsMessage::Binary(bytes))) => {
                    match std::str::from_utf8(&bytes) {
                        Ok(text) => handle_frame(inner, key, text, &mut awaiting_pong, |deadline| {
                            ping_timer.as_mut().reset(Instant::now() + deadline);
                        }),
                        Err(_) => debug!(%key, bytes = bytes.len(), "non-utf8 binary frame dropped"),
                    }
                }
                Some(Ok(WsMessage::Ping(_)) | Ok(WsMessage::Pong(_)) | Ok(WsMessage::Frame(_))) => {}
                Some(Ok(WsMessage::Close(_))) | None => {
                    if closing {
                        return Outcome::Finished;
                    }
                    warn!(%key, "connection closed by server");
                    return Outcome::Retry;
                }
                Some(Err(err)) => {
                    if closing {
                        return Outcome::Finished;
                    }
                    error!(%key, error = %err, "transport error");
                    inner.emit(WsEvent::Error { key, message: err.to_string() });
                    return Outcome::Retry;
                }
            },
        }
    }
}

/// Classify and route one inbound text frame. A qualifying pong clears
/// the outstanding deadline and reschedules the next ping.
fn handle_frame(
    inner: &Arc<WsInner>,
    key: WsKey,
    text: &str,
    awaiting_pong: &mut bool,
    mut reschedule_ping: impl FnMut(std::time::Duration),
) {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            warn!(%key, error = %err, bytes = text.len(), "unparseable frame dropped");
            return;
        }
    };

    match frame::classify(&value) {
        InboundKind::Pong => {
            if *awaiting_pong {
                *awaiting_pong = false;
                reschedule_ping(inner.config.ping_interval);
            }
        }
        InboundKind::Response => inner.emit(WsEvent::Response { key, frame: value }),
        InboundKind::Update => inner.emit(WsEvent::Update { key, frame: value }),
        InboundKind::Unhandled => debug!(%key, frame = %value, "unhandled frame dropped"),
    }
}
