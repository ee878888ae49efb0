/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for bybit-adapter tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};

use bybit_adapter::WsEvent;

/// Upper bound for any single wait in a test
pub const WAIT: Duration = Duration::from_secs(2);

/// Setup a mock HTTP server for testing
#[allow(dead_code)]
pub async fn setup_mock_server() -> wiremock::MockServer {
    wiremock::MockServer::start().await
}

/// In-process WebSocket server accepting any number of connections
#[allow(dead_code)]
pub struct MockWsServer {
    pub url: String,
    connections: mpsc::UnboundedReceiver<MockConnection>,
}

/// One accepted client connection: inbound text frames are parsed as JSON
/// and queued; outbound messages are pushed through `send_json`/`close`.
#[allow(dead_code)]
pub struct MockConnection {
    /// Request URI the client connected with (includes the query string)
    pub uri: String,
    frames: mpsc::UnboundedReceiver<Value>,
    outbound: mpsc::UnboundedSender<Message>,
}

#[allow(dead_code)]
impl MockWsServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock ws server");
        let addr = listener.local_addr().expect("local addr");
        let (conn_tx, conn_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(handle_connection(stream, conn_tx.clone()));
            }
        });

        Self {
            url: format!("ws://{addr}"),
            connections: conn_rx,
        }
    }

    pub async fn next_connection(&mut self) -> MockConnection {
        timeout(WAIT, self.connections.recv())
            .await
            .expect("timed out waiting for a connection")
            .expect("mock server stopped")
    }

    pub async fn expect_no_connection(&mut self, window: Duration) {
        assert!(
            timeout(window, self.connections.recv()).await.is_err(),
            "unexpected new connection"
        );
    }
}

#[allow(dead_code)]
impl MockConnection {
    pub fn send_json(&self, frame: Value) {
        let _ = self.outbound.send(Message::Text(frame.to_string().into()));
    }

    pub fn close(&self) {
        let _ = self.outbound.send(Message::Close(None));
    }

    pub async fn recv_frame(&mut self) -> Value {
        timeout(WAIT, self.frames.recv())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed")
    }

    pub async fn expect_no_frame(&mut self, window: Duration) {
        assert!(
            timeout(window, self.frames.recv()).await.is_err(),
            "unexpected frame"
        );
    }

    /// Wait until the client side has dropped the connection
    pub async fn wait_closed(&mut self) {
        loop {
            match timeout(WAIT, self.frames.recv())
                .await
                .expect("timed out waiting for the connection to close")
            {
                Some(_) => {}
                None => return,
            }
        }
    }
}

async fn handle_connection(stream: TcpStream, conn_tx: mpsc::UnboundedSender<MockConnection>) {
    let uri = Arc::new(Mutex::new(String::new()));
    let uri_capture = uri.clone();
    let callback = move |req: &Request, resp: Response| {
        *uri_capture.lock().unwrap() = req.uri().to_string();
        Ok(resp)
    };

    let Ok(ws_stream) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
        return;
    };
    let (mut write, mut read) = ws_stream.split();
    let (frame_tx, frame_rx) = mpsc::unbounded_channel();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();

    let connection = MockConnection {
        uri: uri.lock().unwrap().clone(),
        frames: frame_rx,
        outbound: outbound_tx,
    };
    if conn_tx.send(connection).is_err() {
        return;
    }

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => match outbound {
                Some(Message::Close(frame)) => {
                    let _ = write.send(Message::Close(frame)).await;
                    break;
                }
                Some(message) => {
                    if write.send(message).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(value) = serde_json::from_str(text.as_str()) {
                        let _ = frame_tx.send(value);
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }
}

/// Answer every `{"op":"ping"}` on the connection with a pong reply
#[allow(dead_code)]
pub fn pump_pongs(mut conn: MockConnection) {
    tokio::spawn(async move {
        while let Some(frame) = conn.frames.recv().await {
            if frame.get("op").and_then(Value::as_str) == Some("ping") {
                conn.send_json(serde_json::json!({
                    "success": true,
                    "ret_msg": "pong",
                    "conn_id": "mock",
                    "request": {"op": "ping", "args": null}
                }));
            }
        }
    });
}

/// Drain events until one matches the predicate
#[allow(dead_code)]
pub async fn wait_for_event<F>(rx: &mut broadcast::Receiver<WsEvent>, mut pred: F) -> WsEvent
where
    F: FnMut(&WsEvent) -> bool,
{
    loop {
        match timeout(WAIT, rx.recv())
            .await
            .expect("timed out waiting for an event")
        {
            Ok(event) if pred(&event) => return event,
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(_)) => {}
            Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
        }
    }
}
