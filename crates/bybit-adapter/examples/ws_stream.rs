/*
[INPUT]:  Public streaming topics on testnet
[OUTPUT]: Real-time trade and order book updates on stdout
[POS]:    Examples - public market data stream
[UPDATE]: When streaming topics change
*/

use bybit_adapter::{BybitWebSocket, WsConfig, WsEvent};

/// Example: public market data stream (no credentials needed).
/// Subscriptions survive reconnects; unplugging the network mid-run and
/// restoring it resumes the same topics.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let ws = BybitWebSocket::new(WsConfig::default())?;
    let mut events = ws.events();

    ws.connect();
    ws.subscribe(["trade.BTCUSD", "orderBookL2_25.BTCUSD"]);

    while let Ok(event) = events.recv().await {
        match event {
            WsEvent::Update { frame, .. } => println!("update: {frame}"),
            WsEvent::Response { frame, .. } => println!("response: {frame}"),
            other => println!("lifecycle: {other:?}"),
        }
    }

    Ok(())
}
