/*
[INPUT]:  BYBIT_API_KEY / BYBIT_API_SECRET environment variables
[OUTPUT]: Real-time position, order and execution events on stdout
[POS]:    Examples - authenticated account event stream
[UPDATE]: When account topics change
*/

use bybit_adapter::{BybitWebSocket, Credentials, WsConfig, WsEvent};

/// Example: authenticated linear account stream. Market data and account
/// events ride separate connections; topics route automatically.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("BYBIT_API_KEY")?;
    let api_secret = std::env::var("BYBIT_API_SECRET")?;

    let config = WsConfig {
        credentials: Some(Credentials::new(api_key, api_secret)),
        linear: true,
        ..Default::default()
    };
    let ws = BybitWebSocket::new(config)?;
    let mut events = ws.events();

    ws.connect();
    ws.subscribe(["position", "order", "execution", "trade.BTCUSDT"]);

    while let Ok(event) = events.recv().await {
        match event {
            WsEvent::Update { key, frame } => println!("[{key:?}] update: {frame}"),
            WsEvent::Response { key, frame } => println!("[{key:?}] response: {frame}"),
            other => println!("lifecycle: {other:?}"),
        }
    }

    Ok(())
}
