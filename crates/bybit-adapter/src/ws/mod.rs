/*
[INPUT]:  Streaming configuration and subscription requests
[OUTPUT]: Maintained market-data and account-event connections
[POS]:    WebSocket layer - real-time data streams
[UPDATE]: When adding channels or changing connection logic
*/

pub mod config;
pub mod event;
pub mod frame;
pub mod manager;
pub mod subscription;

pub use config::WsConfig;
pub use event::WsEvent;
pub use frame::InboundKind;
pub use manager::{BybitWebSocket, Command};
pub use subscription::{ConnectionState, SubscriptionStore, WsKey, route_topic};
