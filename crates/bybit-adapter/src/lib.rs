/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Bybit adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;
pub mod ws;

// Re-export commonly used types from auth
pub use auth::{
    Credentials,
    HmacAuthProvider,
    HmacSigner,
    MockAuthProvider,
    WsAuthProvider,
};

// Re-export commonly used types from http
pub use http::{
    BybitClient,
    BybitError,
    ClientConfig,
    RequestSigner,
    Result,
};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    BybitWebSocket,
    ConnectionState,
    WsConfig,
    WsEvent,
    WsKey,
};
