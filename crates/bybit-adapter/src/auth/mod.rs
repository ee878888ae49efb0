/*
[INPUT]:  API credentials and signing configuration
[OUTPUT]: Signed query strings for REST and streaming authentication
[POS]:    Auth layer - handles Bybit API authentication
[UPDATE]: When auth flow or signature methods change
*/

pub mod credentials;
pub mod provider;
pub mod signer;

pub use credentials::Credentials;
pub use provider::{HmacAuthProvider, MockAuthProvider, WsAuthProvider};
pub use signer::HmacSigner;
