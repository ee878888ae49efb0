/*
[INPUT]:  Optional credentials and a clock-offset source
[OUTPUT]: Signed query strings appended to streaming connection URLs
[POS]:    Auth layer - connection authentication abstraction
[UPDATE]: When the handshake template or expiry policy changes
*/

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::auth::{Credentials, HmacSigner};
use crate::http::{BybitClient, Result};

/// Produces the auth query parameters for a streaming connection URL.
///
/// The trait is async because an implementation may need a network round
/// trip (e.g. a server-time probe for clock-offset correction) before it
/// can pick an expiry timestamp.
#[async_trait]
pub trait WsAuthProvider: Send + Sync {
    /// `Ok(None)` means no credentials are configured; the connection
    /// proceeds unauthenticated.
    async fn ws_auth_query(&self) -> Result<Option<String>>;
}

/// Default provider: HMAC-SHA256 over `"GET/realtime" + expires`
#[derive(Debug, Clone)]
pub struct HmacAuthProvider {
    credentials: Option<Credentials>,
    skew: Duration,
    time_source: Option<Arc<BybitClient>>,
}

impl HmacAuthProvider {
    pub fn new(credentials: Option<Credentials>, skew: Duration) -> Self {
        Self {
            credentials,
            skew,
            time_source: None,
        }
    }

    /// Correct the expiry for local clock drift with a server-time probe
    /// before every handshake.
    pub fn with_time_source(mut self, client: Arc<BybitClient>) -> Self {
        self.time_source = Some(client);
        self
    }
}

#[async_trait]
impl WsAuthProvider for HmacAuthProvider {
    async fn ws_auth_query(&self) -> Result<Option<String>> {
        let Some(credentials) = &self.credentials else {
            return Ok(None);
        };

        let offset_ms = match &self.time_source {
            Some(client) => client.time_offset_ms().await?,
            None => 0,
        };
        if offset_ms != 0 {
            debug!(offset_ms, "applying server clock offset to auth expiry");
        }

        let expires = Utc::now().timestamp_millis() + offset_ms + self.skew.as_millis() as i64;
        let signature = HmacSigner::new(&credentials.api_secret).sign_realtime(expires);

        Ok(Some(format!(
            "api_key={}&expires={}&signature={}",
            credentials.api_key, expires, signature
        )))
    }
}

/// Fixed-output provider for tests
#[derive(Debug, Clone, Default)]
pub struct MockAuthProvider {
    query: Option<String>,
}

impl MockAuthProvider {
    pub fn with_query(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
        }
    }
}

#[async_trait]
impl WsAuthProvider for MockAuthProvider {
    async fn ws_auth_query(&self) -> Result<Option<String>> {
        Ok(self.query.clone())
    }
}
