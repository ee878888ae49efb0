/*
[INPUT]:  Streaming options (credentials, market segment, timing overrides)
[OUTPUT]: Resolved endpoint URLs and connection tuning values
[POS]:    WebSocket layer - connection configuration
[UPDATE]: When endpoints move or new tuning knobs are added
*/

use std::time::Duration;

use crate::auth::Credentials;
use crate::ws::subscription::WsKey;

const MAINNET_INVERSE_URL: &str = "wss://stream.bybit.com/realtime";
const TESTNET_INVERSE_URL: &str = "wss://stream-testnet.bybit.com/realtime";
const MAINNET_LINEAR_PUBLIC_URL: &str = "wss://stream.bybit.com/realtime_public";
const TESTNET_LINEAR_PUBLIC_URL: &str = "wss://stream-testnet.bybit.com/realtime_public";
const MAINNET_LINEAR_PRIVATE_URL: &str = "wss://stream.bybit.com/realtime_private";
const TESTNET_LINEAR_PRIVATE_URL: &str = "wss://stream-testnet.bybit.com/realtime_private";

/// Streaming client configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub credentials: Option<Credentials>,
    /// Production endpoints when true, testnet otherwise
    pub livenet: bool,
    /// Linear (USDT) market channels when true, inverse otherwise
    pub linear: bool,
    /// Explicit URL override bypassing the computed endpoint
    pub ws_url: Option<String>,
    /// Interval between liveness pings
    pub ping_interval: Duration,
    /// Window after a ping in which a pong must arrive
    pub pong_timeout: Duration,
    /// Delay between reconnect attempts
    pub reconnect_timeout: Duration,
    /// Margin added to auth expiry timestamps
    pub auth_skew: Duration,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            livenet: false,
            linear: false,
            ws_url: None,
            ping_interval: Duration::from_secs(10),
            pong_timeout: Duration::from_millis(1000),
            reconnect_timeout: Duration::from_millis(500),
            auth_skew: Duration::from_millis(5000),
        }
    }
}

impl WsConfig {
    /// Computed endpoint for a connection key; `ws_url` overrides this
    pub fn endpoint(&self, key: WsKey) -> &'static str {
        match (key, self.livenet) {
            (WsKey::Inverse, true) => MAINNET_INVERSE_URL,
            (WsKey::Inverse, false) => TESTNET_INVERSE_URL,
            (WsKey::LinearPublic, true) => MAINNET_LINEAR_PUBLIC_URL,
            (WsKey::LinearPublic, false) => TESTNET_LINEAR_PUBLIC_URL,
            (WsKey::LinearPrivate, true) => MAINNET_LINEAR_PRIVATE_URL,
            (WsKey::LinearPrivate, false) => TESTNET_LINEAR_PRIVATE_URL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WsKey::Inverse, true, "wss://stream.bybit.com/realtime")]
    #[case(WsKey::Inverse, false, "wss://stream-testnet.bybit.com/realtime")]
    #[case(WsKey::LinearPublic, true, "wss://stream.bybit.com/realtime_public")]
    #[case(WsKey::LinearPrivate, false, "wss://stream-testnet.bybit.com/realtime_private")]
    fn test_endpoint_selection(#[case] key: WsKey, #[case] livenet: bool, #[case] expected: &str) {
        let config = WsConfig {
            livenet,
            ..Default::default()
        };
        assert_eq!(config.endpoint(key), expected);
    }

    #[test]
    fn test_default_timings() {
        let config = WsConfig::default();
        assert_eq!(config.ping_interval, Duration::from_secs(10));
        assert_eq!(config.pong_timeout, Duration::from_millis(1000));
        assert_eq!(config.reconnect_timeout, Duration::from_millis(500));
        assert_eq!(config.auth_skew, Duration::from_millis(5000));
    }
}
