/*
[INPUT]:  HTTP configuration (base URLs, timeouts, credentials)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::collections::BTreeMap;

use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::auth::Credentials;
use crate::http::{BybitError, RequestSigner, Result};
use crate::types::ApiResponse;

/// Base URLs for the REST API
const MAINNET_BASE_URL: &str = "https://api.bybit.com";
const TESTNET_BASE_URL: &str = "https://api-testnet.bybit.com";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Window (ms) during which a signed request stays valid
    pub recv_window: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            recv_window: 5000,
        }
    }
}

/// Main HTTP client for the REST API
#[derive(Debug)]
pub struct BybitClient {
    http_client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
    recv_window: u64,
}

impl BybitClient {
    /// Create a new client with default configuration
    pub fn new(livenet: bool) -> Result<Self> {
        Self::with_config(ClientConfig::default(), livenet)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, livenet: bool) -> Result<Self> {
        let base_url = if livenet {
            MAINNET_BASE_URL
        } else {
            TESTNET_BASE_URL
        };
        Self::with_config_and_base_url(config, base_url)
    }

    /// Create a client against an explicit base URL (tests)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            credentials: None,
            recv_window: config.recv_window,
        })
    }

    /// Set credentials for authenticated requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Build request builder for an endpoint path
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Stamp and sign a parameter map for a private endpoint
    fn signed_params(&self, mut params: BTreeMap<String, String>) -> Result<BTreeMap<String, String>> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            BybitError::Config("credentials required for private endpoints".to_string())
        })?;

        params.insert("api_key".to_string(), credentials.api_key.clone());
        params.insert(
            "timestamp".to_string(),
            Utc::now().timestamp_millis().to_string(),
        );
        params.insert("recv_window".to_string(), self.recv_window.to_string());

        let signature = RequestSigner::new(&credentials.api_secret).sign_params(&params);
        params.insert("sign".to_string(), signature);
        Ok(params)
    }

    /// Signed GET with parameters in the query string
    pub(crate) async fn get_signed<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: BTreeMap<String, String>,
    ) -> Result<T> {
        let params = self.signed_params(params)?;
        let builder = self.request(Method::GET, endpoint)?.query(&params);
        self.send_json(builder).await
    }

    /// Signed POST with parameters in the JSON body
    pub(crate) async fn post_signed<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: BTreeMap<String, String>,
    ) -> Result<T> {
        let params = self.signed_params(params)?;
        let builder = self.request(Method::POST, endpoint)?.json(&params);
        self.send_json(builder).await
    }

    /// Execute a request and decode the response envelope
    pub(crate) async fn send_envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BybitError::api_error(status, body));
        }

        let envelope: ApiResponse<T> = response.json().await?;
        if envelope.ret_code != 0 {
            return Err(BybitError::from_ret_code(
                envelope.ret_code,
                envelope.ret_msg,
            ));
        }
        Ok(envelope)
    }

    /// Execute a request and unwrap the envelope's result payload
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T> {
        let envelope = self.send_envelope(builder).await?;
        envelope
            .result
            .ok_or_else(|| BybitError::InvalidResponse("missing result field".to_string()))
    }
}
