/*
[INPUT]:  API key and secret from application configuration
[OUTPUT]: Credential pair shared by the REST and streaming layers
[POS]:    Auth layer - credential carrier
[UPDATE]: When the exchange changes its credential format
*/

/// API key/secret pair for authenticated requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}
