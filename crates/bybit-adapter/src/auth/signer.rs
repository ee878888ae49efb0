/*
[INPUT]:  Message payloads and the API secret
[OUTPUT]: Hex-encoded HMAC-SHA256 signatures
[POS]:    Auth layer - cryptographic signing for request authentication
[UPDATE]: When changing signing algorithm or encoding
*/

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer shared by REST request signing and the
/// streaming connection handshake
#[derive(Debug, Clone)]
pub struct HmacSigner {
    secret: Vec<u8>,
}

impl HmacSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Sign a payload and return the lowercase hex signature
    pub fn sign_hex(&self, payload: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Signature over the fixed streaming handshake template
    ///
    /// The exchange authenticates streaming connections with a signature
    /// over the literal string `"GET/realtime" + expires`.
    pub fn sign_realtime(&self, expires: i64) -> String {
        self.sign_hex(&format!("GET/realtime{expires}"))
    }
}
