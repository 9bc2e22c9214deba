//! Request signing for private endpoints
//!
//! Kraken signs `path ‖ SHA256(nonce ‖ postData)` with HMAC-SHA512 keyed by the base64-decoded
//! private key, and expects the base64 result in the `API-Sign` header.
//!
//! The private key is held in a [`SecretBox`], zeroized on drop and redacted from `Debug`.

use crate::error::{RestError, RestResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox};
use sha2::{Digest, Sha256, Sha512};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha512 = Hmac<Sha512>;

/// Last nonce handed out, shared by every client in the process
static LAST_NONCE: AtomicU64 = AtomicU64::new(0);

/// API credentials for authenticated requests
pub struct Credentials {
    api_key: String,
    private_key: SecretBox<Vec<u8>>,
}

impl Credentials {
    /// Create credentials from an API key and its base64 private key
    pub fn new(api_key: impl Into<String>, private_key: impl AsRef<str>) -> RestResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RestError::InvalidCredentials("API key is empty".to_string()));
        }

        let decoded = BASE64.decode(private_key.as_ref().trim()).map_err(|e| {
            RestError::InvalidCredentials(format!("Invalid base64 private key: {e}"))
        })?;
        if decoded.is_empty() {
            return Err(RestError::InvalidCredentials("private key is empty".to_string()));
        }

        Ok(Self {
            api_key,
            private_key: SecretBox::new(Box::new(decoded)),
        })
    }

    /// Read `KRAKEN_API_KEY` and `KRAKEN_PRIVATE_KEY`
    pub fn from_env() -> RestResult<Self> {
        let api_key = std::env::var("KRAKEN_API_KEY")
            .map_err(|_| RestError::EnvVarNotSet("KRAKEN_API_KEY".to_string()))?;
        let private_key = std::env::var("KRAKEN_PRIVATE_KEY")
            .map_err(|_| RestError::EnvVarNotSet("KRAKEN_PRIVATE_KEY".to_string()))?;

        Self::new(api_key, private_key)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Next nonce: milliseconds since the epoch, bumped past the previous one if the clock has
    /// not moved
    pub fn next_nonce() -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();

        let mut last = LAST_NONCE.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match LAST_NONCE.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }

    /// `API-Sign` value for a request
    pub fn sign(&self, path: &str, nonce: u64, post_data: &str) -> RestResult<String> {
        let mut sha256 = Sha256::new();
        sha256.update(nonce.to_string().as_bytes());
        sha256.update(post_data.as_bytes());
        let digest = sha256.finalize();

        let mut mac = HmacSha512::new_from_slice(self.private_key.expose_secret())
            .map_err(|e| RestError::InvalidCredentials(e.to_string()))?;
        mac.update(path.as_bytes());
        mac.update(&digest);

        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            private_key: SecretBox::new(Box::new(self.private_key.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{shown}..."))
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_SECRET: &str =
        "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";

    #[test]
    fn test_nonces_strictly_increase() {
        let first = Credentials::next_nonce();
        let second = Credentials::next_nonce();
        let third = Credentials::next_nonce();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let creds = Credentials::new("test_api_key", "dGVzdF9wcml2YXRlX2tleQ==").unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("test_private_key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(matches!(
            Credentials::new("key", "not base64!"),
            Err(RestError::InvalidCredentials(_))
        ));
        assert!(matches!(
            Credentials::new("", DOC_SECRET),
            Err(RestError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_documented_signature() {
        let creds = Credentials::new("API_KEY", DOC_SECRET).unwrap();
        let signature = creds
            .sign(
                "/0/private/AddOrder",
                1616492376594,
                "nonce=1616492376594&ordertype=limit&pair=XBTUSD&price=37500&type=buy&volume=1.25",
            )
            .unwrap();
        assert_eq!(
            signature,
            "4/dpxb3iT4tp/ZCVEwSnEsLxx0bqyhLpdfOpc6fn7OR8+UClSV5n9E6aSS8MPtnRfp32bAb0nmbRn6H8ndwLUQ=="
        );
    }
}
