//! HTTP transport
//!
//! The decoding and composition code never touches the network; it hands a path and a
//! [`ParameterSet`] to a [`Transport`] and gets the body text back. [`HttpTransport`] is the
//! reqwest implementation. It performs no retries and no client-side throttling.

use crate::auth::Credentials;
use crate::client::ClientConfig;
use crate::error::{RestError, RestResult};
use crate::order::ParameterSet;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Longest error body kept on a status error
const MAX_ERROR_BODY: usize = 512;

/// Wait suggested for a 429 without a usable `Retry-After`
const DEFAULT_RETRY_AFTER_MS: u64 = 1_000;

/// Performs HTTP calls and returns raw response bodies
#[async_trait]
pub trait Transport: Send + Sync {
    /// Unauthenticated call
    async fn send_public(&self, path: &str, params: ParameterSet) -> RestResult<String>;

    /// Authenticated call; fails with [`RestError::AuthRequired`] without credentials
    async fn send_signed(&self, path: &str, params: ParameterSet) -> RestResult<String>;

    /// Whether [`send_signed`](Self::send_signed) can succeed
    fn can_sign(&self) -> bool;
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> RestResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RestError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_body(response: Response) -> RestResult<String> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_ms = retry_after_ms(
                response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok()),
            );
            warn!(retry_after_ms, "Rate limited by server");
            return Err(RestError::RateLimited { retry_after_ms });
        }

        let body = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success HTTP status");
            return Err(RestError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, params), fields(param_count = params.len()))]
    async fn send_public(&self, path: &str, params: ParameterSet) -> RestResult<String> {
        let mut url = format!("{}{}", self.base_url, path);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.encode()?);
        }

        debug!("GET {}", path);
        let response = self.client.get(&url).send().await.map_err(request_error)?;
        Self::read_body(response).await
    }

    #[instrument(skip(self, params), fields(param_count = params.len()))]
    async fn send_signed(&self, path: &str, params: ParameterSet) -> RestResult<String> {
        let credentials = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;

        let nonce = Credentials::next_nonce();
        let mut body = ParameterSet::new().with("nonce", nonce.to_string());
        body.merge(params);
        let post_data = body.encode()?;
        let signature = credentials.sign(path, nonce, &post_data)?;

        debug!("POST {}", path);
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("API-Key", credentials.api_key())
            .header("API-Sign", signature)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(post_data)
            .send()
            .await
            .map_err(request_error)?;

        Self::read_body(response).await
    }

    fn can_sign(&self) -> bool {
        self.credentials.is_some()
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.can_sign())
            .finish()
    }
}

fn request_error(err: reqwest::Error) -> RestError {
    if err.is_timeout() {
        RestError::Timeout
    } else {
        RestError::Http(err)
    }
}

/// `Retry-After` in whole seconds, as milliseconds
fn retry_after_ms(header: Option<&str>) -> u64 {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs.saturating_mul(1_000))
        .unwrap_or(DEFAULT_RETRY_AFTER_MS)
}
