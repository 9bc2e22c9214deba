//! Main REST client implementation

use crate::auth::Credentials;
use crate::decode::Decode;
use crate::endpoints::{AccountEndpoints, Endpoint, FundingEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::format::{self, Response, ReturnFormat};
use crate::order::{EditRequest, OrderId, OrderRequest, ParameterSet};
use crate::transport::{HttpTransport, Transport};
use crate::types::{AddOrderResult, Balances, CancelResult, EditOrderResult, MarketQuote};
use tracing::{debug, info};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.kraken.com";

const DEFAULT_USER_AGENT: &str = concat!("kraken-rest/", env!("CARGO_PKG_VERSION"));

/// Kraken REST API client
///
/// Every call goes through [`fetch`](Self::fetch): the transport returns the body text and
/// the requested [`ReturnFormat`] decides how much of it gets interpreted.
///
/// # Example
///
/// ```no_run
/// use kraken_rest::{KrakenRestClient, ReturnFormat};
/// use kraken_rest::endpoints::Endpoint;
/// use kraken_rest::order::ParameterSet;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = KrakenRestClient::new()?;
///     let quote = client.get_ticker("XBTUSD").await?;
///     println!("mid {}", quote.mid_price());
///
///     let raw = client
///         .fetch::<serde_json::Value>(Endpoint::Time, ParameterSet::new(), ReturnFormat::RawText)
///         .await?;
///     println!("{:?}", raw.as_raw());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct KrakenRestClient<T: Transport = HttpTransport> {
    transport: T,
}

impl KrakenRestClient<HttpTransport> {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let transport = HttpTransport::new(&config)?;
        info!(
            base_url = %config.base_url,
            authenticated = config.credentials.is_some(),
            "Created Kraken REST client"
        );
        Ok(Self { transport })
    }

    /// Create a client configured from the environment, see [`ClientConfig::from_env`]
    pub fn from_env() -> RestResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }
}

impl<T: Transport> KrakenRestClient<T> {
    /// Wrap any transport, e.g. a recording or in-memory one
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Check if the client can call private endpoints
    pub fn has_credentials(&self) -> bool {
        self.transport.can_sign()
    }

    /// Call `endpoint` once and convert the body into the requested format
    pub async fn fetch<X: Decode>(
        &self,
        endpoint: Endpoint,
        params: ParameterSet,
        format: ReturnFormat,
    ) -> RestResult<Response<X>> {
        let raw = self.send(endpoint, params).await?;
        format::dispatch(raw, format)
    }

    /// [`fetch`](Self::fetch) with [`ReturnFormat::TypedObject`]
    pub(crate) async fn call<X: Decode>(
        &self,
        endpoint: Endpoint,
        params: ParameterSet,
    ) -> RestResult<X> {
        match self.fetch(endpoint, params, ReturnFormat::TypedObject).await? {
            Response::Typed(entity) => Ok(entity),
            _ => Err(RestError::schema(X::KIND, "expected a typed response")),
        }
    }

    async fn send(&self, endpoint: Endpoint, params: ParameterSet) -> RestResult<String> {
        debug!(endpoint = endpoint.name(), "Sending request");
        if endpoint.is_private() {
            if !self.transport.can_sign() {
                return Err(RestError::AuthRequired);
            }
            self.transport.send_signed(endpoint.path(), params).await
        } else {
            self.transport.send_public(endpoint.path(), params).await
        }
    }

    fn require_signing(&self) -> RestResult<()> {
        if self.transport.can_sign() {
            Ok(())
        } else {
            Err(RestError::AuthRequired)
        }
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_, T> {
        MarketEndpoints::new(self)
    }

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_, T>> {
        self.require_signing()?;
        Ok(AccountEndpoints::new(self))
    }

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_, T>> {
        self.require_signing()?;
        Ok(TradingEndpoints::new(self))
    }

    /// Get funding endpoints (requires credentials)
    pub fn funding(&self) -> RestResult<FundingEndpoints<'_, T>> {
        self.require_signing()?;
        Ok(FundingEndpoints::new(self))
    }

    // ========================================================================
    // Shortcuts
    // ========================================================================

    /// Get ticker information for a trading pair
    pub async fn get_ticker(&self, pair: &str) -> RestResult<MarketQuote> {
        self.market().get_ticker(pair).await
    }

    /// Get account balance
    pub async fn get_balance(&self) -> RestResult<Balances> {
        self.account()?.get_balance().await
    }

    /// Place a new order
    pub async fn add_order(&self, order: &OrderRequest) -> RestResult<AddOrderResult> {
        self.trading()?.add_order(order).await
    }

    /// Edit an open order
    pub async fn edit_order(&self, edit: &EditRequest) -> RestResult<EditOrderResult> {
        self.trading()?.edit_order(edit).await
    }

    /// Cancel an order by transaction id or user reference
    pub async fn cancel_order(&self, id: impl Into<OrderId>) -> RestResult<CancelResult> {
        self.trading()?.cancel_order(id).await
    }
}

impl<T: Transport> std::fmt::Debug for KrakenRestClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenRestClient")
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Scheme and host, without a trailing path
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the environment
    ///
    /// Reads `KRAKEN_API_KEY` and `KRAKEN_PRIVATE_KEY` (both or neither), `KRAKEN_REST_URL` and
    /// `KRAKEN_TIMEOUT_SECS`.
    pub fn from_env() -> RestResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RestResult<Self> {
        let mut config = Self::default();

        match (lookup("KRAKEN_API_KEY"), lookup("KRAKEN_PRIVATE_KEY")) {
            (Some(key), Some(secret)) => {
                config.credentials = Some(Credentials::new(key, secret)?);
            }
            (Some(_), None) => return Err(RestError::EnvVarNotSet("KRAKEN_PRIVATE_KEY".to_string())),
            (None, Some(_)) => return Err(RestError::EnvVarNotSet("KRAKEN_API_KEY".to_string())),
            (None, None) => {}
        }

        if let Some(url) = lookup("KRAKEN_REST_URL") {
            config.base_url = url;
        }
        if let Some(timeout) = lookup("KRAKEN_TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                RestError::Config(format!("KRAKEN_TIMEOUT_SECS is not a number: {timeout}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> RestResult<()> {
        if self.timeout_secs == 0 {
            return Err(RestError::Config("timeout must be at least one second".to_string()));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(RestError::Config(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_client_without_credentials() {
        let client = KrakenRestClient::new().unwrap();
        assert!(!client.has_credentials());
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent");

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_auth_required_error() {
        let client = KrakenRestClient::new().unwrap();
        assert!(matches!(client.account(), Err(RestError::AuthRequired)));
        assert!(matches!(client.trading(), Err(RestError::AuthRequired)));
        assert!(matches!(client.funding(), Err(RestError::AuthRequired)));
    }

    #[test]
    fn test_config_from_empty_env() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.credentials.is_none());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_from_env_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("KRAKEN_API_KEY", "key"),
            ("KRAKEN_PRIVATE_KEY", "dGVzdF9wcml2YXRlX2tleQ=="),
            ("KRAKEN_REST_URL", "http://localhost:8080"),
            ("KRAKEN_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert!(config.credentials.is_some());
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_config_requires_both_keys() {
        let err = ClientConfig::from_lookup(lookup(&[("KRAKEN_API_KEY", "key")])).unwrap_err();
        assert!(matches!(err, RestError::EnvVarNotSet(ref name) if name == "KRAKEN_PRIVATE_KEY"));
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("KRAKEN_TIMEOUT_SECS", "soon")])),
            Err(RestError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("KRAKEN_REST_URL", "ftp://api.kraken.com")])),
            Err(RestError::Config(_))
        ));
    }
}
