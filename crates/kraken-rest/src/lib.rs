//! REST API client for Kraken cryptocurrency exchange
//!
//! This crate covers the request/response core of Kraken's spot REST API: market data,
//! account queries, order placement and funding.
//!
//! # Features
//!
//! - **Return formats**: every call can hand back the raw body, a parsed JSON tree, or a typed
//!   entity ([`ReturnFormat`])
//! - **Decoding**: keyed objects, positional arrays and id-keyed maps become typed entities with
//!   the map key injected as the entity id ([`Decode`], [`DecodeKeyed`])
//! - **Order composition**: the six order variants, edits, batches and cancels become ordered
//!   [`ParameterSet`]s ([`order`])
//! - **Batches and lists**: keyed collections keep server order; batch responses resolve to
//!   per-order outcomes ([`assemble`])
//!
//! # Authentication
//!
//! Private endpoints require API credentials. Requests are signed with HMAC-SHA512 over the
//! URI path and the SHA-256 of nonce plus POST data, as Kraken documents.
//!
//! # Example
//!
//! ```no_run
//! use kraken_rest::{ClientConfig, Credentials, KrakenRestClient};
//! use kraken_rest::order::OrderRequest;
//! use kraken_types::{Decimal, Side};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = KrakenRestClient::new()?;
//!     let quote = client.get_ticker("XBTUSD").await?;
//!     println!("XBT/USD mid: {}", quote.mid_price());
//!
//!     // Private endpoints (auth required)
//!     let auth_client = KrakenRestClient::with_credentials(Credentials::from_env()?)?;
//!     let balances = auth_client.get_balance().await?;
//!     println!("Balances: {:?}", balances.non_zero());
//!
//!     let order = OrderRequest::limit("XBTUSD", Side::Buy, Decimal::new(1, 2), Decimal::new(30000, 0))
//!         .post_only()
//!         .validate_only();
//!     let result = auth_client.add_order(&order).await?;
//!     println!("{}", result.descr.order);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! The client does not throttle or retry. A `429` surfaces as [`RestError::RateLimited`] and
//! exchange errors carry a [`RestError::recovery_strategy`] for the caller to act on.

pub mod assemble;
pub mod auth;
pub mod client;
pub mod decode;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod format;
pub mod order;
pub mod transport;
pub mod types;

// Re-export main types
pub use auth::Credentials;
pub use client::{ClientConfig, KrakenRestClient};
pub use decode::{Decode, DecodeKeyed};
pub use endpoints::{Endpoint, HistoryRange};
pub use error::{RestError, RestResult};
pub use format::{Response, ReturnFormat};
pub use order::{BatchRequest, EditRequest, OrderId, OrderRequest, ParameterSet};
pub use transport::{HttpTransport, Transport};

// Re-export entity types
pub use types::{
    // Market data
    AssetInfo, AssetPair, Candle, MarketQuote, OrderBook, PublicTrade, Series, ServerTime,
    SpreadEntry, SystemStatus,
    // Account
    Balances, LedgerEntry, OrderInfo, Position, TradeBalance, TradeEntry,
    // Trading
    AddOrderResult, BatchOrderEntry, BatchOutcome, CancelResult, EditOrderResult,
    // Sentinels
    ABSENT_FEE,
};
