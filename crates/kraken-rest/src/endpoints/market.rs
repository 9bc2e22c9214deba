//! Public market data endpoints
//!
//! These endpoints don't require authentication.

use super::Endpoint;
use crate::client::KrakenRestClient;
use crate::error::{RestError, RestResult};
use crate::order::ParameterSet;
use crate::transport::Transport;
use crate::types::{
    AssetInfo, AssetPair, Candle, MarketQuote, OrderBook, PublicTrade, Series, SpreadEntry,
    ServerTime, SystemStatus,
};
use tracing::{debug, instrument};

/// Candle intervals the exchange accepts, in minutes
pub const OHLC_INTERVALS: [u32; 9] = [1, 5, 15, 30, 60, 240, 1440, 10080, 21600];

/// Public market data endpoints
pub struct MarketEndpoints<'a, T: Transport> {
    client: &'a KrakenRestClient<T>,
}

impl<'a, T: Transport> MarketEndpoints<'a, T> {
    pub fn new(client: &'a KrakenRestClient<T>) -> Self {
        Self { client }
    }

    /// Get server time
    #[instrument(skip(self))]
    pub async fn get_server_time(&self) -> RestResult<ServerTime> {
        debug!("Fetching server time");
        self.client.call(Endpoint::Time, ParameterSet::new()).await
    }

    /// Get system status
    #[instrument(skip(self))]
    pub async fn get_system_status(&self) -> RestResult<SystemStatus> {
        debug!("Fetching system status");
        self.client.call(Endpoint::SystemStatus, ParameterSet::new()).await
    }

    /// Get asset info, in the order the exchange lists them
    ///
    /// # Arguments
    /// * `assets` - Optional list of assets to get info for (e.g., ["XBT", "ETH"])
    #[instrument(skip(self))]
    pub async fn get_assets(&self, assets: Option<&[&str]>) -> RestResult<Vec<AssetInfo>> {
        let mut params = ParameterSet::new();
        params.insert_opt("asset", assets.map(|a| a.join(",")));
        self.client.call(Endpoint::Assets, params).await
    }

    /// Get tradable asset pairs
    ///
    /// # Arguments
    /// * `pairs` - Optional list of pairs to get info for (e.g., ["XBTUSD", "ETHUSD"])
    #[instrument(skip(self))]
    pub async fn get_asset_pairs(&self, pairs: Option<&[&str]>) -> RestResult<Vec<AssetPair>> {
        let mut params = ParameterSet::new();
        params.insert_opt("pair", pairs.map(|p| p.join(",")));
        self.client.call(Endpoint::AssetPairs, params).await
    }

    /// Get ticker information for one pair
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, pair: &str) -> RestResult<MarketQuote> {
        self.get_tickers(&[pair])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RestError::schema("ticker", format!("no ticker returned for {pair}")))
    }

    /// Get ticker information for multiple pairs
    #[instrument(skip(self))]
    pub async fn get_tickers(&self, pairs: &[&str]) -> RestResult<Vec<MarketQuote>> {
        debug!("Fetching tickers for {} pairs", pairs.len());
        let params = ParameterSet::new().with("pair", pairs.join(","));
        self.client.call(Endpoint::Ticker, params).await
    }

    /// Get orderbook depth
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD")
    /// * `count` - Maximum number of asks/bids (1-500, default 100)
    #[instrument(skip(self))]
    pub async fn get_orderbook(&self, pair: &str, count: Option<u16>) -> RestResult<OrderBook> {
        let mut params = ParameterSet::new().with("pair", pair);
        params.insert_opt("count", count.map(|c| c.clamp(1, 500)));

        let books: Vec<OrderBook> = self.client.call(Endpoint::Depth, params).await?;
        books
            .into_iter()
            .next()
            .ok_or_else(|| RestError::schema("order book", format!("no book returned for {pair}")))
    }

    /// Get recent trades
    ///
    /// # Arguments
    /// * `since` - Cursor from a previous call's `last` (optional)
    /// * `count` - Number of trades to return (optional, max 1000)
    #[instrument(skip(self))]
    pub async fn get_recent_trades(
        &self,
        pair: &str,
        since: Option<&str>,
        count: Option<u16>,
    ) -> RestResult<Series<PublicTrade>> {
        let mut params = ParameterSet::new().with("pair", pair);
        params.insert_opt("since", since);
        params.insert_opt("count", count.map(|c| c.clamp(1, 1000)));
        self.client.call(Endpoint::Trades, params).await
    }

    /// Get recent spread data
    #[instrument(skip(self))]
    pub async fn get_recent_spreads(
        &self,
        pair: &str,
        since: Option<u64>,
    ) -> RestResult<Series<SpreadEntry>> {
        let mut params = ParameterSet::new().with("pair", pair);
        params.insert_opt("since", since);
        self.client.call(Endpoint::Spread, params).await
    }

    /// Get OHLC data
    ///
    /// # Arguments
    /// * `interval` - Candle width in minutes, one of [`OHLC_INTERVALS`]
    /// * `since` - Return candles since this timestamp (optional)
    #[instrument(skip(self))]
    pub async fn get_ohlc(
        &self,
        pair: &str,
        interval: Option<u32>,
        since: Option<u64>,
    ) -> RestResult<Series<Candle>> {
        if let Some(interval) = interval {
            if !OHLC_INTERVALS.contains(&interval) {
                return Err(RestError::InvalidParameter(format!(
                    "unsupported OHLC interval {interval}"
                )));
            }
        }

        let mut params = ParameterSet::new().with("pair", pair);
        params.insert_opt("interval", interval);
        params.insert_opt("since", since);
        self.client.call(Endpoint::Ohlc, params).await
    }
}
