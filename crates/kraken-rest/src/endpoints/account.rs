//! Private account endpoints
//!
//! These endpoints require authentication.

use super::{id_list, Endpoint, HistoryRange};
use crate::client::KrakenRestClient;
use crate::error::RestResult;
use crate::order::ParameterSet;
use crate::transport::Transport;
use crate::types::{
    Balances, ClosedOrders, ExtendedBalance, LedgerEntry, LedgerPage, OpenOrders, OrderInfo,
    Position, TradeBalance, TradeEntry, TradeHistory, TradeVolume,
};
use tracing::{debug, instrument};

/// Most ids a single query call accepts
const MAX_QUERY_IDS: usize = 50;

/// Most ledger ids a single `QueryLedgers` call accepts
const MAX_LEDGER_IDS: usize = 20;

/// Private account endpoints
pub struct AccountEndpoints<'a, T: Transport> {
    client: &'a KrakenRestClient<T>,
}

impl<'a, T: Transport> AccountEndpoints<'a, T> {
    pub fn new(client: &'a KrakenRestClient<T>) -> Self {
        Self { client }
    }

    /// Get account balance
    #[instrument(skip(self))]
    pub async fn get_balance(&self) -> RestResult<Balances> {
        self.client.call(Endpoint::Balance, ParameterSet::new()).await
    }

    /// Get extended balance with hold amounts
    #[instrument(skip(self))]
    pub async fn get_extended_balance(&self) -> RestResult<Vec<ExtendedBalance>> {
        self.client.call(Endpoint::BalanceEx, ParameterSet::new()).await
    }

    /// Get trade balance (margin info)
    ///
    /// # Arguments
    /// * `asset` - Base asset for calculations (default: "ZUSD")
    #[instrument(skip(self))]
    pub async fn get_trade_balance(&self, asset: Option<&str>) -> RestResult<TradeBalance> {
        let mut params = ParameterSet::new();
        params.insert_opt("asset", asset);
        self.client.call(Endpoint::TradeBalance, params).await
    }

    /// Get open orders
    ///
    /// # Arguments
    /// * `trades` - Include trade info
    /// * `userref` - Filter by user reference
    #[instrument(skip(self))]
    pub async fn get_open_orders(
        &self,
        trades: Option<bool>,
        userref: Option<i32>,
    ) -> RestResult<OpenOrders> {
        let mut params = ParameterSet::new();
        params.insert_opt("trades", trades);
        params.insert_opt("userref", userref);

        let open: OpenOrders = self.client.call(Endpoint::OpenOrders, params).await?;
        debug!(count = open.orders.len(), "Fetched open orders");
        Ok(open)
    }

    /// Get closed orders, newest first, fifty per page
    #[instrument(skip(self))]
    pub async fn get_closed_orders(
        &self,
        range: &HistoryRange,
        trades: Option<bool>,
        userref: Option<i32>,
    ) -> RestResult<ClosedOrders> {
        let mut params = ParameterSet::new();
        params.insert_opt("trades", trades);
        params.insert_opt("userref", userref);
        range.apply(&mut params);
        self.client.call(Endpoint::ClosedOrders, params).await
    }

    /// Query specific orders by transaction id
    #[instrument(skip(self))]
    pub async fn query_orders(
        &self,
        txids: &[&str],
        trades: Option<bool>,
    ) -> RestResult<Vec<OrderInfo>> {
        let mut params = ParameterSet::new().with("txid", id_list("txid", txids, MAX_QUERY_IDS)?);
        params.insert_opt("trades", trades);
        self.client.call(Endpoint::QueryOrders, params).await
    }

    /// Get trade history
    #[instrument(skip(self))]
    pub async fn get_trades_history(&self, range: &HistoryRange) -> RestResult<TradeHistory> {
        let mut params = ParameterSet::new();
        range.apply(&mut params);
        self.client.call(Endpoint::TradesHistory, params).await
    }

    /// Query specific trades by transaction id
    #[instrument(skip(self))]
    pub async fn query_trades(&self, txids: &[&str]) -> RestResult<Vec<TradeEntry>> {
        let params = ParameterSet::new().with("txid", id_list("txid", txids, MAX_QUERY_IDS)?);
        self.client.call(Endpoint::QueryTrades, params).await
    }

    /// Get open margin positions
    ///
    /// # Arguments
    /// * `txids` - Restrict to these positions (empty for all)
    /// * `docalcs` - Include profit/loss calculations
    #[instrument(skip(self))]
    pub async fn get_open_positions(
        &self,
        txids: &[&str],
        docalcs: bool,
    ) -> RestResult<Vec<Position>> {
        let mut params = ParameterSet::new();
        if !txids.is_empty() {
            params.insert("txid", id_list("txid", txids, MAX_QUERY_IDS)?);
        }
        if docalcs {
            params.insert("docalcs", "true");
        }
        self.client.call(Endpoint::OpenPositions, params).await
    }

    /// Get ledger entries
    ///
    /// # Arguments
    /// * `assets` - Restrict to these assets (empty for all)
    /// * `kind` - Entry type filter, e.g. "trade" or "deposit"
    #[instrument(skip(self))]
    pub async fn get_ledgers(
        &self,
        range: &HistoryRange,
        assets: &[&str],
        kind: Option<&str>,
    ) -> RestResult<LedgerPage> {
        let mut params = ParameterSet::new();
        if !assets.is_empty() {
            params.insert("asset", assets.join(","));
        }
        params.insert_opt("type", kind);
        range.apply(&mut params);
        self.client.call(Endpoint::Ledgers, params).await
    }

    /// Query specific ledger entries
    #[instrument(skip(self))]
    pub async fn query_ledgers(&self, ids: &[&str]) -> RestResult<Vec<LedgerEntry>> {
        let params = ParameterSet::new().with("id", id_list("id", ids, MAX_LEDGER_IDS)?);
        self.client.call(Endpoint::QueryLedgers, params).await
    }

    /// Get 30-day volume and fee tiers
    ///
    /// # Arguments
    /// * `pairs` - Pairs to report fee tiers for (empty for volume only)
    #[instrument(skip(self))]
    pub async fn get_trade_volume(&self, pairs: &[&str]) -> RestResult<TradeVolume> {
        let mut params = ParameterSet::new();
        if !pairs.is_empty() {
            params.insert("pair", pairs.join(","));
        }
        self.client.call(Endpoint::TradeVolume, params).await
    }
}
