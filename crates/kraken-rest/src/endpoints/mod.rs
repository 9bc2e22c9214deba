//! API endpoint implementations

pub mod account;
pub mod funding;
pub mod market;
pub mod trading;

pub use account::AccountEndpoints;
pub use funding::FundingEndpoints;
pub use market::MarketEndpoints;
pub use trading::TradingEndpoints;

use crate::error::{RestError, RestResult};
use crate::order::ParameterSet;

/// Every REST method this client calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // Public
    Time,
    SystemStatus,
    Assets,
    AssetPairs,
    Ticker,
    Ohlc,
    Depth,
    Trades,
    Spread,
    // Account
    Balance,
    BalanceEx,
    TradeBalance,
    OpenOrders,
    ClosedOrders,
    QueryOrders,
    TradesHistory,
    QueryTrades,
    OpenPositions,
    Ledgers,
    QueryLedgers,
    TradeVolume,
    // Trading
    AddOrder,
    AddOrderBatch,
    EditOrder,
    CancelOrder,
    CancelAll,
    CancelAllOrdersAfter,
    CancelOrderBatch,
    GetWebSocketsToken,
    // Funding
    DepositMethods,
    DepositAddresses,
    DepositStatus,
    WithdrawInfo,
    Withdraw,
    WithdrawStatus,
    WithdrawCancel,
}

impl Endpoint {
    /// Method name as it appears in the URL
    pub fn name(&self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::SystemStatus => "SystemStatus",
            Self::Assets => "Assets",
            Self::AssetPairs => "AssetPairs",
            Self::Ticker => "Ticker",
            Self::Ohlc => "OHLC",
            Self::Depth => "Depth",
            Self::Trades => "Trades",
            Self::Spread => "Spread",
            Self::Balance => "Balance",
            Self::BalanceEx => "BalanceEx",
            Self::TradeBalance => "TradeBalance",
            Self::OpenOrders => "OpenOrders",
            Self::ClosedOrders => "ClosedOrders",
            Self::QueryOrders => "QueryOrders",
            Self::TradesHistory => "TradesHistory",
            Self::QueryTrades => "QueryTrades",
            Self::OpenPositions => "OpenPositions",
            Self::Ledgers => "Ledgers",
            Self::QueryLedgers => "QueryLedgers",
            Self::TradeVolume => "TradeVolume",
            Self::AddOrder => "AddOrder",
            Self::AddOrderBatch => "AddOrderBatch",
            Self::EditOrder => "EditOrder",
            Self::CancelOrder => "CancelOrder",
            Self::CancelAll => "CancelAll",
            Self::CancelAllOrdersAfter => "CancelAllOrdersAfter",
            Self::CancelOrderBatch => "CancelOrderBatch",
            Self::GetWebSocketsToken => "GetWebSocketsToken",
            Self::DepositMethods => "DepositMethods",
            Self::DepositAddresses => "DepositAddresses",
            Self::DepositStatus => "DepositStatus",
            Self::WithdrawInfo => "WithdrawInfo",
            Self::Withdraw => "Withdraw",
            Self::WithdrawStatus => "WithdrawStatus",
            Self::WithdrawCancel => "WithdrawCancel",
        }
    }

    pub fn is_private(&self) -> bool {
        !matches!(
            self,
            Self::Time
                | Self::SystemStatus
                | Self::Assets
                | Self::AssetPairs
                | Self::Ticker
                | Self::Ohlc
                | Self::Depth
                | Self::Trades
                | Self::Spread
        )
    }

    /// URL path, e.g. `/0/public/Ticker`
    pub fn path(&self) -> &'static str {
        match self {
            Self::Time => "/0/public/Time",
            Self::SystemStatus => "/0/public/SystemStatus",
            Self::Assets => "/0/public/Assets",
            Self::AssetPairs => "/0/public/AssetPairs",
            Self::Ticker => "/0/public/Ticker",
            Self::Ohlc => "/0/public/OHLC",
            Self::Depth => "/0/public/Depth",
            Self::Trades => "/0/public/Trades",
            Self::Spread => "/0/public/Spread",
            Self::Balance => "/0/private/Balance",
            Self::BalanceEx => "/0/private/BalanceEx",
            Self::TradeBalance => "/0/private/TradeBalance",
            Self::OpenOrders => "/0/private/OpenOrders",
            Self::ClosedOrders => "/0/private/ClosedOrders",
            Self::QueryOrders => "/0/private/QueryOrders",
            Self::TradesHistory => "/0/private/TradesHistory",
            Self::QueryTrades => "/0/private/QueryTrades",
            Self::OpenPositions => "/0/private/OpenPositions",
            Self::Ledgers => "/0/private/Ledgers",
            Self::QueryLedgers => "/0/private/QueryLedgers",
            Self::TradeVolume => "/0/private/TradeVolume",
            Self::AddOrder => "/0/private/AddOrder",
            Self::AddOrderBatch => "/0/private/AddOrderBatch",
            Self::EditOrder => "/0/private/EditOrder",
            Self::CancelOrder => "/0/private/CancelOrder",
            Self::CancelAll => "/0/private/CancelAll",
            Self::CancelAllOrdersAfter => "/0/private/CancelAllOrdersAfter",
            Self::CancelOrderBatch => "/0/private/CancelOrderBatch",
            Self::GetWebSocketsToken => "/0/private/GetWebSocketsToken",
            Self::DepositMethods => "/0/private/DepositMethods",
            Self::DepositAddresses => "/0/private/DepositAddresses",
            Self::DepositStatus => "/0/private/DepositStatus",
            Self::WithdrawInfo => "/0/private/WithdrawInfo",
            Self::Withdraw => "/0/private/Withdraw",
            Self::WithdrawStatus => "/0/private/WithdrawStatus",
            Self::WithdrawCancel => "/0/private/WithdrawCancel",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Time window and offset for paginated history
///
/// `start` and `end` take a unix timestamp or a transaction id; both are exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRange {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Result offset for pagination
    pub ofs: Option<u32>,
}

impl HistoryRange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: impl ToString) -> Self {
        self.start = Some(start.to_string());
        self
    }

    pub fn end(mut self, end: impl ToString) -> Self {
        self.end = Some(end.to_string());
        self
    }

    pub fn offset(mut self, ofs: u32) -> Self {
        self.ofs = Some(ofs);
        self
    }

    pub(crate) fn apply(&self, params: &mut ParameterSet) {
        params.insert_opt("start", self.start.as_deref());
        params.insert_opt("end", self.end.as_deref());
        params.insert_opt("ofs", self.ofs);
    }
}

/// Comma-joined list parameter; rejects empty lists and lists over `max`
pub(crate) fn id_list(field: &str, ids: &[&str], max: usize) -> RestResult<String> {
    if ids.is_empty() {
        return Err(RestError::InvalidParameter(format!("`{field}` needs at least one id")));
    }
    if ids.len() > max {
        return Err(RestError::InvalidParameter(format!(
            "`{field}` takes at most {max} ids, got {}",
            ids.len()
        )));
    }
    Ok(ids.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::Ohlc.path(), "/0/public/OHLC");
        assert_eq!(Endpoint::CancelAllOrdersAfter.path(), "/0/private/CancelAllOrdersAfter");
        assert!(!Endpoint::Ticker.is_private());
        assert!(Endpoint::GetWebSocketsToken.is_private());
        assert!(Endpoint::AddOrder.path().ends_with(Endpoint::AddOrder.name()));
    }

    #[test]
    fn test_history_range() {
        let mut params = ParameterSet::new();
        HistoryRange::new().start(1688000000).offset(50).apply(&mut params);
        assert_eq!(params.get("start"), Some("1688000000"));
        assert_eq!(params.get("ofs"), Some("50"));
        assert!(!params.contains("end"));
    }

    #[test]
    fn test_id_list_bounds() {
        assert_eq!(id_list("txid", &["A", "B"], 50).unwrap(), "A,B");
        assert!(id_list("txid", &[], 50).is_err());
        assert!(id_list("txid", &["A"; 3], 2).is_err());
    }
}
