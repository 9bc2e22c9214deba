//! Deposit and withdrawal endpoints
//!
//! These endpoints require authentication, and withdrawals need a key with funding permissions.

use super::Endpoint;
use crate::assemble::Sequence;
use crate::client::KrakenRestClient;
use crate::error::{RestError, RestResult};
use crate::order::ParameterSet;
use crate::transport::Transport;
use crate::types::{
    DepositAddress, DepositMethod, TransferHistory, WithdrawInfo, WithdrawalRef,
};
use rust_decimal::Decimal;
use tracing::{info, instrument};

/// Deposit and withdrawal endpoints
pub struct FundingEndpoints<'a, T: Transport> {
    client: &'a KrakenRestClient<T>,
}

impl<'a, T: Transport> FundingEndpoints<'a, T> {
    pub fn new(client: &'a KrakenRestClient<T>) -> Self {
        Self { client }
    }

    /// Get the deposit methods available for an asset
    #[instrument(skip(self))]
    pub async fn get_deposit_methods(&self, asset: &str) -> RestResult<Vec<DepositMethod>> {
        let params = ParameterSet::new().with("asset", asset);
        let methods: Sequence<DepositMethod> =
            self.client.call(Endpoint::DepositMethods, params).await?;
        Ok(methods.into_inner())
    }

    /// Get deposit addresses, optionally generating a fresh one
    #[instrument(skip(self))]
    pub async fn get_deposit_addresses(
        &self,
        asset: &str,
        method: &str,
        new: bool,
    ) -> RestResult<Vec<DepositAddress>> {
        let mut params = ParameterSet::new().with("asset", asset).with("method", method);
        if new {
            params.insert("new", "true");
        }
        let addresses: Sequence<DepositAddress> =
            self.client.call(Endpoint::DepositAddresses, params).await?;
        Ok(addresses.into_inner())
    }

    /// Get the status of recent deposits
    #[instrument(skip(self))]
    pub async fn get_deposit_status(
        &self,
        asset: Option<&str>,
        method: Option<&str>,
    ) -> RestResult<TransferHistory> {
        let mut params = ParameterSet::new();
        params.insert_opt("asset", asset);
        params.insert_opt("method", method);
        self.client.call(Endpoint::DepositStatus, params).await
    }

    /// Quote a withdrawal to a stored key
    ///
    /// # Arguments
    /// * `key` - Withdrawal key name as set up in the account
    #[instrument(skip(self))]
    pub async fn get_withdraw_info(
        &self,
        asset: &str,
        key: &str,
        amount: Decimal,
    ) -> RestResult<WithdrawInfo> {
        let params = withdraw_params(asset, key, amount)?;
        self.client.call(Endpoint::WithdrawInfo, params).await
    }

    /// Withdraw funds to a stored key
    #[instrument(skip(self))]
    pub async fn withdraw(&self, asset: &str, key: &str, amount: Decimal) -> RestResult<WithdrawalRef> {
        let params = withdraw_params(asset, key, amount)?;
        let reference: WithdrawalRef = self.client.call(Endpoint::Withdraw, params).await?;
        info!(refid = %reference.refid, "Withdrawal submitted");
        Ok(reference)
    }

    /// Get the status of recent withdrawals
    #[instrument(skip(self))]
    pub async fn get_withdraw_status(
        &self,
        asset: Option<&str>,
        method: Option<&str>,
    ) -> RestResult<TransferHistory> {
        let mut params = ParameterSet::new();
        params.insert_opt("asset", asset);
        params.insert_opt("method", method);
        self.client.call(Endpoint::WithdrawStatus, params).await
    }

    /// Request cancellation of a pending withdrawal
    ///
    /// Returns whether the exchange accepted the request; the withdrawal may still complete.
    #[instrument(skip(self))]
    pub async fn cancel_withdrawal(&self, asset: &str, refid: &str) -> RestResult<bool> {
        let params = ParameterSet::new().with("asset", asset).with("refid", refid);
        self.client.call(Endpoint::WithdrawCancel, params).await
    }
}

fn withdraw_params(asset: &str, key: &str, amount: Decimal) -> RestResult<ParameterSet> {
    if amount <= Decimal::ZERO {
        return Err(RestError::InvalidParameter(format!(
            "withdrawal amount must be positive, got {amount}"
        )));
    }
    Ok(ParameterSet::new()
        .with("asset", asset)
        .with("key", key)
        .with("amount", amount.to_string()))
}
