//! Trading endpoints for order management
//!
//! These endpoints require authentication. Parameters come from the composers in
//! [`crate::order`], so every request shape is testable without a network.

use super::Endpoint;
use crate::client::KrakenRestClient;
use crate::error::{RestError, RestResult};
use crate::order::{
    compose_batch, compose_cancel, compose_cancel_batch, compose_edit, compose_order,
    BatchRequest, EditRequest, OrderId, OrderRequest, ParameterSet,
};
use crate::transport::Transport;
use crate::types::{
    AddOrderResult, BatchOutcome, CancelAfterResult, CancelResult, EditOrderResult,
    WebSocketToken,
};
use tracing::{debug, info, instrument, warn};

/// Longest dead man's switch the exchange accepts, in seconds
pub const MAX_CANCEL_AFTER_SECS: u64 = 86_400;

/// Most orders one `CancelOrderBatch` call accepts
pub const MAX_CANCEL_BATCH: usize = 50;

/// Trading endpoints for order management
pub struct TradingEndpoints<'a, T: Transport> {
    client: &'a KrakenRestClient<T>,
}

impl<'a, T: Transport> TradingEndpoints<'a, T> {
    pub fn new(client: &'a KrakenRestClient<T>) -> Self {
        Self { client }
    }

    /// Place a new order
    #[instrument(skip(self, order), fields(pair = %order.pair, side = %order.side, ordertype = %order.variant))]
    pub async fn add_order(&self, order: &OrderRequest) -> RestResult<AddOrderResult> {
        let params = compose_order(order)?;
        let result: AddOrderResult = self.client.call(Endpoint::AddOrder, params).await?;

        if result.is_validation_only() {
            debug!("Order validated, not submitted");
        } else {
            info!(txid = ?result.txid, "Order placed");
        }
        Ok(result)
    }

    /// Place up to 15 orders on one pair
    ///
    /// The result holds one entry per submitted order, each either a txid or a per-order error.
    #[instrument(skip(self, batch), fields(pair = %batch.pair, count = batch.orders.len()))]
    pub async fn add_order_batch(&self, batch: &BatchRequest) -> RestResult<BatchOutcome> {
        let params = compose_batch(batch)?;
        let outcome: BatchOutcome = self.client.call(Endpoint::AddOrderBatch, params).await?;

        let failed = outcome.errors();
        if !failed.is_empty() {
            warn!(failed = failed.len(), "Some batch orders were rejected");
        }
        Ok(outcome)
    }

    /// Amend an open order
    #[instrument(skip(self, edit), fields(id = %edit.id))]
    pub async fn edit_order(&self, edit: &EditRequest) -> RestResult<EditOrderResult> {
        let params = compose_edit(edit)?;
        let result: EditOrderResult = self.client.call(Endpoint::EditOrder, params).await?;

        if !result.is_ok() {
            warn!(status = %result.status, "Order edit not applied");
        }
        Ok(result)
    }

    /// Cancel an order by transaction id or user reference
    #[instrument(skip(self, id))]
    pub async fn cancel_order(&self, id: impl Into<OrderId>) -> RestResult<CancelResult> {
        let id = id.into();
        debug!(%id, "Cancelling order");
        self.client.call(Endpoint::CancelOrder, compose_cancel(&id)).await
    }

    /// Cancel all open orders
    #[instrument(skip(self))]
    pub async fn cancel_all(&self) -> RestResult<CancelResult> {
        let result: CancelResult = self.client.call(Endpoint::CancelAll, ParameterSet::new()).await?;
        info!(count = result.count, "Cancelled all orders");
        Ok(result)
    }

    /// Arm, refresh or disarm (`0`) the dead man's switch
    #[instrument(skip(self))]
    pub async fn cancel_all_after(&self, timeout_secs: u64) -> RestResult<CancelAfterResult> {
        if timeout_secs > MAX_CANCEL_AFTER_SECS {
            return Err(RestError::InvalidParameter(format!(
                "cancel-after timeout {timeout_secs}s exceeds {MAX_CANCEL_AFTER_SECS}s"
            )));
        }
        let params = ParameterSet::new().with("timeout", timeout_secs.to_string());
        self.client.call(Endpoint::CancelAllOrdersAfter, params).await
    }

    /// Cancel several orders at once
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn cancel_order_batch(&self, ids: &[OrderId]) -> RestResult<CancelResult> {
        if ids.len() > MAX_CANCEL_BATCH {
            return Err(RestError::InvalidParameter(format!(
                "at most {MAX_CANCEL_BATCH} orders per cancel batch, got {}",
                ids.len()
            )));
        }
        let params = compose_cancel_batch(ids)?;
        self.client.call(Endpoint::CancelOrderBatch, params).await
    }

    /// Get a token for the authenticated WebSocket feeds
    #[instrument(skip(self))]
    pub async fn get_websocket_token(&self) -> RestResult<WebSocketToken> {
        self.client.call(Endpoint::GetWebSocketsToken, ParameterSet::new()).await
    }
}
