//! Trading results: placement, edits, cancellation and batches

use crate::decode::{from_wire, Decode};
use crate::error::RestResult;
use serde::Deserialize;
use serde_json::Value;

/// Order summary text returned on placement
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderSummary {
    /// Order description
    pub order: String,
    /// Close order description (if applicable)
    pub close: Option<String>,
}

/// Response from placing an order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddOrderResult {
    pub descr: OrderSummary,
    /// Empty when the request was validate-only
    #[serde(default)]
    pub txid: Vec<String>,
}

impl AddOrderResult {
    pub fn is_validation_only(&self) -> bool {
        self.txid.is_empty()
    }
}

impl Decode for AddOrderResult {
    const KIND: &'static str = "add order";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// Response from editing an order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditOrderResult {
    /// `ok` or `err`
    pub status: String,
    /// New transaction id
    pub txid: Option<String>,
    pub originaltxid: Option<String>,
    pub descr: Option<OrderSummary>,
    pub volume: Option<String>,
    pub price: Option<String>,
    /// Secondary price as echoed, including any offset prefix
    pub price2: Option<String>,
    pub orders_cancelled: Option<u32>,
    pub error_message: Option<String>,
}

impl EditOrderResult {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

impl Decode for EditOrderResult {
    const KIND: &'static str = "edit order";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// Cancel order result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CancelResult {
    /// Number of orders cancelled
    pub count: u32,
    /// Whether cancel is pending
    #[serde(default)]
    pub pending: bool,
}

impl Decode for CancelResult {
    const KIND: &'static str = "cancel";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// Dead man's switch state
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAfterResult {
    pub current_time: String,
    /// `1970-01-01T00:00:00Z` when the timer is disabled
    pub trigger_time: String,
}

impl Decode for CancelAfterResult {
    const KIND: &'static str = "cancel all after";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// One order's outcome within a batch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchOrderEntry {
    pub descr: Option<OrderSummary>,
    pub txid: Option<String>,
    /// Per-order error text, verbatim
    pub error: Option<String>,
}

impl BatchOrderEntry {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.txid.is_some()
    }
}

impl Decode for BatchOrderEntry {
    const KIND: &'static str = "batch entry";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// Decoded order-batch response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// One entry per submitted order, in submission order
    Orders(Vec<BatchOrderEntry>),
    /// Payload without an `orders` array
    Single(AddOrderResult),
}

impl BatchOutcome {
    /// Transaction ids of every accepted order
    pub fn txids(&self) -> Vec<&str> {
        match self {
            Self::Orders(entries) => entries.iter().filter_map(|e| e.txid.as_deref()).collect(),
            Self::Single(result) => result.txid.iter().map(String::as_str).collect(),
        }
    }

    /// Per-order errors, in submission order
    pub fn errors(&self) -> Vec<&str> {
        match self {
            Self::Orders(entries) => entries.iter().filter_map(|e| e.error.as_deref()).collect(),
            Self::Single(_) => Vec::new(),
        }
    }
}

/// WebSocket authentication token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebSocketToken {
    pub token: String,
    /// Seconds until the token expires if unused
    pub expires: u64,
}

impl Decode for WebSocketToken {
    const KIND: &'static str = "websocket token";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RestError;
    use serde_json::json;

    #[test]
    fn test_add_order_validate_only() {
        let result = AddOrderResult::decode(&json!({
            "descr": {"order": "buy 1.45 XBTUSD @ limit 27500.0"}
        }))
        .unwrap();
        assert!(result.is_validation_only());
    }

    #[test]
    fn test_edit_result() {
        let result = EditOrderResult::decode(&json!({
            "status": "ok",
            "txid": "OFVXHJ-KPQ3B-VS7ELA",
            "originaltxid": "OHYO67-6LP66-HMQ437",
            "volume": "0.00030000",
            "price": "19500.0",
            "price2": "+10.5",
            "orders_cancelled": 1,
            "descr": {"order": "buy 0.00030000 XXBTZGBP @ limit 19500.0"}
        }))
        .unwrap();
        assert!(result.is_ok());
        assert_eq!(result.price2.as_deref(), Some("+10.5"));
    }

    #[test]
    fn test_cancel_after() {
        let result = CancelAfterResult::decode(&json!({
            "currentTime": "2023-03-24T17:41:56Z",
            "triggerTime": "2023-03-24T17:42:56Z"
        }))
        .unwrap();
        assert_eq!(result.trigger_time, "2023-03-24T17:42:56Z");
    }

    #[test]
    fn test_mixed_batch_outcome() {
        let outcome = BatchOutcome::Orders(vec![
            BatchOrderEntry {
                descr: Some(OrderSummary::default()),
                txid: Some("OUF4EM-FRGI2-MQMWZD".to_string()),
                error: None,
            },
            BatchOrderEntry {
                descr: None,
                txid: None,
                error: Some("EOrder:Insufficient funds".to_string()),
            },
        ]);
        assert_eq!(outcome.txids(), vec!["OUF4EM-FRGI2-MQMWZD"]);
        assert_eq!(outcome.errors(), vec!["EOrder:Insufficient funds"]);
    }

    #[test]
    fn test_wrong_shape() {
        let err = CancelResult::decode(&json!({"count": "many"})).unwrap_err();
        assert!(matches!(err, RestError::SchemaMismatch { entity: "cancel", .. }));
    }
}
