//! Collection assembly
//!
//! Turns keyed JSON objects and arrays into collections of decoded entities. Keyed objects keep
//! the order the exchange sent them in when assembled into a `Vec`.

use crate::decode::{object, positional, Decode, DecodeKeyed};
use crate::error::{RestError, RestResult};
use crate::types::{AddOrderResult, BatchOrderEntry, BatchOutcome};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Decode every member of a keyed object, threading each key into its entity
pub fn keyed_list<T: DecodeKeyed>(value: &Value) -> RestResult<Vec<T>> {
    object(T::KIND, value)?
        .iter()
        .map(|(id, body)| T::decode_keyed(id, body))
        .collect()
}

/// Decode a keyed object into a map from key to entity
pub fn keyed_map<T: DecodeKeyed>(value: &Value) -> RestResult<HashMap<String, T>> {
    object(T::KIND, value)?
        .iter()
        .map(|(id, body)| Ok((id.clone(), T::decode_keyed(id, body)?)))
        .collect()
}

/// Decode the keyed object found under `key`, e.g. `{"open": {...}}`
pub fn keyed_list_under<T: DecodeKeyed>(value: &Value, key: &str) -> RestResult<Vec<T>> {
    let fields = object(T::KIND, value)?;
    match fields.get(key) {
        Some(inner) => keyed_list(inner),
        None => Err(RestError::schema(T::KIND, format!("missing `{key}` collection"))),
    }
}

/// Decode every element of a JSON array
pub fn array_list<T: Decode>(value: &Value) -> RestResult<Vec<T>> {
    positional(T::KIND, value, 0)?.iter().map(T::decode).collect()
}

/// Optional `count` member reported alongside paginated collections
pub fn count_of(value: &Value) -> Option<u64> {
    value.get("count").and_then(Value::as_u64)
}

/// Decode an order-batch response
///
/// A payload carrying an `orders` array yields one entry per submitted order, each either a
/// success or a per-order error. Anything else is read as a single order result.
pub fn batch_outcome(value: &Value) -> RestResult<BatchOutcome> {
    match value.get("orders") {
        Some(orders @ Value::Array(_)) => {
            let entries: Vec<BatchOrderEntry> = array_list(orders)?;
            debug!(count = entries.len(), "Decoded batch entries");
            Ok(BatchOutcome::Orders(entries))
        }
        _ => {
            debug!("Batch response has no orders array, reading as single result");
            AddOrderResult::decode(value).map(BatchOutcome::Single)
        }
    }
}

/// A JSON array of entities, in array order
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence<T>(pub Vec<T>);

impl<T> Sequence<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T: Decode> Decode for Sequence<T> {
    const KIND: &'static str = T::KIND;

    fn decode(value: &Value) -> RestResult<Self> {
        array_list(value).map(Self)
    }
}

impl<T: DecodeKeyed> Decode for Vec<T> {
    const KIND: &'static str = T::KIND;

    fn decode(value: &Value) -> RestResult<Self> {
        keyed_list(value)
    }
}

impl<T: DecodeKeyed> Decode for HashMap<String, T> {
    const KIND: &'static str = T::KIND;

    fn decode(value: &Value) -> RestResult<Self> {
        keyed_map(value)
    }
}

impl Decode for BatchOutcome {
    const KIND: &'static str = "order batch";

    fn decode(value: &Value) -> RestResult<Self> {
        batch_outcome(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerEntry;
    use serde_json::json;

    fn ledger(amount: &str) -> Value {
        json!({
            "refid": "TJKLXX-PGMUI-4NTLXU",
            "time": 1688464484.1787,
            "type": "trade",
            "subtype": "",
            "aclass": "currency",
            "asset": "ZGBP",
            "amount": amount,
            "fee": "0.0000",
            "balance": "1.0000"
        })
    }

    #[test]
    fn test_keyed_list_keeps_source_order() {
        let value = json!({
            "LZZZZZ-AAAAA-000001": ledger("1.0"),
            "LAAAAA-AAAAA-000002": ledger("2.0"),
            "LMMMMM-AAAAA-000003": ledger("3.0"),
        });
        let entries: Vec<LedgerEntry> = keyed_list(&value).unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            ["LZZZZZ-AAAAA-000001", "LAAAAA-AAAAA-000002", "LMMMMM-AAAAA-000003"]
        );
    }

    #[test]
    fn test_keyed_map() {
        let value = json!({"L4UESK-KG3EQ-UFO4L4": ledger("-0.5")});
        let entries: HashMap<String, LedgerEntry> = keyed_map(&value).unwrap();
        assert_eq!(entries["L4UESK-KG3EQ-UFO4L4"].id, "L4UESK-KG3EQ-UFO4L4");
    }

    #[test]
    fn test_keyed_list_under_missing_key() {
        let err = keyed_list_under::<LedgerEntry>(&json!({"count": 0}), "ledger").unwrap_err();
        assert!(matches!(err, RestError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_empty_collections() {
        let entries: Vec<LedgerEntry> = keyed_list_under(&json!({"ledger": {}}), "ledger").unwrap();
        assert!(entries.is_empty());
        assert_eq!(count_of(&json!({"ledger": {}, "count": 0})), Some(0));
    }

    #[test]
    fn test_batch_with_orders() {
        let value = json!({
            "orders": [
                {"descr": {"order": "buy 0.1 XBTUSD @ limit 30000.0"}, "txid": "OUF4EM-FRGI2-MQMWZD"},
                {"error": "EOrder:Insufficient funds"}
            ]
        });
        let BatchOutcome::Orders(entries) = batch_outcome(&value).unwrap() else {
            panic!("expected per-order entries");
        };
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_success());
        assert_eq!(entries[1].error.as_deref(), Some("EOrder:Insufficient funds"));
    }

    #[test]
    fn test_batch_without_orders_is_single_result() {
        let value = json!({
            "descr": {"order": "buy 1.0 XBTUSD @ market"},
            "txid": ["OUF4EM-FRGI2-MQMWZD"]
        });
        let BatchOutcome::Single(result) = batch_outcome(&value).unwrap() else {
            panic!("expected single result");
        };
        assert_eq!(result.txid, vec!["OUF4EM-FRGI2-MQMWZD".to_string()]);
    }
}
