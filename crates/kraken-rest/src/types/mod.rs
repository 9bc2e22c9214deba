//! Decoded response entities
//!
//! Grouped the same way as the endpoint views: market data, account, trading and funding.

pub mod account;
pub mod funding;
pub mod market;
pub mod trading;

pub use account::*;
pub use funding::*;
pub use market::*;
pub use trading::*;

use crate::error::{RestError, RestResult};
use kraken_types::{decimal_from_value, integer_from_value};
use rust_decimal::Decimal;
use serde_json::Value;

/// Fee value recorded when the exchange omits `fee`
pub const ABSENT_FEE: Decimal = Decimal::NEGATIVE_ONE;

/// Read an optional `fee` member, substituting [`ABSENT_FEE`] when missing
pub(crate) fn fee_or_absent(kind: &'static str, fee: Option<&Value>) -> RestResult<Decimal> {
    match fee {
        None | Some(Value::Null) => Ok(ABSENT_FEE),
        Some(raw) => decimal_from_value(raw)
            .ok_or_else(|| RestError::schema(kind, "`fee` is not a decimal")),
    }
}

/// Read an optional decimal member; unparsable text is a schema error
pub(crate) fn optional_decimal(
    kind: &'static str,
    field: &str,
    raw: Option<&Value>,
) -> RestResult<Option<Decimal>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(v) => decimal_from_value(v)
            .map(Some)
            .ok_or_else(|| RestError::schema(kind, format!("`{field}` is not a decimal"))),
    }
}

/// Read an optional integer member; unparsable text is a schema error
pub(crate) fn optional_integer(
    kind: &'static str,
    field: &str,
    raw: Option<&Value>,
) -> RestResult<Option<i64>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(v) => integer_from_value(v)
            .map(Some)
            .ok_or_else(|| RestError::schema(kind, format!("`{field}` is not an integer"))),
    }
}

/// Kraken reports unset timestamps as `0`
pub(crate) fn nonzero_time(raw: Option<f64>) -> Option<f64> {
    raw.filter(|t| *t != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fee_sentinel() {
        assert_eq!(fee_or_absent("trade", None).unwrap(), ABSENT_FEE);
        assert_eq!(fee_or_absent("trade", Some(&json!(null))).unwrap(), ABSENT_FEE);
        assert_eq!(fee_or_absent("trade", Some(&json!("0.26"))).unwrap().to_string(), "0.26");
        assert!(fee_or_absent("trade", Some(&json!("n/a"))).is_err());
    }

    #[test]
    fn test_optional_members_reject_bad_text() {
        assert_eq!(optional_decimal("pair", "ordermin", None).unwrap(), None);
        assert!(matches!(
            optional_decimal("pair", "ordermin", Some(&json!("n/a"))),
            Err(RestError::SchemaMismatch { .. })
        ));
        let id = optional_integer("trade", "id", Some(&json!(61044952))).unwrap();
        assert_eq!(id, Some(61044952));
        assert_eq!(optional_integer("trade", "id", Some(&json!(null))).unwrap(), None);
        assert!(matches!(
            optional_integer("trade", "id", Some(&json!("abc"))),
            Err(RestError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_time_is_unset() {
        assert_eq!(nonzero_time(Some(0.0)), None);
        assert_eq!(nonzero_time(Some(1688666559.8974)), Some(1688666559.8974));
    }
}
