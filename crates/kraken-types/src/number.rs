//! Numeric values as Kraken sends them
//!
//! REST payloads mix JSON strings (`"50000.10000"`) and JSON numbers (`0.26`, `1688671200`)
//! for the same logical quantities. Strings are parsed directly so the exchange's scale is
//! preserved; numbers go through their textual form, falling back to `f64` only for
//! scientific notation.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Parse a decimal from a JSON string or number
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => {
            let text = n.to_string();
            if text.contains('e') || text.contains('E') {
                n.as_f64().and_then(Decimal::from_f64)
            } else {
                Decimal::from_str(&text).ok()
            }
        }
        _ => None,
    }
}

/// Parse a signed integer from a JSON number or a string holding one
pub fn integer_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a floating timestamp (`1688669448.7664`) from a JSON number or string
pub fn timestamp_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
