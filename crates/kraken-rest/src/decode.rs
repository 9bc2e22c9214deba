//! Response decoding
//!
//! Kraken results come in three shapes: keyed objects (`{"XXBT": "0.5"}`), positional arrays
//! (`["30300.1", "1", "1.000"]`) and objects whose keys are entity identifiers
//! (`{"L4UESK-KG3EQ-UFO4L4": {...}}`). Each entity implements [`Decode`] or, when its identity
//! is the surrounding map key, [`DecodeKeyed`]. The helpers here turn shape violations into
//! [`RestError::SchemaMismatch`] and [`RestError::ArrayShape`] consistently.

use crate::error::{RestError, RestResult};
use kraken_types::{decimal_from_value, integer_from_value, timestamp_from_value};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// An entity decoded from a JSON value
pub trait Decode: Sized {
    /// Entity kind used in error messages
    const KIND: &'static str;

    fn decode(value: &Value) -> RestResult<Self>;
}

/// An entity whose identifier is carried as the key of an enclosing JSON object
///
/// The key is passed in explicitly and stored on the entity; bodies are never assumed to be
/// self-describing.
pub trait DecodeKeyed: Sized {
    /// Entity kind used in error messages
    const KIND: &'static str;

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self>;
}

impl Decode for Value {
    const KIND: &'static str = "json";

    fn decode(value: &Value) -> RestResult<Self> {
        Ok(value.clone())
    }
}

impl Decode for bool {
    const KIND: &'static str = "flag";

    fn decode(value: &Value) -> RestResult<Self> {
        value
            .as_bool()
            .ok_or_else(|| RestError::schema(Self::KIND, format!("expected boolean, got {}", type_name(value))))
    }
}

/// Borrow `value` as an object or fail with a schema mismatch
pub fn object<'a>(kind: &'static str, value: &'a Value) -> RestResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| RestError::schema(kind, format!("expected object, got {}", type_name(value))))
}

/// Borrow `value` as an array of at least `min` elements
pub fn positional<'a>(kind: &'static str, value: &'a Value, min: usize) -> RestResult<&'a [Value]> {
    let items = value
        .as_array()
        .ok_or_else(|| RestError::schema(kind, format!("expected array, got {}", type_name(value))))?;

    if items.len() < min {
        return Err(RestError::ArrayShape {
            entity: kind,
            expected: min,
            actual: items.len(),
        });
    }

    Ok(items)
}

/// Fetch a required member of an object
pub fn member<'a>(
    kind: &'static str,
    fields: &'a Map<String, Value>,
    key: &str,
) -> RestResult<&'a Value> {
    fields
        .get(key)
        .ok_or_else(|| RestError::schema(kind, format!("missing field `{key}`")))
}

/// Decimal at a position; the caller has already checked the length
pub fn decimal_at(kind: &'static str, items: &[Value], index: usize) -> RestResult<Decimal> {
    decimal_from_value(&items[index])
        .ok_or_else(|| RestError::schema(kind, format!("element {index} is not a decimal")))
}

/// Integer at a position; the caller has already checked the length
pub fn integer_at(kind: &'static str, items: &[Value], index: usize) -> RestResult<i64> {
    integer_from_value(&items[index])
        .ok_or_else(|| RestError::schema(kind, format!("element {index} is not an integer")))
}

/// Floating timestamp at a position; the caller has already checked the length
pub fn timestamp_at(kind: &'static str, items: &[Value], index: usize) -> RestResult<f64> {
    timestamp_from_value(&items[index])
        .ok_or_else(|| RestError::schema(kind, format!("element {index} is not a timestamp")))
}

/// String at a position; the caller has already checked the length
pub fn text_at<'a>(kind: &'static str, items: &'a [Value], index: usize) -> RestResult<&'a str> {
    items[index]
        .as_str()
        .ok_or_else(|| RestError::schema(kind, format!("element {index} is not a string")))
}

/// Decode a fixed-width `[today, last24h]` pair
pub fn window<T>(
    kind: &'static str,
    value: &Value,
    parse: impl Fn(&'static str, &[Value], usize) -> RestResult<T>,
) -> RestResult<Window<T>> {
    let items = positional(kind, value, 2)?;
    Ok(Window {
        today: parse(kind, items, 0)?,
        last_24h: parse(kind, items, 1)?,
    })
}

/// Deserialize a regular keyed body through a serde wire struct
pub fn from_wire<W: DeserializeOwned>(kind: &'static str, value: &Value) -> RestResult<W> {
    W::deserialize(value).map_err(|e| RestError::schema(kind, e.to_string()))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A value reported for the current day and for the trailing 24 hours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window<T> {
    /// Since 00:00 UTC
    pub today: T,
    /// Rolling 24 hours
    pub last_24h: T,
}

/// `false` is how Kraken spells "no limit" in some numeric fields
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum DecimalOrFlag {
    Flag(bool),
    Value(Value),
}

impl DecimalOrFlag {
    pub(crate) fn into_decimal(self, kind: &'static str, field: &str) -> RestResult<Option<Decimal>> {
        match self {
            Self::Flag(_) => Ok(None),
            Self::Value(Value::Null) => Ok(None),
            Self::Value(v) => decimal_from_value(&v)
                .map(Some)
                .ok_or_else(|| RestError::schema(kind, format!("`{field}` is not a decimal"))),
        }
    }
}
