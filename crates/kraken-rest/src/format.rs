//! Return format dispatch
//!
//! Every endpoint call hands its raw body to [`dispatch`] exactly once. The caller picks how
//! much interpretation it wants: the text as received, a generic JSON tree, or the decoded
//! entity.

use crate::decode::Decode;
use crate::envelope;
use crate::error::{RestError, RestResult};
use serde_json::Value;

/// Representation requested from a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnFormat {
    /// Body text untouched
    RawText,
    /// Whole envelope parsed as a JSON tree
    StructuredTree,
    /// Envelope opened and `result` decoded into the endpoint's entity type
    #[default]
    TypedObject,
}

/// A response in the representation that was asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Response<T> {
    Raw(String),
    Tree(Value),
    Typed(T),
}

impl<T> Response<T> {
    /// The format this response is in
    pub fn format(&self) -> ReturnFormat {
        match self {
            Self::Raw(_) => ReturnFormat::RawText,
            Self::Tree(_) => ReturnFormat::StructuredTree,
            Self::Typed(_) => ReturnFormat::TypedObject,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Value> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn into_typed(self) -> Option<T> {
        match self {
            Self::Typed(entity) => Some(entity),
            _ => None,
        }
    }
}

/// Convert a raw response body into the requested representation
pub fn dispatch<T: Decode>(raw: String, format: ReturnFormat) -> RestResult<Response<T>> {
    match format {
        ReturnFormat::RawText => Ok(Response::Raw(raw)),
        ReturnFormat::StructuredTree => parse_tree(&raw).map(Response::Tree),
        ReturnFormat::TypedObject => decode_body(&raw).map(Response::Typed),
    }
}

/// Parse body text as JSON
pub fn parse_tree(raw: &str) -> RestResult<Value> {
    serde_json::from_str(raw).map_err(|e| RestError::MalformedResponse(e.to_string()))
}

/// Parse body text, open the envelope and decode `result` as `T`
pub fn decode_body<T: Decode>(raw: &str) -> RestResult<T> {
    let result = envelope::open(parse_tree(raw)?)?;
    T::decode(&result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServerTime;

    const TIME: &str = r#"{"error":[],"result":{"unixtime":1688669448,"rfc1123":"Thu, 06 Jul 23 18:50:48 +0000"}}"#;

    #[test]
    fn test_raw_is_pass_through() {
        let response = dispatch::<ServerTime>("not even json".to_string(), ReturnFormat::RawText)
            .unwrap();
        assert_eq!(response.as_raw(), Some("not even json"));
    }

    #[test]
    fn test_tree_keeps_envelope() {
        let response = dispatch::<ServerTime>(TIME.to_string(), ReturnFormat::StructuredTree)
            .unwrap();
        let tree = response.as_tree().unwrap();
        assert!(tree["error"].as_array().unwrap().is_empty());
        assert_eq!(tree["result"]["unixtime"], 1688669448);
    }

    #[test]
    fn test_typed_decodes_result() {
        let response = dispatch::<ServerTime>(TIME.to_string(), ReturnFormat::TypedObject)
            .unwrap();
        assert_eq!(response.format(), ReturnFormat::TypedObject);
        assert_eq!(response.into_typed().unwrap().unixtime, 1688669448);
    }

    #[test]
    fn test_malformed_text() {
        let err = dispatch::<ServerTime>("<html>".to_string(), ReturnFormat::StructuredTree)
            .unwrap_err();
        assert!(matches!(err, RestError::MalformedResponse(_)));

        let err = dispatch::<ServerTime>("<html>".to_string(), ReturnFormat::TypedObject)
            .unwrap_err();
        assert!(matches!(err, RestError::MalformedResponse(_)));
    }

    #[test]
    fn test_tree_does_not_inspect_errors() {
        let raw = r#"{"error":["EGeneral:Unknown method"]}"#;
        let response = dispatch::<ServerTime>(raw.to_string(), ReturnFormat::StructuredTree);
        assert!(response.is_ok());
        let err = dispatch::<ServerTime>(raw.to_string(), ReturnFormat::TypedObject).unwrap_err();
        assert!(matches!(err, RestError::Exchange { .. }));
    }
}
