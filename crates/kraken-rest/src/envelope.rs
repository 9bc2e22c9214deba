//! The `{"error": [...], "result": ...}` wrapper present on every response

use crate::error::{RestError, RestResult};
use serde::Deserialize;
use serde_json::Value;

/// Standard Kraken API response wrapper
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Error messages (empty if successful)
    #[serde(default)]
    pub error: Vec<String>,
    /// Result data (present if successful)
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }

    /// Get the result, failing with an exchange error if the API returned errors
    ///
    /// When errors are present the result is dropped without being looked at.
    pub fn into_result(self) -> RestResult<T> {
        if !self.error.is_empty() {
            return Err(RestError::from_api_errors(self.error));
        }
        self.result
            .ok_or_else(|| RestError::schema("envelope", "missing `result`"))
    }
}

/// Unwrap a parsed response tree down to its `result` value
pub fn open(tree: Value) -> RestResult<Value> {
    if !tree.is_object() {
        return Err(RestError::schema("envelope", "response is not a JSON object"));
    }
    let envelope: ApiResponse<Value> =
        serde_json::from_value(tree).map_err(|e| RestError::schema("envelope", e.to_string()))?;
    envelope.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_open_success() {
        let result = open(json!({"error": [], "result": {"unixtime": 1688669448}})).unwrap();
        assert_eq!(result["unixtime"], 1688669448);
    }

    #[test]
    fn test_errors_skip_result() {
        // The result here would not decode as anything; it must never be touched.
        let err = open(json!({"error": ["EOrder:Insufficient funds"], "result": {"garbage": [1]}}))
            .unwrap_err();
        assert_eq!(
            err.exchange_errors().unwrap().to_vec(),
            vec!["EOrder:Insufficient funds".to_string()]
        );
    }

    #[test]
    fn test_missing_result() {
        let err = open(json!({"error": []})).unwrap_err();
        assert!(matches!(err, RestError::SchemaMismatch { entity: "envelope", .. }));
    }

    #[test]
    fn test_non_object_response() {
        let err = open(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, RestError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_typed_envelope() {
        let response: ApiResponse<u64> =
            serde_json::from_value(json!({"error": [], "result": 7})).unwrap();
        assert!(response.is_success());
        assert_eq!(response.into_result().unwrap(), 7);
    }
}
