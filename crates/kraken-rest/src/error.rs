//! Error types for REST API operations

use kraken_types::error_codes::{ExchangeErrorInfo, RecoveryStrategy};

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Server throttled the request
    #[error("Rate limit exceeded, retry after {retry_after_ms}ms")]
    RateLimited {
        /// Milliseconds to wait before retrying
        retry_after_ms: u64,
    },

    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Client configuration is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Response text is not valid JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Valid JSON, but not the shape expected for the entity
    #[error("Schema mismatch decoding {entity}: {detail}")]
    SchemaMismatch {
        /// Entity kind being decoded
        entity: &'static str,
        /// What was wrong
        detail: String,
    },

    /// Positional array shorter than the entity requires
    #[error("Array shape error decoding {entity}: expected at least {expected} elements, got {actual}")]
    ArrayShape {
        /// Entity kind being decoded
        entity: &'static str,
        /// Minimum element count
        expected: usize,
        /// Element count received
        actual: usize,
    },

    /// The envelope carried a non-empty error list
    #[error("Exchange error: {}", .errors.join(", "))]
    Exchange {
        /// Error strings exactly as received
        errors: Vec<String>,
        /// Structure parsed from the first error
        primary: ExchangeErrorInfo,
    },

    /// Order request lacks a field its variant requires, or is otherwise unusable
    #[error("Invalid order parameters: {0}")]
    InvalidOrderParameters(String),

    /// Invalid request parameters outside order composition
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RestError {
    /// Create an exchange error from the envelope's error strings
    pub fn from_api_errors(errors: Vec<String>) -> Self {
        let primary = ExchangeErrorInfo::parse(errors.first().map_or("", String::as_str));
        Self::Exchange { errors, primary }
    }

    pub(crate) fn schema(entity: &'static str, detail: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            entity,
            detail: detail.into(),
        }
    }

    /// Error strings exactly as the exchange sent them, if this is an exchange error
    pub fn exchange_errors(&self) -> Option<&[String]> {
        match self {
            Self::Exchange { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::Exchange { primary, .. } => primary.recovery_strategy(),
            Self::RateLimited { retry_after_ms } => RecoveryStrategy::Backoff {
                initial_ms: *retry_after_ms,
                max_ms: *retry_after_ms * 2,
                multiplier: 1,
            },
            Self::Timeout | Self::Http(_) => RecoveryStrategy::Retry {
                max_attempts: 3,
                delay_ms: 1000,
            },
            Self::Status { status, .. } if *status >= 500 => RecoveryStrategy::service_retry(),
            Self::InvalidCredentials(_) | Self::AuthRequired => RecoveryStrategy::Fatal,
            Self::MalformedResponse(_) | Self::SchemaMismatch { .. } | Self::ArrayShape { .. } => {
                RecoveryStrategy::Manual
            }
            Self::InvalidOrderParameters(_) | Self::InvalidParameter(_) => RecoveryStrategy::Skip,
            Self::Status { .. } | Self::EnvVarNotSet(_) | Self::Config(_) => {
                RecoveryStrategy::Fatal
            }
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Exchange { primary, .. } => primary.is_rate_limit(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_error_keeps_verbatim_strings() {
        let err = RestError::from_api_errors(vec![
            "EOrder:Insufficient funds".to_string(),
            "EGeneral:Invalid arguments:volume".to_string(),
        ]);
        assert_eq!(
            err.exchange_errors().unwrap().to_vec(),
            vec![
                "EOrder:Insufficient funds".to_string(),
                "EGeneral:Invalid arguments:volume".to_string(),
            ]
        );
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("EOrder:Insufficient funds"));
    }

    #[test]
    fn test_rate_limit_detection() {
        let err = RestError::from_api_errors(vec!["EAPI:Rate limit exceeded".to_string()]);
        assert!(err.is_rate_limited());
        assert!(err.is_retryable());

        let throttled = RestError::RateLimited { retry_after_ms: 1000 };
        assert!(throttled.is_rate_limited());
    }

    #[test]
    fn test_decode_errors_are_not_retryable() {
        let err = RestError::ArrayShape {
            entity: "ticker",
            expected: 3,
            actual: 2,
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("expected at least 3"));

        assert!(!RestError::AuthRequired.is_retryable());
    }
}
