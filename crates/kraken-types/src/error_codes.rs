//! Exchange error strings mapped to categories, known codes and recovery hints
//!
//! Kraken reports business failures inside the response envelope as strings shaped
//! `"ECategory:Message"` (sometimes with a trailing `:detail`). The verbatim strings are always
//! kept by the caller; this module only adds structure on top of them.

use std::time::Duration;

/// Advisory recovery hint for an error
///
/// Nothing in the REST client acts on these; they are surfaced for the caller's own policy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecoveryStrategy {
    /// Exponential backoff before retry
    Backoff {
        initial_ms: u64,
        max_ms: u64,
        multiplier: u32,
    },
    /// Fixed delay retry
    Retry { delay_ms: u64, max_attempts: u32 },
    /// Credentials or nonce must be fixed before trying again
    Reauthenticate,
    /// The account owner has to do something (fund, reduce size, wait for market)
    UserAction { message: &'static str },
    /// The request itself is wrong; resending it unchanged will fail again
    Skip,
    /// Cannot be recovered programmatically
    Fatal,
    /// Unclassified
    #[default]
    Manual,
}

impl RecoveryStrategy {
    /// Default exponential backoff for rate limits
    pub fn rate_limit_backoff() -> Self {
        Self::Backoff {
            initial_ms: 1000,
            max_ms: 60_000,
            multiplier: 2,
        }
    }

    /// Default retry for transient service errors
    pub fn service_retry() -> Self {
        Self::Retry {
            delay_ms: 5000,
            max_attempts: 3,
        }
    }

    /// First delay suggested by the strategy
    pub fn initial_delay(&self) -> Option<Duration> {
        match self {
            Self::Backoff { initial_ms, .. } => Some(Duration::from_millis(*initial_ms)),
            Self::Retry { delay_ms, .. } => Some(Duration::from_millis(*delay_ms)),
            _ => None,
        }
    }

    /// Whether resending can succeed without a change in the request
    pub fn allows_retry(&self) -> bool {
        matches!(
            self,
            Self::Backoff { .. } | Self::Retry { .. } | Self::Reauthenticate
        )
    }
}

/// Prefix family of an exchange error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// `EAPI:*`
    Api,
    /// `EGeneral:*`
    General,
    /// `EService:*`
    Service,
    /// `EOrder:*`
    Order,
    /// `EFunding:*`
    Funding,
    /// `EQuery:*`
    Query,
    /// `ETrade:*`
    Trade,
    /// Anything else
    Unknown,
}

impl ErrorCategory {
    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "EAPI" => Self::Api,
            "EGeneral" => Self::General,
            "EService" => Self::Service,
            "EOrder" => Self::Order,
            "EFunding" => Self::Funding,
            "EQuery" => Self::Query,
            "ETrade" => Self::Trade,
            _ => Self::Unknown,
        }
    }
}

/// Error codes the REST API is known to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeErrorCode {
    RateLimitExceeded,
    InvalidKey,
    InvalidSignature,
    InvalidNonce,
    BadRequest,
    FeatureDisabled,
    InvalidArguments,
    PermissionDenied,
    UnknownAssetPair,
    UnknownAsset,
    TooManyRequests,
    TemporaryLockout,
    UnknownMethod,
    InternalError,
    ServiceUnavailable,
    ServiceBusy,
    MarketCancelOnly,
    MarketPostOnly,
    DeadlineElapsed,
    CannotOpenPosition,
    MarginAllowanceExceeded,
    InsufficientMargin,
    InsufficientFunds,
    OrderMinimumNotMet,
    CostMinimumNotMet,
    TickSizeCheckFailed,
    OrdersLimitExceeded,
    OrderRateLimitExceeded,
    PositionsLimitExceeded,
    UnknownOrder,
    UnknownPosition,
    InvalidPrice,
    InvalidOrderType,
    TradingDisabled,
    UnknownWithdrawKey,
    InvalidFundingAmount,
    UnknownReference,
}

/// Exact prefixes, matched against the start of the raw string so that trailing
/// `:detail` segments (e.g. `EGeneral:Invalid arguments:volume`) still resolve.
const KNOWN_CODES: &[(&str, ExchangeErrorCode)] = &[
    ("EAPI:Rate limit exceeded", ExchangeErrorCode::RateLimitExceeded),
    ("EAPI:Invalid key", ExchangeErrorCode::InvalidKey),
    ("EAPI:Invalid signature", ExchangeErrorCode::InvalidSignature),
    ("EAPI:Invalid nonce", ExchangeErrorCode::InvalidNonce),
    ("EAPI:Bad request", ExchangeErrorCode::BadRequest),
    ("EAPI:Feature disabled", ExchangeErrorCode::FeatureDisabled),
    ("EGeneral:Invalid arguments", ExchangeErrorCode::InvalidArguments),
    ("EGeneral:Permission denied", ExchangeErrorCode::PermissionDenied),
    ("EGeneral:Unknown asset pair", ExchangeErrorCode::UnknownAssetPair),
    ("EQuery:Unknown asset pair", ExchangeErrorCode::UnknownAssetPair),
    ("EGeneral:Unknown asset", ExchangeErrorCode::UnknownAsset),
    ("EQuery:Unknown asset", ExchangeErrorCode::UnknownAsset),
    ("EGeneral:Too many requests", ExchangeErrorCode::TooManyRequests),
    ("EGeneral:Temporary lockout", ExchangeErrorCode::TemporaryLockout),
    ("EGeneral:Unknown method", ExchangeErrorCode::UnknownMethod),
    ("EGeneral:Internal error", ExchangeErrorCode::InternalError),
    ("EService:Unavailable", ExchangeErrorCode::ServiceUnavailable),
    ("EService:Busy", ExchangeErrorCode::ServiceBusy),
    ("EService:Market in cancel_only mode", ExchangeErrorCode::MarketCancelOnly),
    ("EService:Market in post_only mode", ExchangeErrorCode::MarketPostOnly),
    ("EService:Deadline elapsed", ExchangeErrorCode::DeadlineElapsed),
    ("EOrder:Cannot open position", ExchangeErrorCode::CannotOpenPosition),
    ("EOrder:Margin allowance exceeded", ExchangeErrorCode::MarginAllowanceExceeded),
    ("EOrder:Insufficient margin", ExchangeErrorCode::InsufficientMargin),
    ("EOrder:Insufficient funds", ExchangeErrorCode::InsufficientFunds),
    ("EOrder:Order minimum not met", ExchangeErrorCode::OrderMinimumNotMet),
    ("EOrder:Cost minimum not met", ExchangeErrorCode::CostMinimumNotMet),
    ("EOrder:Tick size check failed", ExchangeErrorCode::TickSizeCheckFailed),
    ("EOrder:Orders limit exceeded", ExchangeErrorCode::OrdersLimitExceeded),
    ("EOrder:Rate limit exceeded", ExchangeErrorCode::OrderRateLimitExceeded),
    ("EOrder:Positions limit exceeded", ExchangeErrorCode::PositionsLimitExceeded),
    ("EOrder:Unknown order", ExchangeErrorCode::UnknownOrder),
    ("EOrder:Unknown position", ExchangeErrorCode::UnknownPosition),
    ("ETrade:Unknown position", ExchangeErrorCode::UnknownPosition),
    ("EOrder:Invalid price", ExchangeErrorCode::InvalidPrice),
    ("EOrder:Invalid order", ExchangeErrorCode::InvalidOrderType),
    ("EOrder:Trading agreement required", ExchangeErrorCode::PermissionDenied),
    ("EOrder:Trading disabled", ExchangeErrorCode::TradingDisabled),
    ("EFunding:Unknown withdraw key", ExchangeErrorCode::UnknownWithdrawKey),
    ("EFunding:Invalid amount", ExchangeErrorCode::InvalidFundingAmount),
    ("EFunding:Unknown reference id", ExchangeErrorCode::UnknownReference),
];

impl ExchangeErrorCode {
    /// Look up a raw error string
    pub fn lookup(raw: &str) -> Option<Self> {
        KNOWN_CODES
            .iter()
            .find(|(prefix, _)| raw.starts_with(prefix))
            .map(|(_, code)| *code)
    }

    /// Advisory recovery hint
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        use ExchangeErrorCode::*;

        match self {
            RateLimitExceeded | TooManyRequests | OrderRateLimitExceeded => {
                RecoveryStrategy::rate_limit_backoff()
            }
            TemporaryLockout => RecoveryStrategy::Backoff {
                initial_ms: 60_000,
                max_ms: 600_000,
                multiplier: 2,
            },
            InvalidKey | InvalidSignature | InvalidNonce => RecoveryStrategy::Reauthenticate,
            ServiceUnavailable | ServiceBusy => RecoveryStrategy::service_retry(),
            DeadlineElapsed => RecoveryStrategy::Retry {
                delay_ms: 1000,
                max_attempts: 5,
            },
            InsufficientFunds => RecoveryStrategy::UserAction {
                message: "Insufficient funds - deposit more or reduce order size",
            },
            InsufficientMargin | MarginAllowanceExceeded | CannotOpenPosition => {
                RecoveryStrategy::UserAction {
                    message: "Margin limits reached - add collateral or reduce position",
                }
            }
            OrderMinimumNotMet | CostMinimumNotMet => RecoveryStrategy::UserAction {
                message: "Order size too small - increase volume",
            },
            OrdersLimitExceeded | PositionsLimitExceeded => RecoveryStrategy::UserAction {
                message: "Too many open orders or positions - close some first",
            },
            MarketCancelOnly | MarketPostOnly | TradingDisabled => RecoveryStrategy::UserAction {
                message: "Market is restricted - wait for normal trading",
            },
            UnknownWithdrawKey | InvalidFundingAmount => RecoveryStrategy::UserAction {
                message: "Check withdrawal key and amount",
            },
            BadRequest | InvalidArguments | InvalidPrice | InvalidOrderType
            | TickSizeCheckFailed | UnknownAssetPair | UnknownAsset | UnknownOrder
            | UnknownPosition | UnknownReference => RecoveryStrategy::Skip,
            PermissionDenied | FeatureDisabled => RecoveryStrategy::Fatal,
            UnknownMethod | InternalError => RecoveryStrategy::Manual,
        }
    }

    /// Whether the error is a throttling response
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::TooManyRequests | Self::OrderRateLimitExceeded
        )
    }
}

/// One exchange error string with the structure parsed out of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeErrorInfo {
    /// The string exactly as the exchange sent it
    pub raw: String,
    /// Prefix family
    pub category: ErrorCategory,
    /// Recognised code, if any
    pub code: Option<ExchangeErrorCode>,
    /// Text after the category prefix
    pub message: String,
}

impl ExchangeErrorInfo {
    /// Parse one error string
    pub fn parse(raw: &str) -> Self {
        let (category, message) = match raw.split_once(':') {
            Some((prefix, rest)) => (ErrorCategory::from_prefix(prefix), rest.trim().to_string()),
            None => (ErrorCategory::Unknown, raw.to_string()),
        };

        Self {
            raw: raw.to_string(),
            category,
            code: ExchangeErrorCode::lookup(raw),
            message,
        }
    }

    /// Parse every string of an envelope `error` array
    pub fn parse_all(errors: &[String]) -> Vec<Self> {
        errors.iter().map(|e| Self::parse(e)).collect()
    }

    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        self.code
            .map(|c| c.recovery_strategy())
            .unwrap_or_default()
    }

    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    pub fn is_rate_limit(&self) -> bool {
        self.code.is_some_and(|c| c.is_rate_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_error() {
        let error = ExchangeErrorInfo::parse("EOrder:Insufficient funds");
        assert_eq!(error.category, ErrorCategory::Order);
        assert_eq!(error.code, Some(ExchangeErrorCode::InsufficientFunds));
        assert_eq!(error.message, "Insufficient funds");
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_trailing_detail_still_resolves() {
        let error = ExchangeErrorInfo::parse("EGeneral:Invalid arguments:volume");
        assert_eq!(error.code, Some(ExchangeErrorCode::InvalidArguments));
        assert_eq!(error.message, "Invalid arguments:volume");
        assert_eq!(error.raw, "EGeneral:Invalid arguments:volume");
    }

    #[test]
    fn test_rate_limit_is_retryable() {
        let error = ExchangeErrorInfo::parse("EAPI:Rate limit exceeded");
        assert!(error.is_rate_limit());
        assert!(error.is_retryable());
        assert_eq!(
            error.recovery_strategy().initial_delay(),
            Some(Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_unknown_error() {
        let error = ExchangeErrorInfo::parse("something odd");
        assert_eq!(error.category, ErrorCategory::Unknown);
        assert_eq!(error.code, None);
        assert_eq!(error.recovery_strategy(), RecoveryStrategy::Manual);
    }

    #[test]
    fn test_asset_pair_is_not_mistaken_for_asset() {
        let error = ExchangeErrorInfo::parse("EQuery:Unknown asset pair");
        assert_eq!(error.code, Some(ExchangeErrorCode::UnknownAssetPair));
    }
}
