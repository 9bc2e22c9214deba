//! Shared vocabulary for the Kraken REST client
//!
//! Small, dependency-light types used by both order composition and response decoding.
//!
//! # Key Types
//!
//! - [`Side`], [`OrderVariant`], [`OffsetType`], [`TriggerType`] - Order vocabulary
//! - [`TimeInForce`], [`OrderFlag`] - Optional order modifiers
//! - [`ExchangeErrorInfo`], [`ExchangeErrorCode`] - Structure parsed from envelope error strings
//! - [`decimal_from_value`] - Lossless numeric parsing of mixed string/number JSON

pub mod enums;
pub mod error_codes;
pub mod number;

pub use enums::*;
pub use error_codes::*;
pub use number::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
