//! Order vocabulary shared by the composer and the decoders

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a wire string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which vocabulary was being parsed
    pub kind: &'static str,
    /// The offending input
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    /// Wire representation used in the `type` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = UnknownVariant;

    /// Accepts both the long form and the one-letter form used in public trade arrays
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" | "b" => Ok(Self::Buy),
            "sell" | "s" => Ok(Self::Sell),
            other => Err(UnknownVariant::new("side", other)),
        }
    }
}

/// The six supported order variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderVariant {
    /// Execute immediately at the best available price
    Market,
    /// Rest on the book at `price`
    Limit,
    /// Market order once `price` is crossed against the trigger reference
    StopLoss,
    /// Market order once `price` is reached in the favourable direction
    TakeProfit,
    /// Limit order at the offset `price2` once `price` is crossed
    StopLossLimit,
    /// Limit order at the offset `price2` once `price` is reached
    TakeProfitLimit,
}

impl OrderVariant {
    /// All variants in wire order
    pub const ALL: [OrderVariant; 6] = [
        Self::Market,
        Self::Limit,
        Self::StopLoss,
        Self::TakeProfit,
        Self::StopLossLimit,
        Self::TakeProfitLimit,
    ];

    /// Wire representation used in the `ordertype` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::StopLoss => "stop-loss",
            Self::TakeProfit => "take-profit",
            Self::StopLossLimit => "stop-loss-limit",
            Self::TakeProfitLimit => "take-profit-limit",
        }
    }

    /// Whether the variant carries a primary price
    pub fn needs_price(&self) -> bool {
        !matches!(self, Self::Market)
    }

    /// Whether the variant carries a trigger reference
    pub fn needs_trigger(&self) -> bool {
        matches!(
            self,
            Self::StopLoss | Self::TakeProfit | Self::StopLossLimit | Self::TakeProfitLimit
        )
    }

    /// Whether the variant carries an offset secondary price
    pub fn needs_secondary_price(&self) -> bool {
        matches!(self, Self::StopLossLimit | Self::TakeProfitLimit)
    }
}

impl fmt::Display for OrderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("order variant", s))
    }
}

/// How a secondary price is applied relative to the reference price
///
/// The character is prepended to the number verbatim when building `price2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetType {
    /// `+` add the amount to the reference price
    Add,
    /// `-` subtract the amount from the reference price
    Subtract,
    /// `#` add or subtract depending on the order side
    Directional,
    /// `%` amount is a percentage of the reference price
    Percent,
}

impl OffsetType {
    /// The one-character prefix
    pub fn as_char(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Directional => '#',
            Self::Percent => '%',
        }
    }
}

impl TryFrom<char> for OffsetType {
    type Error = UnknownVariant;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '+' => Ok(Self::Add),
            '-' => Ok(Self::Subtract),
            '#' => Ok(Self::Directional),
            '%' => Ok(Self::Percent),
            other => Err(UnknownVariant::new("offset type", &other.to_string())),
        }
    }
}

impl fmt::Display for OffsetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Price reference used to fire triggered orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// Index price across exchanges
    Index,
    /// Last traded price on the book
    Last,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Last => "last",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time in force for orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancelled
    #[serde(rename = "GTC")]
    GoodTillCancelled,
    /// Immediate or cancel
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    /// Good till date (requires an expire time)
    #[serde(rename = "GTD")]
    GoodTillDate,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodTillCancelled => "GTC",
            Self::ImmediateOrCancel => "IOC",
            Self::GoodTillDate => "GTD",
        }
    }
}

/// Order flags sent comma-joined in `oflags`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderFlag {
    /// Post-only order (maker only)
    PostOnly,
    /// Fee in base currency
    FeeInBase,
    /// Fee in quote currency
    FeeInQuote,
    /// Disable market price protection
    NoMarketPriceProtection,
    /// Order volume expressed in quote currency
    VolumeInQuote,
}

impl OrderFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostOnly => "post",
            Self::FeeInBase => "fcib",
            Self::FeeInQuote => "fciq",
            Self::NoMarketPriceProtection => "nompp",
            Self::VolumeInQuote => "viqc",
        }
    }

    /// Joins flags the way `oflags` expects them, keeping caller order and dropping repeats
    pub fn join(flags: &[OrderFlag]) -> String {
        let mut seen: Vec<OrderFlag> = Vec::with_capacity(flags.len());
        for flag in flags {
            if !seen.contains(flag) {
                seen.push(*flag);
            }
        }
        seen.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_wire_names_round_trip() {
        for variant in OrderVariant::ALL {
            assert_eq!(variant.as_str().parse::<OrderVariant>().unwrap(), variant);
        }
        assert!("trailing-stop".parse::<OrderVariant>().is_err());
    }

    #[test]
    fn test_variant_payload_requirements() {
        assert!(!OrderVariant::Market.needs_price());
        assert!(OrderVariant::Limit.needs_price());
        assert!(!OrderVariant::Limit.needs_trigger());
        assert!(OrderVariant::StopLoss.needs_trigger());
        assert!(!OrderVariant::TakeProfit.needs_secondary_price());
        assert!(OrderVariant::TakeProfitLimit.needs_secondary_price());
    }

    #[test]
    fn test_side_short_form() {
        assert_eq!("b".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("sell".parse::<Side>().unwrap(), Side::Sell);
        assert_eq!(Side::Buy.opposite(), Side::Sell);
    }

    #[test]
    fn test_offset_characters() {
        for c in ['+', '-', '#', '%'] {
            assert_eq!(OffsetType::try_from(c).unwrap().as_char(), c);
        }
        assert!(OffsetType::try_from('*').is_err());
    }

    #[test]
    fn test_flags_join_dedupes() {
        let joined = OrderFlag::join(&[
            OrderFlag::PostOnly,
            OrderFlag::FeeInQuote,
            OrderFlag::PostOnly,
        ]);
        assert_eq!(joined, "post,fciq");
    }
}
