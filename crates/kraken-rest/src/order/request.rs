//! Order, edit and batch requests

use super::params::ParameterSet;
use chrono::{DateTime, Utc};
use kraken_types::{OffsetType, OrderFlag, OrderVariant, Side, TimeInForce, TriggerType};
use rust_decimal::Decimal;
use std::fmt;

/// Variant-dependent part of an order
///
/// Which fields a variant needs is fixed by [`OrderVariant`]; fields a variant does not use are
/// never transmitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderPayload {
    /// Limit price, or trigger price for the stop and take-profit variants
    pub price: Option<Decimal>,
    /// Limit price of the triggered order, relative to `offset`
    pub price2: Option<Decimal>,
    /// Price signal the trigger watches
    pub trigger: Option<TriggerType>,
    /// Prefix applied to `price2`
    pub offset: Option<OffsetType>,
}

/// When an order starts or expires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTime {
    Now,
    /// Seconds from now
    In(u64),
    At(DateTime<Utc>),
}

impl fmt::Display for OrderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Now => f.write_str("0"),
            Self::In(secs) => write!(f, "+{secs}"),
            Self::At(at) => write!(f, "{}", at.timestamp()),
        }
    }
}

/// Conditional close order attached to an opening order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOrder {
    pub variant: OrderVariant,
    pub price: Option<Decimal>,
    pub price2: Option<Decimal>,
}

impl CloseOrder {
    pub fn new(variant: OrderVariant) -> Self {
        Self {
            variant,
            price: None,
            price2: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_price2(mut self, price2: Decimal) -> Self {
        self.price2 = Some(price2);
        self
    }
}

/// Optional order modifiers, merged after the derived keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderOptions {
    pub leverage: Option<String>,
    pub flags: Vec<OrderFlag>,
    pub time_in_force: Option<TimeInForce>,
    pub start_time: Option<OrderTime>,
    pub expire_time: Option<OrderTime>,
    pub userref: Option<i32>,
    pub validate: bool,
    pub close: Option<CloseOrder>,
    /// Reject the order if it reaches the matching engine after this time
    pub deadline: Option<DateTime<Utc>>,
    /// Arbitrary extra parameters, applied last
    pub extra: ParameterSet,
}

/// A new order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub pair: String,
    pub side: Side,
    pub variant: OrderVariant,
    pub volume: Decimal,
    pub payload: OrderPayload,
    pub options: OrderOptions,
}

impl OrderRequest {
    /// An order with an empty payload; fill it in with the `with_*` methods
    pub fn new(pair: impl Into<String>, side: Side, variant: OrderVariant, volume: Decimal) -> Self {
        Self {
            pair: pair.into(),
            side,
            variant,
            volume,
            payload: OrderPayload::default(),
            options: OrderOptions::default(),
        }
    }

    /// Create a market order
    pub fn market(pair: impl Into<String>, side: Side, volume: Decimal) -> Self {
        Self::new(pair, side, OrderVariant::Market, volume)
    }

    /// Create a limit order
    pub fn limit(pair: impl Into<String>, side: Side, volume: Decimal, price: Decimal) -> Self {
        Self::new(pair, side, OrderVariant::Limit, volume).with_price(price)
    }

    /// Create a stop loss order triggering at `price`
    pub fn stop_loss(
        pair: impl Into<String>,
        side: Side,
        volume: Decimal,
        price: Decimal,
        trigger: TriggerType,
    ) -> Self {
        Self::new(pair, side, OrderVariant::StopLoss, volume)
            .with_price(price)
            .with_trigger(trigger)
    }

    /// Create a take profit order triggering at `price`
    pub fn take_profit(
        pair: impl Into<String>,
        side: Side,
        volume: Decimal,
        price: Decimal,
        trigger: TriggerType,
    ) -> Self {
        Self::new(pair, side, OrderVariant::TakeProfit, volume)
            .with_price(price)
            .with_trigger(trigger)
    }

    /// Create a stop loss limit order: triggers at `price`, then rests at `offset` + `price2`
    pub fn stop_loss_limit(
        pair: impl Into<String>,
        side: Side,
        volume: Decimal,
        price: Decimal,
        offset: OffsetType,
        price2: Decimal,
        trigger: TriggerType,
    ) -> Self {
        Self::new(pair, side, OrderVariant::StopLossLimit, volume)
            .with_price(price)
            .with_price2(offset, price2)
            .with_trigger(trigger)
    }

    /// Create a take profit limit order: triggers at `price`, then rests at `offset` + `price2`
    pub fn take_profit_limit(
        pair: impl Into<String>,
        side: Side,
        volume: Decimal,
        price: Decimal,
        offset: OffsetType,
        price2: Decimal,
        trigger: TriggerType,
    ) -> Self {
        Self::new(pair, side, OrderVariant::TakeProfitLimit, volume)
            .with_price(price)
            .with_price2(offset, price2)
            .with_trigger(trigger)
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.payload.price = Some(price);
        self
    }

    pub fn with_price2(mut self, offset: OffsetType, price2: Decimal) -> Self {
        self.payload.offset = Some(offset);
        self.payload.price2 = Some(price2);
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerType) -> Self {
        self.payload.trigger = Some(trigger);
        self
    }

    /// Set time in force
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.options.time_in_force = Some(tif);
        self
    }

    /// Add an order flag
    pub fn with_flag(mut self, flag: OrderFlag) -> Self {
        self.options.flags.push(flag);
        self
    }

    /// Set as post-only (maker only)
    pub fn post_only(self) -> Self {
        self.with_flag(OrderFlag::PostOnly)
    }

    /// Set leverage for margin trading
    pub fn with_leverage(mut self, leverage: impl Into<String>) -> Self {
        self.options.leverage = Some(leverage.into());
        self
    }

    /// Set user reference ID
    pub fn with_userref(mut self, userref: i32) -> Self {
        self.options.userref = Some(userref);
        self
    }

    pub fn starting(mut self, at: OrderTime) -> Self {
        self.options.start_time = Some(at);
        self
    }

    pub fn expiring(mut self, at: OrderTime) -> Self {
        self.options.expire_time = Some(at);
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.options.deadline = Some(deadline);
        self
    }

    /// Set as validate-only (don't actually submit)
    pub fn validate_only(mut self) -> Self {
        self.options.validate = true;
        self
    }

    /// Add a close order
    pub fn with_close(mut self, close: CloseOrder) -> Self {
        self.options.close = Some(close);
        self
    }

    /// Add a raw parameter, overriding anything derived
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.extra.insert(key, value);
        self
    }
}

/// Identifies an existing order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderId {
    /// Exchange-assigned transaction id
    Txid(String),
    /// Caller-assigned reference
    UserRef(i32),
}

impl OrderId {
    /// Parameter key used when editing
    pub fn edit_key(&self) -> &'static str {
        match self {
            Self::Txid(_) => "txid",
            Self::UserRef(_) => "userref",
        }
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Txid(txid) => f.write_str(txid),
            Self::UserRef(userref) => write!(f, "{userref}"),
        }
    }
}

impl From<&str> for OrderId {
    fn from(txid: &str) -> Self {
        Self::Txid(txid.to_string())
    }
}

impl From<String> for OrderId {
    fn from(txid: String) -> Self {
        Self::Txid(txid)
    }
}

impl From<i32> for OrderId {
    fn from(userref: i32) -> Self {
        Self::UserRef(userref)
    }
}

/// Changes to an open order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub id: OrderId,
    /// Pair of the order being edited
    pub pair: Option<String>,
    pub volume: Option<Decimal>,
    pub price: Option<Decimal>,
    pub price2: Option<Decimal>,
    pub offset: Option<OffsetType>,
    pub flags: Vec<OrderFlag>,
    pub deadline: Option<DateTime<Utc>>,
    /// Wait for the original order to be cancelled before answering
    pub cancel_response: bool,
    pub validate: bool,
    pub extra: ParameterSet,
}

impl EditRequest {
    pub fn new(id: impl Into<OrderId>) -> Self {
        Self {
            id: id.into(),
            pair: None,
            volume: None,
            price: None,
            price2: None,
            offset: None,
            flags: Vec::new(),
            deadline: None,
            cancel_response: false,
            validate: false,
            extra: ParameterSet::new(),
        }
    }

    pub fn for_pair(mut self, pair: impl Into<String>) -> Self {
        self.pair = Some(pair.into());
        self
    }

    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_price2(mut self, offset: OffsetType, price2: Decimal) -> Self {
        self.offset = Some(offset);
        self.price2 = Some(price2);
        self
    }

    pub fn with_flag(mut self, flag: OrderFlag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn wait_for_cancel(mut self) -> Self {
        self.cancel_response = true;
        self
    }

    pub fn validate_only(mut self) -> Self {
        self.validate = true;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key, value);
        self
    }

    /// Whether anything about the order would change
    pub fn has_changes(&self) -> bool {
        self.volume.is_some()
            || self.price.is_some()
            || self.price2.is_some()
            || !self.flags.is_empty()
            || !self.extra.is_empty()
    }
}

/// Maximum orders accepted in one batch
pub const MAX_BATCH_ORDERS: usize = 15;

/// Several orders on one pair, accepted or rejected together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub pair: String,
    pub orders: Vec<OrderRequest>,
    pub validate: bool,
    pub deadline: Option<DateTime<Utc>>,
}

impl BatchRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            orders: Vec::new(),
            validate: false,
            deadline: None,
        }
    }

    pub fn push(mut self, order: OrderRequest) -> Self {
        self.orders.push(order);
        self
    }

    pub fn validate_only(mut self) -> Self {
        self.validate = true;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_request_builder() {
        let order = OrderRequest::limit("XBTUSD", Side::Buy, Decimal::ONE, dec!(50000))
            .post_only()
            .with_userref(123)
            .with_time_in_force(TimeInForce::GoodTillCancelled);

        assert_eq!(order.pair, "XBTUSD");
        assert_eq!(order.variant, OrderVariant::Limit);
        assert_eq!(order.payload.price, Some(dec!(50000)));
        assert!(order.options.flags.contains(&OrderFlag::PostOnly));
        assert_eq!(order.options.userref, Some(123));
    }

    #[test]
    fn test_order_time_rendering() {
        assert_eq!(OrderTime::Now.to_string(), "0");
        assert_eq!(OrderTime::In(3600).to_string(), "+3600");
        let at = Utc.with_ymd_and_hms(2023, 7, 6, 18, 0, 0).unwrap();
        assert_eq!(OrderTime::At(at).to_string(), "1688666400");
    }

    #[test]
    fn test_order_id_from_type() {
        assert_eq!(OrderId::from(12345).edit_key(), "userref");
        assert_eq!(OrderId::from("OABC-123").edit_key(), "txid");
        assert_eq!(OrderId::from(12345).to_string(), "12345");
    }

    #[test]
    fn test_edit_has_changes() {
        assert!(!EditRequest::new("OABC-123").has_changes());
        assert!(EditRequest::new("OABC-123").with_volume(dec!(1)).has_changes());
    }
}
