//! Public market data entities

use super::{optional_decimal, optional_integer};
use crate::assemble::array_list;
use crate::decode::{
    decimal_at, from_wire, integer_at, member, object, positional, text_at, timestamp_at, window,
    Decode, DecodeKeyed, Window,
};
use crate::error::{RestError, RestResult};
use kraken_types::{decimal_from_value, OrderVariant, Side};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Server time
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerTime {
    /// Unix timestamp
    pub unixtime: i64,
    /// RFC 1123 time string
    pub rfc1123: String,
}

impl Decode for ServerTime {
    const KIND: &'static str = "server time";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// Exchange operating status
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemStatus {
    /// `online`, `maintenance`, `cancel_only` or `post_only`
    pub status: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl SystemStatus {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

impl Decode for SystemStatus {
    const KIND: &'static str = "system status";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// Asset information, keyed by asset id
#[derive(Debug, Clone, PartialEq)]
pub struct AssetInfo {
    /// Asset id (`XXBT`)
    pub id: String,
    pub aclass: String,
    pub altname: String,
    pub decimals: u32,
    pub display_decimals: u32,
    pub collateral_value: Option<Decimal>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
struct AssetInfoWire {
    aclass: String,
    altname: String,
    decimals: u32,
    display_decimals: u32,
    collateral_value: Option<Value>,
    status: Option<String>,
}

impl DecodeKeyed for AssetInfo {
    const KIND: &'static str = "asset";

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self> {
        let wire: AssetInfoWire = from_wire(Self::KIND, value)?;
        Ok(Self {
            id: id.to_string(),
            aclass: wire.aclass,
            altname: wire.altname,
            decimals: wire.decimals,
            display_decimals: wire.display_decimals,
            collateral_value: optional_decimal(
                Self::KIND,
                "collateral_value",
                wire.collateral_value.as_ref(),
            )?,
            status: wire.status,
        })
    }
}

/// One step of a volume-tiered fee schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTier {
    /// 30-day volume at which this tier starts
    pub volume: Decimal,
    /// Fee in percent
    pub percent: Decimal,
}

impl Decode for FeeTier {
    const KIND: &'static str = "fee tier";

    fn decode(value: &Value) -> RestResult<Self> {
        let items = positional(Self::KIND, value, 2)?;
        Ok(Self {
            volume: decimal_at(Self::KIND, items, 0)?,
            percent: decimal_at(Self::KIND, items, 1)?,
        })
    }
}

/// Tradable asset pair, keyed by pair id
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPair {
    /// Pair id (`XXBTZUSD`)
    pub id: String,
    pub altname: String,
    pub wsname: Option<String>,
    pub aclass_base: String,
    pub base: String,
    pub aclass_quote: String,
    pub quote: String,
    pub pair_decimals: u32,
    pub cost_decimals: Option<u32>,
    pub lot_decimals: u32,
    pub lot_multiplier: u32,
    /// Leverage levels available for buying, ascending
    pub leverage_buy: Vec<u32>,
    /// Leverage levels available for selling, ascending
    pub leverage_sell: Vec<u32>,
    /// Taker schedule in source order
    pub fees: Vec<FeeTier>,
    /// Maker schedule in source order
    pub fees_maker: Vec<FeeTier>,
    pub fee_volume_currency: Option<String>,
    pub margin_call: Option<u32>,
    pub margin_stop: Option<u32>,
    pub ordermin: Option<Decimal>,
    pub costmin: Option<Decimal>,
    pub tick_size: Option<Decimal>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
struct AssetPairWire {
    altname: String,
    wsname: Option<String>,
    aclass_base: String,
    base: String,
    aclass_quote: String,
    quote: String,
    pair_decimals: u32,
    cost_decimals: Option<u32>,
    lot_decimals: u32,
    #[serde(default = "one")]
    lot_multiplier: u32,
    #[serde(default)]
    leverage_buy: Vec<u32>,
    #[serde(default)]
    leverage_sell: Vec<u32>,
    #[serde(default)]
    fees: Vec<Value>,
    #[serde(default)]
    fees_maker: Vec<Value>,
    fee_volume_currency: Option<String>,
    margin_call: Option<u32>,
    margin_stop: Option<u32>,
    ordermin: Option<Value>,
    costmin: Option<Value>,
    tick_size: Option<Value>,
    status: Option<String>,
}

fn one() -> u32 {
    1
}

impl AssetPair {
    /// Taker fee for a given 30-day volume
    pub fn taker_fee(&self, volume: Decimal) -> Option<Decimal> {
        tier_for(&self.fees, volume)
    }

    /// Maker fee for a given 30-day volume
    pub fn maker_fee(&self, volume: Decimal) -> Option<Decimal> {
        tier_for(&self.fees_maker, volume)
    }

    /// Whether margin trading is available on this pair
    pub fn supports_margin(&self) -> bool {
        !self.leverage_buy.is_empty() || !self.leverage_sell.is_empty()
    }
}

fn tier_for(tiers: &[FeeTier], volume: Decimal) -> Option<Decimal> {
    tiers
        .iter()
        .take_while(|tier| tier.volume <= volume)
        .last()
        .map(|tier| tier.percent)
}

impl DecodeKeyed for AssetPair {
    const KIND: &'static str = "asset pair";

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self> {
        let wire: AssetPairWire = from_wire(Self::KIND, value)?;
        let tiers = |raw: &[Value]| -> RestResult<Vec<FeeTier>> {
            raw.iter().map(FeeTier::decode).collect()
        };

        Ok(Self {
            id: id.to_string(),
            fees: tiers(&wire.fees)?,
            fees_maker: tiers(&wire.fees_maker)?,
            altname: wire.altname,
            wsname: wire.wsname,
            aclass_base: wire.aclass_base,
            base: wire.base,
            aclass_quote: wire.aclass_quote,
            quote: wire.quote,
            pair_decimals: wire.pair_decimals,
            cost_decimals: wire.cost_decimals,
            lot_decimals: wire.lot_decimals,
            lot_multiplier: wire.lot_multiplier,
            leverage_buy: wire.leverage_buy,
            leverage_sell: wire.leverage_sell,
            fee_volume_currency: wire.fee_volume_currency,
            margin_call: wire.margin_call,
            margin_stop: wire.margin_stop,
            ordermin: optional_decimal(Self::KIND, "ordermin", wire.ordermin.as_ref())?,
            costmin: optional_decimal(Self::KIND, "costmin", wire.costmin.as_ref())?,
            tick_size: optional_decimal(Self::KIND, "tick_size", wire.tick_size.as_ref())?,
            status: wire.status,
        })
    }
}

/// Best ask or bid: `[price, wholeLotVolume, lotVolume]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketAction {
    pub price: Decimal,
    pub whole_lot_volume: i64,
    pub lot_volume: Decimal,
}

impl Decode for MarketAction {
    const KIND: &'static str = "market action";

    fn decode(value: &Value) -> RestResult<Self> {
        let items = positional(Self::KIND, value, 3)?;
        Ok(Self {
            price: decimal_at(Self::KIND, items, 0)?,
            whole_lot_volume: integer_at(Self::KIND, items, 1)?,
            lot_volume: decimal_at(Self::KIND, items, 2)?,
        })
    }
}

/// Last closed trade: `[price, lotVolume]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastTrade {
    pub price: Decimal,
    pub lot_volume: Decimal,
}

impl Decode for LastTrade {
    const KIND: &'static str = "last trade";

    fn decode(value: &Value) -> RestResult<Self> {
        let items = positional(Self::KIND, value, 2)?;
        Ok(Self {
            price: decimal_at(Self::KIND, items, 0)?,
            lot_volume: decimal_at(Self::KIND, items, 1)?,
        })
    }
}

/// A ticker price point whose variant is chosen by element count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotePoint {
    Action(MarketAction),
    Trade(LastTrade),
}

impl QuotePoint {
    pub fn price(&self) -> Decimal {
        match self {
            Self::Action(action) => action.price,
            Self::Trade(trade) => trade.price,
        }
    }
}

impl Decode for QuotePoint {
    const KIND: &'static str = "quote point";

    fn decode(value: &Value) -> RestResult<Self> {
        let items = positional(Self::KIND, value, 2)?;
        if items.len() >= 3 {
            MarketAction::decode(value).map(Self::Action)
        } else {
            LastTrade::decode(value).map(Self::Trade)
        }
    }
}

/// Ticker for one pair
#[derive(Debug, Clone, PartialEq)]
pub struct MarketQuote {
    /// Pair key as returned by the exchange
    pub symbol: String,
    pub ask: MarketAction,
    pub bid: MarketAction,
    pub close: LastTrade,
    pub volume: Window<Decimal>,
    pub vwap: Window<Decimal>,
    pub trade_count: Window<i64>,
    pub low: Window<Decimal>,
    pub high: Window<Decimal>,
    /// Today's opening price
    pub open: Decimal,
}

impl MarketQuote {
    /// Get the mid price (average of bid and ask)
    pub fn mid_price(&self) -> Decimal {
        (self.ask.price + self.bid.price) / Decimal::TWO
    }

    /// Get the spread
    pub fn spread(&self) -> Decimal {
        self.ask.price - self.bid.price
    }

    /// Get spread in basis points
    pub fn spread_bps(&self) -> Option<Decimal> {
        let mid = self.mid_price();
        if mid.is_zero() {
            return None;
        }
        Some(self.spread() / mid * Decimal::from(10_000))
    }
}

impl DecodeKeyed for MarketQuote {
    const KIND: &'static str = "ticker";

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self> {
        let fields = object(Self::KIND, value)?;
        let field = |key: &str| member(Self::KIND, fields, key);
        let open = field("o")?;

        Ok(Self {
            symbol: id.to_string(),
            ask: MarketAction::decode(field("a")?)?,
            bid: MarketAction::decode(field("b")?)?,
            close: LastTrade::decode(field("c")?)?,
            volume: window("ticker volume", field("v")?, decimal_at)?,
            vwap: window("ticker vwap", field("p")?, decimal_at)?,
            trade_count: window("ticker trade count", field("t")?, integer_at)?,
            low: window("ticker low", field("l")?, decimal_at)?,
            high: window("ticker high", field("h")?, decimal_at)?,
            open: decimal_from_value(open)
                .ok_or_else(|| RestError::schema(Self::KIND, "`o` is not a decimal"))?,
        })
    }
}

/// One order book level: `[price, volume, timestamp]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderBookLevel {
    pub price: Decimal,
    pub volume: Decimal,
    pub timestamp: f64,
}

impl Decode for OrderBookLevel {
    const KIND: &'static str = "book level";

    fn decode(value: &Value) -> RestResult<Self> {
        let items = positional(Self::KIND, value, 3)?;
        Ok(Self {
            price: decimal_at(Self::KIND, items, 0)?,
            volume: decimal_at(Self::KIND, items, 1)?,
            timestamp: timestamp_at(Self::KIND, items, 2)?,
        })
    }
}

/// Order book snapshot; both sides kept in the order received
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBook {
    pub pair: String,
    pub asks: Vec<OrderBookLevel>,
    pub bids: Vec<OrderBookLevel>,
}

impl OrderBook {
    /// Get the best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|level| level.price)
    }

    /// Get the best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|level| level.price)
    }

    /// Get the spread
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

impl DecodeKeyed for OrderBook {
    const KIND: &'static str = "order book";

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self> {
        let fields = object(Self::KIND, value)?;
        Ok(Self {
            pair: id.to_string(),
            asks: array_list(member(Self::KIND, fields, "asks")?)?,
            bids: array_list(member(Self::KIND, fields, "bids")?)?,
        })
    }
}

/// OHLC candle: `[time, open, high, low, close, vwap, volume, count]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candle {
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub vwap: Decimal,
    pub volume: Decimal,
    pub count: i64,
}

impl Decode for Candle {
    const KIND: &'static str = "candle";

    fn decode(value: &Value) -> RestResult<Self> {
        let items = positional(Self::KIND, value, 8)?;
        Ok(Self {
            time: integer_at(Self::KIND, items, 0)?,
            open: decimal_at(Self::KIND, items, 1)?,
            high: decimal_at(Self::KIND, items, 2)?,
            low: decimal_at(Self::KIND, items, 3)?,
            close: decimal_at(Self::KIND, items, 4)?,
            vwap: decimal_at(Self::KIND, items, 5)?,
            volume: decimal_at(Self::KIND, items, 6)?,
            count: integer_at(Self::KIND, items, 7)?,
        })
    }
}

/// Public trade: `[price, volume, time, side, ordertype, misc, tradeId]`
#[derive(Debug, Clone, PartialEq)]
pub struct PublicTrade {
    pub price: Decimal,
    pub volume: Decimal,
    pub time: f64,
    pub side: Side,
    /// `Market` or `Limit`
    pub order_type: OrderVariant,
    pub misc: String,
    /// Absent on older responses
    pub trade_id: Option<i64>,
}

impl Decode for PublicTrade {
    const KIND: &'static str = "public trade";

    fn decode(value: &Value) -> RestResult<Self> {
        let items = positional(Self::KIND, value, 6)?;
        let side = text_at(Self::KIND, items, 3)?
            .parse::<Side>()
            .map_err(|e| RestError::schema(Self::KIND, e.to_string()))?;
        let order_type = match text_at(Self::KIND, items, 4)? {
            "m" => OrderVariant::Market,
            "l" => OrderVariant::Limit,
            other => {
                return Err(RestError::schema(
                    Self::KIND,
                    format!("unknown order type `{other}`"),
                ))
            }
        };

        Ok(Self {
            price: decimal_at(Self::KIND, items, 0)?,
            volume: decimal_at(Self::KIND, items, 1)?,
            time: timestamp_at(Self::KIND, items, 2)?,
            side,
            order_type,
            misc: text_at(Self::KIND, items, 5)?.to_string(),
            trade_id: optional_integer(Self::KIND, "trade id", items.get(6))?,
        })
    }
}

/// Spread sample: `[time, bid, ask]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadEntry {
    pub time: i64,
    pub bid: Decimal,
    pub ask: Decimal,
}

impl Decode for SpreadEntry {
    const KIND: &'static str = "spread";

    fn decode(value: &Value) -> RestResult<Self> {
        let items = positional(Self::KIND, value, 3)?;
        Ok(Self {
            time: integer_at(Self::KIND, items, 0)?,
            bid: decimal_at(Self::KIND, items, 1)?,
            ask: decimal_at(Self::KIND, items, 2)?,
        })
    }
}

/// A time series for one pair plus its pagination cursor
///
/// Wire form is `{"<pair>": [[...], ...], "last": <cursor>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    pub pair: String,
    pub entries: Vec<T>,
    /// Pass back as `since` to continue; a number for candles and spreads, a string for trades
    pub last: Option<String>,
}

impl<T: Decode> Decode for Series<T> {
    const KIND: &'static str = T::KIND;

    fn decode(value: &Value) -> RestResult<Self> {
        let fields = object(Self::KIND, value)?;
        let (pair, data) = fields
            .iter()
            .find(|(key, _)| key.as_str() != "last")
            .ok_or_else(|| RestError::schema(Self::KIND, "no pair in series"))?;

        let last = fields.get("last").and_then(|cursor| match cursor {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Ok(Self {
            pair: pair.clone(),
            entries: array_list(data)?,
            last,
        })
    }
}
