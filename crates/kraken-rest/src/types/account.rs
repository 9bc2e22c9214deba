//! Account entities: balances, orders, trades, positions, ledger

use super::{fee_or_absent, nonzero_time, optional_decimal, ABSENT_FEE};
use crate::assemble::{count_of, keyed_list_under};
use crate::decode::{from_wire, object, Decode, DecodeKeyed};
use crate::error::{RestError, RestResult};
use kraken_types::{decimal_from_value, Side};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Asset balances, keyed by asset id
///
/// Unknown assets are kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Balances(pub HashMap<String, Decimal>);

impl Balances {
    /// Get balance for a specific asset
    pub fn get(&self, asset: &str) -> Option<Decimal> {
        self.0.get(asset).copied()
    }

    /// Get all non-zero balances
    pub fn non_zero(&self) -> HashMap<String, Decimal> {
        self.0
            .iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(asset, balance)| (asset.clone(), *balance))
            .collect()
    }

    /// Iterate over all balances
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Decode for Balances {
    const KIND: &'static str = "balance";

    fn decode(value: &Value) -> RestResult<Self> {
        object(Self::KIND, value)?
            .iter()
            .map(|(asset, amount)| {
                decimal_from_value(amount)
                    .map(|amount| (asset.clone(), amount))
                    .ok_or_else(|| RestError::schema(Self::KIND, format!("`{asset}` is not a decimal")))
            })
            .collect::<RestResult<_>>()
            .map(Self)
    }
}

/// Balance with credit and hold amounts, keyed by asset id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedBalance {
    pub asset: String,
    pub balance: Decimal,
    pub credit: Decimal,
    pub credit_used: Decimal,
    pub hold_trade: Decimal,
}

#[derive(Deserialize)]
struct ExtendedBalanceWire {
    balance: Decimal,
    #[serde(default)]
    credit: Decimal,
    #[serde(default)]
    credit_used: Decimal,
    #[serde(default)]
    hold_trade: Decimal,
}

impl ExtendedBalance {
    /// Amount free for new orders
    pub fn available(&self) -> Decimal {
        self.balance + self.credit - self.credit_used - self.hold_trade
    }
}

impl DecodeKeyed for ExtendedBalance {
    const KIND: &'static str = "extended balance";

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self> {
        let wire: ExtendedBalanceWire = from_wire(Self::KIND, value)?;
        Ok(Self {
            asset: id.to_string(),
            balance: wire.balance,
            credit: wire.credit,
            credit_used: wire.credit_used,
            hold_trade: wire.hold_trade,
        })
    }
}

/// Margin account summary; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TradeBalance {
    #[serde(rename = "eb")]
    pub equivalent_balance: Option<Decimal>,
    #[serde(rename = "tb")]
    pub trade_balance: Option<Decimal>,
    #[serde(rename = "m")]
    pub margin: Option<Decimal>,
    #[serde(rename = "n")]
    pub unrealized_pnl: Option<Decimal>,
    #[serde(rename = "c")]
    pub cost_basis: Option<Decimal>,
    #[serde(rename = "v")]
    pub valuation: Option<Decimal>,
    #[serde(rename = "e")]
    pub equity: Option<Decimal>,
    #[serde(rename = "mf")]
    pub free_margin: Option<Decimal>,
    #[serde(rename = "ml")]
    pub margin_level: Option<Decimal>,
    #[serde(rename = "uv")]
    pub unexecuted_value: Option<Decimal>,
}

impl Decode for TradeBalance {
    const KIND: &'static str = "trade balance";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// Order description as echoed back by the exchange
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderDescription {
    pub pair: String,
    #[serde(rename = "type")]
    pub side: Side,
    /// Order type; may name variants this client does not place
    pub ordertype: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub price2: Decimal,
    #[serde(default)]
    pub leverage: String,
    /// Human-readable summary
    #[serde(default)]
    pub order: String,
    /// Conditional close summary; empty when none
    #[serde(default)]
    pub close: String,
}

/// An order, keyed by transaction id
#[derive(Debug, Clone, PartialEq)]
pub struct OrderInfo {
    /// Transaction id
    pub id: String,
    pub refid: Option<String>,
    pub userref: Option<i64>,
    pub cl_ord_id: Option<String>,
    /// `pending`, `open`, `closed`, `canceled` or `expired`
    pub status: String,
    pub opentm: f64,
    pub starttm: Option<f64>,
    pub expiretm: Option<f64>,
    pub closetm: Option<f64>,
    pub descr: OrderDescription,
    pub vol: Decimal,
    pub vol_exec: Decimal,
    pub cost: Decimal,
    /// [`ABSENT_FEE`] when not reported
    pub fee: Decimal,
    /// Average fill price
    pub price: Decimal,
    pub stopprice: Option<Decimal>,
    pub limitprice: Option<Decimal>,
    pub trigger: Option<String>,
    pub misc: String,
    pub oflags: String,
    pub reason: Option<String>,
    /// Trade ids, present only when trades were requested
    pub trades: Vec<String>,
}

#[derive(Deserialize)]
struct OrderInfoWire {
    refid: Option<String>,
    userref: Option<i64>,
    cl_ord_id: Option<String>,
    status: String,
    opentm: f64,
    starttm: Option<f64>,
    expiretm: Option<f64>,
    closetm: Option<f64>,
    descr: OrderDescription,
    vol: Decimal,
    vol_exec: Decimal,
    cost: Decimal,
    fee: Option<Value>,
    price: Decimal,
    stopprice: Option<Value>,
    limitprice: Option<Value>,
    trigger: Option<String>,
    #[serde(default)]
    misc: String,
    #[serde(default)]
    oflags: String,
    reason: Option<String>,
    #[serde(default)]
    trades: Vec<String>,
}

impl OrderInfo {
    pub fn is_open(&self) -> bool {
        matches!(self.status.as_str(), "pending" | "open")
    }

    /// Volume not yet executed
    pub fn remaining_volume(&self) -> Decimal {
        self.vol - self.vol_exec
    }

    pub fn has_fee(&self) -> bool {
        self.fee != ABSENT_FEE
    }
}

impl DecodeKeyed for OrderInfo {
    const KIND: &'static str = "order";

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self> {
        let wire: OrderInfoWire = from_wire(Self::KIND, value)?;
        Ok(Self {
            id: id.to_string(),
            fee: fee_or_absent(Self::KIND, wire.fee.as_ref())?,
            stopprice: optional_decimal(Self::KIND, "stopprice", wire.stopprice.as_ref())?,
            limitprice: optional_decimal(Self::KIND, "limitprice", wire.limitprice.as_ref())?,
            refid: wire.refid,
            userref: wire.userref,
            cl_ord_id: wire.cl_ord_id,
            status: wire.status,
            opentm: wire.opentm,
            starttm: nonzero_time(wire.starttm),
            expiretm: nonzero_time(wire.expiretm),
            closetm: wire.closetm,
            descr: wire.descr,
            vol: wire.vol,
            vol_exec: wire.vol_exec,
            cost: wire.cost,
            price: wire.price,
            trigger: wire.trigger,
            misc: wire.misc,
            oflags: wire.oflags,
            reason: wire.reason,
            trades: wire.trades,
        })
    }
}

/// Result of `OpenOrders`: `{"open": {txid: order}}`
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOrders {
    pub orders: Vec<OrderInfo>,
}

impl Decode for OpenOrders {
    const KIND: &'static str = "open orders";

    fn decode(value: &Value) -> RestResult<Self> {
        Ok(Self {
            orders: keyed_list_under(value, "open")?,
        })
    }
}

/// Result of `ClosedOrders`: `{"closed": {txid: order}, "count": n}`
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedOrders {
    pub orders: Vec<OrderInfo>,
    /// Total matching orders across all pages
    pub count: Option<u64>,
}

impl Decode for ClosedOrders {
    const KIND: &'static str = "closed orders";

    fn decode(value: &Value) -> RestResult<Self> {
        Ok(Self {
            orders: keyed_list_under(value, "closed")?,
            count: count_of(value),
        })
    }
}

/// An account trade, keyed by trade id
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEntry {
    /// Trade id
    pub id: String,
    pub ordertxid: String,
    pub postxid: Option<String>,
    pub pair: String,
    pub time: f64,
    pub side: Side,
    pub ordertype: String,
    pub price: Decimal,
    pub cost: Decimal,
    /// [`ABSENT_FEE`] when not reported
    pub fee: Decimal,
    pub vol: Decimal,
    pub margin: Option<Decimal>,
    pub leverage: Option<String>,
    pub misc: String,
    pub trade_id: Option<i64>,
    pub maker: Option<bool>,
    pub posstatus: Option<String>,
    pub ledgers: Vec<String>,
}

#[derive(Deserialize)]
struct TradeEntryWire {
    ordertxid: String,
    postxid: Option<String>,
    pair: String,
    time: f64,
    #[serde(rename = "type")]
    side: Side,
    ordertype: String,
    price: Decimal,
    cost: Decimal,
    fee: Option<Value>,
    vol: Decimal,
    margin: Option<Value>,
    leverage: Option<String>,
    #[serde(default)]
    misc: String,
    trade_id: Option<i64>,
    maker: Option<bool>,
    posstatus: Option<String>,
    #[serde(default)]
    ledgers: Vec<String>,
}

impl TradeEntry {
    pub fn has_fee(&self) -> bool {
        self.fee != ABSENT_FEE
    }
}

impl DecodeKeyed for TradeEntry {
    const KIND: &'static str = "trade";

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self> {
        let wire: TradeEntryWire = from_wire(Self::KIND, value)?;
        Ok(Self {
            id: id.to_string(),
            fee: fee_or_absent(Self::KIND, wire.fee.as_ref())?,
            margin: optional_decimal(Self::KIND, "margin", wire.margin.as_ref())?,
            ordertxid: wire.ordertxid,
            postxid: wire.postxid,
            pair: wire.pair,
            time: wire.time,
            side: wire.side,
            ordertype: wire.ordertype,
            price: wire.price,
            cost: wire.cost,
            vol: wire.vol,
            leverage: wire.leverage,
            misc: wire.misc,
            trade_id: wire.trade_id,
            maker: wire.maker,
            posstatus: wire.posstatus,
            ledgers: wire.ledgers,
        })
    }
}

/// Result of `TradesHistory`: `{"trades": {id: trade}, "count": n}`
#[derive(Debug, Clone, PartialEq)]
pub struct TradeHistory {
    pub trades: Vec<TradeEntry>,
    pub count: Option<u64>,
}

impl Decode for TradeHistory {
    const KIND: &'static str = "trade history";

    fn decode(value: &Value) -> RestResult<Self> {
        Ok(Self {
            trades: keyed_list_under(value, "trades")?,
            count: count_of(value),
        })
    }
}

/// An open margin position, keyed by position id
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Position id
    pub id: String,
    pub ordertxid: String,
    pub posstatus: String,
    pub pair: String,
    pub time: f64,
    pub side: Side,
    pub ordertype: String,
    pub cost: Decimal,
    /// [`ABSENT_FEE`] when not reported
    pub fee: Decimal,
    pub vol: Decimal,
    pub vol_closed: Decimal,
    pub margin: Decimal,
    /// Present only when calculations were requested
    pub value: Option<Decimal>,
    pub net: Option<Decimal>,
    pub terms: Option<String>,
    pub rollovertm: Option<String>,
    pub misc: String,
    pub oflags: String,
}

#[derive(Deserialize)]
struct PositionWire {
    ordertxid: String,
    posstatus: String,
    pair: String,
    time: f64,
    #[serde(rename = "type")]
    side: Side,
    ordertype: String,
    cost: Decimal,
    fee: Option<Value>,
    vol: Decimal,
    vol_closed: Decimal,
    margin: Decimal,
    value: Option<Value>,
    net: Option<Value>,
    terms: Option<String>,
    rollovertm: Option<String>,
    #[serde(default)]
    misc: String,
    #[serde(default)]
    oflags: String,
}

impl Position {
    /// Volume still open
    pub fn open_volume(&self) -> Decimal {
        self.vol - self.vol_closed
    }

    pub fn has_fee(&self) -> bool {
        self.fee != ABSENT_FEE
    }
}

impl DecodeKeyed for Position {
    const KIND: &'static str = "position";

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self> {
        let wire: PositionWire = from_wire(Self::KIND, value)?;
        Ok(Self {
            id: id.to_string(),
            fee: fee_or_absent(Self::KIND, wire.fee.as_ref())?,
            value: optional_decimal(Self::KIND, "value", wire.value.as_ref())?,
            net: optional_decimal(Self::KIND, "net", wire.net.as_ref())?,
            ordertxid: wire.ordertxid,
            posstatus: wire.posstatus,
            pair: wire.pair,
            time: wire.time,
            side: wire.side,
            ordertype: wire.ordertype,
            cost: wire.cost,
            vol: wire.vol,
            vol_closed: wire.vol_closed,
            margin: wire.margin,
            terms: wire.terms,
            rollovertm: wire.rollovertm,
            misc: wire.misc,
            oflags: wire.oflags,
        })
    }
}

/// A ledger entry, keyed by ledger id
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Ledger id
    pub id: String,
    pub refid: String,
    pub time: f64,
    /// `trade`, `deposit`, `withdrawal`, `transfer`, `margin`, ...
    pub kind: String,
    pub subtype: Option<String>,
    pub aclass: String,
    pub asset: String,
    pub amount: Decimal,
    /// [`ABSENT_FEE`] when not reported
    pub fee: Decimal,
    /// Resulting balance
    pub balance: Decimal,
}

#[derive(Deserialize)]
struct LedgerEntryWire {
    refid: String,
    time: f64,
    #[serde(rename = "type")]
    kind: String,
    subtype: Option<String>,
    aclass: String,
    asset: String,
    amount: Decimal,
    fee: Option<Value>,
    balance: Decimal,
}

impl LedgerEntry {
    pub fn has_fee(&self) -> bool {
        self.fee != ABSENT_FEE
    }
}

impl DecodeKeyed for LedgerEntry {
    const KIND: &'static str = "ledger entry";

    fn decode_keyed(id: &str, value: &Value) -> RestResult<Self> {
        let wire: LedgerEntryWire = from_wire(Self::KIND, value)?;
        Ok(Self {
            id: id.to_string(),
            fee: fee_or_absent(Self::KIND, wire.fee.as_ref())?,
            refid: wire.refid,
            time: wire.time,
            kind: wire.kind,
            subtype: wire.subtype.filter(|s| !s.is_empty()),
            aclass: wire.aclass,
            asset: wire.asset,
            amount: wire.amount,
            balance: wire.balance,
        })
    }
}

/// Result of `Ledgers`: `{"ledger": {id: entry}, "count": n}`
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerPage {
    pub entries: Vec<LedgerEntry>,
    pub count: Option<u64>,
}

impl Decode for LedgerPage {
    const KIND: &'static str = "ledger";

    fn decode(value: &Value) -> RestResult<Self> {
        Ok(Self {
            entries: keyed_list_under(value, "ledger")?,
            count: count_of(value),
        })
    }
}

/// Fee tier information for one pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeeInfo {
    /// Current fee in percent
    pub fee: Decimal,
    pub minfee: Option<Decimal>,
    pub maxfee: Option<Decimal>,
    pub nextfee: Option<Decimal>,
    pub nextvolume: Option<Decimal>,
    pub tiervolume: Option<Decimal>,
}

/// 30-day trading volume and the fees it earns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeVolume {
    pub currency: String,
    pub volume: Decimal,
    /// Taker fees per requested pair
    pub fees: HashMap<String, FeeInfo>,
    /// Maker fees per requested pair
    pub fees_maker: HashMap<String, FeeInfo>,
}

#[derive(Deserialize)]
struct TradeVolumeWire {
    currency: String,
    volume: Decimal,
    fees: Option<HashMap<String, FeeInfo>>,
    fees_maker: Option<HashMap<String, FeeInfo>>,
}

impl Decode for TradeVolume {
    const KIND: &'static str = "trade volume";

    fn decode(value: &Value) -> RestResult<Self> {
        let wire: TradeVolumeWire = from_wire(Self::KIND, value)?;
        Ok(Self {
            currency: wire.currency,
            volume: wire.volume,
            fees: wire.fees.unwrap_or_default(),
            fees_maker: wire.fees_maker.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn closed_order(fee: Option<&str>) -> Value {
        let mut body = json!({
            "refid": null,
            "userref": 0,
            "status": "closed",
            "reason": null,
            "opentm": 1688665496.7808,
            "closetm": 1688665499.1922,
            "starttm": 0,
            "expiretm": 0,
            "descr": {
                "pair": "XBTUSD",
                "type": "buy",
                "ordertype": "stop-loss-limit",
                "price": "27500.0",
                "price2": "0",
                "leverage": "none",
                "order": "buy 1.25000000 XBTUSD @ stop loss 27500.0 -> limit 0",
                "close": ""
            },
            "vol": "1.25000000",
            "vol_exec": "1.25000000",
            "cost": "27526.2",
            "price": "27500.0",
            "stopprice": "0.00000",
            "limitprice": "0.00000",
            "misc": "",
            "oflags": "fciq",
            "trigger": "index"
        });
        if let Some(fee) = fee {
            body["fee"] = json!(fee);
        }
        body
    }

    #[test]
    fn test_balances_accept_unknown_assets() {
        let balances = Balances::decode(&json!({
            "ZUSD": "171288.6158",
            "XXBT": "0.0000000000",
            "NEWCOIN.F": "12.5"
        }))
        .unwrap();
        assert_eq!(balances.len(), 3);
        assert_eq!(balances.get("NEWCOIN.F"), Some(dec!(12.5)));
        assert_eq!(balances.non_zero().len(), 2);
    }

    #[test]
    fn test_balance_rejects_garbage() {
        let err = Balances::decode(&json!({"ZUSD": "lots"})).unwrap_err();
        assert!(matches!(err, RestError::SchemaMismatch { entity: "balance", .. }));
    }

    #[test]
    fn test_extended_balance_available() {
        let entry = ExtendedBalance::decode_keyed(
            "ZUSD",
            &json!({"balance": "25435.21", "hold_trade": "8249.76"}),
        )
        .unwrap();
        assert_eq!(entry.asset, "ZUSD");
        assert_eq!(entry.available(), dec!(17185.45));
    }

    #[test]
    fn test_trade_balance_partial() {
        let balance = TradeBalance::decode(&json!({"eb": "1101.3425", "tb": "392.2264"})).unwrap();
        assert_eq!(balance.equivalent_balance, Some(dec!(1101.3425)));
        assert_eq!(balance.margin_level, None);
    }

    #[test]
    fn test_order_with_fee() {
        let order = OrderInfo::decode_keyed("OQCLML-BW3P3-BUCMWZ", &closed_order(Some("26.2")))
            .unwrap();
        assert_eq!(order.id, "OQCLML-BW3P3-BUCMWZ");
        assert_eq!(order.fee, dec!(26.2));
        assert!(order.has_fee());
        assert_eq!(order.descr.side, Side::Buy);
        assert_eq!(order.starttm, None);
        assert_eq!(order.remaining_volume(), Decimal::ZERO);
        assert!(!order.is_open());
    }

    #[test]
    fn test_order_without_fee_uses_sentinel() {
        let order = OrderInfo::decode_keyed("OQCLML-BW3P3-BUCMWZ", &closed_order(None)).unwrap();
        assert_eq!(order.fee, ABSENT_FEE);
        assert!(!order.has_fee());
    }

    #[test]
    fn test_closed_orders_page() {
        let page = ClosedOrders::decode(&json!({
            "closed": {"OQCLML-BW3P3-BUCMWZ": closed_order(Some("0"))},
            "count": 1
        }))
        .unwrap();
        assert_eq!(page.orders.len(), 1);
        assert_eq!(page.count, Some(1));
    }

    #[test]
    fn test_ledger_key_becomes_id() {
        let page = LedgerPage::decode(&json!({
            "ledger": {
                "L4UESK-KG3EQ-UFO4L4": {
                    "refid": "TJKLXX-PGMUI-4NTLXU",
                    "time": 1688464484.1787,
                    "type": "trade",
                    "subtype": "",
                    "aclass": "currency",
                    "asset": "ZGBP",
                    "amount": "-24.5000",
                    "fee": "0.0490",
                    "balance": "459567.9171"
                }
            },
            "count": 1
        }))
        .unwrap();
        let entry = &page.entries[0];
        assert_eq!(entry.id, "L4UESK-KG3EQ-UFO4L4");
        assert_eq!(entry.amount, dec!(-24.5000));
        assert_eq!(entry.subtype, None);
    }

    #[test]
    fn test_position_without_fee() {
        let position = Position::decode_keyed(
            "TF5GVO-T7ZZ2-6NBKBI",
            &json!({
                "ordertxid": "OLWNFG-LLH4R-D6SFFP",
                "posstatus": "open",
                "pair": "XXBTZUSD",
                "time": 1605280097.8294,
                "type": "buy",
                "ordertype": "limit",
                "cost": "104610.52842",
                "vol": "8.82412861",
                "vol_closed": "0.20200000",
                "margin": "20922.10568",
                "value": "258797.5",
                "net": "+154186.9728",
                "terms": "0.0100% per 4 hours",
                "rollovertm": "1616672637",
                "misc": "",
                "oflags": ""
            }),
        )
        .unwrap();
        assert_eq!(position.id, "TF5GVO-T7ZZ2-6NBKBI");
        assert!(!position.has_fee());
        assert_eq!(position.open_volume(), dec!(8.62212861));
        assert_eq!(position.net, Some(dec!(154186.9728)));
    }

    #[test]
    fn test_trade_volume() {
        let volume = TradeVolume::decode(&json!({
            "currency": "ZUSD",
            "volume": "200709587.4223",
            "fees": {
                "XXBTZUSD": {
                    "fee": "0.1000",
                    "minfee": "0.1000",
                    "maxfee": "0.2600",
                    "nextfee": null,
                    "nextvolume": null,
                    "tiervolume": "10000000.0000"
                }
            }
        }))
        .unwrap();
        assert_eq!(volume.fees["XXBTZUSD"].fee, dec!(0.1));
        assert_eq!(volume.fees["XXBTZUSD"].nextfee, None);
        assert!(volume.fees_maker.is_empty());
    }
}
