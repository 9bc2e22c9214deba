//! Funding entities: deposit and withdrawal

use super::{optional_decimal, optional_integer};
use crate::assemble::array_list;
use crate::decode::{from_wire, DecimalOrFlag, Decode};
use crate::error::{RestError, RestResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// Deposit method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositMethod {
    pub method: String,
    /// `None` when the exchange reports no limit
    pub limit: Option<Decimal>,
    pub fee: Option<Decimal>,
    pub minimum: Option<Decimal>,
    pub address_setup_fee: Option<Decimal>,
    pub gen_address: bool,
}

#[derive(Deserialize)]
struct DepositMethodWire {
    method: String,
    limit: Option<DecimalOrFlag>,
    fee: Option<Value>,
    minimum: Option<Value>,
    #[serde(rename = "address-setup-fee")]
    address_setup_fee: Option<Value>,
    #[serde(rename = "gen-address", default)]
    gen_address: bool,
}

impl Decode for DepositMethod {
    const KIND: &'static str = "deposit method";

    fn decode(value: &Value) -> RestResult<Self> {
        let wire: DepositMethodWire = from_wire(Self::KIND, value)?;
        let limit = match wire.limit {
            Some(limit) => limit.into_decimal(Self::KIND, "limit")?,
            None => None,
        };

        Ok(Self {
            method: wire.method,
            limit,
            fee: optional_decimal(Self::KIND, "fee", wire.fee.as_ref())?,
            minimum: optional_decimal(Self::KIND, "minimum", wire.minimum.as_ref())?,
            address_setup_fee: optional_decimal(
                Self::KIND,
                "address-setup-fee",
                wire.address_setup_fee.as_ref(),
            )?,
            gen_address: wire.gen_address,
        })
    }
}

/// A deposit address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositAddress {
    pub address: String,
    /// Unix seconds; `None` when the address does not expire
    pub expiretm: Option<i64>,
    /// Whether the address was generated by this call
    pub new: bool,
    pub tag: Option<String>,
    pub memo: Option<String>,
}

#[derive(Deserialize)]
struct DepositAddressWire {
    address: String,
    expiretm: Option<Value>,
    #[serde(default)]
    new: bool,
    tag: Option<String>,
    memo: Option<String>,
}

impl Decode for DepositAddress {
    const KIND: &'static str = "deposit address";

    fn decode(value: &Value) -> RestResult<Self> {
        let wire: DepositAddressWire = from_wire(Self::KIND, value)?;
        Ok(Self {
            address: wire.address,
            expiretm: optional_integer(Self::KIND, "expiretm", wire.expiretm.as_ref())?
                .filter(|t| *t != 0),
            new: wire.new,
            tag: wire.tag,
            memo: wire.memo,
        })
    }
}

/// Withdrawal quote for an amount and key
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WithdrawInfo {
    pub method: String,
    pub limit: Decimal,
    pub amount: Decimal,
    pub fee: Decimal,
}

impl Decode for WithdrawInfo {
    const KIND: &'static str = "withdraw info";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// Reference id of a submitted withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WithdrawalRef {
    pub refid: String,
}

impl Decode for WithdrawalRef {
    const KIND: &'static str = "withdrawal";

    fn decode(value: &Value) -> RestResult<Self> {
        from_wire(Self::KIND, value)
    }
}

/// Status of a deposit or withdrawal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferStatus {
    pub method: String,
    pub aclass: String,
    pub asset: String,
    pub refid: String,
    /// On-chain or network transaction id
    pub txid: String,
    pub info: String,
    pub amount: Decimal,
    pub fee: Option<Decimal>,
    pub time: i64,
    /// `Initial`, `Pending`, `Settled`, `Success` or `Failure`
    pub status: String,
    /// `return`, `onhold`, `cancel-pending`, `canceled`
    pub status_prop: Option<String>,
}

#[derive(Deserialize)]
struct TransferStatusWire {
    method: String,
    #[serde(default)]
    aclass: String,
    asset: String,
    refid: String,
    #[serde(default)]
    txid: String,
    #[serde(default)]
    info: String,
    amount: Decimal,
    fee: Option<Value>,
    time: i64,
    status: String,
    #[serde(rename = "status-prop")]
    status_prop: Option<String>,
}

impl TransferStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self.status.as_str(), "Success" | "Settled")
    }
}

impl Decode for TransferStatus {
    const KIND: &'static str = "transfer status";

    fn decode(value: &Value) -> RestResult<Self> {
        let wire: TransferStatusWire = from_wire(Self::KIND, value)?;
        Ok(Self {
            fee: optional_decimal(Self::KIND, "fee", wire.fee.as_ref())?,
            method: wire.method,
            aclass: wire.aclass,
            asset: wire.asset,
            refid: wire.refid,
            txid: wire.txid,
            info: wire.info,
            amount: wire.amount,
            time: wire.time,
            status: wire.status,
            status_prop: wire.status_prop,
        })
    }
}

/// Recent deposits or withdrawals
///
/// Arrives either as a bare array or, when paginated, as `{"<kind>": [...], "next_cursor": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferHistory {
    pub entries: Vec<TransferStatus>,
    pub next_cursor: Option<String>,
}

impl Decode for TransferHistory {
    const KIND: &'static str = "transfer history";

    fn decode(value: &Value) -> RestResult<Self> {
        match value {
            Value::Array(_) => Ok(Self {
                entries: array_list(value)?,
                next_cursor: None,
            }),
            Value::Object(fields) => {
                let entries = fields
                    .iter()
                    .find(|(_, v)| v.is_array())
                    .map(|(_, v)| array_list(v))
                    .transpose()?
                    .unwrap_or_default();
                let next_cursor = fields.get("next_cursor").and_then(|cursor| match cursor {
                    Value::String(s) => Some(s.clone()),
                    _ => None,
                });
                Ok(Self { entries, next_cursor })
            }
            _ => Err(RestError::schema(Self::KIND, "expected array or object")),
        }
    }
}
