//! Common test utilities and fixtures for integration tests
//!
//! Response bodies follow the shapes Kraken's REST API returns, trimmed to what the tests need.

#![allow(dead_code)]

use async_trait::async_trait;
use kraken_rest::{KrakenRestClient, ParameterSet, RestError, RestResult, Transport};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One request seen by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub params: ParameterSet,
    pub signed: bool,
}

/// In-memory transport that replays canned bodies and records every request
pub struct MockTransport {
    bodies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<RecordedCall>>,
    can_sign: bool,
}

impl MockTransport {
    pub fn new(bodies: &[&str]) -> Self {
        Self {
            bodies: Mutex::new(bodies.iter().map(|b| b.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
            can_sign: true,
        }
    }

    /// A transport without credentials
    pub fn public(bodies: &[&str]) -> Self {
        Self {
            can_sign: false,
            ..Self::new(bodies)
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls().pop().expect("no request was sent")
    }

    fn reply(&self, path: &str, params: ParameterSet, signed: bool) -> RestResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            params,
            signed,
        });
        self.bodies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RestError::Config(format!("no canned body left for {path}")))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_public(&self, path: &str, params: ParameterSet) -> RestResult<String> {
        self.reply(path, params, false)
    }

    async fn send_signed(&self, path: &str, params: ParameterSet) -> RestResult<String> {
        if !self.can_sign {
            return Err(RestError::AuthRequired);
        }
        self.reply(path, params, true)
    }

    fn can_sign(&self) -> bool {
        self.can_sign
    }
}

/// Client over a [`MockTransport`] replaying `bodies` in order
pub fn mock_client(bodies: &[&str]) -> KrakenRestClient<MockTransport> {
    KrakenRestClient::with_transport(MockTransport::new(bodies))
}

pub const SERVER_TIME: &str = r#"{
    "error": [],
    "result": {"unixtime": 1688669448, "rfc1123": "Thu, 06 Jul 23 18:50:48 +0000"}
}"#;

pub const TICKER: &str = r#"{
    "error": [],
    "result": {
        "XXBTZUSD": {
            "a": ["30300.10000", "1", "1.000"],
            "b": ["30300.00000", "1", "1.000"],
            "c": ["30303.20000", "0.00067643"],
            "v": ["4083.67001100", "4412.73601799"],
            "p": ["30706.77771", "30689.13205"],
            "t": [34619, 38907],
            "l": ["29868.30000", "29868.30000"],
            "h": ["31631.00000", "31631.00000"],
            "o": "30502.80000"
        }
    }
}"#;

/// Ticker whose close array is missing its volume
pub const TICKER_SHORT_CLOSE: &str = r#"{
    "error": [],
    "result": {
        "XXBTZUSD": {
            "a": ["30300.10000", "1", "1.000"],
            "b": ["30300.00000", "1", "1.000"],
            "c": ["30303.20000"],
            "v": ["4083.67001100", "4412.73601799"],
            "p": ["30706.77771", "30689.13205"],
            "t": [34619, 38907],
            "l": ["29868.30000", "29868.30000"],
            "h": ["31631.00000", "31631.00000"],
            "o": "30502.80000"
        }
    }
}"#;

pub const ASSET_PAIRS: &str = r#"{
    "error": [],
    "result": {
        "XXBTZUSD": {
            "altname": "XBTUSD",
            "wsname": "XBT/USD",
            "aclass_base": "currency",
            "base": "XXBT",
            "aclass_quote": "currency",
            "quote": "ZUSD",
            "lot": "unit",
            "cost_decimals": 5,
            "pair_decimals": 1,
            "lot_decimals": 8,
            "lot_multiplier": 1,
            "leverage_buy": [2, 3, 4, 5],
            "leverage_sell": [2, 3, 4, 5],
            "fees": [[0, 0.26], [50000, 0.24], [100000, 0.22]],
            "fees_maker": [[0, 0.16], [50000, 0.14], [100000, 0.12]],
            "fee_volume_currency": "ZUSD",
            "margin_call": 80,
            "margin_stop": 40,
            "ordermin": "0.0001",
            "costmin": "0.5",
            "tick_size": "0.1",
            "status": "online"
        },
        "XETHXXBT": {
            "altname": "ETHXBT",
            "wsname": "ETH/XBT",
            "aclass_base": "currency",
            "base": "XETH",
            "aclass_quote": "currency",
            "quote": "XXBT",
            "lot": "unit",
            "pair_decimals": 5,
            "lot_decimals": 8,
            "lot_multiplier": 1,
            "leverage_buy": [],
            "leverage_sell": [],
            "fees": [[0, 0.26], [50000, 0.24]],
            "fees_maker": [[0, 0.16], [50000, 0.14]],
            "ordermin": "0.01"
        }
    }
}"#;

pub const DEPTH: &str = r#"{
    "error": [],
    "result": {
        "XXBTZUSD": {
            "asks": [
                ["30384.10000", "2.059", 1688671659],
                ["30387.90000", "1.500", 1688671380]
            ],
            "bids": [
                ["30297.00000", "1.115", 1688671636],
                ["30296.70000", "2.002", 1688671674]
            ]
        }
    }
}"#;

pub const OHLC: &str = r#"{
    "error": [],
    "result": {
        "XXBTZUSD": [
            [1688671200, "30306.1", "30306.2", "30305.7", "30305.7", "30306.1", "3.39243896", 23],
            [1688671260, "30304.5", "30304.5", "30300.0", "30300.0", "30300.0", "4.42996871", 18]
        ],
        "last": 1688672160
    }
}"#;

pub const RECENT_TRADES: &str = r#"{
    "error": [],
    "result": {
        "XXBTZUSD": [
            ["30243.40000", "0.34507674", 1688669597.8277369, "b", "m", "", 61044952],
            ["30243.30000", "0.00376960", 1688669598.2804112, "s", "l", "", 61044953]
        ],
        "last": "1688671969993150842"
    }
}"#;

pub const BALANCE: &str = r#"{
    "error": [],
    "result": {
        "ZUSD": "171288.6158",
        "ZEUR": "504861.8946",
        "XXBT": "1011.1908877900",
        "XETH": "0.0000000000",
        "NEWCOIN": "42"
    }
}"#;

pub const LEDGERS: &str = r#"{
    "error": [],
    "result": {
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
            },
            "LMKZCZ-Z3GVL-CXKK4H": {
                "refid": "TBZIP2-F6QOU-TMB6FY",
                "time": 1688444262.8888,
                "type": "deposit",
                "subtype": "",
                "aclass": "currency",
                "asset": "ZUSD",
                "amount": "0.9852",
                "balance": "52732.1132"
            }
        },
        "count": 2
    }
}"#;

pub const CLOSED_ORDERS: &str = r#"{
    "error": [],
    "result": {
        "closed": {
            "O37652-RJWRT-IMO74O": {
                "refid": null,
                "userref": 1,
                "status": "canceled",
                "reason": "User requested",
                "opentm": 1688148493.7708,
                "closetm": 1688148610.0482,
                "starttm": 0,
                "expiretm": 0,
                "descr": {
                    "pair": "XBTGBP",
                    "type": "buy",
                    "ordertype": "stop-loss-limit",
                    "price": "23667.0",
                    "price2": "0",
                    "leverage": "none",
                    "order": "buy 0.00100000 XBTGBP @ limit 23667.0",
                    "close": ""
                },
                "vol": "0.00100000",
                "vol_exec": "0.00000000",
                "cost": "0.00000",
                "fee": "0.00000",
                "price": "0.00000",
                "stopprice": "0.00000",
                "limitprice": "0.00000",
                "misc": "",
                "oflags": "fciq",
                "trigger": "index"
            },
            "O6YDQ5-LOMWU-37YKEE": {
                "refid": null,
                "userref": 36493663,
                "status": "canceled",
                "reason": "User requested",
                "opentm": 1688148493.7708,
                "closetm": 1688148610.0477,
                "starttm": 0,
                "expiretm": 0,
                "descr": {
                    "pair": "XBTEUR",
                    "type": "buy",
                    "ordertype": "take-profit-limit",
                    "price": "27743.0",
                    "price2": "0",
                    "leverage": "none",
                    "order": "buy 0.00100000 XBTEUR @ limit 27743.0",
                    "close": ""
                },
                "vol": "0.00100000",
                "vol_exec": "0.00000000",
                "cost": "0.00000",
                "price": "0.00000",
                "misc": "",
                "oflags": "fciq"
            }
        },
        "count": 2
    }
}"#;

pub const INSUFFICIENT_FUNDS: &str = r#"{"error":["EOrder:Insufficient funds"],"result":{}}"#;

pub const ADD_ORDER: &str = r#"{
    "error": [],
    "result": {
        "descr": {"order": "buy 1.25000000 XBTUSD @ limit 27500.0"},
        "txid": ["OU22CG-KLAF2-FWUDD7"]
    }
}"#;

pub const BATCH_ORDERS: &str = r#"{
    "error": [],
    "result": {
        "orders": [
            {"txid": "65LRD3-AHGRA-YAH8V5", "descr": {"order": "buy 1.02010000 XBTUSD @ limit 29000.0"}},
            {"error": "EOrder:Insufficient funds"},
            {"txid": "OPPRT6-MQOFI-EWRG3M", "descr": {"order": "sell 0.21000000 XBTUSD @ limit 40000.0"}}
        ]
    }
}"#;

pub const BATCH_SINGLE: &str = r#"{
    "error": [],
    "result": {
        "descr": {"order": "buy 1.02010000 XBTUSD @ limit 29000.0"},
        "txid": ["65LRD3-AHGRA-YAH8V5"]
    }
}"#;

pub const EDIT_ORDER: &str = r#"{
    "error": [],
    "result": {
        "status": "ok",
        "txid": "OFVXHJ-KPQ3B-VS7ELA",
        "originaltxid": "OHYO67-6LP66-HMQ437",
        "volume": "0.00030000",
        "price": "19500.0",
        "price2": "+32.5",
        "orders_cancelled": 1,
        "descr": {"order": "buy 0.00030000 XXBTZGBP @ limit 19500.0"}
    }
}"#;

pub const CANCEL_ORDER: &str = r#"{"error": [], "result": {"count": 1}}"#;

pub const WITHDRAW_STATUS: &str = r#"{
    "error": [],
    "result": [
        {
            "method": "Bitcoin",
            "aclass": "currency",
            "asset": "XXBT",
            "refid": "FTQcuak-V6Za8qrWnhzTx67yYHz8Tg",
            "txid": "5f7e0f5b6d5d0e4b7f0bd4e1e3c4e3d1",
            "info": "bc1qxyz",
            "amount": "0.72485000",
            "fee": "0.00015000",
            "time": 1688014586,
            "status": "Pending"
        }
    ]
}"#;
