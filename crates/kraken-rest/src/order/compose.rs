//! Parameter composition for order placement, editing and batches
//!
//! Derived keys come first (`pair`, `type`, `ordertype`, `volume`, then whatever the variant
//! needs), options are merged on top. `price2` is always the offset character followed by the
//! decimal text; no arithmetic is done on it.

use super::params::ParameterSet;
use super::request::{
    BatchRequest, CloseOrder, EditRequest, OrderId, OrderOptions, OrderRequest, MAX_BATCH_ORDERS,
};
use crate::error::{RestError, RestResult};
use chrono::{DateTime, SecondsFormat, Utc};
use kraken_types::{OffsetType, OrderFlag, OrderVariant};
use rust_decimal::Decimal;
use tracing::debug;

/// Parameters for `AddOrder`
pub fn compose_order(order: &OrderRequest) -> RestResult<ParameterSet> {
    if order.pair.trim().is_empty() {
        return Err(invalid("order has no pair"));
    }
    let mut params = ParameterSet::new().with("pair", order.pair.as_str());
    params.merge(order_fields(order)?);
    Ok(params)
}

/// Parameters for `EditOrder`
///
/// The identifier replaces the pair/side/variant triple; its type picks `txid` or `userref`.
pub fn compose_edit(edit: &EditRequest) -> RestResult<ParameterSet> {
    if !edit.has_changes() {
        return Err(invalid(format!("edit of {} changes nothing", edit.id)));
    }
    if let OrderId::Txid(txid) = &edit.id {
        if txid.trim().is_empty() {
            return Err(invalid("edit has an empty txid"));
        }
    }
    match (edit.offset, edit.price2) {
        (None, Some(_)) => return Err(invalid("edit `price2` needs an offset type")),
        (Some(offset), None) => {
            return Err(invalid(format!("edit offset `{}` has no `price2`", offset.as_char())))
        }
        _ => {}
    }
    check_positive("volume", edit.volume)?;
    check_positive("price", edit.price)?;
    check_positive("price2", edit.price2)?;

    let mut params = ParameterSet::new().with(edit.id.edit_key(), edit.id.to_string());
    params.insert_opt("pair", edit.pair.as_deref());
    params.insert_opt("volume", edit.volume);
    params.insert_opt("price", edit.price);
    if let (Some(offset), Some(price2)) = (edit.offset, edit.price2) {
        params.insert("price2", secondary_price(offset, price2));
    }
    if !edit.flags.is_empty() {
        params.insert("oflags", OrderFlag::join(&edit.flags));
    }
    params.insert_opt("deadline", edit.deadline.map(rfc3339));
    if edit.cancel_response {
        params.insert("cancel_response", "true");
    }
    if edit.validate {
        params.insert("validate", "true");
    }
    params.merge(edit.extra.clone());

    debug!(id = %edit.id, keys = params.len(), "Composed order edit");
    Ok(params)
}

/// Parameters for `AddOrderBatch`
///
/// Each order's keys are nested as `orders[i][key]`; `pair`, `validate` and `deadline` apply to
/// the whole batch.
pub fn compose_batch(batch: &BatchRequest) -> RestResult<ParameterSet> {
    if batch.orders.is_empty() {
        return Err(invalid("batch has no orders"));
    }
    if batch.orders.len() > MAX_BATCH_ORDERS {
        return Err(invalid(format!(
            "batch has {} orders, at most {MAX_BATCH_ORDERS} allowed",
            batch.orders.len()
        )));
    }

    let mut params = ParameterSet::new().with("pair", batch.pair.as_str());
    for (index, order) in batch.orders.iter().enumerate() {
        if order.pair != batch.pair {
            return Err(invalid(format!(
                "order {index} is for {}, batch is for {}",
                order.pair, batch.pair
            )));
        }
        for (key, value) in order_fields(order)? {
            if matches!(key.as_str(), "validate" | "deadline") {
                continue;
            }
            params.insert(nest(index, &key), value);
        }
    }
    if batch.validate {
        params.insert("validate", "true");
    }
    params.insert_opt("deadline", batch.deadline.map(rfc3339));

    debug!(pair = %batch.pair, count = batch.orders.len(), "Composed order batch");
    Ok(params)
}

/// Parameters for `CancelOrder`
///
/// Unlike editing, cancellation takes either identifier under `txid`.
pub fn compose_cancel(id: &OrderId) -> ParameterSet {
    ParameterSet::new().with("txid", id.to_string())
}

/// Parameters for `CancelOrderBatch`
pub fn compose_cancel_batch(ids: &[OrderId]) -> RestResult<ParameterSet> {
    if ids.is_empty() {
        return Err(RestError::InvalidParameter("no orders to cancel".to_string()));
    }
    Ok(ids
        .iter()
        .enumerate()
        .map(|(index, id)| (format!("orders[{index}]"), id.to_string()))
        .collect())
}

/// Everything but `pair`: base keys, variant keys, then options
fn order_fields(order: &OrderRequest) -> RestResult<ParameterSet> {
    if order.volume <= Decimal::ZERO {
        return Err(invalid(format!("volume must be positive, got {}", order.volume)));
    }

    let mut params = ParameterSet::new()
        .with("type", order.side.as_str())
        .with("ordertype", order.variant.as_str())
        .with("volume", order.volume.to_string());

    variant_fields(order, &mut params)?;
    params.merge(option_fields(&order.options)?);

    debug!(
        pair = %order.pair,
        side = %order.side,
        variant = %order.variant,
        keys = params.len(),
        "Composed order"
    );
    Ok(params)
}

fn variant_fields(order: &OrderRequest, params: &mut ParameterSet) -> RestResult<()> {
    let variant = order.variant;
    let payload = &order.payload;

    if variant.needs_price() {
        let price = payload.price.ok_or_else(|| missing(variant, "price"))?;
        check_positive("price", Some(price))?;
        params.insert("price", price.to_string());
    }
    if variant.needs_secondary_price() {
        let price2 = payload.price2.ok_or_else(|| missing(variant, "price2"))?;
        check_positive("price2", Some(price2))?;
        let offset = payload.offset.ok_or_else(|| missing(variant, "offset type"))?;
        params.insert("price2", secondary_price(offset, price2));
    }
    if variant.needs_trigger() {
        let trigger = payload.trigger.ok_or_else(|| missing(variant, "trigger"))?;
        params.insert("trigger", trigger.as_str());
    }
    Ok(())
}

fn option_fields(options: &OrderOptions) -> RestResult<ParameterSet> {
    let mut params = ParameterSet::new();
    params.insert_opt("leverage", options.leverage.as_deref());
    if !options.flags.is_empty() {
        params.insert("oflags", OrderFlag::join(&options.flags));
    }
    params.insert_opt("timeinforce", options.time_in_force.map(|tif| tif.as_str()));
    params.insert_opt("starttm", options.start_time);
    params.insert_opt("expiretm", options.expire_time);
    params.insert_opt("userref", options.userref);
    if options.validate {
        params.insert("validate", "true");
    }
    if let Some(close) = &options.close {
        params.merge(close_fields(close)?);
    }
    params.insert_opt("deadline", options.deadline.map(rfc3339));
    params.merge(options.extra.clone());
    Ok(params)
}

fn close_fields(close: &CloseOrder) -> RestResult<ParameterSet> {
    let mut params = ParameterSet::new().with("close[ordertype]", close.variant.as_str());
    if close.variant.needs_price() {
        let price = close.price.ok_or_else(|| missing(close.variant, "close price"))?;
        check_positive("close price", Some(price))?;
        params.insert("close[price]", price.to_string());
    }
    if close.variant.needs_secondary_price() {
        let price2 = close.price2.ok_or_else(|| missing(close.variant, "close price2"))?;
        check_positive("close price2", Some(price2))?;
        params.insert("close[price2]", price2.to_string());
    }
    Ok(params)
}

/// `orders[i][key]`, keeping any bracketed suffix: `close[price]` becomes
/// `orders[i][close][price]`
fn nest(index: usize, key: &str) -> String {
    match key.split_once('[') {
        Some((head, rest)) => format!("orders[{index}][{head}][{rest}"),
        None => format!("orders[{index}][{key}]"),
    }
}

fn secondary_price(offset: OffsetType, price2: Decimal) -> String {
    format!("{}{}", offset.as_char(), price2)
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn check_positive(field: &str, value: Option<Decimal>) -> RestResult<()> {
    match value {
        Some(v) if v <= Decimal::ZERO => Err(invalid(format!("{field} must be positive, got {v}"))),
        _ => Ok(()),
    }
}

fn missing(variant: OrderVariant, field: &str) -> RestError {
    invalid(format!("{variant} order requires {field}"))
}

fn invalid(message: impl Into<String>) -> RestError {
    RestError::InvalidOrderParameters(message.into())
}
