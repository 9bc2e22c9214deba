//! Demo 2: Order Preview
//!
//! Showcases: order composition for every variant, edits and batches, printed as the exact
//! parameters that would be sent. With KRAKEN_API_KEY and KRAKEN_PRIVATE_KEY set, the limit
//! order is also submitted as validate-only.
//!
//! Run: cargo run --bin order_preview

use colored::*;
use kraken_rest::order::{compose_batch, compose_edit, compose_order, CloseOrder, OrderTime};
use kraken_rest::{BatchRequest, EditRequest, KrakenRestClient, OrderRequest, ParameterSet};
use kraken_types::{OffsetType, OrderVariant, Side, TimeInForce, TriggerType};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn show(title: &str, params: &ParameterSet) {
    println!("{}", title.white().bold());
    for (key, value) in params.iter() {
        println!("    {:<28} {}", key.cyan(), value);
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  ORDER PREVIEW".cyan().bold());
    println!("{}", "  Parameters composed for each order variant".cyan());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let orders = [
        OrderRequest::market("XBTUSD", Side::Buy, dec!(0.01)),
        OrderRequest::limit("XBTUSD", Side::Buy, dec!(0.01), dec!(27500))
            .post_only()
            .with_time_in_force(TimeInForce::GoodTillDate)
            .expiring(OrderTime::In(3600)),
        OrderRequest::stop_loss("XBTUSD", Side::Sell, dec!(0.01), dec!(26000), TriggerType::Last),
        OrderRequest::take_profit("XBTUSD", Side::Sell, dec!(0.01), dec!(32000), TriggerType::Index),
        OrderRequest::stop_loss_limit(
            "XBTUSD",
            Side::Sell,
            dec!(0.01),
            dec!(26000),
            OffsetType::Subtract,
            dec!(25),
            TriggerType::Last,
        ),
        OrderRequest::take_profit_limit(
            "XBTUSD",
            Side::Sell,
            dec!(0.01),
            dec!(32000),
            OffsetType::Percent,
            dec!(0.5),
            TriggerType::Index,
        )
        .with_close(CloseOrder::new(OrderVariant::Limit).with_price(dec!(31000))),
    ];

    for order in &orders {
        match compose_order(order) {
            Ok(params) => show(&format!("  {} {}", order.variant, order.side), &params),
            Err(e) => println!("  {} {}: {}", "✗".red(), order.variant, e),
        }
    }

    let edit = EditRequest::new(1001)
        .for_pair("XBTUSD")
        .with_price(dec!(27600))
        .with_price2(OffsetType::Add, dec!(10.5));
    show("  edit by userref", &compose_edit(&edit)?);

    let batch = BatchRequest::new("XBTUSD")
        .push(OrderRequest::limit("XBTUSD", Side::Buy, dec!(0.01), dec!(27000)))
        .push(OrderRequest::limit("XBTUSD", Side::Sell, dec!(0.01), dec!(33000)))
        .validate_only();
    show("  batch", &compose_batch(&batch)?);

    match KrakenRestClient::from_env() {
        Ok(client) if client.has_credentials() => {
            let order = orders[1].clone().validate_only();
            match client.add_order(&order).await {
                Ok(result) => println!("{} Validated: {}", "✓".green(), result.descr.order),
                Err(e) => println!("{} Rejected: {}", "✗".red(), e),
            }
        }
        Ok(_) => println!("{} No credentials set, skipping validation", "!".yellow()),
        Err(e) => println!("{} {}", "✗".red(), e),
    }

    Ok(())
}
