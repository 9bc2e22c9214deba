//! Demo 1: Market Snapshot
//!
//! Showcases: public ticker, order book and fee schedule decoding
//!
//! Run: cargo run --bin market_snapshot -- XBTUSD

use colored::*;
use kraken_rest::KrakenRestClient;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pair = std::env::args().nth(1).unwrap_or_else(|| "XBTUSD".to_string());

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  MARKET SNAPSHOT".cyan().bold());
    println!("{}", format!("  {pair} via REST").cyan());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let client = KrakenRestClient::new()?;
    let market = client.market();

    let status = market.get_system_status().await?;
    let marker = if status.is_online() { "✓".green() } else { "!".yellow() };
    println!("{} Exchange status: {}", marker, status.status);

    let quote = market.get_ticker(&pair).await?;
    println!();
    println!("  {:<14} {}", "Symbol".white().bold(), quote.symbol);
    println!("  {:<14} {}", "Best bid".white().bold(), quote.bid.price.to_string().green());
    println!("  {:<14} {}", "Best ask".white().bold(), quote.ask.price.to_string().red());
    println!("  {:<14} {}", "Mid".white().bold(), quote.mid_price());
    if let Some(bps) = quote.spread_bps() {
        println!("  {:<14} {:.2} bps", "Spread".white().bold(), bps);
    }
    println!(
        "  {:<14} {} today / {} 24h",
        "Volume".white().bold(),
        quote.volume.today,
        quote.volume.last_24h
    );

    let book = market.get_orderbook(&pair, Some(5)).await?;
    println!();
    println!("  {:>16}  {:>14}  │  {:<16}  {:<14}", "BID", "VOLUME", "ASK", "VOLUME");
    println!("  {}", "─".repeat(68));
    for (bid, ask) in book.bids.iter().zip(book.asks.iter()) {
        println!(
            "  {:>16}  {:>14}  │  {:<16}  {:<14}",
            bid.price.to_string().green(),
            bid.volume,
            ask.price.to_string().red(),
            ask.volume
        );
    }

    let pairs = market.get_asset_pairs(Some(&[pair.as_str()][..])).await?;
    if let Some(info) = pairs.first() {
        println!();
        println!("{}", "  Fee schedule (taker / maker)".white().bold());
        for (taker, maker) in info.fees.iter().zip(info.fees_maker.iter()) {
            println!("  ≥ {:>12}  {:>6}% / {:>6}%", taker.volume, taker.percent, maker.percent);
        }
        if let Some(fee) = info.taker_fee(dec!(100000)) {
            println!("  At 100k volume you pay {}% taker", fee.to_string().yellow());
        }
    }

    Ok(())
}
