//! Demo 3: Return Formats
//!
//! Showcases: one endpoint fetched as raw text, JSON tree and typed entity
//!
//! Run: cargo run --bin return_formats

use colored::*;
use kraken_rest::{Endpoint, KrakenRestClient, ParameterSet, Response, ReturnFormat, ServerTime};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  RETURN FORMATS".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let client = KrakenRestClient::new()?;

    for format in [
        ReturnFormat::RawText,
        ReturnFormat::StructuredTree,
        ReturnFormat::TypedObject,
    ] {
        let response = client
            .fetch::<ServerTime>(Endpoint::Time, ParameterSet::new(), format)
            .await?;

        println!("{}", format!("  {format:?}").white().bold());
        match response {
            Response::Raw(text) => println!("    {}", text.trim()),
            Response::Tree(tree) => println!("    {}", serde_json::to_string_pretty(&tree)?),
            Response::Typed(time) => {
                let at = chrono::DateTime::from_timestamp(time.unixtime, 0).unwrap_or_default();
                println!("    unixtime {} ({})", time.unixtime.to_string().green(), at);
            }
        }
        println!();
    }

    Ok(())
}
