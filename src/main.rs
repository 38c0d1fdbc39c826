//! Command-line entry point: aggregate one query and print the result.

use pazar_aggregator::{init_tracing, load_config, AggregatorBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();

	let settings = load_config().unwrap_or_default();
	init_tracing(&settings);

	let query = std::env::args().nth(1).ok_or("usage: pazar-aggregator <query>")?;

	let aggregator = AggregatorBuilder::from_config(settings).build()?;
	let response = aggregator.aggregate(&query).await;

	println!("{}", serde_json::to_string_pretty(&response)?);
	Ok(())
}
