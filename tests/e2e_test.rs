//! End-to-end aggregation over mock sources.
//!
//! Exercises the whole chain: alias expansion, dispatch, standardization,
//! the five pipeline stages, and the price summary.

use pazar_aggregator::mocks::{
	mock_listing, MockRerankBehaviour, MockRerankerGateway, MockSourceAdapter,
};
use pazar_aggregator::{AggregatorBuilder, Source};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn chicken_aggregator() -> AggregatorBuilder {
	// "tavuk göğsü" expands to three search terms, so every adapter is
	// queried three times and returns the same listings each time; the
	// dedup stage must collapse those repeats.
	AggregatorBuilder::new()
		.with_adapter(Box::new(MockSourceAdapter::returning(
			"mock-migros",
			vec![
				mock_listing("Banvit Piliç Bonfile Kg", 189.95, Some("1 kg")),
				mock_listing("Tavuk Göğsü Fileto", 100.0, Some("500 g")),
				mock_listing("Çamaşır Deterjanı 4 kg", 150.0, None),
				mock_listing("Dana Antrikot Kg", 450.0, Some("1 kg")),
				mock_listing("", 9.99, None),
			],
		)))
		.with_adapter(Box::new(MockSourceAdapter::returning(
			"mock-a101",
			vec![mock_listing("Piliç Bonfile", 92.5, Some("500 g"))],
		)))
		.with_source(Source::new("migros", "mock-migros", "mock://migros", 5_000))
		.with_source(Source::new("a101", "mock-a101", "mock://a101", 5_000))
}

#[tokio::test]
async fn aggregate_filters_dedups_and_ranks_by_unit_price() {
	let aggregator = chicken_aggregator().build().unwrap();
	let response = aggregator.aggregate("tavuk göğsü").await;

	// Detergent is blacklisted, beef fails the query-term stage, the
	// nameless listing is malformed, and every term repeat is collapsed.
	let names: Vec<&str> = response.results.iter().map(|p| p.name.as_str()).collect();
	assert_eq!(
		names,
		vec!["Piliç Bonfile", "Banvit Piliç Bonfile Kg", "Tavuk Göğsü Fileto"]
	);

	// 92.5 TRY for 500 g is 185/kg, the best unit price despite not being
	// the lowest shelf price.
	assert_eq!(
		response.results[0].normalized_price_per_kg,
		Some(dec!(185.00))
	);

	let cheapest = response.cheapest.unwrap();
	assert_eq!(cheapest.name, "Piliç Bonfile");
	assert_eq!(cheapest.source_name, "a101");

	let most_expensive = response.most_expensive.unwrap();
	assert_eq!(most_expensive.name, "Tavuk Göğsü Fileto");
	assert_eq!(response.potential_saving, Some(dec!(15.00)));

	assert_eq!(response.source_outcomes.len(), 2);
	assert!(response.source_outcomes.iter().all(|e| e.outcome.is_success()));
}

#[tokio::test]
async fn reranker_order_is_applied_when_gateway_answers() {
	// Arrival order after the local stages: Banvit, Fileto, a101 Bonfile.
	// The gateway keeps only two of them, reversed.
	let aggregator = chicken_aggregator()
		.with_reranker(Arc::new(MockRerankerGateway::new(
			MockRerankBehaviour::Indices(vec![2, 0]),
		)))
		.build()
		.unwrap();

	let response = aggregator.aggregate("tavuk göğsü").await;
	let names: Vec<&str> = response.results.iter().map(|p| p.name.as_str()).collect();
	assert_eq!(names, vec!["Piliç Bonfile", "Banvit Piliç Bonfile Kg"]);
}

#[tokio::test]
async fn reranker_failure_degrades_to_unit_price_order() {
	let aggregator = chicken_aggregator()
		.with_reranker(Arc::new(MockRerankerGateway::new(
			MockRerankBehaviour::Timeout,
		)))
		.build()
		.unwrap();

	let response = aggregator.aggregate("tavuk göğsü").await;
	let names: Vec<&str> = response.results.iter().map(|p| p.name.as_str()).collect();
	assert_eq!(
		names,
		vec!["Piliç Bonfile", "Banvit Piliç Bonfile Kg", "Tavuk Göğsü Fileto"]
	);
}

#[tokio::test]
async fn searching_a_blacklisted_word_still_returns_it() {
	let aggregator = AggregatorBuilder::new()
		.with_adapter(Box::new(MockSourceAdapter::returning(
			"mock-sok",
			vec![
				mock_listing("Toz Deterjan 4 kg", 150.0, None),
				mock_listing("Sıvı Deterjan 1 L", 60.0, None),
			],
		)))
		.with_source(Source::new("sok", "mock-sok", "mock://sok", 5_000))
		.build()
		.unwrap();

	let response = aggregator.aggregate("deterjan").await;
	assert_eq!(response.results.len(), 2);
}
