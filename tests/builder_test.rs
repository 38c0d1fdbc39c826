//! Builder wiring and validation.

use pazar_aggregator::mocks::MockSourceAdapter;
use pazar_aggregator::{AggregatorBuilder, Settings, Source};

#[tokio::test]
async fn default_build_has_no_sources() {
	let aggregator = AggregatorBuilder::new().build().unwrap();
	assert!(aggregator.source_ids().is_empty());
}

#[tokio::test]
async fn build_rejects_source_with_unknown_adapter() {
	let result = AggregatorBuilder::new()
		.with_source(Source::new("migros", "no-such-adapter", "mock://x", 5_000))
		.build();

	let err = result.err().unwrap().to_string();
	assert!(err.contains("no-such-adapter"));
}

#[tokio::test]
async fn build_rejects_enabled_reranker_without_endpoint() {
	let mut settings = Settings::default();
	settings.reranker.enabled = true;
	settings.reranker.endpoint = None;

	let result = AggregatorBuilder::from_config(settings).build();
	assert!(result.is_err());
}

#[tokio::test]
async fn build_rejects_duplicate_adapter_ids() {
	let result = AggregatorBuilder::new()
		.with_adapter(Box::new(MockSourceAdapter::returning("dup", Vec::new())))
		.with_adapter(Box::new(MockSourceAdapter::returning("dup", Vec::new())))
		.build();

	assert!(result.is_err());
}

#[tokio::test]
async fn sources_from_settings_register_in_stable_order() {
	let mut settings = Settings::default();
	for id in ["sok", "a101", "migros"] {
		settings.sources.insert(
			id.to_string(),
			pazar_config::SourceSettings {
				source_id: id.to_string(),
				adapter_id: "json-api-v1".to_string(),
				endpoint: format!("https://{id}.test/search"),
				timeout_ms: None,
				cache_ttl_secs: None,
				enabled: true,
				headers: None,
			},
		);
	}

	let aggregator = AggregatorBuilder::from_config(settings)
		.with_source(Source::new("extra", "json-api-v1", "https://extra.test", 5_000))
		.build()
		.unwrap();

	// Settings sources sort by id; explicitly added sources come after.
	assert_eq!(aggregator.source_ids(), vec!["a101", "migros", "sok", "extra"]);
}
