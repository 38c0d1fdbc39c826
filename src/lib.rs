//! Pazar Aggregator Library
//!
//! A multi-source retail price aggregator: fans a product query out to
//! configured market sources in parallel, standardizes and filters the
//! raw listings, and assembles a ranked result set with a price summary.

// Core domain types - the most commonly used types
pub use pazar_types::{
	AdapterError,
	AdapterResult,
	AggregateResponse,
	AggregatedResult,
	GeoPoint,
	PriceSummary,
	Quantity,
	Query,
	RawListing,
	Source,
	SourceAdapter,
	SourceOutcome,
	SourceOutcomeEntry,
	SourcedListing,
	StandardizedProduct,
	Unit,
};

// Service layer
pub use pazar_service::{
	summarize, standardize_all, FilterPipeline, HttpRerankerGateway, OrchestratorService,
	RerankerGateway,
};

// Cache layer
pub use pazar_cache::{Cache, MemoryCache};

// Adapters
pub use pazar_adapters::{AdapterRegistry, JsonApiAdapter};

// Config
pub use pazar_config::{load_config, LogFormat, Settings};

pub mod mocks;

use std::sync::Arc;
use tracing::info;

// Re-export external dependencies for downstream callers
pub use async_trait;
pub use serde_json;

/// Builder pattern for configuring the aggregator
pub struct AggregatorBuilder {
	settings: Option<Settings>,
	cache: Option<Arc<dyn Cache>>,
	extra_adapters: Vec<Box<dyn SourceAdapter>>,
	sources: Vec<Source>,
	reranker: Option<Arc<dyn RerankerGateway>>,
}

impl Default for AggregatorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl AggregatorBuilder {
	/// Create a new aggregator builder with default in-memory caching
	pub fn new() -> Self {
		Self {
			settings: None,
			cache: None,
			extra_adapters: Vec::new(),
			sources: Vec::new(),
			reranker: None,
		}
	}

	/// Create an aggregator builder from configuration
	pub fn from_config(settings: Settings) -> Self {
		Self::new().with_settings(settings)
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Set a custom cache backend (defaults to [`MemoryCache`])
	pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
		self.cache = Some(cache);
		self
	}

	/// Register a custom adapter alongside the defaults (uses adapter's own ID)
	pub fn with_adapter(mut self, adapter: Box<dyn SourceAdapter>) -> Self {
		self.extra_adapters.push(adapter);
		self
	}

	/// Add a source beyond those defined in settings
	pub fn with_source(mut self, source: Source) -> Self {
		self.sources.push(source);
		self
	}

	/// Set a custom reranker gateway, overriding the settings-driven one
	pub fn with_reranker(mut self, reranker: Arc<dyn RerankerGateway>) -> Self {
		self.reranker = Some(reranker);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Build the aggregator, validating the source/adapter wiring.
	///
	/// Fails fast on configuration errors: invalid sources, sources that
	/// reference unregistered adapters, duplicate adapter ids.
	pub fn build(self) -> Result<PriceAggregator, Box<dyn std::error::Error>> {
		let settings = self.settings.unwrap_or_default();

		let cache: Arc<dyn Cache> = match self.cache {
			Some(cache) => cache,
			None => {
				let cache = MemoryCache::new();
				cache.start_ttl_cleanup();
				Arc::new(cache)
			},
		};

		let mut adapter_registry = AdapterRegistry::with_defaults(Arc::clone(&cache));
		for adapter in self.extra_adapters {
			adapter_registry
				.register(adapter)
				.map_err(|e| format!("Adapter registration failed: {}", e))?;
		}

		let mut sources: Vec<Source> = settings
			.enabled_sources()
			.iter()
			.map(|source_settings| settings.to_source(source_settings))
			.collect();
		sources.extend(self.sources);

		let reranker = match self.reranker {
			Some(reranker) => Some(reranker),
			None if settings.reranker.enabled => {
				let endpoint = settings
					.reranker
					.endpoint
					.clone()
					.ok_or("Reranker enabled but no endpoint configured")?;
				let mut gateway = HttpRerankerGateway::new(endpoint, settings.reranker.timeout_ms);
				if let Ok(api_key) = std::env::var(&settings.reranker.api_key_env) {
					gateway = gateway.with_api_key(api_key);
				}
				Some(Arc::new(gateway) as Arc<dyn RerankerGateway>)
			},
			None => None,
		};

		let orchestrator = OrchestratorService::new(
			sources,
			Arc::new(adapter_registry),
			settings.filtering.query_aliases.clone(),
		);
		orchestrator
			.validate_sources()
			.map_err(|e| format!("Source validation failed: {}", e))?;

		let pipeline = FilterPipeline::new(
			settings.filtering.blacklist.clone(),
			settings.filtering.required_terms.clone(),
			reranker,
		);

		info!(
			"Aggregator initialized with {} source(s): {:?}",
			orchestrator.source_ids().len(),
			orchestrator.source_ids()
		);

		Ok(PriceAggregator {
			orchestrator,
			pipeline,
		})
	}
}

/// The assembled aggregation pipeline.
pub struct PriceAggregator {
	orchestrator: OrchestratorService,
	pipeline: FilterPipeline,
}

impl PriceAggregator {
	/// Run one query end to end: dispatch, standardize, filter, rank,
	/// summarize.
	///
	/// Partial source failures never fail the call; they show up in
	/// `source_outcomes` instead.
	pub async fn aggregate(&self, query_text: &str) -> AggregateResponse {
		let query = Query::new(query_text);
		let result = self.orchestrator.dispatch(&query).await;

		let (products, _dropped) = standardize_all(&result.listings);
		let ranked = self.pipeline.run(query_text, products).await;
		let summary = summarize(&ranked);

		AggregateResponse {
			query: query_text.to_string(),
			results: ranked,
			cheapest: summary.cheapest,
			most_expensive: summary.most_expensive,
			potential_saving: summary.potential_saving,
			source_outcomes: result
				.outcomes
				.into_iter()
				.map(|(source_id, outcome)| SourceOutcomeEntry {
					source_id,
					outcome,
				})
				.collect(),
		}
	}

	pub fn source_ids(&self) -> Vec<&str> {
		self.orchestrator.source_ids()
	}
}

/// Initialize tracing with configuration-based settings
pub fn init_tracing(settings: &Settings) {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

	match settings.logging.format {
		LogFormat::Json => {
			tracing_subscriber::fmt()
				.json()
				.with_env_filter(env_filter)
				.init();
		},
		LogFormat::Pretty => {
			tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter)
				.init();
		},
		LogFormat::Compact => {
			tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter)
				.init();
		},
	}

	info!(
		"Logging configuration applied: level={}, format={:?}",
		settings.logging.level, settings.logging.format
	);
}
