//! Parallel-fetch orchestrator
//!
//! Fans a query out to every registered source concurrently, enforces a
//! per-source timeout, collects whatever completes and tags the rest as
//! timed out or failed. One slow source never blocks the others: total
//! dispatch time is bounded by the largest per-source timeout, not the sum.

use futures::future::join_all;
use pazar_adapters::AdapterRegistry;
use pazar_types::{
	AggregatedResult, Query, Source, SourceOutcome, SourceRuntimeConfig, SourcedListing,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::text::fold;

/// Per-invocation result of one (source, term) fetch.
#[derive(Debug)]
enum FetchOutcome {
	Listings(Vec<pazar_types::RawListing>),
	TimedOut,
	Failed(String),
}

/// Service that dispatches one query to all registered sources.
pub struct OrchestratorService {
	sources: Vec<Source>,
	adapter_registry: Arc<AdapterRegistry>,
	query_aliases: Vec<(String, Vec<String>)>,
}

impl OrchestratorService {
	/// Create a new orchestrator over the given sources, in registration
	/// order.
	pub fn new(
		sources: Vec<Source>,
		adapter_registry: Arc<AdapterRegistry>,
		query_aliases: HashMap<String, Vec<String>>,
	) -> Self {
		// Longest trigger first so "tavuk göğsü" wins over a bare "tavuk".
		let mut query_aliases: Vec<(String, Vec<String>)> = query_aliases
			.into_iter()
			.map(|(trigger, terms)| (fold(&trigger), terms))
			.collect();
		query_aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

		Self {
			sources,
			adapter_registry,
			query_aliases,
		}
	}

	/// Validate that every source references a registered adapter.
	pub fn validate_sources(&self) -> Result<(), String> {
		for source in &self.sources {
			source.validate()?;
			if self.adapter_registry.get(&source.adapter_id).is_none() {
				return Err(format!(
					"Source '{}' references unknown adapter '{}'",
					source.source_id, source.adapter_id
				));
			}
		}
		Ok(())
	}

	pub fn source_ids(&self) -> Vec<&str> {
		self.sources.iter().map(|s| s.source_id.as_str()).collect()
	}

	/// Expand a query into the search terms actually sent upstream.
	///
	/// Sources sometimes list an offer under a sibling wording ("tavuk
	/// göğsü" appears as "piliç bonfile"); the alias table adds those
	/// variants so they are searched too.
	fn expand_search_terms(&self, query: &str) -> Vec<String> {
		let trimmed = query.trim();
		if trimmed.is_empty() {
			return Vec::new();
		}

		let folded = fold(trimmed);
		for (trigger, terms) in &self.query_aliases {
			if folded.contains(trigger.as_str()) {
				return terms.clone();
			}
		}
		vec![trimmed.to_string()]
	}

	/// Fetch listings concurrently from all registered sources.
	///
	/// Every (source, term) invocation runs under its own timeout clock;
	/// cancellation on timeout is advisory and the abandoned result is
	/// discarded. Failures are recorded per source and never abort
	/// siblings. No retries happen at this layer.
	pub async fn dispatch(&self, query: &Query) -> AggregatedResult {
		let terms = self.expand_search_terms(&query.text);
		if terms.is_empty() {
			return AggregatedResult {
				listings: Vec::new(),
				outcomes: self
					.sources
					.iter()
					.map(|s| (s.source_id.clone(), SourceOutcome::Success { listings: 0 }))
					.collect(),
			};
		}

		info!(
			"Dispatching query '{}' ({} terms) to {} sources",
			query.text,
			terms.len(),
			self.sources.len()
		);

		let mut handles = Vec::new();
		for source in &self.sources {
			for term in &terms {
				let source = source.clone();
				let term = term.clone();
				let adapter_registry = Arc::clone(&self.adapter_registry);

				handles.push(tokio::spawn(async move {
					debug!("Starting fetch from {} for '{}'", source.source_id, term);

					let adapter = match adapter_registry.get(&source.adapter_id) {
						Some(adapter) => adapter,
						None => {
							return FetchOutcome::Failed(format!(
								"unknown adapter '{}'",
								source.adapter_id
							))
						},
					};

					let config = SourceRuntimeConfig::from(&source);
					let deadline = Duration::from_millis(source.timeout_ms);
					match timeout(deadline, adapter.search(&term, &config)).await {
						Ok(Ok(listings)) => FetchOutcome::Listings(listings),
						Ok(Err(e)) => {
							warn!("Source {} returned error: {}", source.source_id, e);
							FetchOutcome::Failed(e.to_string())
						},
						Err(_) => {
							warn!(
								"Source {} exceeded its {}ms timeout, abandoning",
								source.source_id, source.timeout_ms
							);
							FetchOutcome::TimedOut
						},
					}
				}));
			}
		}

		let joined = join_all(handles).await;
		let mut fetches = joined.into_iter().map(|result| match result {
			Ok(outcome) => outcome,
			Err(e) => FetchOutcome::Failed(format!("fetch task aborted: {}", e)),
		});

		let mut listings = Vec::new();
		let mut outcomes = Vec::with_capacity(self.sources.len());
		for source in &self.sources {
			let mut returned = 0usize;
			let mut succeeded = false;
			let mut timed_out = false;
			let mut failure: Option<String> = None;

			// Task order matches spawn order, so this source's term fetches
			// come next, in term order.
			for _ in 0..terms.len() {
				match fetches.next() {
					Some(FetchOutcome::Listings(items)) => {
						succeeded = true;
						returned += items.len();
						listings.extend(
							items
								.into_iter()
								.map(|listing| SourcedListing::new(source.source_id.clone(), listing)),
						);
					},
					Some(FetchOutcome::TimedOut) => timed_out = true,
					Some(FetchOutcome::Failed(reason)) => {
						failure.get_or_insert(reason);
					},
					None => break,
				}
			}

			let outcome = if succeeded {
				SourceOutcome::Success { listings: returned }
			} else if timed_out {
				SourceOutcome::Timeout
			} else {
				SourceOutcome::Failure {
					reason: failure.unwrap_or_else(|| "no result".to_string()),
				}
			};
			outcomes.push((source.source_id.clone(), outcome));
		}

		info!(
			"Dispatch completed: {} listings from {}/{} sources",
			listings.len(),
			outcomes.iter().filter(|(_, o)| o.is_success()).count(),
			self.sources.len()
		);

		AggregatedResult {
			listings,
			outcomes,
		}
	}
}
