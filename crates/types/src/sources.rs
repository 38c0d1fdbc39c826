//! Source registration and per-round outcome models

use crate::listings::SourcedListing;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One registered retail source.
///
/// A source pairs a human-facing name with the adapter that knows how to
/// query it, plus the runtime knobs the orchestrator and adapter need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
	/// Stable identifier, also used as `source_name` on produced listings.
	pub source_id: String,
	/// Which registered adapter implementation serves this source.
	pub adapter_id: String,
	/// Upstream search endpoint.
	pub endpoint: String,
	/// Per-source dispatch timeout in milliseconds.
	pub timeout_ms: u64,
	/// TTL for cached search results, in seconds.
	pub cache_ttl_secs: u64,
	/// Extra request headers (site keys, cookies).
	pub headers: Option<HashMap<String, String>>,
}

impl Source {
	pub fn new(
		source_id: impl Into<String>,
		adapter_id: impl Into<String>,
		endpoint: impl Into<String>,
		timeout_ms: u64,
	) -> Self {
		Self {
			source_id: source_id.into(),
			adapter_id: adapter_id.into(),
			endpoint: endpoint.into(),
			timeout_ms,
			cache_ttl_secs: 3600,
			headers: None,
		}
	}

	pub fn with_cache_ttl(mut self, cache_ttl_secs: u64) -> Self {
		self.cache_ttl_secs = cache_ttl_secs;
		self
	}

	pub fn validate(&self) -> Result<(), String> {
		if self.source_id.trim().is_empty() {
			return Err("source_id must not be empty".to_string());
		}
		if self.adapter_id.trim().is_empty() {
			return Err(format!("source '{}' has empty adapter_id", self.source_id));
		}
		if self.timeout_ms == 0 {
			return Err(format!("source '{}' has zero timeout", self.source_id));
		}
		Ok(())
	}
}

/// Runtime view of a source handed to adapter calls.
#[derive(Debug, Clone)]
pub struct SourceRuntimeConfig {
	pub source_id: String,
	pub endpoint: String,
	pub timeout_ms: u64,
	pub cache_ttl_secs: u64,
	pub headers: Option<HashMap<String, String>>,
}

impl From<&Source> for SourceRuntimeConfig {
	fn from(source: &Source) -> Self {
		Self {
			source_id: source.source_id.clone(),
			endpoint: source.endpoint.clone(),
			timeout_ms: source.timeout_ms,
			cache_ttl_secs: source.cache_ttl_secs,
			headers: source.headers.clone(),
		}
	}
}

/// Per-source result of one orchestration round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
	/// The source answered in time; `listings` is how many entries it returned.
	Success { listings: usize },
	/// The source exceeded its per-source timeout and was abandoned.
	Timeout,
	/// The source failed with an unrecoverable error.
	Failure { reason: String },
}

impl SourceOutcome {
	pub fn is_success(&self) -> bool {
		matches!(self, SourceOutcome::Success { .. })
	}
}

/// Everything one dispatch round produced: the concatenated listings of all
/// successful sources (registration order, then source return order) plus a
/// per-source outcome log.
#[derive(Debug, Clone, Default)]
pub struct AggregatedResult {
	pub listings: Vec<SourcedListing>,
	pub outcomes: Vec<(String, SourceOutcome)>,
}
