//! Reranker gateway: external relevance model behind a strict contract
//!
//! The gateway receives the query plus the candidate list and answers with
//! an ordered list of indices into that list (a permutation, possibly with
//! indices dropped to signal "irrelevant"). Anything outside that contract —
//! malformed indices, timeouts, auth failures, exhausted quota — is treated
//! as a gateway failure and the caller falls back to a deterministic order.
//! Relevance reranking is a quality enhancement, not a correctness
//! requirement, so nothing here ever surfaces an error to the request path.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Reranker gateway errors. All of them degrade to the fallback order.
#[derive(Error, Debug)]
pub enum GatewayError {
	#[error("Gateway timeout after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Gateway quota exceeded")]
	QuotaExceeded,

	#[error("Gateway authentication failed")]
	AuthenticationFailed,

	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("Invalid gateway response: {reason}")]
	InvalidResponse { reason: String },
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// One candidate sent to the relevance model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankCandidate {
	pub index: usize,
	pub name: String,
	pub normalized_price_per_kg: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
	query: &'a str,
	candidates: &'a [RerankCandidate],
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
	#[serde(rename = "orderedIndices")]
	ordered_indices: Vec<usize>,
}

/// External relevance reranking service.
#[async_trait]
pub trait RerankerGateway: Send + Sync + Debug {
	/// Rank `candidates` for `query`, best first.
	///
	/// One attempt only; retries are not performed at this layer.
	async fn rerank(
		&self,
		query: &str,
		candidates: &[RerankCandidate],
	) -> GatewayResult<Vec<usize>>;
}

/// Validate a gateway index response against the candidate list length.
///
/// Indices must be non-empty, unique, and in range; responses failing any of
/// those are rejected wholesale.
pub fn validate_indices(indices: &[usize], candidate_count: usize) -> Result<(), String> {
	if indices.is_empty() {
		return Err("empty index list".to_string());
	}
	if indices.len() > candidate_count {
		return Err(format!(
			"{} indices for {} candidates",
			indices.len(),
			candidate_count
		));
	}
	let mut seen = HashSet::with_capacity(indices.len());
	for &index in indices {
		if index >= candidate_count {
			return Err(format!(
				"index {} out of range for {} candidates",
				index, candidate_count
			));
		}
		if !seen.insert(index) {
			return Err(format!("duplicate index {}", index));
		}
	}
	Ok(())
}

/// HTTP-backed reranker gateway.
#[derive(Debug)]
pub struct HttpRerankerGateway {
	client: reqwest::Client,
	endpoint: String,
	api_key: Option<String>,
	timeout_ms: u64,
}

impl HttpRerankerGateway {
	pub fn new(endpoint: impl Into<String>, timeout_ms: u64) -> Self {
		Self {
			client: reqwest::Client::new(),
			endpoint: endpoint.into(),
			api_key: None,
			timeout_ms,
		}
	}

	pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
		self.api_key = Some(api_key.into());
		self
	}
}

#[async_trait]
impl RerankerGateway for HttpRerankerGateway {
	async fn rerank(
		&self,
		query: &str,
		candidates: &[RerankCandidate],
	) -> GatewayResult<Vec<usize>> {
		debug!(
			"Reranking {} candidates for '{}' via {}",
			candidates.len(),
			query,
			self.endpoint
		);

		let mut request = self
			.client
			.post(&self.endpoint)
			.timeout(Duration::from_millis(self.timeout_ms))
			.json(&RerankRequest {
				query,
				candidates,
			});
		if let Some(api_key) = &self.api_key {
			request = request.bearer_auth(api_key);
		}

		let response = request.send().await.map_err(|e| {
			if e.is_timeout() {
				GatewayError::Timeout {
					timeout_ms: self.timeout_ms,
				}
			} else {
				GatewayError::Http(e)
			}
		})?;

		let status = response.status();
		match status.as_u16() {
			429 => return Err(GatewayError::QuotaExceeded),
			401 | 403 => return Err(GatewayError::AuthenticationFailed),
			code if !status.is_success() => {
				return Err(GatewayError::InvalidResponse {
					reason: format!("HTTP {}", code),
				})
			},
			_ => {},
		}

		let parsed: RerankResponse =
			response
				.json()
				.await
				.map_err(|e| GatewayError::InvalidResponse {
					reason: e.to_string(),
				})?;

		Ok(parsed.ordered_indices)
	}
}
