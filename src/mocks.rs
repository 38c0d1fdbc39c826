//! Shared mock implementations for tests and demos
//!
//! A scripted source adapter and reranker gateway so integration tests can
//! exercise the full pipeline without real upstreams.

use crate::{AdapterError, AdapterResult, RawListing, SourceAdapter};
use async_trait::async_trait;
use pazar_service::{GatewayError, GatewayResult, RerankCandidate, RerankerGateway};
use pazar_types::SourceRuntimeConfig;
use std::time::Duration;

/// What a [`MockSourceAdapter`] does when searched.
#[derive(Debug, Clone)]
pub enum MockFetchBehaviour {
	/// Return these listings immediately.
	Listings(Vec<RawListing>),
	/// Sleep first, then return the listings. Combined with a short source
	/// timeout this simulates a slow upstream.
	DelayedListings(Duration, Vec<RawListing>),
	/// Fail with a connection error carrying this message.
	Fail(String),
}

/// Scripted source adapter.
#[derive(Debug)]
pub struct MockSourceAdapter {
	adapter_id: String,
	behaviour: MockFetchBehaviour,
}

impl MockSourceAdapter {
	pub fn new(adapter_id: impl Into<String>, behaviour: MockFetchBehaviour) -> Self {
		Self {
			adapter_id: adapter_id.into(),
			behaviour,
		}
	}

	/// Adapter that returns the given listings immediately.
	pub fn returning(adapter_id: impl Into<String>, listings: Vec<RawListing>) -> Self {
		Self::new(adapter_id, MockFetchBehaviour::Listings(listings))
	}
}

#[async_trait]
impl SourceAdapter for MockSourceAdapter {
	fn id(&self) -> &str {
		&self.adapter_id
	}

	async fn search(
		&self,
		_query: &str,
		_config: &SourceRuntimeConfig,
	) -> AdapterResult<Vec<RawListing>> {
		match &self.behaviour {
			MockFetchBehaviour::Listings(listings) => Ok(listings.clone()),
			MockFetchBehaviour::DelayedListings(delay, listings) => {
				tokio::time::sleep(*delay).await;
				Ok(listings.clone())
			},
			MockFetchBehaviour::Fail(message) => Err(AdapterError::Connection(message.clone())),
		}
	}
}

/// Build a raw listing the way mock sources return them.
pub fn mock_listing(name: &str, price: f64, size_text: Option<&str>) -> RawListing {
	RawListing {
		name: name.to_string(),
		price,
		size_text: size_text.map(str::to_string),
		..Default::default()
	}
}

/// What a [`MockRerankerGateway`] answers.
#[derive(Debug, Clone)]
pub enum MockRerankBehaviour {
	Indices(Vec<usize>),
	Timeout,
	QuotaExceeded,
	InvalidResponse(String),
}

/// Scripted reranker gateway.
#[derive(Debug)]
pub struct MockRerankerGateway {
	behaviour: MockRerankBehaviour,
}

impl MockRerankerGateway {
	pub fn new(behaviour: MockRerankBehaviour) -> Self {
		Self {
			behaviour,
		}
	}
}

#[async_trait]
impl RerankerGateway for MockRerankerGateway {
	async fn rerank(
		&self,
		_query: &str,
		_candidates: &[RerankCandidate],
	) -> GatewayResult<Vec<usize>> {
		match &self.behaviour {
			MockRerankBehaviour::Indices(indices) => Ok(indices.clone()),
			MockRerankBehaviour::Timeout => Err(GatewayError::Timeout {
				timeout_ms: 8000,
			}),
			MockRerankBehaviour::QuotaExceeded => Err(GatewayError::QuotaExceeded),
			MockRerankBehaviour::InvalidResponse(reason) => Err(GatewayError::InvalidResponse {
				reason: reason.clone(),
			}),
		}
	}
}
