//! Core adapter trait for source implementations

use super::AdapterResult;
use crate::listings::RawListing;
use crate::sources::SourceRuntimeConfig;
use async_trait::async_trait;
use std::fmt::Debug;

/// Capability interface for one retail source.
///
/// Implementations wrap whatever site-specific fetching a retailer needs and
/// expose a single `search` operation. They must be safe to invoke
/// concurrently with other adapters and with themselves across different
/// queries; per-upstream politeness (request limiting, caching) is internal
/// to the adapter.
#[async_trait]
pub trait SourceAdapter: Send + Sync + Debug {
	/// Adapter identifier used for registration and source matching.
	fn id(&self) -> &str;

	/// Human-readable adapter name.
	fn name(&self) -> &str {
		self.id()
	}

	/// Search the source for listings matching `query`.
	///
	/// Returns a finite list of raw listings; an empty list is a legitimate
	/// answer. Fails with [`AdapterError`](super::AdapterError) on
	/// unrecoverable errors.
	async fn search(
		&self,
		query: &str,
		config: &SourceRuntimeConfig,
	) -> AdapterResult<Vec<RawListing>>;
}
