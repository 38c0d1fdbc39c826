//! Cache trait for pluggable backends

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Cache backend errors.
///
/// Callers are expected to treat any of these as a miss and continue with a
/// live fetch, logging the degradation.
#[derive(Error, Debug)]
pub enum CacheError {
	#[error("Cache backend unreachable: {reason}")]
	Unreachable { reason: String },

	#[error("Cache operation failed: {reason}")]
	Operation { reason: String },
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Pure key/value semantics with TTL; no partial updates, no cross-key
/// transactions. Same-key writes are last-write-wins.
#[async_trait]
pub trait Cache: Send + Sync {
	/// Read a value; expired entries behave as absent.
	async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

	/// Write a value wholesale with a per-write TTL.
	async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;
}
