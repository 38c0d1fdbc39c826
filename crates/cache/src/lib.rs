//! Pazar Cache
//!
//! Key/value side store with per-entry expiry, shared by all source adapters.
//! The cache is at-least-effort: a failing backend degrades to a miss, never
//! to a failed request.

pub mod memory;
pub mod traits;

pub use memory::MemoryCache;
pub use traits::{Cache, CacheError, CacheResult};

/// Build the canonical cache key for one source operation.
///
/// Format: `source:{source_name}:{operation}:{query}`.
pub fn cache_key(source_name: &str, operation: &str, query: &str) -> String {
	format!("source:{}:{}:{}", source_name, operation, query)
}
