//! In-memory cache implementation using DashMap with TTL support

use crate::traits::{Cache, CacheResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
	value: Vec<u8>,
	expires_at: DateTime<Utc>,
}

impl CacheEntry {
	fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.expires_at <= now
	}
}

/// In-memory cache with lazy expiry on read and a periodic cleanup task.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
	entries: Arc<DashMap<String, CacheEntry>>,
}

impl MemoryCache {
	pub fn new() -> Self {
		Self {
			entries: Arc::new(DashMap::new()),
		}
	}

	/// Start the periodic cleanup task for expired entries.
	///
	/// Lazy expiry on `get` already keeps reads correct; this only bounds
	/// memory held by keys nobody reads again.
	pub fn start_ttl_cleanup(&self) -> tokio::task::JoinHandle<()> {
		let entries = Arc::clone(&self.entries);
		tokio::spawn(async move {
			let mut cleanup_interval = interval(Duration::from_secs(60));
			loop {
				cleanup_interval.tick().await;

				let now = Utc::now();
				// Counted inside the closure: concurrent inserts during the
				// shard-by-shard retain would skew a before/after length diff.
				let mut removed = 0usize;
				entries.retain(|_, entry| {
					let keep = !entry.is_expired(now);
					if !keep {
						removed += 1;
					}
					keep
				});
				if removed > 0 {
					debug!("Cleaned up {} expired cache entries", removed);
				}
			}
		})
	}

	/// Number of live (unexpired) entries.
	pub fn len(&self) -> usize {
		let now = Utc::now();
		self.entries
			.iter()
			.filter(|entry| !entry.value().is_expired(now))
			.count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[async_trait]
impl Cache for MemoryCache {
	async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
		if let Some(entry) = self.entries.get(key) {
			if entry.is_expired(Utc::now()) {
				drop(entry);
				self.entries.remove(key);
				return Ok(None);
			}
			return Ok(Some(entry.value.clone()));
		}
		Ok(None)
	}

	async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
		let expires_at = Utc::now()
			+ chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(1));
		self.entries.insert(
			key.to_string(),
			CacheEntry {
				value,
				expires_at,
			},
		);
		Ok(())
	}
}
