//! Generic JSON search API adapter
//!
//! Most retail sources expose an internal JSON search endpoint behind their
//! storefront; this adapter covers every source whose endpoint answers
//! `GET {endpoint}?q={query}` with a listing array (bare, or under a
//! `results` key). Site-idiosyncratic scraping lives outside this crate and
//! plugs in through the same [`SourceAdapter`] trait.

use async_trait::async_trait;
use pazar_cache::{cache_key, Cache};
use pazar_types::{AdapterError, AdapterResult, RawListing, SourceAdapter, SourceRuntimeConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Outbound request cap per adapter instance, to avoid abusive bursts
/// against one upstream.
const MAX_CONCURRENT_REQUESTS: usize = 5;

/// Connection-level timeout; the per-source dispatch timeout is separate and
/// enforced per request from the runtime config.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct JsonApiAdapter {
	adapter_id: String,
	display_name: String,
	client: Client,
	cache: Arc<dyn Cache>,
	limiter: Arc<Semaphore>,
}

impl fmt::Debug for JsonApiAdapter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("JsonApiAdapter")
			.field("adapter_id", &self.adapter_id)
			.field("display_name", &self.display_name)
			.finish()
	}
}

impl JsonApiAdapter {
	pub fn new(cache: Arc<dyn Cache>) -> Self {
		Self::with_id("json-api-v1", "Generic JSON Search API", cache)
	}

	pub fn with_id(
		adapter_id: impl Into<String>,
		display_name: impl Into<String>,
		cache: Arc<dyn Cache>,
	) -> Self {
		let client = Client::builder()
			.default_headers(Self::default_headers())
			.connect_timeout(CONNECT_TIMEOUT)
			.build()
			.unwrap_or_default();

		Self {
			adapter_id: adapter_id.into(),
			display_name: display_name.into(),
			client,
			cache,
			limiter: Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS)),
		}
	}

	/// Realistic browser headers; several sources reject obvious bot traffic.
	fn default_headers() -> HeaderMap {
		let mut headers = HeaderMap::new();
		headers.insert(
			"User-Agent",
			HeaderValue::from_static(
				"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
				 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
			),
		);
		headers.insert("Accept", HeaderValue::from_static("application/json"));
		headers.insert(
			"Accept-Language",
			HeaderValue::from_static("tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7"),
		);
		headers
	}

	/// Per-source headers from the runtime config (site keys, cookies).
	fn config_headers(config: &SourceRuntimeConfig) -> HeaderMap {
		let mut headers = HeaderMap::new();
		if let Some(source_headers) = &config.headers {
			for (key, value) in source_headers {
				if let (Ok(header_name), Ok(header_value)) =
					(HeaderName::from_str(key), HeaderValue::from_str(value))
				{
					headers.insert(header_name, header_value);
				}
			}
		}
		headers
	}

	/// Accept a bare array or an object with a `results` array.
	fn parse_listings(body: serde_json::Value) -> AdapterResult<Vec<RawListing>> {
		let items = match body {
			serde_json::Value::Array(items) => items,
			serde_json::Value::Object(mut object) => match object.remove("results") {
				Some(serde_json::Value::Array(items)) => items,
				_ => {
					return Err(AdapterError::InvalidResponse {
						reason: "expected a listing array or a 'results' field".to_string(),
					})
				},
			},
			_ => {
				return Err(AdapterError::InvalidResponse {
					reason: "expected a JSON array or object".to_string(),
				})
			},
		};

		items
			.into_iter()
			.map(|item| serde_json::from_value(item).map_err(AdapterError::from))
			.collect()
	}

	async fn fetch_live(
		&self,
		query: &str,
		config: &SourceRuntimeConfig,
	) -> AdapterResult<Vec<RawListing>> {
		let _permit = self
			.limiter
			.acquire()
			.await
			.map_err(|_| AdapterError::Connection("request limiter closed".to_string()))?;

		let response = self
			.client
			.get(&config.endpoint)
			.headers(Self::config_headers(config))
			.query(&[("q", query)])
			.timeout(Duration::from_millis(config.timeout_ms))
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(AdapterError::from_response_status(
				status.as_u16(),
				&config.source_id,
			));
		}

		let body: serde_json::Value = response.json().await?;
		Self::parse_listings(body)
	}
}

#[async_trait]
impl SourceAdapter for JsonApiAdapter {
	fn id(&self) -> &str {
		&self.adapter_id
	}

	fn name(&self) -> &str {
		&self.display_name
	}

	async fn search(
		&self,
		query: &str,
		config: &SourceRuntimeConfig,
	) -> AdapterResult<Vec<RawListing>> {
		let key = cache_key(&config.source_id, "search", query);

		match self.cache.get(&key).await {
			Ok(Some(bytes)) => match serde_json::from_slice::<Vec<RawListing>>(&bytes) {
				Ok(listings) => {
					debug!(
						"Cache hit for {} '{}' ({} listings)",
						config.source_id,
						query,
						listings.len()
					);
					return Ok(listings);
				},
				Err(e) => {
					warn!("Discarding undecodable cache entry for {}: {}", key, e);
				},
			},
			Ok(None) => {},
			Err(e) => {
				warn!(
					"Cache read degraded for {}, falling through to live fetch: {}",
					config.source_id, e
				);
			},
		}

		let listings = self.fetch_live(query, config).await?;
		debug!(
			"Live fetch for {} '{}' returned {} listings",
			config.source_id,
			query,
			listings.len()
		);

		match serde_json::to_vec(&listings) {
			Ok(bytes) => {
				let ttl = Duration::from_secs(config.cache_ttl_secs);
				if let Err(e) = self.cache.set(&key, bytes, ttl).await {
					warn!("Cache write degraded for {}: {}", config.source_id, e);
				}
			},
			Err(e) => warn!("Skipping cache write for {}: {}", config.source_id, e),
		}

		Ok(listings)
	}
}
