//! Configuration settings structures

use pazar_types::Source;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
	pub sources: HashMap<String, SourceSettings>,
	pub timeouts: TimeoutSettings,
	pub cache: CacheSettings,
	pub filtering: FilterSettings,
	pub reranker: RerankerSettings,
	pub logging: LoggingSettings,
}

/// Individual source configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceSettings {
	pub source_id: String,
	pub adapter_id: String,
	pub endpoint: String,
	/// Overrides `timeouts.per_source_ms` for this source when set.
	pub timeout_ms: Option<u64>,
	/// Overrides `cache.ttl_secs` for this source when set.
	pub cache_ttl_secs: Option<u64>,
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	pub headers: Option<HashMap<String, String>>,
}

fn default_enabled() -> bool {
	true
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeoutSettings {
	/// Per-source dispatch timeout in milliseconds.
	pub per_source_ms: u64,
}

/// Cache configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheSettings {
	/// Default TTL for cached search results, in seconds.
	pub ttl_secs: u64,
}

/// Data-quality pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterSettings {
	/// Terms that mark a listing as cross-category noise unless the query
	/// itself contains them.
	pub blacklist: Vec<String>,
	/// Query trigger → terms, at least one of which must appear in a
	/// product name for it to survive the query-term stage.
	pub required_terms: HashMap<String, Vec<String>>,
	/// Query trigger → additional search terms dispatched to every source.
	pub query_aliases: HashMap<String, Vec<String>>,
}

/// Relevance reranker configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RerankerSettings {
	pub enabled: bool,
	pub endpoint: Option<String>,
	pub timeout_ms: u64,
	/// Environment variable holding the gateway API key.
	pub api_key_env: String,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			sources: HashMap::new(),
			timeouts: TimeoutSettings {
				per_source_ms: 15_000,
			},
			cache: CacheSettings {
				ttl_secs: 3600,
			},
			filtering: FilterSettings::default(),
			reranker: RerankerSettings {
				enabled: false,
				endpoint: None,
				timeout_ms: 8_000,
				api_key_env: "PAZAR_RERANKER_API_KEY".to_string(),
			},
			logging: LoggingSettings {
				level: "info".to_string(),
				format: LogFormat::Pretty,
			},
		}
	}
}

impl Default for FilterSettings {
	fn default() -> Self {
		let blacklist = [
			"ped", "noodle", "çorba", "bulyon", "sos", "deterjan", "şampuan", "sabun",
			"peçete", "tuvalet", "mendil", "parfüm", "diş macunu", "krem", "losyon",
			"deodorant", "çamaşır", "bulaşık", "baharat", "kedi", "köpek", "mama",
		]
		.into_iter()
		.map(str::to_string)
		.collect();

		let required_terms = [
			(
				"tavuk göğsü",
				vec!["piliç", "tavuk", "bonfile", "göğüs", "göğsü"],
			),
			("tavuk", vec!["piliç", "tavuk", "chicken"]),
			("bonfile", vec!["bonfile", "piliç", "tavuk", "göğüs"]),
			("süt", vec!["süt", "milk"]),
			("yoğurt", vec!["yoğurt", "yogurt"]),
			("peynir", vec!["peynir", "cheese"]),
			("yumurta", vec!["yumurta", "egg"]),
			("pirinç", vec!["pirinç", "baldo", "basmati"]),
			("makarna", vec!["makarna", "spagetti", "penne", "pasta"]),
			("şeker", vec!["şeker", "toz şeker"]),
			("zeytinyağı", vec!["zeytinyağ", "sızma"]),
			("ayçiçek yağı", vec!["ayçiçek", "ayçiçeği"]),
			("kıyma", vec!["kıyma", "dana", "kuzu"]),
			("dana eti", vec!["dana", "biftek", "antrikot", "kuşbaşı"]),
		]
		.into_iter()
		.map(|(trigger, terms)| {
			(
				trigger.to_string(),
				terms.into_iter().map(str::to_string).collect(),
			)
		})
		.collect();

		let query_aliases = [(
			"tavuk göğsü",
			vec!["tavuk göğsü", "tavuk bonfile", "piliç bonfile"],
		)]
		.into_iter()
		.map(|(trigger, terms)| {
			(
				trigger.to_string(),
				terms.into_iter().map(str::to_string).collect(),
			)
		})
		.collect();

		Self {
			blacklist,
			required_terms,
			query_aliases,
		}
	}
}

impl Settings {
	/// Get enabled sources only.
	pub fn enabled_sources(&self) -> Vec<&SourceSettings> {
		let mut sources: Vec<&SourceSettings> =
			self.sources.values().filter(|s| s.enabled).collect();
		// HashMap iteration order is arbitrary; registration order must be
		// stable across runs.
		sources.sort_by(|a, b| a.source_id.cmp(&b.source_id));
		sources
	}

	/// Materialize one configured source into its domain form, applying
	/// the global timeout/TTL defaults.
	pub fn to_source(&self, settings: &SourceSettings) -> Source {
		let mut source = Source::new(
			settings.source_id.clone(),
			settings.adapter_id.clone(),
			settings.endpoint.clone(),
			settings.timeout_ms.unwrap_or(self.timeouts.per_source_ms),
		)
		.with_cache_ttl(settings.cache_ttl_secs.unwrap_or(self.cache.ttl_secs));
		source.headers = settings.headers.clone();
		source
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_match_documented_values() {
		let settings = Settings::default();
		assert_eq!(settings.timeouts.per_source_ms, 15_000);
		assert_eq!(settings.cache.ttl_secs, 3600);
		assert!(!settings.reranker.enabled);
		assert!(settings.filtering.blacklist.contains(&"deterjan".to_string()));
		assert!(settings.filtering.required_terms.contains_key("tavuk göğsü"));
	}

	#[test]
	fn test_source_defaults_are_applied() {
		let settings = Settings::default();
		let source_settings = SourceSettings {
			source_id: "migros".to_string(),
			adapter_id: "json-api-v1".to_string(),
			endpoint: "https://example.test/search".to_string(),
			timeout_ms: None,
			cache_ttl_secs: Some(600),
			enabled: true,
			headers: None,
		};

		let source = settings.to_source(&source_settings);
		assert_eq!(source.timeout_ms, 15_000);
		assert_eq!(source.cache_ttl_secs, 600);
	}

	#[test]
	fn test_enabled_sources_ordering_is_stable() {
		let mut settings = Settings::default();
		for id in ["sok", "a101", "migros"] {
			settings.sources.insert(
				id.to_string(),
				SourceSettings {
					source_id: id.to_string(),
					adapter_id: "json-api-v1".to_string(),
					endpoint: format!("https://{id}.test/search"),
					timeout_ms: None,
					cache_ttl_secs: None,
					enabled: id != "sok",
					headers: None,
				},
			);
		}

		let ids: Vec<&str> = settings
			.enabled_sources()
			.iter()
			.map(|s| s.source_id.as_str())
			.collect();
		assert_eq!(ids, vec!["a101", "migros"]);
	}
}
