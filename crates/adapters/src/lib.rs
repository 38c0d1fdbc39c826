//! Pazar Adapters
//!
//! Source-specific adapters for the pazar price aggregator, selected through
//! a static registry rather than inheritance.

pub mod json_api_adapter;

pub use json_api_adapter::JsonApiAdapter;
pub use pazar_types::{AdapterError, AdapterResult, SourceAdapter};

use pazar_cache::Cache;
use std::collections::HashMap;
use std::sync::Arc;

/// Static registry of source adapter implementations.
///
/// Sources reference adapters by id; registration happens once at startup.
#[derive(Debug, Default)]
pub struct AdapterRegistry {
	adapters: HashMap<String, Box<dyn SourceAdapter>>,
}

impl AdapterRegistry {
	pub fn new() -> Self {
		Self {
			adapters: HashMap::new(),
		}
	}

	/// Create a registry pre-populated with the built-in adapters.
	pub fn with_defaults(cache: Arc<dyn Cache>) -> Self {
		let mut registry = Self::new();
		registry
			.register(Box::new(JsonApiAdapter::new(cache)))
			.expect("default adapter registration cannot collide on an empty registry");
		registry
	}

	/// Register an adapter under its own id.
	pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) -> AdapterResult<()> {
		let id = adapter.id().to_string();
		if self.adapters.contains_key(&id) {
			return Err(AdapterError::AlreadyRegistered { adapter_id: id });
		}
		self.adapters.insert(id, adapter);
		Ok(())
	}

	pub fn get(&self, adapter_id: &str) -> Option<&dyn SourceAdapter> {
		self.adapters.get(adapter_id).map(|adapter| adapter.as_ref())
	}

	pub fn ids(&self) -> Vec<&str> {
		self.adapters.keys().map(|id| id.as_str()).collect()
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}
