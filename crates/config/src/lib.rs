//! Pazar Config
//!
//! Settings structures and file/environment loading.

pub mod loader;
pub mod settings;

pub use loader::load_config;
pub use settings::{
	CacheSettings, FilterSettings, LogFormat, LoggingSettings, RerankerSettings, Settings,
	SourceSettings, TimeoutSettings,
};
