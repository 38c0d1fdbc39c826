//! Raw listing payloads as returned by source adapters
//!
//! A raw listing is untrusted input: every field is optional or defaulted so
//! that one malformed entry never fails deserialization of a whole result
//! page. Validation happens later, in the standardizer.

use serde::{Deserialize, Serialize};

/// Source-specific product payload, prior to standardization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawListing {
	/// Display name as shown on the source site.
	#[serde(default, alias = "product_name")]
	pub name: String,

	/// Price in major currency units. Zero or negative means malformed.
	#[serde(default)]
	pub price: f64,

	/// Currency code; sources that omit it are assumed TRY.
	#[serde(default)]
	pub currency: Option<String>,

	/// Free-text weight/volume expression, e.g. "500 g" or "1 L".
	/// Often absent; the standardizer also scans the name for one.
	#[serde(default, alias = "gramaj")]
	pub size_text: Option<String>,

	/// Source-defined identifier, when the site exposes one.
	#[serde(default)]
	pub product_id: Option<String>,

	#[serde(default)]
	pub image_url: Option<String>,
}

/// A raw listing tagged with the source that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcedListing {
	pub source_name: String,
	pub listing: RawListing,
}

impl SourcedListing {
	pub fn new(source_name: impl Into<String>, listing: RawListing) -> Self {
		Self {
			source_name: source_name.into(),
			listing,
		}
	}
}
