//! Query model for aggregation requests

use serde::{Deserialize, Serialize};

/// Immutable free-text search query with optional structured context.
///
/// The location is carried for outer layers (nearby-store lookup); the
/// aggregation core itself only reads the text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
	pub text: String,
	pub location: Option<GeoPoint>,
}

/// Geographic coordinate attached to a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
	pub latitude: f64,
	pub longitude: f64,
}

impl Query {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			location: None,
		}
	}

	pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
		self.location = Some(GeoPoint {
			latitude,
			longitude,
		});
		self
	}
}
