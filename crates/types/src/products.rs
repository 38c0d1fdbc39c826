//! Canonical product records produced by the standardizer

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Recognized weight/volume units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
	#[serde(rename = "g")]
	Gram,
	#[serde(rename = "kg")]
	Kilogram,
	#[serde(rename = "ml")]
	Milliliter,
	#[serde(rename = "l")]
	Liter,
}

impl Unit {
	pub fn as_str(&self) -> &'static str {
		match self {
			Unit::Gram => "g",
			Unit::Kilogram => "kg",
			Unit::Milliliter => "ml",
			Unit::Liter => "l",
		}
	}

}

/// Parsed weight or volume of one offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
	pub magnitude: f64,
	pub unit: Unit,
}

impl Quantity {
	pub fn new(magnitude: f64, unit: Unit) -> Self {
		Self {
			magnitude,
			unit,
		}
	}

	/// Magnitude converted to grams.
	///
	/// Volume units are mapped 1 ml = 1 g. That 1 L ≈ 1 kg equivalence is a
	/// stated approximation for non-water products; no density correction is
	/// attempted.
	pub fn magnitude_in_grams(&self) -> f64 {
		match self.unit {
			Unit::Gram | Unit::Milliliter => self.magnitude,
			Unit::Kilogram | Unit::Liter => self.magnitude * 1000.0,
		}
	}
}

/// Canonical internal representation of one offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardizedProduct {
	/// Non-empty display name.
	pub name: String,
	/// Positive price in `currency`.
	pub price: Decimal,
	pub currency: String,
	/// Parsed weight/volume; `None` when the listing carried no usable size.
	pub quantity: Option<Quantity>,
	/// Price rescaled to 1 kg (or 1 L), present only when `quantity` is known.
	pub normalized_price_per_kg: Option<Decimal>,
	/// Which source adapter produced this offer.
	pub source_name: String,
}

impl StandardizedProduct {
	/// Deduplication identity: two records sharing this key are the same
	/// physical offer.
	pub fn dedup_key(&self) -> (String, String) {
		(
			self.name.trim().to_lowercase(),
			self.source_name.to_lowercase(),
		)
	}
}
