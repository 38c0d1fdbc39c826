//! Standardizer: raw listings into canonical product records
//!
//! Maps heterogeneous adapter payloads onto [`StandardizedProduct`], parsing
//! free-text weight/volume expressions along the way. Malformed listings
//! (empty name, non-positive price) are dropped and counted, never raised.

use once_cell::sync::Lazy;
use pazar_types::{Quantity, SourcedListing, StandardizedProduct, Unit};
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Recognized unit patterns, in match-priority order.
static UNIT_PATTERNS: Lazy<Vec<(Unit, Regex)>> = Lazy::new(|| {
	vec![
		(
			Unit::Kilogram,
			Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:kg|kilogram|kilo)\b").expect("static pattern"),
		),
		(
			Unit::Gram,
			Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:gr?|gram)\b").expect("static pattern"),
		),
		(
			Unit::Liter,
			Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:lt|l|litre|liter)\b").expect("static pattern"),
		),
		(
			Unit::Milliliter,
			Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:ml|mililitre|milliliter)\b")
				.expect("static pattern"),
		),
	]
});

/// Parse a free-text weight/volume expression like "500g", "1,5 kg" or
/// "1 L". Unparseable text yields `None`, not an error.
pub fn parse_quantity(text: &str) -> Option<Quantity> {
	// Turkish sites write decimal commas.
	let text = text.replace(',', ".");
	for (unit, pattern) in UNIT_PATTERNS.iter() {
		if let Some(captures) = pattern.captures(&text) {
			if let Ok(magnitude) = captures[1].parse::<f64>() {
				if magnitude > 0.0 {
					return Some(Quantity::new(magnitude, *unit));
				}
			}
		}
	}
	None
}

/// Price rescaled to one kilogram (or liter), 2 dp.
///
/// Returns `None` when the quantity converts to zero grams or the price
/// cannot be represented.
pub fn price_per_kg(price: Decimal, quantity: &Quantity) -> Option<Decimal> {
	let grams = quantity.magnitude_in_grams();
	if grams <= 0.0 {
		return None;
	}
	let grams = Decimal::from_f64(grams)?;
	Some((price * Decimal::ONE_THOUSAND / grams).round_dp(2))
}

/// Map one raw listing onto the canonical record.
///
/// Returns `None` for malformed input: empty name, or a price that is
/// non-positive or not a finite number.
pub fn standardize(
	listing: &pazar_types::RawListing,
	source_name: &str,
) -> Option<StandardizedProduct> {
	let name = listing.name.trim();
	if name.is_empty() {
		return None;
	}
	if !listing.price.is_finite() || listing.price <= 0.0 {
		return None;
	}
	let price = Decimal::from_f64(listing.price)?.round_dp(2);

	let currency = listing
		.currency
		.as_deref()
		.map(str::trim)
		.filter(|c| !c.is_empty())
		.unwrap_or("TRY")
		.to_string();

	let quantity = listing
		.size_text
		.as_deref()
		.and_then(parse_quantity)
		.or_else(|| parse_quantity(name));

	let normalized_price_per_kg = quantity.as_ref().and_then(|q| price_per_kg(price, q));

	Some(StandardizedProduct {
		name: name.to_string(),
		price,
		currency,
		quantity,
		normalized_price_per_kg,
		source_name: source_name.to_string(),
	})
}

/// Standardize a whole dispatch round, returning the surviving products and
/// the count of malformed listings that were dropped.
pub fn standardize_all(listings: &[SourcedListing]) -> (Vec<StandardizedProduct>, usize) {
	let mut products = Vec::with_capacity(listings.len());
	let mut dropped = 0usize;

	for sourced in listings {
		match standardize(&sourced.listing, &sourced.source_name) {
			Some(product) => products.push(product),
			None => {
				dropped += 1;
				debug!(
					"Dropped malformed listing from {}: name='{}' price={}",
					sourced.source_name, sourced.listing.name, sourced.listing.price
				);
			},
		}
	}

	if dropped > 0 {
		info!(
			"Standardizer dropped {} malformed listings ({} -> {})",
			dropped,
			listings.len(),
			products.len()
		);
	}

	(products, dropped)
}
