//! Result assembler: price extremes and the saving headline
//!
//! Summarizes a ranked product list into cheapest offer, most expensive
//! offer, and the gap between them. Comparison prefers the per-kg
//! normalized price when enough of the list carries one; otherwise it falls
//! back to the raw shelf price so different pack sizes at least compare on
//! something.

use pazar_types::{PriceSummary, StandardizedProduct};
use rust_decimal::Decimal;
use tracing::debug;

/// Which price field a summary compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComparisonBasis {
	PerKg,
	Raw,
}

/// Build the price summary for a (possibly empty) result set.
///
/// The basis is normalized per-kg price when at least half of the products
/// carry one, raw price otherwise. On the per-kg basis, products without a
/// normalized price are excluded from the extremes. Ties keep the earlier
/// product. `potential_saving` is never negative.
pub fn summarize(products: &[StandardizedProduct]) -> PriceSummary {
	if products.is_empty() {
		return PriceSummary::default();
	}

	let with_norm = products
		.iter()
		.filter(|p| p.normalized_price_per_kg.is_some())
		.count();
	let basis = if with_norm > 0 && with_norm >= products.len() - with_norm {
		ComparisonBasis::PerKg
	} else {
		ComparisonBasis::Raw
	};
	debug!(
		"Summarizing {} products on {:?} basis ({} normalized)",
		products.len(),
		basis,
		with_norm
	);

	let mut cheapest: Option<(&StandardizedProduct, Decimal)> = None;
	let mut most_expensive: Option<(&StandardizedProduct, Decimal)> = None;

	for product in products {
		let value = match basis {
			ComparisonBasis::PerKg => match product.normalized_price_per_kg {
				Some(value) => value,
				None => continue,
			},
			ComparisonBasis::Raw => product.price,
		};

		// Strict comparisons: the first occurrence wins ties.
		match &cheapest {
			Some((_, best)) if value >= *best => {},
			_ => cheapest = Some((product, value)),
		}
		match &most_expensive {
			Some((_, worst)) if value <= *worst => {},
			_ => most_expensive = Some((product, value)),
		}
	}

	let potential_saving = match (&cheapest, &most_expensive) {
		(Some((_, low)), Some((_, high))) => Some((*high - *low).max(Decimal::ZERO)),
		_ => None,
	};

	PriceSummary {
		cheapest: cheapest.map(|(p, _)| p.clone()),
		most_expensive: most_expensive.map(|(p, _)| p.clone()),
		potential_saving,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pazar_types::{Quantity, Unit};
	use rust_decimal_macros::dec;

	fn product(name: &str, price: Decimal) -> StandardizedProduct {
		StandardizedProduct {
			name: name.to_string(),
			price,
			currency: "TRY".to_string(),
			quantity: None,
			normalized_price_per_kg: None,
			source_name: "migros".to_string(),
		}
	}

	fn normalized(name: &str, price: Decimal, per_kg: Decimal) -> StandardizedProduct {
		let mut p = product(name, price);
		p.quantity = Some(Quantity::new(1.0, Unit::Kilogram));
		p.normalized_price_per_kg = Some(per_kg);
		p
	}

	#[test]
	fn test_summarize_empty_is_all_none() {
		let summary = summarize(&[]);
		assert!(summary.cheapest.is_none());
		assert!(summary.most_expensive.is_none());
		assert!(summary.potential_saving.is_none());
	}

	#[test]
	fn test_summarize_prefers_per_kg_basis() {
		// The 500 g pack is cheaper on the shelf but dearer per kilogram.
		let products = vec![
			normalized("Bonfile 500 g", dec!(120), dec!(240)),
			normalized("Bonfile 1 kg", dec!(200), dec!(200)),
		];

		let summary = summarize(&products);
		assert_eq!(summary.cheapest.unwrap().name, "Bonfile 1 kg");
		assert_eq!(summary.most_expensive.unwrap().name, "Bonfile 500 g");
		assert_eq!(summary.potential_saving, Some(dec!(40)));
	}

	#[test]
	fn test_summarize_excludes_unnormalized_on_per_kg_basis() {
		let products = vec![
			normalized("A", dec!(100), dec!(100)),
			normalized("B", dec!(300), dec!(300)),
			product("C çok ucuz", dec!(1)),
		];

		let summary = summarize(&products);
		assert_eq!(summary.cheapest.unwrap().name, "A");
		assert_eq!(summary.most_expensive.unwrap().name, "B");
		assert_eq!(summary.potential_saving, Some(dec!(200)));
	}

	#[test]
	fn test_summarize_raw_basis_when_too_few_normalized() {
		let products = vec![
			product("A", dec!(30)),
			product("B", dec!(10)),
			normalized("C", dec!(20), dec!(20)),
		];

		let summary = summarize(&products);
		assert_eq!(summary.cheapest.unwrap().name, "B");
		assert_eq!(summary.most_expensive.unwrap().name, "A");
		assert_eq!(summary.potential_saving, Some(dec!(20)));
	}

	#[test]
	fn test_summarize_single_product_saves_zero() {
		let products = vec![normalized("A", dec!(50), dec!(50))];
		let summary = summarize(&products);
		assert_eq!(summary.cheapest.as_ref().unwrap().name, "A");
		assert_eq!(summary.most_expensive.as_ref().unwrap().name, "A");
		assert_eq!(summary.potential_saving, Some(dec!(0)));
	}

	#[test]
	fn test_summarize_ties_keep_first_occurrence() {
		let products = vec![
			normalized("First", dec!(100), dec!(100)),
			normalized("Second", dec!(100), dec!(100)),
		];
		let summary = summarize(&products);
		assert_eq!(summary.cheapest.unwrap().name, "First");
		assert_eq!(summary.most_expensive.unwrap().name, "First");
	}
}
