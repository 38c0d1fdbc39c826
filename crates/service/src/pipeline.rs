//! Five-stage data-quality and ranking pipeline
//!
//! Ordered stages over an already-collected list of standardized products:
//! blacklist filter, query-term filter, deduplication, unit-price
//! normalization, relevance rerank. Every stage is total on well-formed
//! input; each one's output is at most its input, except the rerank stage
//! which reorders (and may drop indices the gateway marked irrelevant).

use crate::reranker::{validate_indices, RerankCandidate, RerankerGateway};
use crate::standardizer::price_per_kg;
use crate::text::fold;
use pazar_types::StandardizedProduct;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The configured filter pipeline.
pub struct FilterPipeline {
	/// Folded blacklist terms.
	blacklist: Vec<String>,
	/// Folded trigger → folded required terms, longest trigger first.
	required_terms: Vec<(String, Vec<String>)>,
	reranker: Option<Arc<dyn RerankerGateway>>,
}

impl FilterPipeline {
	pub fn new(
		blacklist: Vec<String>,
		required_terms: HashMap<String, Vec<String>>,
		reranker: Option<Arc<dyn RerankerGateway>>,
	) -> Self {
		let blacklist = blacklist.iter().map(|term| fold(term)).collect();

		// Longest trigger first so "tavuk göğsü" wins over a bare "tavuk".
		let mut required_terms: Vec<(String, Vec<String>)> = required_terms
			.into_iter()
			.map(|(trigger, terms)| {
				(
					fold(&trigger),
					terms.iter().map(|term| fold(term)).collect(),
				)
			})
			.collect();
		required_terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

		Self {
			blacklist,
			required_terms,
			reranker,
		}
	}

	/// Run all five stages in order.
	pub async fn run(
		&self,
		query: &str,
		products: Vec<StandardizedProduct>,
	) -> Vec<StandardizedProduct> {
		let count_in = products.len();

		let products = self.apply_blacklist(query, products);
		let products = self.apply_query_terms(query, products);
		let products = deduplicate(products);
		let products = normalize_unit_prices(products);

		info!(
			"Pipeline '{}': {} -> {} products after local stages, reranking",
			query,
			count_in,
			products.len()
		);

		self.rerank(query, products).await
	}

	/// Stage 1: drop cross-category noise.
	///
	/// A blacklisted term only disqualifies when the query itself does not
	/// contain it — searching for "deterjan" must still return detergents.
	fn apply_blacklist(
		&self,
		query: &str,
		products: Vec<StandardizedProduct>,
	) -> Vec<StandardizedProduct> {
		let folded_query = fold(query);
		let before = products.len();

		let products: Vec<StandardizedProduct> = products
			.into_iter()
			.filter(|product| {
				let name = fold(&product.name);
				!self
					.blacklist
					.iter()
					.any(|term| name.contains(term.as_str()) && !folded_query.contains(term.as_str()))
			})
			.collect();

		let dropped = before - products.len();
		if dropped > 0 {
			debug!("Blacklist filter dropped {} products", dropped);
		}
		products
	}

	/// Stage 2: require at least one query-derived term in the name.
	///
	/// The rule table is a deterministic, query-keyed lookup; when no rule
	/// matches, any query token of three or more characters counts as a
	/// required term, and a query with no such token filters nothing.
	fn apply_query_terms(
		&self,
		query: &str,
		products: Vec<StandardizedProduct>,
	) -> Vec<StandardizedProduct> {
		let folded_query = fold(query);

		let required: Vec<String> = match self
			.required_terms
			.iter()
			.find(|(trigger, _)| folded_query.contains(trigger.as_str()))
		{
			Some((_, terms)) => terms.clone(),
			None => {
				let tokens: Vec<String> = folded_query
					.split_whitespace()
					.filter(|token| token.len() >= 3)
					.map(str::to_string)
					.collect();
				if tokens.is_empty() {
					return products;
				}
				tokens
			},
		};

		let before = products.len();
		let products: Vec<StandardizedProduct> = products
			.into_iter()
			.filter(|product| {
				let name = fold(&product.name);
				required.iter().any(|term| name.contains(term.as_str()))
			})
			.collect();

		let dropped = before - products.len();
		if dropped > 0 {
			debug!("Query-term filter dropped {} products", dropped);
		}
		products
	}

	/// Stage 5: delegate ordering to the reranker gateway, falling back to
	/// the deterministic order on any gateway failure or invalid response.
	async fn rerank(
		&self,
		query: &str,
		products: Vec<StandardizedProduct>,
	) -> Vec<StandardizedProduct> {
		if products.is_empty() {
			return products;
		}

		let Some(gateway) = &self.reranker else {
			return fallback_order(products);
		};

		let candidates: Vec<RerankCandidate> = products
			.iter()
			.enumerate()
			.map(|(index, product)| RerankCandidate {
				index,
				name: product.name.clone(),
				normalized_price_per_kg: product.normalized_price_per_kg,
			})
			.collect();

		match gateway.rerank(query, &candidates).await {
			Ok(indices) => match validate_indices(&indices, products.len()) {
				Ok(()) => {
					debug!(
						"Reranker returned {} of {} candidates",
						indices.len(),
						products.len()
					);
					reorder(products, &indices)
				},
				Err(reason) => {
					warn!("Rejecting reranker response ({}), using fallback order", reason);
					fallback_order(products)
				},
			},
			Err(e) => {
				warn!("Reranker unavailable ({}), using fallback order", e);
				fallback_order(products)
			},
		}
	}
}

/// Stage 3: keep exactly one representative per `(name, source)` group,
/// first occurrence wins. A source may legitimately return the same offer
/// twice across pagination or query variants.
pub fn deduplicate(products: Vec<StandardizedProduct>) -> Vec<StandardizedProduct> {
	let before = products.len();
	let mut seen: HashSet<(String, String)> = HashSet::with_capacity(products.len());
	let products: Vec<StandardizedProduct> = products
		.into_iter()
		.filter(|product| seen.insert(product.dedup_key()))
		.collect();

	let dropped = before - products.len();
	if dropped > 0 {
		debug!("Deduplication removed {} duplicate offers", dropped);
	}
	products
}

/// Stage 4: compute `normalized_price_per_kg` for products with a known
/// quantity. Products without one keep `None` and are not penalized.
/// Idempotent: recomputing an already-normalized product yields the same
/// value.
pub fn normalize_unit_prices(
	mut products: Vec<StandardizedProduct>,
) -> Vec<StandardizedProduct> {
	for product in &mut products {
		if let Some(quantity) = product.quantity {
			product.normalized_price_per_kg = price_per_kg(product.price, &quantity);
		}
	}
	products
}

/// Deterministic fallback order: products with a known per-kg price sorted
/// ascending by it, then the rest in their existing order.
pub fn fallback_order(products: Vec<StandardizedProduct>) -> Vec<StandardizedProduct> {
	let (mut with_price, without_price): (Vec<_>, Vec<_>) = products
		.into_iter()
		.partition(|product| product.normalized_price_per_kg.is_some());

	// Stable sort keeps same-price offers in arrival order.
	with_price.sort_by_key(|product| product.normalized_price_per_kg);

	with_price.extend(without_price);
	with_price
}

/// Reorder `products` to the gateway's index order. Indices have been
/// validated; anything the gateway dropped is excluded.
fn reorder(products: Vec<StandardizedProduct>, indices: &[usize]) -> Vec<StandardizedProduct> {
	let mut slots: Vec<Option<StandardizedProduct>> = products.into_iter().map(Some).collect();
	indices
		.iter()
		.filter_map(|&index| slots[index].take())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reranker::{GatewayError, GatewayResult};
	use async_trait::async_trait;
	use pazar_types::{Quantity, Unit};
	use rust_decimal::Decimal;
	use rust_decimal_macros::dec;

	fn product(name: &str, source: &str, price: Decimal) -> StandardizedProduct {
		StandardizedProduct {
			name: name.to_string(),
			price,
			currency: "TRY".to_string(),
			quantity: None,
			normalized_price_per_kg: None,
			source_name: source.to_string(),
		}
	}

	fn product_with_quantity(
		name: &str,
		source: &str,
		price: Decimal,
		magnitude: f64,
		unit: Unit,
	) -> StandardizedProduct {
		let mut p = product(name, source, price);
		p.quantity = Some(Quantity::new(magnitude, unit));
		p
	}

	fn pipeline() -> FilterPipeline {
		let mut required = HashMap::new();
		required.insert(
			"tavuk göğsü".to_string(),
			vec!["tavuk".to_string(), "bonfile".to_string(), "piliç".to_string()],
		);
		FilterPipeline::new(vec!["deterjan".to_string()], required, None)
	}

	#[test]
	fn test_blacklist_respects_query_override() {
		let p = pipeline();
		let products = vec![
			product("Çamaşır Deterjanı 4 kg", "sok", dec!(150)),
			product("Piliç Bonfile", "sok", dec!(190)),
		];

		let filtered = p.apply_blacklist("tavuk göğsü", products.clone());
		assert_eq!(filtered.len(), 1);
		assert_eq!(filtered[0].name, "Piliç Bonfile");

		// Searching for detergent keeps detergents.
		let kept = p.apply_blacklist("deterjan", products);
		assert_eq!(kept.len(), 2);
	}

	#[test]
	fn test_query_term_rule_table_lookup() {
		let p = pipeline();
		let products = vec![
			product("Banvit Piliç Bonfile Kg", "migros", dec!(190)),
			product("Dana Antrikot", "migros", dec!(450)),
		];

		let filtered = p.apply_query_terms("tavuk göğsü", products);
		assert_eq!(filtered.len(), 1);
		assert_eq!(filtered[0].name, "Banvit Piliç Bonfile Kg");
	}

	#[test]
	fn test_query_term_generic_token_fallback() {
		let p = pipeline();
		let products = vec![
			product("Eti Makarna 500 g", "a101", dec!(20)),
			product("Pirinç Baldo", "a101", dec!(80)),
		];

		let filtered = p.apply_query_terms("makarna", products);
		assert_eq!(filtered.len(), 1);

		// Queries with no usable token filter nothing.
		let products = vec![product("Eti Makarna 500 g", "a101", dec!(20))];
		let kept = p.apply_query_terms("un", products);
		assert_eq!(kept.len(), 1);
	}

	#[test]
	fn test_deduplication_keeps_first_per_name_source_pair() {
		let products = vec![
			product("Banvit Piliç Bonfile Kg", "migros", dec!(189.95)),
			product("Banvit Piliç Bonfile Kg", "migros", dec!(189.95)),
			product("Banvit Piliç Bonfile Kg", "a101", dec!(184.50)),
		];

		let unique = deduplicate(products);
		assert_eq!(unique.len(), 2);

		let mut keys = HashSet::new();
		for p in &unique {
			assert!(keys.insert(p.dedup_key()), "duplicate key survived");
		}
	}

	#[test]
	fn test_dedup_output_never_exceeds_input() {
		let products: Vec<StandardizedProduct> = (0..10)
			.map(|i| product(&format!("Ürün {}", i % 4), "sok", dec!(10)))
			.collect();
		let unique = deduplicate(products);
		assert!(unique.len() <= 10);
		assert_eq!(unique.len(), 4);
	}

	#[test]
	fn test_normalization_computes_and_is_idempotent() {
		let products = vec![product_with_quantity(
			"Piliç Bonfile 500 g",
			"sok",
			dec!(100),
			500.0,
			Unit::Gram,
		)];

		let once = normalize_unit_prices(products);
		assert_eq!(once[0].normalized_price_per_kg, Some(dec!(200.00)));

		let twice = normalize_unit_prices(once);
		assert_eq!(twice[0].normalized_price_per_kg, Some(dec!(200.00)));
	}

	#[test]
	fn test_normalization_leaves_unknown_quantity_untouched() {
		let products = vec![product("Piliç Bonfile", "sok", dec!(100))];
		let normalized = normalize_unit_prices(products);
		assert_eq!(normalized[0].normalized_price_per_kg, None);
	}

	#[test]
	fn test_fallback_order_sorts_by_per_kg_then_appends_unknowns() {
		let mut a = product("A", "m", dec!(50));
		a.normalized_price_per_kg = Some(dec!(300));
		let mut b = product("B", "m", dec!(60));
		b.normalized_price_per_kg = Some(dec!(150));
		let c = product("C", "m", dec!(10));
		let d = product("D", "m", dec!(20));

		let ordered = fallback_order(vec![a, c.clone(), b, d.clone()]);
		let names: Vec<&str> = ordered.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, vec!["B", "A", "C", "D"]);
	}

	#[derive(Debug)]
	struct ScriptedGateway {
		behaviour: ScriptedBehaviour,
	}

	#[derive(Debug)]
	enum ScriptedBehaviour {
		Indices(Vec<usize>),
		Timeout,
	}

	#[async_trait]
	impl RerankerGateway for ScriptedGateway {
		async fn rerank(
			&self,
			_query: &str,
			_candidates: &[RerankCandidate],
		) -> GatewayResult<Vec<usize>> {
			match &self.behaviour {
				ScriptedBehaviour::Indices(indices) => Ok(indices.clone()),
				ScriptedBehaviour::Timeout => Err(GatewayError::Timeout {
					timeout_ms: 8000,
				}),
			}
		}
	}

	fn pipeline_with_gateway(behaviour: ScriptedBehaviour) -> FilterPipeline {
		FilterPipeline::new(
			Vec::new(),
			HashMap::new(),
			Some(Arc::new(ScriptedGateway {
				behaviour,
			})),
		)
	}

	#[tokio::test]
	async fn test_rerank_applies_gateway_order() {
		let p = pipeline_with_gateway(ScriptedBehaviour::Indices(vec![2, 0]));
		let products = vec![
			product("A", "m", dec!(10)),
			product("B", "m", dec!(20)),
			product("C", "m", dec!(30)),
		];

		let ranked = p.rerank("süt", products).await;
		let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
		// Index 1 was dropped by the gateway as irrelevant.
		assert_eq!(names, vec!["C", "A"]);
	}

	#[tokio::test]
	async fn test_rerank_falls_back_on_out_of_range_indices() {
		let p = pipeline_with_gateway(ScriptedBehaviour::Indices(vec![0, 7]));
		let mut a = product("A", "m", dec!(10));
		a.normalized_price_per_kg = Some(dec!(500));
		let mut b = product("B", "m", dec!(20));
		b.normalized_price_per_kg = Some(dec!(100));

		let ranked = p.rerank("süt", vec![a, b]).await;
		let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, vec!["B", "A"]);
	}

	#[tokio::test]
	async fn test_rerank_falls_back_on_gateway_timeout() {
		let p = pipeline_with_gateway(ScriptedBehaviour::Timeout);
		let mut a = product("A", "m", dec!(10));
		a.normalized_price_per_kg = Some(dec!(500));
		let mut b = product("B", "m", dec!(20));
		b.normalized_price_per_kg = Some(dec!(100));
		let c = product("C", "m", dec!(5));

		let ranked = p.rerank("süt", vec![a, c.clone(), b]).await;
		let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
		assert_eq!(names, vec!["B", "A", "C"]);
	}
}
