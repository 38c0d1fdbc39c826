//! Response shapes for the pipeline entry point

use crate::products::StandardizedProduct;
use crate::sources::SourceOutcome;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cheapest/most-expensive/savings summary over a ranked result list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSummary {
	pub cheapest: Option<StandardizedProduct>,
	pub most_expensive: Option<StandardizedProduct>,
	/// Price gap on the comparison basis the assembler chose; never negative.
	pub potential_saving: Option<Decimal>,
}

/// Outcome log entry, in source registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOutcomeEntry {
	pub source_id: String,
	#[serde(flatten)]
	pub outcome: SourceOutcome,
}

/// Full response of `aggregate(query)`, consumed by the outer surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResponse {
	pub query: String,
	pub results: Vec<StandardizedProduct>,
	pub cheapest: Option<StandardizedProduct>,
	pub most_expensive: Option<StandardizedProduct>,
	pub potential_saving: Option<Decimal>,
	pub source_outcomes: Vec<SourceOutcomeEntry>,
}
