//! Pazar Service
//!
//! Core aggregation logic: the parallel-fetch orchestrator and the
//! multi-stage data-quality pipeline that turns noisy raw listings into a
//! deduplicated, unit-normalized, relevance-ranked result set.

pub mod assembler;
pub mod orchestrator;
pub mod pipeline;
pub mod reranker;
pub mod standardizer;
pub mod text;

pub use assembler::summarize;
pub use orchestrator::OrchestratorService;
pub use pipeline::FilterPipeline;
pub use reranker::{
	GatewayError, GatewayResult, HttpRerankerGateway, RerankCandidate, RerankerGateway,
};
pub use standardizer::{parse_quantity, standardize, standardize_all};
