//! Pazar Types
//!
//! Shared models and traits for the retail price aggregator.
//! This crate contains all domain models organized by business entity.

pub mod adapters;
pub mod listings;
pub mod products;
pub mod queries;
pub mod responses;
pub mod sources;

// Re-export commonly used types for convenience
pub use queries::{GeoPoint, Query};

pub use listings::{RawListing, SourcedListing};

pub use products::{Quantity, StandardizedProduct, Unit};

pub use sources::{AggregatedResult, Source, SourceOutcome, SourceRuntimeConfig};

pub use adapters::{AdapterError, AdapterResult, SourceAdapter};

pub use responses::{AggregateResponse, PriceSummary, SourceOutcomeEntry};
