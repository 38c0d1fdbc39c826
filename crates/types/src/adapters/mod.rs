//! Source adapter contract and errors

pub mod errors;
pub mod traits;

pub use errors::AdapterError;
pub use traits::SourceAdapter;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;
