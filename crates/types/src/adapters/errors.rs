//! Error types for adapter operations

use thiserror::Error;

/// Source adapter operation errors.
///
/// These are isolated per source by the orchestrator: an error here is
/// recorded in the outcome log and never aborts sibling sources.
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("Adapter already registered: {adapter_id}")]
	AlreadyRegistered { adapter_id: String },

	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Rate limit exceeded for source {source_id}")]
	RateLimitExceeded { source_id: String },

	#[error("Authentication failed for source {source_id}")]
	AuthenticationFailed { source_id: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Connection error: {0}")]
	Connection(String),

	#[error("Configuration error: {reason}")]
	ConfigError { reason: String },
}

impl AdapterError {
	/// Extract the HTTP status code from the error if available.
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatusError { status_code, .. } => Some(*status_code),
			AdapterError::HttpError(reqwest_error) => {
				reqwest_error.status().map(|status| status.as_u16())
			},
			_ => None,
		}
	}

	/// Map a failed HTTP response status onto the right error variant.
	pub fn from_response_status(status_code: u16, source_id: &str) -> Self {
		match status_code {
			401 | 403 => Self::AuthenticationFailed {
				source_id: source_id.to_string(),
			},
			429 => Self::RateLimitExceeded {
				source_id: source_id.to_string(),
			},
			code => {
				let reason = match code {
					400 => "Bad Request".to_string(),
					404 => "Not Found".to_string(),
					408 => "Request Timeout".to_string(),
					500 => "Internal Server Error".to_string(),
					502 => "Bad Gateway".to_string(),
					503 => "Service Unavailable".to_string(),
					504 => "Gateway Timeout".to_string(),
					_ => format!("HTTP Error {}", code),
				};
				Self::HttpStatusError {
					status_code: code,
					reason,
				}
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_code_extraction() {
		let error = AdapterError::HttpStatusError {
			status_code: 404,
			reason: "Not Found".to_string(),
		};
		assert_eq!(error.status_code(), Some(404));

		let error = AdapterError::InvalidResponse {
			reason: "not a list".to_string(),
		};
		assert_eq!(error.status_code(), None);
	}

	#[test]
	fn test_response_status_mapping() {
		assert!(matches!(
			AdapterError::from_response_status(401, "migros"),
			AdapterError::AuthenticationFailed { .. }
		));
		assert!(matches!(
			AdapterError::from_response_status(429, "migros"),
			AdapterError::RateLimitExceeded { .. }
		));

		let error = AdapterError::from_response_status(503, "migros");
		assert!(error.to_string().contains("503"));
		assert!(error.to_string().contains("Service Unavailable"));
	}
}
