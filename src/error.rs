//! Client-level error types shared across the governor, transport, and API sections.

// self
use crate::{_prelude::*, auth::AuthLevel, governor::AdmissionError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message reported when the remote error body carries none.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error.";

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The request governor refused or abandoned the call.
	#[error(transparent)]
	Admission(#[from] AdmissionError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Encode {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},

	/// The endpoint needs a higher authentication level than the client holds.
	#[error("You must authenticate to access this resource.")]
	Unauthorized {
		/// Level required by the endpoint.
		required: AuthLevel,
		/// Level derived from the configured credentials.
		current: AuthLevel,
	},
	/// Remote service answered with an error status.
	#[error("{message}")]
	Api {
		/// HTTP status code returned by the service.
		status: u16,
		/// Message extracted from the response body.
		message: String,
	},
	/// OAuth token endpoint omitted a required field.
	#[error("Token endpoint response is missing `{field}`.")]
	InvalidTokenResponse {
		/// Missing form field.
		field: &'static str,
	},
}
impl Error {
	/// Builds an [`Error::Api`] from a status code and an optional remote message.
	pub fn api(status: u16, message: Option<String>) -> Self {
		Self::Api { status, message: message.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.into()) }
	}

	/// HTTP-equivalent status code for the failure, when one applies.
	pub fn status_code(&self) -> Option<u16> {
		match self {
			Self::Admission(e) => e.status_code(),
			Self::Unauthorized { .. } => Some(401),
			Self::Api { status, .. } => Some(*status),
			Self::Decode(DecodeError::Json { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A configured or computed URL cannot be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending input.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// No HTTP transport was supplied and the default one is compiled out.
	#[error("No HTTP transport is configured; enable the `reqwest` feature or supply one.")]
	MissingTransport,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a URL parsing failure together with its input.
	pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
		Self::InvalidUrl { url: url.into(), source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Body decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON for the requested type.
	#[error("Response body is not valid JSON for the requested type.")]
	Json {
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Body is an HTML page rather than JSON.
	#[error("Response body is markup, not JSON: {preview}")]
	NotJson {
		/// Leading characters of the body.
		preview: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_defaults_to_unknown_message() {
		let err = Error::api(500, None);

		assert_eq!(err.to_string(), "Unknown error.");
		assert_eq!(err.status_code(), Some(500));
	}

	#[test]
	fn unauthorized_maps_to_401() {
		let err = Error::Unauthorized { required: AuthLevel::User, current: AuthLevel::None };

		assert_eq!(err.status_code(), Some(401));
		assert_eq!(err.to_string(), "You must authenticate to access this resource.");
	}

	#[test]
	fn quota_rejection_maps_to_429() {
		let err = Error::from(AdmissionError::QuotaExceeded);

		assert_eq!(err.status_code(), Some(429));
		assert_eq!(err.to_string(), "Too many requests.");
	}
}
