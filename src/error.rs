//! Client-level error types shared by the HTTP adapter and the token client.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Per-attempt failures (bad status, malformed JSON) never show up here; they are reported
/// as [`AcquireOutcome`](crate::client::AcquireOutcome) or
/// [`RevokeOutcome`](crate::client::RevokeOutcome) values instead.
#[derive(Debug, ThisError)]
pub enum Error {
	/// A request could not be assembled.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The retry budget ran out before any access token could be obtained.
	#[error("No access token could be acquired after {attempts} attempt(s).")]
	TokenNeverAcquired {
		/// Number of acquisition attempts that were made.
		attempts: u32,
	},
}

/// Request assembly failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A header value could not be encoded.
	#[error("The {header} header value is invalid.")]
	InvalidHeader {
		/// Header name that failed to encode.
		header: &'static str,
		/// Underlying encoding failure.
		#[source]
		source: ::http::header::InvalidHeaderValue,
	},
}

/// Failures to reach a gateway endpoint at all.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// URL of the endpoint that could not be reached.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error raised while calling `endpoint`.
	pub fn network(endpoint: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint: endpoint.to_string(), source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as _;
	// self
	use super::*;

	#[test]
	fn transport_error_keeps_source_and_endpoint() {
		let endpoint =
			Url::parse("https://gateway.example.com/token").expect("Endpoint fixture should parse.");
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
		let err: Error = TransportError::network(&endpoint, io).into();

		assert!(err.to_string().contains("https://gateway.example.com/token"));
		assert_eq!(
			err.source().expect("Transport errors should expose their source.").to_string(),
			"connection refused",
		);
	}

	#[test]
	fn config_error_reports_header_and_source() {
		let source = ::http::HeaderValue::from_bytes(b"bad\x01value")
			.expect_err("Control bytes should not form a header value.");
		let err: Error = ConfigError::InvalidHeader { header: "authorization", source }.into();

		assert_eq!(err.to_string(), "The authorization header value is invalid.");
		assert!(err.source().is_some());
	}

	#[test]
	fn token_never_acquired_reports_attempts() {
		let err = Error::TokenNeverAcquired { attempts: 3 };

		assert_eq!(err.to_string(), "No access token could be acquired after 3 attempt(s).");
	}
}
