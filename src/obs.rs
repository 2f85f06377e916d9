//! Spans, log events, and counters for the three client operations.
//!
//! Every operation opens an [`OperationSpan`] tagged with the endpoint it talks to and closes
//! it with an [`OperationOutcome`] describing how it ended. Both halves feed the
//! `gateway_token.operation` span (feature `tracing`, default) and the
//! `gateway_token_operation_total` counter (feature `metrics`). Service responses are also
//! counted per status class in `gateway_token_service_responses_total`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

pub(crate) use self::tracing::obs_event;

// self
use crate::{
	_prelude::*,
	http::GatewayResponse,
	retry::ServiceErrorPolicy,
};

/// Public operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Client-credentials grant request.
	AcquireToken,
	/// Token revocation request.
	RevokeToken,
	/// Authenticated call to the protected service.
	CallService,
}
impl OperationKind {
	/// Label used for the `operation` span field and metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AcquireToken => "acquire_token",
			Self::RevokeToken => "revoke_token",
			Self::CallService => "call_service",
		}
	}
}

/// How an operation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// The operation started.
	Attempt,
	/// A token was issued and cached.
	Acquired,
	/// The cached token was revoked.
	Revoked,
	/// The service answered `2xx`.
	Served,
	/// The token or revoke endpoint answered with a non-200 status.
	Rejected,
	/// The token endpoint answered `200` without a usable `access_token`.
	Malformed,
	/// Revocation was skipped because nothing was cached.
	NoToken,
	/// The service error was handed back on the first non-401 failure.
	ServiceError,
	/// Every service attempt failed; the last answer was not a `401`.
	Exhausted,
	/// Every service attempt failed; the last answer was a `401`.
	Unauthorized,
	/// No token could be acquired within the attempt budget.
	TokenNeverAcquired,
	/// An endpoint could not be reached.
	TransportFailure,
	/// A request could not be assembled.
	InvalidRequest,
}
impl OperationOutcome {
	/// Label used for the `outcome` span field and metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Attempt => "attempt",
			Self::Acquired => "acquired",
			Self::Revoked => "revoked",
			Self::Served => "served",
			Self::Rejected => "rejected",
			Self::Malformed => "malformed",
			Self::NoToken => "no_token",
			Self::ServiceError => "service_error",
			Self::Exhausted => "exhausted",
			Self::Unauthorized => "unauthorized",
			Self::TokenNeverAcquired => "token_never_acquired",
			Self::TransportFailure => "transport_failure",
			Self::InvalidRequest => "invalid_request",
		}
	}

	/// Classifies an error returned by any operation.
	pub fn of_error(error: &Error) -> Self {
		match error {
			Error::Config(_) => Self::InvalidRequest,
			Error::Transport(_) => Self::TransportFailure,
			Error::TokenNeverAcquired { .. } => Self::TokenNeverAcquired,
		}
	}

	/// Classifies the response a service call handed back under `policy`.
	///
	/// Under [`ServiceErrorPolicy::Retry`] every non-`2xx` answer means the budget ran out.
	/// Under [`ServiceErrorPolicy::ReturnImmediately`] only a `401` can exhaust it.
	pub fn of_service_response(response: &GatewayResponse, policy: ServiceErrorPolicy) -> Self {
		if response.is_success() {
			Self::Served
		} else if response.is_unauthorized() {
			Self::Unauthorized
		} else if policy == ServiceErrorPolicy::ReturnImmediately {
			Self::ServiceError
		} else {
			Self::Exhausted
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use ::http::StatusCode;
	// self
	use super::*;
	use crate::error::TransportError;

	#[test]
	fn errors_map_to_distinct_outcomes() {
		let endpoint = Url::parse("https://gateway.example.com/token")
			.expect("Endpoint fixture should parse.");
		let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");

		assert_eq!(
			OperationOutcome::of_error(&TransportError::network(&endpoint, io).into()),
			OperationOutcome::TransportFailure,
		);
		assert_eq!(
			OperationOutcome::of_error(&Error::TokenNeverAcquired { attempts: 2 }),
			OperationOutcome::TokenNeverAcquired,
		);
	}

	#[test]
	fn service_responses_depend_on_policy() {
		let ok = GatewayResponse::new(StatusCode::OK);
		let unauthorized = GatewayResponse::new(StatusCode::UNAUTHORIZED);
		let unavailable = GatewayResponse::new(StatusCode::SERVICE_UNAVAILABLE);

		for policy in [ServiceErrorPolicy::Retry, ServiceErrorPolicy::ReturnImmediately] {
			assert_eq!(OperationOutcome::of_service_response(&ok, policy), OperationOutcome::Served);
			assert_eq!(
				OperationOutcome::of_service_response(&unauthorized, policy),
				OperationOutcome::Unauthorized,
			);
		}

		assert_eq!(
			OperationOutcome::of_service_response(&unavailable, ServiceErrorPolicy::Retry),
			OperationOutcome::Exhausted,
		);
		assert_eq!(
			OperationOutcome::of_service_response(
				&unavailable,
				ServiceErrorPolicy::ReturnImmediately
			),
			OperationOutcome::ServiceError,
		);
	}

	#[test]
	fn labels_are_snake_case() {
		assert_eq!(OperationKind::CallService.as_str(), "call_service");
		assert_eq!(OperationOutcome::TokenNeverAcquired.to_string(), "token_never_acquired");
	}
}
