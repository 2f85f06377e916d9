// crates.io
use ::http::StatusCode;
// self
use crate::obs::{OperationKind, OperationOutcome};

/// Increments `gateway_token_operation_total{operation, outcome}` when `metrics` is enabled.
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"gateway_token_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Increments `gateway_token_service_responses_total{class}` for one service answer.
pub fn record_service_status(status: StatusCode) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("gateway_token_service_responses_total", "class" => status_class(status))
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = status;
	}
}

/// Buckets a status for metric labels; `401` gets its own bucket since it drives refreshes.
pub fn status_class(status: StatusCode) -> &'static str {
	match status.as_u16() {
		401 => "unauthorized",
		200..=299 => "2xx",
		300..=399 => "3xx",
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}
