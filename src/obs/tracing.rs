// self
use crate::{
	_prelude::*,
	obs::{self, OperationKind, OperationOutcome},
};

/// Future returned by [`OperationSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OperationSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// Emits a `tracing` event at the given level; expands to nothing without the feature.
macro_rules! obs_event {
	($level:ident, $($arg:tt)+) => {
		#[cfg(feature = "tracing")]
		{
			::tracing::$level!($($arg)+);
		}
	};
}
pub(crate) use obs_event;

/// Span covering one client operation against one gateway endpoint.
///
/// [`OperationSpan::start`] counts the attempt; [`OperationSpan::finish`] fills the span's
/// `outcome` field and counts the outcome.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	kind: OperationKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens the span for `kind` against `endpoint` and records the attempt.
	pub fn start(kind: OperationKind, endpoint: &Url) -> Self {
		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"gateway_token.operation",
				operation = kind.as_str(),
				endpoint = %endpoint,
				outcome = tracing::field::Empty,
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = endpoint;

			Self { kind }
		}
	}

	/// Returns the operation this span covers.
	pub fn kind(&self) -> OperationKind {
		self.kind
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Records how the operation ended.
	pub fn finish(&self, outcome: OperationOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());
		}

		obs::record_operation_outcome(self.kind, outcome);
	}
}
