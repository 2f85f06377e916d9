// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for token client activity.
#[derive(Debug, Default)]
pub struct ClientMetrics {
	acquire_attempts: AtomicU64,
	acquire_successes: AtomicU64,
	acquire_failures: AtomicU64,
	service_calls: AtomicU64,
	unauthorized: AtomicU64,
	revocations: AtomicU64,
}
impl ClientMetrics {
	/// Returns the number of token requests sent to the token endpoint.
	pub fn acquire_attempts(&self) -> u64 {
		self.acquire_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of token requests that yielded a token.
	pub fn acquire_successes(&self) -> u64 {
		self.acquire_successes.load(Ordering::Relaxed)
	}

	/// Returns the number of token requests rejected or answered with malformed bodies.
	pub fn acquire_failures(&self) -> u64 {
		self.acquire_failures.load(Ordering::Relaxed)
	}

	/// Returns the number of requests sent to the protected service.
	pub fn service_calls(&self) -> u64 {
		self.service_calls.load(Ordering::Relaxed)
	}

	/// Returns the number of `401 Unauthorized` answers from the protected service.
	pub fn unauthorized(&self) -> u64 {
		self.unauthorized.load(Ordering::Relaxed)
	}

	/// Returns the number of successful revocations.
	pub fn revocations(&self) -> u64 {
		self.revocations.load(Ordering::Relaxed)
	}

	pub(crate) fn record_acquire_attempt(&self) {
		self.acquire_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_acquire_success(&self) {
		self.acquire_successes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_acquire_failure(&self) {
		self.acquire_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_service_call(&self) {
		self.service_calls.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_unauthorized(&self) {
		self.unauthorized.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_revocation(&self) {
		self.revocations.fetch_add(1, Ordering::Relaxed);
	}
}
