//! Retry budget, backoff strategies, and the service error policy.
//!
//! [`RetryPolicy`] bounds both phases of a service call (ensure-token and
//! call-with-refresh) with the same attempt budget. The delay between attempts comes from a
//! [`Backoff`] so the fixed one-second pause can be swapped for exponential growth without
//! touching the client's state machine.

// std
use std::num::NonZeroU32;
// crates.io
use rand::Rng;
// self
use crate::_prelude::*;

/// Delay strategy applied between failed attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
	/// Same delay after every failed attempt.
	Fixed(Duration),
	/// Delay doubles after every failed attempt, capped at `max`.
	Exponential {
		/// Delay after the first failed attempt.
		initial: Duration,
		/// Upper bound for any single delay.
		max: Duration,
		/// Picks a uniformly random delay in `[0, computed]` when true.
		jitter: bool,
	},
}
impl Backoff {
	const DEFAULT_DELAY: Duration = Duration::from_secs(1);

	/// Returns the delay to wait after the given failed attempt (1-based).
	pub fn delay_for(&self, attempt: u32) -> Duration {
		match *self {
			Backoff::Fixed(delay) => delay,
			Backoff::Exponential { initial, max, jitter } => {
				let shift = attempt.saturating_sub(1).min(31);
				let computed = initial.saturating_mul(1_u32 << shift).min(max);

				if jitter && !computed.is_zero() {
					let nanos = u64::try_from(computed.as_nanos()).unwrap_or(u64::MAX);

					Duration::from_nanos(rand::rng().random_range(0..=nanos))
				} else {
					computed
				}
			},
		}
	}

	/// Sleeps for the delay that follows `attempt`, skipping zero-length delays.
	pub async fn wait(&self, attempt: u32) {
		let delay = self.delay_for(attempt);

		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}
	}
}
impl Default for Backoff {
	fn default() -> Self {
		Backoff::Fixed(Self::DEFAULT_DELAY)
	}
}

/// What to do when the service answers with an error status other than `401`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorPolicy {
	/// Keep retrying until the budget is exhausted.
	#[default]
	Retry,
	/// Hand the error response back to the caller without further attempts.
	ReturnImmediately,
}

/// Attempt budget and pacing shared by every bounded loop of the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
	/// Maximum attempts per phase (the configured retry count).
	pub max_attempts: NonZeroU32,
	/// Delay strategy between attempts.
	pub backoff: Backoff,
	/// Handling of non-401 error statuses from the service endpoint.
	pub on_service_error: ServiceErrorPolicy,
}
impl RetryPolicy {
	const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = NonZeroU32::MIN.saturating_add(2);

	/// Creates a policy with the given budget, a fixed one-second delay, and retry on
	/// service errors.
	pub fn new(max_attempts: NonZeroU32) -> Self {
		Self { max_attempts, ..Self::default() }
	}

	/// Overrides the backoff strategy.
	pub fn with_backoff(mut self, backoff: Backoff) -> Self {
		self.backoff = backoff;

		self
	}

	/// Overrides the service error policy.
	pub fn with_service_error_policy(mut self, policy: ServiceErrorPolicy) -> Self {
		self.on_service_error = policy;

		self
	}

	/// Returns the attempt budget as a plain integer.
	pub fn attempts(&self) -> u32 {
		self.max_attempts.get()
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
			backoff: Backoff::default(),
			on_service_error: ServiceErrorPolicy::default(),
		}
	}
}
