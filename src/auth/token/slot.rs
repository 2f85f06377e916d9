//! Lock-guarded cell holding the one access token that is current for a client.

// self
use crate::{
	_prelude::*,
	auth::token::{AccessToken, secret::TokenSecret},
};

/// Thread-safe slot holding either nothing or one complete [`AccessToken`].
///
/// Every read and write goes through a single mutex, so callers observe either the old
/// token, the new token, or absence; never a partial value. The lock is only held for the
/// duration of a clone or swap and never across an `.await`.
#[derive(Debug, Default)]
pub struct TokenSlot(Mutex<Option<AccessToken>>);
impl TokenSlot {
	/// Returns a copy of the current token, if any.
	pub fn current(&self) -> Option<AccessToken> {
		self.0.lock().clone()
	}

	/// Returns `true` when no token is cached.
	pub fn is_empty(&self) -> bool {
		self.0.lock().is_none()
	}

	/// Stores `token` as the current value, returning the token it replaced.
	pub fn store(&self, token: AccessToken) -> Option<AccessToken> {
		self.0.lock().replace(token)
	}

	/// Clears the slot only if it still holds `stale`.
	///
	/// Returns `false` when the slot is already empty or holds a different token, which
	/// means another caller has already replaced or dropped the stale value.
	pub fn clear_if_current(&self, stale: &TokenSecret) -> bool {
		let mut guard = self.0.lock();

		match guard.as_ref() {
			Some(current) if &current.secret == stale => {
				*guard = None;

				true
			},
			_ => false,
		}
	}
}
