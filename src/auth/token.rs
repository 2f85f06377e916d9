//! Access-token models: the redacted secret, the cached token, and the shared slot.

pub mod response;
pub mod secret;
pub mod slot;

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Access token currently considered valid by the client.
///
/// No expiry is tracked; a token stays current until it is revoked or a service call
/// answers `401 Unauthorized`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
	/// Bearer secret; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Instant the token endpoint handed out this token.
	pub acquired_at: OffsetDateTime,
}
impl AccessToken {
	/// Wraps a freshly acquired secret, stamping it with the current UTC instant.
	pub fn new(secret: TokenSecret) -> Self {
		Self { secret, acquired_at: OffsetDateTime::now_utc() }
	}

	/// Returns the raw bearer value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.secret.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &self.secret)
			.field("acquired_at", &self.acquired_at)
			.finish()
	}
}
