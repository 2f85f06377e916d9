//! Token client: cached bearer token, client-credentials acquisition, revocation, and the
//! retrying service-call wrapper.

mod acquire;
mod call;
mod metrics;
mod revoke;

pub use self::metrics::ClientMetrics;

// crates.io
use ::http::StatusCode;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSlot},
	error::TransportError,
	http::{GatewayHttpClient, GatewayRequest, GatewayResponse},
	obs::OperationOutcome,
	settings::GatewaySettings,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Token client specialized for the crate's default reqwest transport.
pub type ReqwestTokenClient = TokenClient<ReqwestHttpClient>;

/// Manages one client-credentials access token for a service behind an API gateway.
///
/// The client owns the token slot, the adapter, and the immutable settings. Clones share
/// all three, so every clone sees the same current token; wrapping the client in an `Arc`
/// works just as well. Concurrent callers are safe: the slot is mutex-guarded and token
/// requests are serialized by an async guard that is never held while sleeping.
pub struct TokenClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// HTTP adapter used for every outbound gateway request.
	pub http_client: Arc<C>,
	/// Shared counters for acquisitions, service calls, and revocations.
	pub metrics: Arc<ClientMetrics>,
	settings: Arc<GatewaySettings>,
	token: Arc<TokenSlot>,
	acquire_guard: Arc<AsyncMutex<()>>,
}
impl<C> TokenClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(settings: GatewaySettings, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			metrics: Default::default(),
			settings: Arc::new(settings),
			token: Default::default(),
			acquire_guard: Default::default(),
		}
	}

	/// Returns the immutable settings.
	pub fn settings(&self) -> &GatewaySettings {
		&self.settings
	}

	/// Returns a copy of the access token currently considered valid, if any.
	pub fn current_token(&self) -> Option<AccessToken> {
		self.token.current()
	}

	/// Returns `true` when an access token is cached.
	pub fn has_token(&self) -> bool {
		!self.token.is_empty()
	}

	async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse> {
		let endpoint = request.url.clone();

		self.http_client
			.execute(request)
			.await
			.map_err(|e| TransportError::network(&endpoint, e).into())
	}
}
#[cfg(feature = "reqwest")]
impl TokenClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(settings: GatewaySettings) -> Self {
		Self::with_http_client(settings, ReqwestHttpClient::default())
	}
}
impl<C> Clone for TokenClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			metrics: Arc::clone(&self.metrics),
			settings: Arc::clone(&self.settings),
			token: Arc::clone(&self.token),
			acquire_guard: Arc::clone(&self.acquire_guard),
		}
	}
}
impl<C> Debug for TokenClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenClient")
			.field("settings", &self.settings)
			.field("token_cached", &self.has_token())
			.finish()
	}
}

/// Result of a single client-credentials grant request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquireOutcome {
	/// The token endpoint issued a token, which is now the current one.
	Acquired {
		/// Freshly cached token.
		token: AccessToken,
	},
	/// The token endpoint answered with a status other than `200 OK`.
	Rejected {
		/// Status returned by the token endpoint.
		status: StatusCode,
		/// Response body, decoded lossily.
		body: String,
	},
	/// The token endpoint answered `200 OK` without a usable `access_token`.
	Malformed {
		/// Status returned by the token endpoint.
		status: StatusCode,
		/// Why the body was unusable.
		reason: String,
	},
}
impl AcquireOutcome {
	/// Returns `true` when a token was stored.
	pub fn is_acquired(&self) -> bool {
		matches!(self, Self::Acquired { .. })
	}

	/// Consumes the outcome, returning the acquired token if any.
	pub fn into_token(self) -> Option<AccessToken> {
		match self {
			Self::Acquired { token } => Some(token),
			_ => None,
		}
	}
}

impl From<&AcquireOutcome> for OperationOutcome {
	fn from(outcome: &AcquireOutcome) -> Self {
		match outcome {
			AcquireOutcome::Acquired { .. } => Self::Acquired,
			AcquireOutcome::Rejected { .. } => Self::Rejected,
			AcquireOutcome::Malformed { .. } => Self::Malformed,
		}
	}
}

/// Result of a revocation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevokeOutcome {
	/// The gateway revoked the token and the slot was cleared.
	Revoked,
	/// No token was cached, so no request was sent.
	NoToken,
	/// The revoke endpoint answered with a status other than `200 OK`; the token is kept.
	Rejected {
		/// Status returned by the revoke endpoint.
		status: StatusCode,
		/// Response body, decoded lossily.
		body: String,
	},
}
impl RevokeOutcome {
	/// Returns `true` when the token was revoked.
	pub fn is_revoked(&self) -> bool {
		matches!(self, Self::Revoked)
	}
}
impl From<&RevokeOutcome> for OperationOutcome {
	fn from(outcome: &RevokeOutcome) -> Self {
		match outcome {
			RevokeOutcome::Revoked => Self::Revoked,
			RevokeOutcome::NoToken => Self::NoToken,
			RevokeOutcome::Rejected { .. } => Self::Rejected,
		}
	}
}
