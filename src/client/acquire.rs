//! Client-credentials acquisition plus the ensure-token and refresh-on-401 helpers.
//!
//! Every token request runs under the client's acquisition guard, so two requests never
//! race to overwrite the slot. The helpers re-check the slot after taking the guard and
//! reuse a token that a concurrent caller fetched in the meantime.

// crates.io
use ::http::StatusCode;
// self
use crate::{
	_prelude::*,
	auth::{self, AccessToken, TokenSecret},
	client::{AcquireOutcome, TokenClient},
	http::{GatewayHttpClient, GatewayRequest},
	obs::{OperationKind, OperationOutcome, OperationSpan, obs_event},
};

const GRANT_TYPE: &str = "client_credentials";

impl<C> TokenClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Performs one `client_credentials` grant request.
	///
	/// On `200 OK` with a non-empty `access_token` that fits in a bearer header, the token
	/// replaces whatever was cached and [`AcquireOutcome::Acquired`] is returned. Any other status, or a body without a usable
	/// token, leaves the cache untouched. The request is never retried here; transport
	/// failures surface as [`Error::Transport`].
	pub async fn acquire_token(&self) -> Result<AcquireOutcome> {
		let span = OperationSpan::start(OperationKind::AcquireToken, &self.settings.endpoints.token);
		let result = span
			.instrument(async move {
				let _singleflight = self.acquire_guard.lock().await;

				self.request_token().await
			})
			.await;

		span.finish(match &result {
			Ok(outcome) => outcome.into(),
			Err(e) => OperationOutcome::of_error(e),
		});

		result
	}

	/// Returns the cached token, acquiring one with up to `max_attempts` requests if the
	/// cache is empty.
	pub(super) async fn ensure_token(&self) -> Result<AccessToken> {
		let policy = self.settings.retry;
		let max_attempts = policy.attempts();

		if !self.has_token() {
			obs_event!(info, "No access token is cached; acquiring one.");
		}

		for attempt in 1..=max_attempts {
			if let Some(token) = self.token_or_acquire().await? {
				return Ok(token);
			}

			obs_event!(warn, attempt, max_attempts, "Access token acquisition failed.");

			if attempt < max_attempts {
				policy.backoff.wait(attempt).await;
			}
		}

		obs_event!(error, max_attempts, "Gave up acquiring an access token.");

		Err(Error::TokenNeverAcquired { attempts: max_attempts })
	}

	/// Returns the cached token or makes a single acquisition attempt.
	pub(super) async fn token_or_acquire(&self) -> Result<Option<AccessToken>> {
		if let Some(token) = self.token.current() {
			return Ok(Some(token));
		}

		let _singleflight = self.acquire_guard.lock().await;

		if let Some(token) = self.token.current() {
			return Ok(Some(token));
		}

		Ok(self.request_token().await?.into_token())
	}

	/// Discards `stale` after a `401` and obtains its replacement.
	///
	/// If another caller already swapped in a different token, that one is returned without
	/// contacting the token endpoint.
	pub(super) async fn refresh_after_unauthorized(
		&self,
		stale: &TokenSecret,
	) -> Result<Option<AccessToken>> {
		let _singleflight = self.acquire_guard.lock().await;

		if !self.token.clear_if_current(stale)
			&& let Some(current) = self.token.current()
		{
			return Ok(Some(current));
		}

		Ok(self.request_token().await?.into_token())
	}

	/// Sends the grant request. Callers must hold the acquisition guard.
	async fn request_token(&self) -> Result<AcquireOutcome> {
		self.metrics.record_acquire_attempt();

		let request =
			GatewayRequest::form_post(self.settings.endpoints.token.clone(), [(
				"grant_type",
				GRANT_TYPE,
			)])
			.basic_auth(&self.settings.credentials)?;
		let response = self.execute(request).await?;
		let status = response.status;

		obs_event!(debug, status = status.as_u16(), "Token endpoint responded.");

		let outcome = if status != StatusCode::OK {
			obs_event!(warn, status = status.as_u16(), "Token endpoint returned a non-200 status.");

			AcquireOutcome::Rejected { status, body: response.text().into_owned() }
		} else {
			match auth::parse_access_token(&response.body) {
				Ok(secret) => {
					let token = AccessToken::new(secret);

					self.token.store(token.clone());

					obs_event!(info, "Acquired a new access token.");

					AcquireOutcome::Acquired { token }
				},
				Err(e) => {
					obs_event!(warn, error = %e, "Token endpoint response has no usable access_token.");

					AcquireOutcome::Malformed { status, reason: e.to_string() }
				},
			}
		};

		if outcome.is_acquired() {
			self.metrics.record_acquire_success();
		} else {
			self.metrics.record_acquire_failure();
		}

		Ok(outcome)
	}
}
