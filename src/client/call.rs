//! Retrying service calls with refresh-on-401.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	client::TokenClient,
	http::{GatewayHttpClient, GatewayRequest, GatewayResponse},
	obs::{self, OperationKind, OperationOutcome, OperationSpan, obs_event},
	retry::ServiceErrorPolicy,
};

impl<C> TokenClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Sends `GET` to the configured service endpoint.
	///
	/// See [`TokenClient::call`] for the retry and refresh semantics.
	pub async fn call_service(&self) -> Result<GatewayResponse> {
		self.call(GatewayRequest::get(self.settings.endpoints.service.clone())).await
	}

	/// Sends `request` to the protected service with the current bearer token.
	///
	/// The call runs in two bounded phases, each limited to `max_attempts`:
	///
	/// 1. Ensure a token is cached. If none can be acquired, returns
	///    [`Error::TokenNeverAcquired`] without contacting the service.
	/// 2. Call the service. A `2xx` response is returned at once. A `401` discards the token
	///    that was sent and fetches a new one before the next attempt. Other statuses follow
	///    the configured [`ServiceErrorPolicy`].
	///
	/// When the second phase runs out of attempts, the last response is returned as `Ok` so
	/// the caller can inspect it. Transport failures abort the call immediately.
	pub async fn call(&self, request: GatewayRequest) -> Result<GatewayResponse> {
		let span = OperationSpan::start(OperationKind::CallService, &request.url);
		let result = span.instrument(self.call_with_refresh(request)).await;

		span.finish(match &result {
			Ok(response) =>
				OperationOutcome::of_service_response(response, self.settings.retry.on_service_error),
			Err(e) => OperationOutcome::of_error(e),
		});

		result
	}

	async fn call_with_refresh(&self, request: GatewayRequest) -> Result<GatewayResponse> {
		let policy = self.settings.retry;
		let max_attempts = policy.attempts();
		let mut next: Option<AccessToken> = Some(self.ensure_token().await?);
		let mut last = None;

		for attempt in 1..=max_attempts {
			let token = match next.take() {
				Some(token) => Some(token),
				None => self.token_or_acquire().await?,
			};

			if let Some(token) = token {
				let authorized = request.clone().bearer_auth(&token.secret)?;
				let response = self.execute(authorized).await?;

				self.metrics.record_service_call();
				obs::record_service_status(response.status);

				let status = response.status;

				if response.is_success() {
					obs_event!(debug, attempt, status = status.as_u16(), "Service call succeeded.");

					return Ok(response);
				}
				if response.is_unauthorized() {
					self.metrics.record_unauthorized();

					obs_event!(
						warn,
						attempt,
						"Service rejected the access token; requesting a new one."
					);

					next = self.refresh_after_unauthorized(&token.secret).await?;
				} else {
					obs_event!(
						error,
						attempt,
						status = status.as_u16(),
						body = %response.text(),
						"Service call failed."
					);

					if policy.on_service_error == ServiceErrorPolicy::ReturnImmediately {
						return Ok(response);
					}
				}

				last = Some(response);
			} else {
				obs_event!(warn, attempt, "No access token available for this attempt.");
			}

			if attempt < max_attempts {
				policy.backoff.wait(attempt).await;
			}
		}

		obs_event!(error, max_attempts, "Service call attempts exhausted.");

		// Every attempt failed to obtain a token, so the service was never reached.
		last.ok_or(Error::TokenNeverAcquired { attempts: max_attempts })
	}
}
