// crates.io
use ::http::StatusCode;
// self
use crate::{
	_prelude::*,
	client::{RevokeOutcome, TokenClient},
	http::{GatewayHttpClient, GatewayRequest},
	obs::{OperationKind, OperationOutcome, OperationSpan, obs_event},
};

impl<C> TokenClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Revokes the cached access token at the gateway.
	///
	/// Returns [`RevokeOutcome::NoToken`] without any network traffic when nothing is cached.
	/// On `200 OK` the slot is cleared, unless a different token was stored while the request
	/// was in flight. Other statuses keep the token and report [`RevokeOutcome::Rejected`].
	pub async fn revoke_token(&self) -> Result<RevokeOutcome> {
		let span = OperationSpan::start(OperationKind::RevokeToken, &self.settings.endpoints.revoke);
		let result = span.instrument(self.send_revocation()).await;

		span.finish(match &result {
			Ok(outcome) => outcome.into(),
			Err(e) => OperationOutcome::of_error(e),
		});

		result
	}

	async fn send_revocation(&self) -> Result<RevokeOutcome> {
		let Some(current) = self.token.current() else {
			obs_event!(warn, "No access token to revoke.");

			return Ok(RevokeOutcome::NoToken);
		};
		let request = GatewayRequest::form_post(self.settings.endpoints.revoke.clone(), [(
			"token",
			current.expose(),
		)])
		.basic_auth(&self.settings.credentials)?;
		let response = self.execute(request).await?;
		let status = response.status;

		if status != StatusCode::OK {
			obs_event!(
				warn,
				status = status.as_u16(),
				body = %response.text(),
				"Revoke endpoint rejected the request."
			);

			return Ok(RevokeOutcome::Rejected { status, body: response.text().into_owned() });
		}

		if self.token.clear_if_current(&current.secret) {
			obs_event!(info, "Access token revoked.");
		} else {
			obs_event!(info, "Access token revoked; a newer token stays cached.");
		}

		self.metrics.record_revocation();

		Ok(RevokeOutcome::Revoked)
	}
}
