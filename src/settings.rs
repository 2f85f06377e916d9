//! Validated gateway settings and the builder that produces them.
//!
//! Settings are loaded once and never change afterwards. [`GatewaySettingsBuilder`] accepts
//! raw strings (from code or any serde format), and [`GatewaySettingsBuilder::build`]
//! turns them into [`GatewaySettings`] or a [`SettingsError`]. Deserializing
//! [`GatewaySettings`] directly runs the same validation.

// std
use std::num::NonZeroU32;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, CredentialsError},
	retry::{Backoff, RetryPolicy, ServiceErrorPolicy},
};

/// Errors raised while validating settings.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SettingsError {
	/// A required setting was not provided.
	#[error("Missing required setting `{field}`.")]
	MissingField {
		/// Name of the missing setting.
		field: &'static str,
	},
	/// Consumer credentials failed validation.
	#[error(transparent)]
	Credentials(#[from] CredentialsError),
	/// An endpoint URL could not be parsed.
	#[error("The {endpoint} URL is invalid.")]
	InvalidUrl {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTP or HTTPS.
	#[error("The {endpoint} URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The retry count must allow at least one attempt.
	#[error("The retry count must be at least 1.")]
	ZeroRetryCount,
}

/// Gateway endpoints used by the token client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayEndpoints {
	/// Token endpoint for the client-credentials grant.
	pub token: Url,
	/// Revocation endpoint.
	pub revoke: Url,
	/// Protected business service.
	pub service: Url,
}

/// Immutable settings consumed by [`TokenClient`](crate::client::TokenClient).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "GatewaySettingsBuilder")]
pub struct GatewaySettings {
	/// Consumer key/secret pair.
	pub credentials: Credentials,
	/// Endpoint definitions.
	pub endpoints: GatewayEndpoints,
	/// Retry budget and pacing.
	pub retry: RetryPolicy,
}
impl GatewaySettings {
	/// Creates an empty builder.
	pub fn builder() -> GatewaySettingsBuilder {
		GatewaySettingsBuilder::default()
	}
}
impl TryFrom<GatewaySettingsBuilder> for GatewaySettings {
	type Error = SettingsError;

	fn try_from(builder: GatewaySettingsBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

/// Builder for [`GatewaySettings`] values.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewaySettingsBuilder {
	/// Consumer key issued by the gateway.
	pub consumer_key: Option<String>,
	/// Consumer secret issued by the gateway.
	pub consumer_secret: Option<String>,
	/// Token endpoint URL.
	pub token_url: Option<String>,
	/// Revocation endpoint URL.
	pub revoke_url: Option<String>,
	/// Service endpoint URL.
	pub service_url: Option<String>,
	/// Maximum attempts per bounded operation.
	pub retry_count: Option<u32>,
	/// Optional backoff override (defaults to a fixed one-second delay).
	pub backoff: Option<Backoff>,
	/// Optional service error policy override (defaults to retry).
	pub on_service_error: Option<ServiceErrorPolicy>,
}
impl GatewaySettingsBuilder {
	/// Sets the consumer key and secret.
	pub fn credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
		self.consumer_key = Some(key.into());
		self.consumer_secret = Some(secret.into());

		self
	}

	/// Sets the token endpoint URL.
	pub fn token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = Some(url.into());

		self
	}

	/// Sets the revocation endpoint URL.
	pub fn revoke_url(mut self, url: impl Into<String>) -> Self {
		self.revoke_url = Some(url.into());

		self
	}

	/// Sets the service endpoint URL.
	pub fn service_url(mut self, url: impl Into<String>) -> Self {
		self.service_url = Some(url.into());

		self
	}

	/// Sets the attempt budget.
	pub fn retry_count(mut self, count: u32) -> Self {
		self.retry_count = Some(count);

		self
	}

	/// Overrides the backoff strategy.
	pub fn backoff(mut self, backoff: Backoff) -> Self {
		self.backoff = Some(backoff);

		self
	}

	/// Overrides the service error policy.
	pub fn on_service_error(mut self, policy: ServiceErrorPolicy) -> Self {
		self.on_service_error = Some(policy);

		self
	}

	/// Consumes the builder and validates the resulting settings.
	pub fn build(self) -> Result<GatewaySettings, SettingsError> {
		let key = self.consumer_key.ok_or(SettingsError::MissingField { field: "consumer_key" })?;
		let secret =
			self.consumer_secret.ok_or(SettingsError::MissingField { field: "consumer_secret" })?;
		let credentials = Credentials::new(key, secret)?;
		let endpoints = GatewayEndpoints {
			token: parse_endpoint("token", "token_url", self.token_url)?,
			revoke: parse_endpoint("revoke", "revoke_url", self.revoke_url)?,
			service: parse_endpoint("service", "service_url", self.service_url)?,
		};
		let retry_count =
			self.retry_count.ok_or(SettingsError::MissingField { field: "retry_count" })?;
		let max_attempts = NonZeroU32::new(retry_count).ok_or(SettingsError::ZeroRetryCount)?;
		let mut retry = RetryPolicy::new(max_attempts);

		if let Some(backoff) = self.backoff {
			retry = retry.with_backoff(backoff);
		}
		if let Some(policy) = self.on_service_error {
			retry = retry.with_service_error_policy(policy);
		}

		Ok(GatewaySettings { credentials, endpoints, retry })
	}
}

fn parse_endpoint(
	endpoint: &'static str,
	field: &'static str,
	raw: Option<String>,
) -> Result<Url, SettingsError> {
	let raw = raw.ok_or(SettingsError::MissingField { field })?;
	let url = Url::parse(&raw).map_err(|source| SettingsError::InvalidUrl { endpoint, source })?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		_ => Err(SettingsError::UnsupportedScheme { endpoint, url: url.to_string() }),
	}
}
