//! Transport primitives for gateway calls.
//!
//! [`GatewayHttpClient`] is the crate's only dependency on an HTTP stack. It executes one
//! [`GatewayRequest`] and hands back a [`GatewayResponse`] for every HTTP status,
//! `4xx`/`5xx` included, so the token client can branch on status codes instead of
//! catching errors. Only failures to reach the endpoint at all surface as
//! [`GatewayHttpClient::TransportError`]. Adapters never retry and never cache; that
//! policy lives in [`TokenClient`](crate::client::TokenClient).

// std
use std::borrow::Cow;
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use ::http::{
	HeaderMap, HeaderValue, Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderName},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenSecret},
	error::ConfigError,
};

/// Boxed future returned by [`GatewayHttpClient::execute`].
pub type GatewayFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Abstraction over HTTP transports capable of reaching the API gateway.
///
/// Implementations must be `Send + Sync + 'static` so one adapter can be shared by every
/// caller of a [`TokenClient`](crate::client::TokenClient), and the returned future must be
/// `Send` so calls can hop executors.
pub trait GatewayHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and returns the response, whatever its status.
	fn execute(
		&self,
		request: GatewayRequest,
	) -> GatewayFuture<'_, GatewayResponse, Self::TransportError>;
}

/// Outbound request handed to a [`GatewayHttpClient`].
///
/// Authentication is attached per request through [`GatewayRequest::basic_auth`] or
/// [`GatewayRequest::bearer_auth`]; adapters hold no credentials of their own.
#[derive(Clone, Debug)]
pub struct GatewayRequest {
	/// HTTP method.
	pub method: Method,
	/// Target URL.
	pub url: Url,
	/// Request headers.
	pub headers: HeaderMap,
	/// Raw request body; empty for bodiless requests.
	pub body: Vec<u8>,
}
impl GatewayRequest {
	/// Creates a bodiless request.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: Vec::new() }
	}

	/// Creates a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(Method::GET, url)
	}

	/// Creates a form-encoded `POST` request from key/value pairs.
	pub fn form_post<'a, I>(url: Url, pairs: I) -> Self
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish();
		let mut request = Self::new(Method::POST, url).with_body(body);

		request.headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));

		request
	}

	/// Adds or replaces a header.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Replaces the request body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = body.into();

		self
	}

	/// Sets `Authorization: Basic ...` from the consumer credentials.
	pub fn basic_auth(self, credentials: &Credentials) -> Result<Self, ConfigError> {
		self.authorization(credentials.basic_authorization())
	}

	/// Sets `Authorization: Bearer ...`, replacing any previous authorization header.
	pub fn bearer_auth(self, token: &TokenSecret) -> Result<Self, ConfigError> {
		self.authorization(token.bearer_authorization())
	}

	fn authorization(self, raw: String) -> Result<Self, ConfigError> {
		let mut value = HeaderValue::try_from(raw)
			.map_err(|source| ConfigError::InvalidHeader { header: "authorization", source })?;

		value.set_sensitive(true);

		Ok(self.with_header(AUTHORIZATION, value))
	}
}

/// Response returned by a [`GatewayHttpClient`] for any HTTP status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl GatewayResponse {
	/// Creates an empty response with the given status.
	pub fn new(status: StatusCode) -> Self {
		Self { status, headers: HeaderMap::new(), body: Vec::new() }
	}

	/// Replaces the response body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = body.into();

		self
	}

	/// Returns `true` for any `2xx` status.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Returns `true` for `401 Unauthorized`.
	pub fn is_unauthorized(&self) -> bool {
		self.status == StatusCode::UNAUTHORIZED
	}

	/// Returns the body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GatewayHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(
		&self,
		request: GatewayRequest,
	) -> GatewayFuture<'_, GatewayResponse, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let GatewayRequest { method, url, headers, body } = request;
			let mut builder = client.request(method, url).headers(headers);

			if !body.is_empty() {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(GatewayResponse { status, headers, body })
		})
	}
}
