//! Scripted in-process gateway shared by the integration suites.

#![allow(dead_code)]

// std
use std::{
	collections::{HashMap, VecDeque},
	io::{Error as IoError, ErrorKind},
	sync::Arc,
	time::Duration,
};
// crates.io
use parking_lot::Mutex;
// self
use gateway_token::{
	client::TokenClient,
	http::{GatewayFuture, GatewayHttpClient, GatewayRequest, GatewayResponse},
	http_types::{StatusCode, header::AUTHORIZATION},
	retry::{Backoff, ServiceErrorPolicy},
	settings::{GatewaySettings, GatewaySettingsBuilder},
};

pub const BASE: &str = "http://gateway.test";
pub const TOKEN_PATH: &str = "/token";
pub const REVOKE_PATH: &str = "/revoke";
pub const SERVICE_PATH: &str = "/api/orders";
pub const BASIC_CONSUMER: &str = "Basic Y29uc3VtZXI6czNjcmV0";

/// One scripted answer for a path.
#[derive(Clone, Debug)]
pub enum Reply {
	Respond(GatewayResponse),
	ConnectionRefused,
}
impl Reply {
	pub fn status(status: u16) -> Self {
		Self::Respond(GatewayResponse::new(
			StatusCode::from_u16(status).expect("Scripted status should be valid."),
		))
	}

	pub fn token(value: &str) -> Self {
		Self::json(200, &format!(r#"{{"access_token":"{value}","token_type":"Bearer"}}"#))
	}

	pub fn json(status: u16, body: &str) -> Self {
		match Self::status(status) {
			Self::Respond(response) => Self::Respond(response.with_body(body.to_owned())),
			other => other,
		}
	}
}

/// Fake gateway that answers from per-path queues and records every request.
///
/// The last reply queued for a path repeats once the queue drains to it. Paths without a
/// script answer `404 Not Found`.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
	routes: Mutex<HashMap<String, VecDeque<Reply>>>,
	requests: Mutex<Vec<GatewayRequest>>,
	latency: Duration,
}
impl ScriptedGateway {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = latency;

		self
	}

	pub fn script(self, path: &str, replies: impl IntoIterator<Item = Reply>) -> Self {
		self.routes.lock().entry(path.to_owned()).or_default().extend(replies);

		self
	}

	pub fn requests_to(&self, path: &str) -> Vec<GatewayRequest> {
		self.requests.lock().iter().filter(|request| request.url.path() == path).cloned().collect()
	}

	pub fn calls_to(&self, path: &str) -> usize {
		self.requests_to(path).len()
	}

	fn next_reply(&self, path: &str) -> Reply {
		let mut routes = self.routes.lock();

		match routes.get_mut(path) {
			Some(queue) if queue.len() > 1 => queue.pop_front().expect("Queue should not be empty."),
			Some(queue) => queue.front().cloned().unwrap_or_else(|| Reply::status(404)),
			None => Reply::status(404),
		}
	}
}
impl GatewayHttpClient for ScriptedGateway {
	type TransportError = IoError;

	fn execute(
		&self,
		request: GatewayRequest,
	) -> GatewayFuture<'_, GatewayResponse, Self::TransportError> {
		Box::pin(async move {
			if !self.latency.is_zero() {
				tokio::time::sleep(self.latency).await;
			}

			let reply = self.next_reply(request.url.path());

			self.requests.lock().push(request);

			match reply {
				Reply::Respond(response) => Ok(response),
				Reply::ConnectionRefused =>
					Err(IoError::new(ErrorKind::ConnectionRefused, "connection refused")),
			}
		})
	}
}

pub fn settings_builder(retry_count: u32) -> GatewaySettingsBuilder {
	GatewaySettings::builder()
		.credentials("consumer", "s3cret")
		.token_url(format!("{BASE}{TOKEN_PATH}"))
		.revoke_url(format!("{BASE}{REVOKE_PATH}"))
		.service_url(format!("{BASE}{SERVICE_PATH}"))
		.retry_count(retry_count)
		.backoff(Backoff::Fixed(Duration::ZERO))
}

pub fn settings(retry_count: u32) -> GatewaySettings {
	settings_builder(retry_count).build().expect("Test settings should validate.")
}

pub fn client(
	gateway: ScriptedGateway,
	retry_count: u32,
) -> (TokenClient<ScriptedGateway>, Arc<ScriptedGateway>) {
	client_with(gateway, settings(retry_count))
}

pub fn client_with_policy(
	gateway: ScriptedGateway,
	retry_count: u32,
	policy: ServiceErrorPolicy,
) -> (TokenClient<ScriptedGateway>, Arc<ScriptedGateway>) {
	let settings = settings_builder(retry_count)
		.on_service_error(policy)
		.build()
		.expect("Test settings should validate.");

	client_with(gateway, settings)
}

fn client_with(
	gateway: ScriptedGateway,
	settings: GatewaySettings,
) -> (TokenClient<ScriptedGateway>, Arc<ScriptedGateway>) {
	let gateway = Arc::new(gateway);
	let client = TokenClient::with_http_client(settings, Arc::clone(&gateway));

	(client, gateway)
}

pub fn authorization(request: &GatewayRequest) -> Option<String> {
	request.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).map(str::to_owned)
}

pub fn body(request: &GatewayRequest) -> String {
	String::from_utf8_lossy(&request.body).into_owned()
}
