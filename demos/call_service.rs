//! Demonstrates acquiring a gateway token, recovering when the service rejects it with `401`,
//! and revoking the replacement, all against a mock gateway with the default reqwest transport.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use gateway_token::{client::TokenClient, retry::Backoff, settings::GatewaySettings};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let expiring_token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token").body("grant_type=client_credentials");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"expired-access","token_type":"Bearer"}"#);
		})
		.await;
	let expired_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders").header("authorization", "Bearer expired-access");
			then.status(401).body("token expired");
		})
		.await;
	let service_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders").header("authorization", "Bearer fresh-access");
			then.status(200).header("content-type", "application/json").body(r#"{"orders":[]}"#);
		})
		.await;
	let revoke_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/revoke").body("token=fresh-access");
			then.status(200);
		})
		.await;
	let settings = GatewaySettings::builder()
		.credentials("demo-consumer", "demo-secret")
		.token_url(server.url("/token"))
		.revoke_url(server.url("/revoke"))
		.service_url(server.url("/api/orders"))
		.retry_count(3)
		.backoff(Backoff::Fixed(Duration::from_millis(100)))
		.build()?;
	let client = TokenClient::new(settings);

	println!("Initial acquisition: {:?}.", client.acquire_token().await?);

	// The gateway only hands out the fresh token from now on.
	expiring_token_mock.delete_async().await;

	let fresh_token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token").body("grant_type=client_credentials");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"fresh-access","token_type":"Bearer"}"#);
		})
		.await;
	let response = client.call_service().await?;

	println!("Service answered {} with {} after re-acquiring.", response.status, response.text());
	println!("Revocation outcome: {:?}.", client.revoke_token().await?);
	println!(
		"Token requests: {}, service calls: {}, unauthorized: {}, revocations: {}.",
		client.metrics.acquire_attempts(),
		client.metrics.service_calls(),
		client.metrics.unauthorized(),
		client.metrics.revocations(),
	);

	expired_mock.assert_calls_async(1).await;
	fresh_token_mock.assert_calls_async(1).await;
	service_mock.assert_calls_async(1).await;
	revoke_mock.assert_calls_async(1).await;

	Ok(())
}
