mod common;

// self
use common::*;
use gateway_token::{client::RevokeOutcome, http_types::StatusCode, obs::OperationOutcome};

#[tokio::test]
async fn revoke_without_token_sends_nothing() {
	let (client, gateway) = client(ScriptedGateway::new(), 3);
	let outcome = client.revoke_token().await.expect("Revoking nothing should not fail.");

	assert_eq!(outcome, RevokeOutcome::NoToken);
	assert_eq!(OperationOutcome::from(&outcome), OperationOutcome::NoToken);
	assert_eq!(gateway.calls_to(REVOKE_PATH), 0);
	assert_eq!(client.metrics.revocations(), 0);
}

#[tokio::test]
async fn revoke_posts_token_and_clears_slot() {
	let (client, gateway) = client(
		ScriptedGateway::new()
			.script(TOKEN_PATH, [Reply::token("to-revoke")])
			.script(REVOKE_PATH, [Reply::status(200)]),
		3,
	);

	client.acquire_token().await.expect("Acquisition should not fail.");

	let outcome = client.revoke_token().await.expect("Revocation should not fail.");

	assert!(outcome.is_revoked());
	assert_eq!(OperationOutcome::from(&outcome), OperationOutcome::Revoked);
	assert!(!client.has_token());

	let requests = gateway.requests_to(REVOKE_PATH);

	assert_eq!(requests.len(), 1);
	assert_eq!(authorization(&requests[0]).as_deref(), Some(BASIC_CONSUMER));
	assert_eq!(body(&requests[0]), "token=to-revoke");
	assert_eq!(client.metrics.revocations(), 1);

	let outcome = client.revoke_token().await.expect("Second revocation should not fail.");

	assert_eq!(outcome, RevokeOutcome::NoToken);
	assert_eq!(gateway.calls_to(REVOKE_PATH), 1);
}

#[tokio::test]
async fn rejected_revocation_keeps_token() {
	let (client, _gateway) = client(
		ScriptedGateway::new()
			.script(TOKEN_PATH, [Reply::token("still-valid")])
			.script(REVOKE_PATH, [Reply::json(400, "unsupported_token_type")]),
		3,
	);

	client.acquire_token().await.expect("Acquisition should not fail.");

	let outcome = client.revoke_token().await.expect("A 400 answer is not a client error.");

	assert_eq!(outcome, RevokeOutcome::Rejected {
		status: StatusCode::BAD_REQUEST,
		body: "unsupported_token_type".into(),
	});
	assert_eq!(OperationOutcome::from(&outcome), OperationOutcome::Rejected);
	assert_eq!(
		client.current_token().map(|token| token.expose().to_owned()),
		Some("still-valid".into())
	);
}

#[tokio::test]
async fn service_call_after_revocation_acquires_fresh_token() {
	let (client, gateway) = client(
		ScriptedGateway::new()
			.script(TOKEN_PATH, [Reply::token("old-token"), Reply::token("new-token")])
			.script(REVOKE_PATH, [Reply::status(200)])
			.script(SERVICE_PATH, [Reply::json(200, "ok")]),
		3,
	);

	client.acquire_token().await.expect("Acquisition should not fail.");
	client.revoke_token().await.expect("Revocation should not fail.");

	let response = client.call_service().await.expect("Service call should succeed.");

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(gateway.calls_to(TOKEN_PATH), 2);
	assert_eq!(
		authorization(&gateway.requests_to(SERVICE_PATH)[0]).as_deref(),
		Some("Bearer new-token")
	);
}
