//! Token endpoint response parsing.

// crates.io
use ::http::HeaderValue;
// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Reasons a `200 OK` token endpoint response could not yield an access token.
#[derive(Debug, ThisError)]
pub enum TokenResponseError {
	/// Body was not JSON, or `access_token` was missing or not a string.
	#[error("Token endpoint returned malformed JSON at `{path}`: {source}.")]
	Parse {
		/// JSON path at which deserialization failed.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// `access_token` was present but empty.
	#[error("Token endpoint returned an empty access_token.")]
	EmptyAccessToken,
	/// `access_token` holds bytes that cannot travel in an `Authorization` header.
	#[error("Token endpoint returned an access_token that cannot be sent as a bearer header.")]
	UnsendableAccessToken {
		/// Header encoding failure.
		#[source]
		source: ::http::header::InvalidHeaderValue,
	},
}

/// Fields read from a token endpoint response. Everything else is ignored.
#[derive(Deserialize)]
struct TokenResponseBody {
	access_token: TokenSecret,
}

/// Extracts the top-level `access_token` from a token endpoint JSON body.
pub fn parse_access_token(body: &[u8]) -> Result<TokenSecret, TokenResponseError> {
	let deserializer = &mut serde_json::Deserializer::from_slice(body);
	let parsed: TokenResponseBody =
		serde_path_to_error::deserialize(deserializer).map_err(|err| {
			let path = err.path().to_string();

			TokenResponseError::Parse { path, source: err.into_inner() }
		})?;

	if parsed.access_token.is_empty() {
		return Err(TokenResponseError::EmptyAccessToken);
	}

	// A token that cannot be rendered as a header would fail every later service call.
	HeaderValue::try_from(parsed.access_token.bearer_authorization())
		.map_err(|source| TokenResponseError::UnsendableAccessToken { source })?;

	Ok(parsed.access_token)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn reads_access_token_and_ignores_extra_fields() {
		let secret = parse_access_token(
			br#"{"access_token":"abc","token_type":"Bearer","expires_in":3600,"scope":"default"}"#,
		)
		.expect("Well-formed token responses should parse.");

		assert_eq!(secret.expose(), "abc");
	}

	#[test]
	fn rejects_missing_empty_and_mistyped_tokens() {
		assert!(matches!(
			parse_access_token(br#"{"token_type":"Bearer"}"#),
			Err(TokenResponseError::Parse { .. })
		));
		assert!(matches!(
			parse_access_token(br#"{"access_token":""}"#),
			Err(TokenResponseError::EmptyAccessToken)
		));

		let err = parse_access_token(br#"{"access_token":42}"#)
			.expect_err("Numeric access tokens should be rejected.");

		match err {
			TokenResponseError::Parse { path, .. } => assert_eq!(path, "access_token"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn rejects_tokens_that_cannot_be_sent_as_headers() {
		assert!(matches!(
			parse_access_token(br#"{"access_token":"bad\u0001tok"}"#),
			Err(TokenResponseError::UnsendableAccessToken { .. })
		));
		assert!(matches!(
			parse_access_token(br#"{"access_token":"line\nbreak"}"#),
			Err(TokenResponseError::UnsendableAccessToken { .. })
		));
	}

	#[test]
	fn rejects_non_json_bodies() {
		assert!(matches!(
			parse_access_token(b"<html>gateway error</html>"),
			Err(TokenResponseError::Parse { .. })
		));
	}
}
