//! Provider strategy hooks plugged into the authorization-code flow.
//!
//! The flow owns redirects, the code exchange, and verification; a [`ProviderStrategy`] supplies
//! the provider-specific pieces: how failed token responses are parsed and how a profile is
//! fetched. The hooks use crate-owned data types so implementations never depend on the HTTP
//! client used for the exchange.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{AccessTokenError, TokenError},
	profile::Profile,
};

/// Future returned by [`ProviderStrategy::user_profile`].
pub type ProfileFuture<'a> = Pin<Box<dyn Future<Output = Result<Profile>> + 'a + Send>>;

/// Strategy hook set that lets a provider customize the authorization-code flow.
///
/// Implementors are required to be `Send + Sync`. Only [`user_profile`](Self::user_profile) is
/// mandatory; the remaining hooks default to standard OAuth 2.0 behavior.
pub trait ProviderStrategy: Send + Sync {
	/// Provider name reported on profiles and used in diagnostics.
	fn name(&self) -> &str;

	/// Converts a failed token endpoint response into an error.
	///
	/// Called with the raw body and status of every non-`200 OK` token response. The default
	/// implementation applies [`parse_oauth_error_response`].
	fn parse_error_response(&self, body: &[u8], status: u16) -> Error {
		parse_oauth_error_response(body, status)
	}

	/// Retrieves and normalizes the profile of the user the access token belongs to.
	fn user_profile<'a>(&'a self, access_token: &'a TokenSecret) -> ProfileFuture<'a>;

	/// Adds provider-specific query parameters to the authorize URL.
	fn authorization_params(&self, _params: &mut BTreeMap<String, String>) {}

	/// Adds provider-specific form parameters to the code exchange request.
	fn augment_token_request(&self, _form: &mut BTreeMap<String, String>) {}
}

/// Standard OAuth 2.0 token error parsing.
///
/// A JSON body with a non-empty string `error` field becomes [`TokenError`] (`error_description`
/// as the message, `error` as the code). Any other JSON body becomes [`AccessTokenError`]. A body
/// that is not JSON becomes [`Error::TokenResponseParse`].
pub fn parse_oauth_error_response(body: &[u8], status: u16) -> Error {
	match parse_error_body(body, status) {
		Ok(json) => oauth_error_from_json(&json, status),
		Err(e) => e,
	}
}

/// Parses a token endpoint error body as JSON.
pub fn parse_error_body(body: &[u8], status: u16) -> Result<JsonValue> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::TokenResponseParse { source, status: Some(status) })
}

/// Maps an already-parsed error body onto the standard OAuth 2.0 taxonomy.
pub fn oauth_error_from_json(json: &JsonValue, status: u16) -> Error {
	let Some(code) = json.get("error").and_then(JsonValue::as_str).filter(|code| !code.is_empty())
	else {
		return AccessTokenError::new(
			Some(status),
			"Token endpoint error body carries no OAuth error code.",
		)
		.into();
	};
	let text = |key: &str| json.get(key).and_then(JsonValue::as_str).map(str::to_owned);

	TokenError {
		code: code.to_owned(),
		description: text("error_description"),
		uri: text("error_uri"),
		status: Some(status),
	}
	.into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn conformant_bodies_become_token_errors() {
		let err = parse_oauth_error_response(
			br#"{"error":"invalid_grant","error_description":"Code expired.","error_uri":"https://example.com/e"}"#,
			400,
		);

		match err {
			Error::Token(token) => {
				assert_eq!(token.code, "invalid_grant");
				assert_eq!(token.message(), "Code expired.");
				assert_eq!(token.uri.as_deref(), Some("https://example.com/e"));
				assert_eq!(token.status, Some(400));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn bodies_without_error_codes_are_unrecognized() {
		let err = parse_oauth_error_response(br#"{"message":"nope"}"#, 500);

		assert!(matches!(err, Error::AccessToken(AccessTokenError { status: Some(500), .. })));
		assert_eq!(err.to_string(), "Failed to obtain access token.");

		let err = parse_oauth_error_response(br#"{"error":42}"#, 400);

		assert!(matches!(err, Error::AccessToken(_)));

		let err = parse_oauth_error_response(br#"{"error":"","error_description":"x"}"#, 400);

		assert!(matches!(err, Error::AccessToken(AccessTokenError { status: Some(400), .. })));
	}

	#[test]
	fn malformed_bodies_propagate_parse_errors() {
		let err = parse_oauth_error_response(b"<html>bad gateway</html>", 502);

		assert!(matches!(err, Error::TokenResponseParse { status: Some(502), .. }));
	}
}
