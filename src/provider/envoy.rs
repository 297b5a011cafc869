//! Envoy implementation of the provider hooks.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{EnvoyGraphQlError, EnvoyTokenError},
	graphql::GraphQlClient,
	obs::{self, FlowKind},
	profile::Profile,
	provider::{
		ProfileFuture, ProviderDescriptor, ProviderStrategy,
		strategy::{oauth_error_from_json, parse_error_body},
	},
};

/// Envoy provider: non-conformant token error handling plus GraphQL profile fetching.
#[derive(Clone, Debug)]
pub struct EnvoyProvider {
	descriptor: Arc<ProviderDescriptor>,
	graphql: GraphQlClient,
}
impl EnvoyProvider {
	/// Provider name carried by every Envoy profile.
	pub const NAME: &'static str = "envoy";

	/// Creates the provider, issuing GraphQL requests through `http`.
	pub fn new(descriptor: impl Into<Arc<ProviderDescriptor>>, http: ReqwestClient) -> Self {
		let descriptor = descriptor.into();
		let graphql = GraphQlClient::new(http, descriptor.endpoints.graphql.clone());

		Self { descriptor, graphql }
	}

	/// Descriptor the provider was built from.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}
}
impl ProviderStrategy for EnvoyProvider {
	fn name(&self) -> &str {
		Self::NAME
	}

	/// Envoy answers some failed exchanges with HTTP 404 and a bare `{"error": "..."}` body.
	/// Those become [`EnvoyTokenError`]; everything else goes through the standard parser.
	fn parse_error_response(&self, body: &[u8], status: u16) -> Error {
		let json = match parse_error_body(body, status) {
			Ok(json) => json,
			Err(e) => return e,
		};

		let message =
			json.get("error").and_then(JsonValue::as_str).filter(|message| !message.is_empty());

		if let (404, Some(message)) = (status, message) {
			return EnvoyTokenError::new(message).into();
		}

		oauth_error_from_json(&json, status)
	}

	fn user_profile<'a>(&'a self, access_token: &'a TokenSecret) -> ProfileFuture<'a> {
		Box::pin(obs::observe(FlowKind::UserProfile, "user_profile", async move {
			let data = self
				.graphql
				.request(&self.descriptor.profile_query, access_token)
				.await
				.map_err(EnvoyGraphQlError::new)?;

			Ok(Profile::new(Self::NAME, data))
		}))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::TokenError;

	fn provider() -> EnvoyProvider {
		let descriptor =
			ProviderDescriptor::builder().build().expect("Default descriptor should build.");

		EnvoyProvider::new(descriptor, ReqwestClient::new())
	}

	#[test]
	fn not_found_with_plain_error_becomes_envoy_token_error() {
		let err = provider().parse_error_response(br#"{"error": "subject not found"}"#, 404);

		match err {
			Error::EnvoyToken(inner) => assert_eq!(inner.message, "subject not found"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn plain_error_with_other_status_uses_standard_parser() {
		let err = provider().parse_error_response(br#"{"error": "subject not found"}"#, 400);

		assert!(matches!(err, Error::Token(TokenError { status: Some(400), .. })));
	}

	#[test]
	fn conformant_error_is_not_special_cased() {
		let err = provider().parse_error_response(
			br#"{"error":"invalid_grant","error_description":"The provided value for the input parameter 'code' is not valid."} "#,
			400,
		);

		match err {
			Error::Token(token) => {
				assert_eq!(token.code, "invalid_grant");
				assert_eq!(
					token.to_string(),
					"The provided value for the input parameter 'code' is not valid."
				);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn non_string_or_empty_error_on_404_falls_back() {
		let err = provider().parse_error_response(br#"{"error": {"reason": "x"}}"#, 404);

		assert!(matches!(err, Error::AccessToken(_)));

		let err = provider().parse_error_response(br#"{"error": ""}"#, 404);

		assert!(matches!(err, Error::AccessToken(_)));
	}

	#[test]
	fn malformed_json_is_propagated() {
		let err = provider().parse_error_response(b"not json", 404);

		assert!(matches!(err, Error::TokenResponseParse { status: Some(404), .. }));
	}
}
