//! Strategy configuration and its builder.

// self
use crate::{
	_prelude::*,
	auth::{Scope, TokenSecret},
	error::ConfigError,
	provider::{ProviderDescriptor, ProviderDescriptorBuilder},
};

/// Validated configuration consumed by [`Strategy`](crate::Strategy).
#[derive(Clone, Debug)]
pub struct StrategyOptions {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Redirect URI sent on the authorize URL and the code exchange. Relative values are
	/// resolved against the origin of the incoming request.
	pub callback_url: Option<String>,
	/// Scopes requested on the authorize URL.
	pub scope: Option<Scope>,
	/// Endpoints, profile query, and wire details of the provider.
	pub provider: ProviderDescriptor,
	/// Overrides whether the incoming request is handed to the verify hook.
	pub pass_request_to_verify: Option<bool>,
}
impl StrategyOptions {
	/// Creates a new builder with Envoy defaults.
	pub fn builder() -> StrategyOptionsBuilder {
		StrategyOptionsBuilder::default()
	}

	/// Validates invariants for the options.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingClientId);
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::MissingClientSecret);
		}
		if let Some(scope) = &self.scope {
			scope.validate()?;
		}

		self.provider.validate()
	}
}

/// Builder for [`StrategyOptions`].
///
/// Also deserializable, accepting both snake_case keys and the camelCase spellings common in
/// hosted configuration (`clientID`, `clientSecret`, `callbackURL`, ...). Provider fields such as
/// `host` or `token_url` sit at the same level as the client fields.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StrategyOptionsBuilder {
	/// OAuth client identifier.
	#[serde(alias = "clientID", alias = "clientId")]
	pub client_id: Option<String>,
	/// OAuth client secret.
	#[serde(alias = "clientSecret")]
	pub client_secret: Option<TokenSecret>,
	/// Redirect URI, absolute or relative.
	#[serde(alias = "callbackURL", alias = "callbackUrl")]
	pub callback_url: Option<String>,
	/// Requested scopes, as a list or a pre-joined string.
	pub scope: Option<Scope>,
	/// Whether the incoming request is handed to the verify hook.
	#[serde(alias = "passReqToCallback", alias = "passRequestToVerify")]
	pub pass_request_to_verify: Option<bool>,
	/// Provider settings.
	#[serde(flatten)]
	pub provider: ProviderDescriptorBuilder,
}
impl StrategyOptionsBuilder {
	/// Sets the OAuth client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the OAuth client secret.
	pub fn client_secret(mut self, client_secret: impl Into<TokenSecret>) -> Self {
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Sets the redirect URI.
	pub fn callback_url(mut self, callback_url: impl Into<String>) -> Self {
		self.callback_url = Some(callback_url.into());

		self
	}

	/// Sets the requested scopes.
	pub fn scope(mut self, scope: impl Into<Scope>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Controls whether the incoming request is handed to the verify hook.
	pub fn pass_request_to_verify(mut self, enabled: bool) -> Self {
		self.pass_request_to_verify = Some(enabled);

		self
	}

	/// Sets the host used to derive the default endpoints.
	pub fn host(mut self, host: impl Into<String>) -> Self {
		self.provider = self.provider.host(host);

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_url(mut self, url: Url) -> Self {
		self.provider = self.provider.authorization_url(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: Url) -> Self {
		self.provider = self.provider.token_url(url);

		self
	}

	/// Overrides the GraphQL endpoint.
	pub fn graphql_url(mut self, url: Url) -> Self {
		self.provider = self.provider.graphql_url(url);

		self
	}

	/// Overrides the profile query.
	pub fn profile_query(mut self, query: impl Into<String>) -> Self {
		self.provider = self.provider.profile_query(query);

		self
	}

	/// Overrides the separator used to join list scopes.
	pub fn scope_separator(mut self, separator: char) -> Self {
		self.provider = self.provider.scope_separator(separator);

		self
	}

	/// Replaces every provider setting at once.
	pub fn provider(mut self, provider: ProviderDescriptorBuilder) -> Self {
		self.provider = provider;

		self
	}

	/// Consumes the builder and validates the resulting options.
	pub fn build(self) -> Result<StrategyOptions, ConfigError> {
		let client_id =
			self.client_id.filter(|id| !id.is_empty()).ok_or(ConfigError::MissingClientId)?;
		let client_secret = self
			.client_secret
			.filter(|secret| !secret.is_empty())
			.ok_or(ConfigError::MissingClientSecret)?;
		let options = StrategyOptions {
			client_id,
			client_secret,
			callback_url: self.callback_url,
			scope: self.scope,
			provider: self.provider.build()?,
			pass_request_to_verify: self.pass_request_to_verify,
		};

		options.validate()?;

		Ok(options)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn client_credentials_are_required() {
		let err = StrategyOptions::builder()
			.client_secret("secret")
			.build()
			.expect_err("Missing client_id should fail.");

		assert!(matches!(err, ConfigError::MissingClientId));

		let err = StrategyOptions::builder()
			.client_id("ABC123")
			.build()
			.expect_err("Missing client_secret should fail.");

		assert!(matches!(err, ConfigError::MissingClientSecret));

		let err = StrategyOptions::builder()
			.client_id("")
			.client_secret("secret")
			.build()
			.expect_err("Empty client_id should fail.");

		assert!(matches!(err, ConfigError::MissingClientId));
	}

	#[test]
	fn list_scopes_are_validated() {
		let err = StrategyOptions::builder()
			.client_id("ABC123")
			.client_secret("secret")
			.scope(vec!["public".to_owned(), "token refresh".to_owned()])
			.build()
			.expect_err("Whitespace in a list scope should fail.");

		assert!(matches!(err, ConfigError::InvalidScope(_)));
	}

	#[test]
	fn deserializes_hosted_configuration() {
		let builder: StrategyOptionsBuilder = serde_json::from_value(serde_json::json!({
			"clientID": "ABC123",
			"clientSecret": "secret",
			"callbackURL": "/auth/envoy/callback",
			"scope": ["public", "token.refresh"],
			"host": "envoy.dev",
			"profileQuery": "query CustomUserQuery { me { id } }",
		}))
		.expect("Options should deserialize.");
		let options = builder.build().expect("Deserialized options should build.");

		assert_eq!(options.client_id, "ABC123");
		assert_eq!(options.client_secret.expose(), "secret");
		assert_eq!(options.callback_url.as_deref(), Some("/auth/envoy/callback"));
		assert_eq!(
			options.scope,
			Some(Scope::List(vec!["public".into(), "token.refresh".into()]))
		);
		assert_eq!(
			options.provider.endpoints.token.as_str(),
			"https://app.envoy.dev/a/auth/v0/token"
		);
		assert_eq!(options.provider.profile_query, "query CustomUserQuery { me { id } }");
		assert_eq!(options.pass_request_to_verify, None);
	}

	#[test]
	fn provider_overrides_flow_into_the_descriptor() {
		let token = Url::parse("http://127.0.0.1:8080/token").expect("Token URL should parse.");
		let options = StrategyOptions::builder()
			.client_id("ABC123")
			.client_secret("secret")
			.token_url(token.clone())
			.scope_separator(',')
			.build()
			.expect("Options should build.");

		assert_eq!(options.provider.endpoints.token, token);
		assert_eq!(
			options.provider.endpoints.graphql.as_str(),
			"https://app.envoy.com/a/graphql"
		);
		assert_eq!(options.provider.scope_separator, ',');
	}
}
