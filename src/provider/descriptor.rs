//! Provider descriptor data structures and the builder that derives Envoy defaults.

// self
use crate::{_prelude::*, error::ConfigError};

/// Host used to derive endpoint defaults when none is configured.
pub const DEFAULT_HOST: &str = "envoy.com";
/// GraphQL query issued for the profile when none is configured.
pub const DEFAULT_PROFILE_QUERY: &str = r#"
query UserQuery {
  me {
    id
    name: formattedName
    email
  }
}
"#;

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	#[default]
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint users are redirected to.
	pub authorization: Url,
	/// Token endpoint used for the code exchange.
	pub token: Url,
	/// GraphQL endpoint queried for the user profile.
	pub graphql: Url,
}
impl ProviderEndpoints {
	/// Derives the Envoy endpoint set for `host` (for example `envoy.com` or `envoy.dev`).
	pub fn for_host(host: &str) -> Result<Self, ConfigError> {
		Ok(Self {
			authorization: parse_endpoint(
				"authorization",
				&format!("https://dashboard.{host}/a/auth/v0/authorize"),
			)?,
			token: parse_endpoint("token", &format!("https://app.{host}/a/auth/v0/token"))?,
			graphql: parse_endpoint("graphql", &format!("https://app.{host}/a/graphql"))?,
		})
	}
}

/// Immutable provider descriptor consumed by the strategy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// GraphQL query used to fetch the profile.
	pub profile_query: String,
	/// Character used to join list scopes in the authorize URL.
	pub scope_separator: char,
	/// Client authentication mechanism for the token endpoint.
	pub client_auth_method: ClientAuthMethod,
}
impl ProviderDescriptor {
	/// Creates a new builder seeded with Envoy defaults.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::default()
	}

	/// Validates invariants for the descriptor.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.profile_query.trim().is_empty() {
			return Err(ConfigError::EmptyProfileQuery);
		}
		if self.scope_separator.is_control() {
			return Err(ConfigError::InvalidScopeSeparator { separator: self.scope_separator });
		}

		Ok(())
	}
}

/// Builder for [`ProviderDescriptor`] values.
///
/// Every endpoint left unset is derived from [`host`](Self::host), which defaults to
/// [`DEFAULT_HOST`]. The host is plain per-instance data, so two strategies pointed at different
/// environments never interfere.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderDescriptorBuilder {
	/// Host used to derive endpoint defaults.
	pub host: Option<String>,
	/// Authorization endpoint override.
	#[serde(alias = "authorizationURL")]
	pub authorization_url: Option<Url>,
	/// Token endpoint override.
	#[serde(alias = "tokenURL")]
	pub token_url: Option<Url>,
	/// GraphQL endpoint override.
	#[serde(alias = "graphqlURL")]
	pub graphql_url: Option<Url>,
	/// Profile query override.
	#[serde(alias = "profileQuery")]
	pub profile_query: Option<String>,
	/// Scope separator override (defaults to a single space).
	#[serde(alias = "scopeSeparator")]
	pub scope_separator: Option<char>,
	/// Client authentication method override.
	pub client_auth_method: Option<ClientAuthMethod>,
}
impl ProviderDescriptorBuilder {
	/// Sets the host used to derive endpoint defaults.
	pub fn host(mut self, host: impl Into<String>) -> Self {
		self.host = Some(host.into());

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_url(mut self, url: Url) -> Self {
		self.authorization_url = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: Url) -> Self {
		self.token_url = Some(url);

		self
	}

	/// Overrides the GraphQL endpoint.
	pub fn graphql_url(mut self, url: Url) -> Self {
		self.graphql_url = Some(url);

		self
	}

	/// Overrides the profile query.
	pub fn profile_query(mut self, query: impl Into<String>) -> Self {
		self.profile_query = Some(query.into());

		self
	}

	/// Overrides the scope separator.
	pub fn scope_separator(mut self, separator: char) -> Self {
		self.scope_separator = Some(separator);

		self
	}

	/// Overrides the client authentication method.
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = Some(method);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ConfigError> {
		let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
		let defaults = ProviderEndpoints::for_host(host)?;
		let endpoints = ProviderEndpoints {
			authorization: self.authorization_url.unwrap_or(defaults.authorization),
			token: self.token_url.unwrap_or(defaults.token),
			graphql: self.graphql_url.unwrap_or(defaults.graphql),
		};
		let descriptor = ProviderDescriptor {
			endpoints,
			profile_query: self.profile_query.unwrap_or_else(|| DEFAULT_PROFILE_QUERY.to_owned()),
			scope_separator: self.scope_separator.unwrap_or(' '),
			client_auth_method: self.client_auth_method.unwrap_or_default(),
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

fn parse_endpoint(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
}
