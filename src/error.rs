//! Strategy-level error types shared across flows, providers, and transports.

// self
use crate::_prelude::*;

/// Strategy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every failure of an authentication attempt surfaces as exactly one of these variants, so
/// callers discriminate by matching instead of inspecting type names.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) while calling the token endpoint.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Provider redirected back with an OAuth error other than a user denial.
	#[error(transparent)]
	Authorization(#[from] AuthorizationError),
	/// Token endpoint returned a conformant OAuth 2.0 error body.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Token endpoint returned Envoy's non-conformant error body.
	#[error(transparent)]
	EnvoyToken(#[from] EnvoyTokenError),
	/// Profile could not be fetched from Envoy's GraphQL API.
	#[error(transparent)]
	EnvoyGraphQl(#[from] EnvoyGraphQlError),
	/// Token endpoint failed in a shape no parser recognizes.
	#[error(transparent)]
	AccessToken(#[from] AccessTokenError),
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Verify hook reported a failure.
	#[error("Verify hook failed.")]
	Verify {
		/// Integrator-supplied failure.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps an integrator failure raised from a verify hook.
	pub fn verify(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Verify { source: Box::new(src) }
	}
}

/// Configuration and validation failures raised while building or running a strategy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// An endpoint URL is invalid.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Callback URL cannot be parsed or resolved.
	#[error("Callback URL is invalid.")]
	InvalidCallback {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},

	/// `client_id` was not supplied.
	#[error("A client_id option is required.")]
	MissingClientId,
	/// `client_secret` was not supplied.
	#[error("A client_secret option is required.")]
	MissingClientSecret,
	/// Requested scopes are invalid.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Scope separator is a control character.
	#[error("Scope separator must be a printable character.")]
	InvalidScopeSeparator {
		/// Invalid separator that was supplied.
		separator: char,
	},
	/// Profile query is blank.
	#[error("Profile query cannot be empty.")]
	EmptyProfileQuery,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO) raised during the token exchange.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Conformant OAuth 2.0 error returned by the token endpoint.
///
/// The message is the provider's `error_description`; the code is the `error` field.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{}", .description.as_deref().unwrap_or(.code.as_str()))]
pub struct TokenError {
	/// OAuth `error` code (e.g. `invalid_grant`).
	pub code: String,
	/// OAuth `error_description`, when supplied.
	pub description: Option<String>,
	/// OAuth `error_uri`, when supplied.
	pub uri: Option<String>,
	/// HTTP status code, when available.
	pub status: Option<u16>,
}
impl TokenError {
	/// Human-readable message; the description, or the code when no description was sent.
	pub fn message(&self) -> &str {
		self.description.as_deref().unwrap_or(&self.code)
	}
}

/// Error redirected back from the authorization endpoint.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{}", .description.as_deref().unwrap_or(.code.as_str()))]
pub struct AuthorizationError {
	/// OAuth `error` code.
	pub code: String,
	/// OAuth `error_description`, when supplied.
	pub description: Option<String>,
	/// OAuth `error_uri`, when supplied.
	pub uri: Option<String>,
}
impl AuthorizationError {
	/// Human-readable message; the description, or the code when no description was sent.
	pub fn message(&self) -> &str {
		self.description.as_deref().unwrap_or(&self.code)
	}
}

/// Failure returned by Envoy's token endpoint in a shape that does not conform to the OAuth 2.0
/// error specification (HTTP 404 with a plain `{"error": "..."}` body).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct EnvoyTokenError {
	/// Message extracted from the `error` field.
	pub message: String,
}
impl EnvoyTokenError {
	/// Creates a new error carrying the provider's message.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// Any failure while fetching the user profile from Envoy's GraphQL API.
///
/// The display message is fixed; the underlying [`GraphQlFailure`] is available through
/// [`std::error::Error::source`].
#[derive(Debug, ThisError)]
#[error("Failed to fetch user profile")]
pub struct EnvoyGraphQlError {
	/// Underlying GraphQL or transport failure.
	#[source]
	pub source: GraphQlFailure,
}
impl EnvoyGraphQlError {
	/// Fixed message carried by every profile-fetch failure.
	pub const MESSAGE: &'static str = "Failed to fetch user profile";

	/// Wraps the underlying failure.
	pub fn new(source: GraphQlFailure) -> Self {
		Self { source }
	}
}

/// Failure reported by the GraphQL client.
#[derive(Debug, ThisError)]
pub enum GraphQlFailure {
	/// Request could not be sent or the response could not be read.
	#[error("GraphQL request failed in transit.")]
	Transport(#[from] ReqwestError),
	/// Endpoint answered with a non-success HTTP status.
	#[error("GraphQL endpoint returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Endpoint reported GraphQL-level errors.
	#[error("GraphQL endpoint reported {} error(s).", .errors.len())]
	GraphQl {
		/// Error entries exactly as returned.
		errors: Vec<JsonValue>,
		/// Partial data returned alongside the errors, if any.
		data: Option<JsonValue>,
	},
	/// Response body is not a GraphQL response document.
	#[error("GraphQL response could not be decoded.")]
	Decode(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// Response carried neither errors nor a data object.
	#[error("GraphQL response is missing the data object.")]
	MissingData,
}

/// Token endpoint failure that no parser could classify.
#[derive(Debug, ThisError)]
#[error("Failed to obtain access token.")]
pub struct AccessTokenError {
	/// HTTP status code, when available.
	pub status: Option<u16>,
	/// Short description of what went wrong.
	pub detail: String,
}
impl AccessTokenError {
	/// Creates a new error from a status and detail string.
	pub fn new(status: Option<u16>, detail: impl Into<String>) -> Self {
		Self { status, detail: detail.into() }
	}
}
