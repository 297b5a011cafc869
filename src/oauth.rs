//! Internal OAuth client facade over the `oauth2` crate.

pub use oauth2;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenSecret},
	error::{AccessTokenError, ConfigError, TokenError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	provider::{ClientAuthMethod, ProviderDescriptor, ProviderStrategy},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

pub(crate) trait OAuth2Facade {
	fn exchange_authorization_code<'a, 'strategy, 'code, 'redirect>(
		&'a self,
		strategy: &'strategy dyn ProviderStrategy,
		code: &'code str,
		redirect_uri: Option<&'redirect Url>,
	) -> FacadeFuture<'a, TokenGrant>
	where
		'strategy: 'a,
		'code: 'a,
		'redirect: 'a;
}

pub(crate) struct BasicFacade<C>
where
	C: ?Sized + TokenHttpClient,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
}
impl<C> BasicFacade<C>
where
	C: ?Sized + TokenHttpClient,
{
	pub(crate) fn from_descriptor(
		descriptor: &ProviderDescriptor,
		client_id: &str,
		client_secret: &TokenSecret,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let auth_url = AuthUrl::from_url(descriptor.endpoints.authorization.clone());
		let token_url = TokenUrl::from_url(descriptor.endpoints.token.clone());
		let mut oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_client_secret(ClientSecret::new(client_secret.expose().to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);

		if matches!(descriptor.client_auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self { oauth_client, http_client: http_client.into() })
	}
}
impl<C> OAuth2Facade for BasicFacade<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn exchange_authorization_code<'a, 'strategy, 'code, 'redirect>(
		&'a self,
		strategy: &'strategy dyn ProviderStrategy,
		code: &'code str,
		redirect_uri: Option<&'redirect Url>,
	) -> FacadeFuture<'a, TokenGrant>
	where
		'strategy: 'a,
		'code: 'a,
		'redirect: 'a,
	{
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let mut request =
				self.oauth_client.exchange_code(AuthorizationCode::new(code.to_owned()));

			if let Some(redirect) = redirect_uri {
				request = request
					.set_redirect_uri(Cow::Owned(RedirectUrl::from_url(redirect.to_owned())));
			}

			let mut form = BTreeMap::new();

			strategy.augment_token_request(&mut form);

			for (key, value) in form {
				request = request.add_extra_param(key, value);
			}

			let response = request
				.request_async(&instrumented)
				.await
				.map_err(|err| map_request_error(strategy, meta.take(), err))?;

			Ok(map_token_response(response))
		})
	}
}

fn map_token_response(response: BasicTokenResponse) -> TokenGrant {
	let expires_in = response.expires_in().and_then(|lifetime| Duration::try_from(lifetime).ok());

	TokenGrant {
		access_token: TokenSecret::new(response.access_token().secret().to_owned()),
		refresh_token: response
			.refresh_token()
			.map(|token| TokenSecret::new(token.secret().to_owned())),
		token_type: response.token_type().as_ref().to_owned(),
		expires_in,
		scopes: response
			.scopes()
			.map(|scopes| scopes.iter().map(|scope| scope.as_str().to_owned()).collect()),
		issued_at: OffsetDateTime::now_utc(),
	}
}

/// Routes a failed exchange to the provider's parser whenever the raw error body is known.
fn map_request_error<E>(
	strategy: &dyn ProviderStrategy,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta.as_ref().and_then(|value| value.status);
	let transport_failure = matches!(err, RequestTokenError::Request(_));

	if let (false, Some(ResponseMetadata { status: Some(status), error_body: Some(body) })) =
		(transport_failure, &meta)
	{
		return strategy.parse_error_response(body, *status);
	}

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response(response, status),
		RequestTokenError::Request(error) => map_transport_error(status, error),
		RequestTokenError::Parse(source, _body) => Error::TokenResponseParse { source, status },
		RequestTokenError::Other(message) => AccessTokenError::new(status, message).into(),
	}
}

fn map_server_response(response: BasicErrorResponse, status: Option<u16>) -> Error {
	TokenError {
		code: response.error().as_ref().to_owned(),
		description: response.error_description().cloned(),
		uri: response.error_uri().cloned(),
		status,
	}
	.into()
}

fn map_transport_error<E>(status: Option<u16>, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => AccessTokenError::new(status, message).into(),
		_ => AccessTokenError::new(
			status,
			"HTTP client error occurred while calling the token endpoint.",
		)
		.into(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::EnvoyTokenError, http::ReqwestHttpClient, provider::EnvoyProvider};

	fn descriptor(method: ClientAuthMethod) -> ProviderDescriptor {
		ProviderDescriptor::builder()
			.client_auth_method(method)
			.build()
			.expect("Failed to build provider descriptor.")
	}

	fn envoy() -> EnvoyProvider {
		EnvoyProvider::new(descriptor(ClientAuthMethod::default()), ReqwestClient::new())
	}

	#[test]
	fn builds_basic_and_post_auth_clients() {
		for method in [ClientAuthMethod::ClientSecretBasic, ClientAuthMethod::ClientSecretPost] {
			let result = <BasicFacade<ReqwestHttpClient>>::from_descriptor(
				&descriptor(method),
				"client-id",
				&TokenSecret::new("secret"),
				Arc::new(ReqwestHttpClient::default()),
			);

			assert!(result.is_ok());
		}
	}

	#[test]
	fn oversized_lifetimes_are_dropped() {
		let response: BasicTokenResponse = serde_json::from_str(
			r#"{"access_token":"a","token_type":"bearer","expires_in":18446744073709551615}"#,
		)
		.expect("Token response fixture should parse.");
		let grant = map_token_response(response);

		assert_eq!(grant.access_token.expose(), "a");
		assert_eq!(grant.expires_in, None);
	}

	#[test]
	fn raw_error_bodies_reach_the_provider_parser() {
		let meta = ResponseMetadata::from_response(404, br#"{"error": "subject not found"}"#);
		let err: BasicRequestTokenError<HttpClientError<ReqwestError>> =
			RequestTokenError::Other("unused".into());
		let mapped = map_request_error(&envoy(), Some(meta), err);

		assert!(matches!(mapped, Error::EnvoyToken(EnvoyTokenError { .. })));
	}

	#[test]
	fn missing_metadata_falls_back_to_oauth2_classification() {
		let err: BasicRequestTokenError<HttpClientError<ReqwestError>> =
			RequestTokenError::Other("server returned empty error response".into());
		let mapped = map_request_error(&envoy(), None, err);

		assert!(matches!(mapped, Error::AccessToken(AccessTokenError { status: None, .. })));
	}
}
