//! Authorization-code strategy orchestrating redirect, exchange, profile fetch, and verify.

pub mod authenticate;
pub mod request;
pub mod verify;

pub use authenticate::*;
pub use request::*;
pub use verify::*;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	http::{ReqwestHttpClient, TokenHttpClient},
	oauth::BasicFacade,
	options::StrategyOptions,
	profile::Profile,
	provider::{EnvoyProvider, ProviderStrategy},
};

/// Envoy authentication strategy.
///
/// The strategy owns the token transport, the provider hooks, and the verify hook so
/// [`authenticate`](Self::authenticate) can drive a login from a single incoming request.
/// Configuration is immutable after construction and every field sits behind an `Arc`, so clones
/// are cheap and may be shared across request handlers.
pub struct Strategy<V = DefaultVerify, C = ReqwestHttpClient>
where
	V: Verify,
	C: ?Sized + TokenHttpClient,
{
	options: Arc<StrategyOptions>,
	provider: Arc<dyn ProviderStrategy>,
	verify: Arc<V>,
	facade: Arc<BasicFacade<C>>,
	pass_request: bool,
}
impl Strategy {
	/// Creates a strategy that uses [`DefaultVerify`] and a reqwest transport.
	pub fn new(options: StrategyOptions) -> Result<Self> {
		Self::with_verify(options, DefaultVerify)
	}
}
impl<V> Strategy<V, ReqwestHttpClient>
where
	V: Verify,
{
	/// Creates a strategy with a custom verify hook and a reqwest transport.
	///
	/// The token exchange and the profile query share one client that never follows redirects.
	pub fn with_verify(options: StrategyOptions, verify: V) -> Result<Self> {
		Self::with_http_client(options, verify, ReqwestHttpClient::without_redirects()?)
	}

	/// Creates a strategy that sends every request through `http_client`.
	pub fn with_http_client(
		options: StrategyOptions,
		verify: V,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let provider = EnvoyProvider::new(options.provider.clone(), http_client.0.clone());

		Self::with_parts(options, Arc::new(provider), verify, http_client)
	}
}
impl<V, C> Strategy<V, C>
where
	V: Verify,
	C: ?Sized + TokenHttpClient,
{
	/// Assembles a strategy from caller-provided provider hooks and token transport.
	pub fn with_parts(
		options: StrategyOptions,
		provider: Arc<dyn ProviderStrategy>,
		verify: impl Into<Arc<V>>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		options.validate()?;

		let verify = verify.into();
		let facade = BasicFacade::from_descriptor(
			&options.provider,
			&options.client_id,
			&options.client_secret,
			http_client,
		)?;
		let pass_request =
			options.pass_request_to_verify.unwrap_or_else(|| verify.passes_request());

		Ok(Self {
			options: Arc::new(options),
			provider,
			verify,
			facade: Arc::new(facade),
			pass_request,
		})
	}

	/// Strategy name, taken from the provider (`"envoy"`).
	pub fn name(&self) -> &str {
		self.provider.name()
	}

	/// Options the strategy was built from.
	pub fn options(&self) -> &StrategyOptions {
		&self.options
	}

	/// Provider hooks in use.
	pub fn provider(&self) -> &dyn ProviderStrategy {
		self.provider.as_ref()
	}

	/// Whether the verify hook receives the incoming request.
	pub fn passes_request_to_verify(&self) -> bool {
		self.pass_request
	}

	/// Fetches and normalizes the profile of the user `access_token` belongs to.
	pub async fn user_profile(&self, access_token: &TokenSecret) -> Result<Profile> {
		self.provider.user_profile(access_token).await
	}
}
impl<V, C> Clone for Strategy<V, C>
where
	V: Verify,
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			options: Arc::clone(&self.options),
			provider: Arc::clone(&self.provider),
			verify: Arc::clone(&self.verify),
			facade: Arc::clone(&self.facade),
			pass_request: self.pass_request,
		}
	}
}
impl<V, C> Debug for Strategy<V, C>
where
	V: Verify,
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Strategy")
			.field("name", &self.provider.name())
			.field("client_id", &self.options.client_id)
			.field("callback_url", &self.options.callback_url)
			.field("endpoints", &self.options.provider.endpoints)
			.field("pass_request", &self.pass_request)
			.finish()
	}
}
