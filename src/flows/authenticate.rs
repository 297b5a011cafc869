//! The `authenticate` state machine plus the redirect and exchange steps it is built from.

// self
use crate::{
	_prelude::*,
	auth::TokenGrant,
	error::{AuthorizationError, ConfigError},
	flows::{CallbackRequest, FailureInfo, Strategy, Verified, Verify, VerifyContext},
	http::TokenHttpClient,
	oauth::OAuth2Facade,
	obs::{self, FlowKind, FlowOutcome},
};

/// Redirect error code that marks a user denial rather than a failure.
pub const ACCESS_DENIED: &str = "access_denied";

/// Result of a single [`Strategy::authenticate`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum Authentication<U> {
	/// Send the user agent to this authorization URL.
	Redirect(Url),
	/// Login completed.
	Success {
		/// Identity produced by the verify hook.
		user: U,
		/// Extra information from the verify hook.
		info: Option<JsonValue>,
	},
	/// Login refused without an error (user denial or verify rejection).
	Failure(FailureInfo),
}
impl<U> Authentication<U> {
	fn flow_outcome(&self) -> FlowOutcome {
		match self {
			Self::Failure(_) => FlowOutcome::Rejected,
			Self::Redirect(_) | Self::Success { .. } => FlowOutcome::Success,
		}
	}
}

impl<V, C> Strategy<V, C>
where
	V: Verify,
	C: ?Sized + TokenHttpClient,
{
	/// Drives one step of the authorization-code flow for an incoming request.
	///
	/// - An `error` parameter ends the flow: `access_denied` becomes
	///   [`Authentication::Failure`] carrying `error_description`, any other code becomes
	///   [`Error::Authorization`].
	/// - A `code` parameter is exchanged for tokens, the profile is fetched, and the verify hook
	///   decides the outcome.
	/// - Otherwise the caller is told to redirect to the authorization endpoint.
	pub async fn authenticate(
		&self,
		request: &CallbackRequest,
	) -> Result<Authentication<V::User>> {
		obs::observe_with(
			FlowKind::Authenticate,
			"authenticate",
			self.run(request),
			Authentication::flow_outcome,
		)
		.await
	}

	/// Builds the authorization URL users are redirected to.
	pub fn authorize_url(&self, redirect_uri: Option<&Url>) -> Url {
		let descriptor = &self.options.provider;
		let mut extra = BTreeMap::new();

		self.provider.authorization_params(&mut extra);

		let mut url = descriptor.endpoints.authorization.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "code");

		if let Some(redirect_uri) = redirect_uri {
			pairs.append_pair("redirect_uri", redirect_uri.as_str());
		}
		if let Some(scope) =
			self.options.scope.as_ref().and_then(|scope| scope.render(descriptor.scope_separator))
		{
			pairs.append_pair("scope", &scope);
		}

		pairs.append_pair("client_id", &self.options.client_id);

		for (key, value) in &extra {
			pairs.append_pair(key, value);
		}

		drop(pairs);

		url
	}

	/// Exchanges an authorization code at the token endpoint.
	///
	/// Failed responses are classified by the provider's token-error parser.
	pub async fn exchange_code(
		&self,
		code: &str,
		redirect_uri: Option<&Url>,
	) -> Result<TokenGrant> {
		obs::observe(
			FlowKind::TokenExchange,
			"exchange_code",
			self.facade.exchange_authorization_code(self.provider.as_ref(), code, redirect_uri),
		)
		.await
	}

	/// Resolves the configured callback URL, joining relative values onto the request origin.
	pub fn callback_url(&self, request: &CallbackRequest) -> Result<Option<Url>> {
		let Some(raw) = self.options.callback_url.as_deref() else {
			return Ok(None);
		};

		match Url::parse(raw) {
			Ok(url) => Ok(Some(url)),
			Err(url::ParseError::RelativeUrlWithoutBase) => {
				let origin = request.origin().ok_or(ConfigError::InvalidCallback {
					source: url::ParseError::RelativeUrlWithoutBase,
				})?;
				let url =
					origin.join(raw).map_err(|source| ConfigError::InvalidCallback { source })?;

				Ok(Some(url))
			},
			Err(source) => Err(ConfigError::InvalidCallback { source }.into()),
		}
	}

	async fn run(&self, request: &CallbackRequest) -> Result<Authentication<V::User>> {
		if let Some(code) = request.param("error").filter(|code| !code.is_empty()) {
			let description = request.param("error_description").map(str::to_owned);

			if code == ACCESS_DENIED {
				return Ok(Authentication::Failure(FailureInfo { message: description }));
			}

			return Err(AuthorizationError {
				code: code.to_owned(),
				description,
				uri: request.param("error_uri").map(str::to_owned),
			}
			.into());
		}

		let callback = self.callback_url(request)?;
		let Some(code) = request.param("code").filter(|code| !code.is_empty()) else {
			return Ok(Authentication::Redirect(self.authorize_url(callback.as_ref())));
		};
		let grant = self.exchange_code(code, callback.as_ref()).await?;
		let profile = self.user_profile(&grant.access_token).await?;
		let context =
			VerifyContext { request: self.pass_request.then_some(request), grant, profile };

		match self.verify.verify(context).await? {
			Verified::Success { user, info } => Ok(Authentication::Success { user, info }),
			Verified::Rejected(info) => Ok(Authentication::Failure(info)),
		}
	}
}
