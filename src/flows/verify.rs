//! Verification hook invoked once a profile has been fetched.

// self
use crate::{
	_prelude::*,
	auth::{TokenGrant, TokenSecret},
	flows::CallbackRequest,
	profile::Profile,
};

/// Session key the default hook stores the access token under.
pub const SESSION_ACCESS_TOKEN_KEY: &str = "accessToken";

/// Future returned by [`Verify::verify`].
pub type VerifyFuture<'a, U> = Pin<Box<dyn Future<Output = Result<Verified<U>>> + 'a + Send>>;

/// Integrator hook deciding which identity a successful login maps to.
pub trait Verify
where
	Self: 'static + Send + Sync,
{
	/// Identity produced on success.
	type User: Send;

	/// Whether the hook wants the incoming request by default.
	///
	/// [`StrategyOptions::pass_request_to_verify`](crate::StrategyOptions::pass_request_to_verify)
	/// overrides this.
	fn passes_request(&self) -> bool {
		false
	}

	/// Maps the tokens and profile onto an identity, or rejects the login.
	///
	/// Returning `Err` errors the whole authentication attempt; use [`Verified::Rejected`] for
	/// ordinary refusals.
	fn verify<'a>(&'a self, context: VerifyContext<'a>) -> VerifyFuture<'a, Self::User>;
}

/// Everything the verify hook receives.
#[derive(Clone, Debug)]
pub struct VerifyContext<'a> {
	/// Incoming request; `Some` only when request passing is enabled.
	pub request: Option<&'a CallbackRequest>,
	/// Tokens issued by the code exchange.
	pub grant: TokenGrant,
	/// Normalized profile.
	pub profile: Profile,
}
impl VerifyContext<'_> {
	/// Access token issued by the code exchange.
	pub fn access_token(&self) -> &TokenSecret {
		&self.grant.access_token
	}

	/// Refresh token, if one was issued.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.grant.refresh_token.as_ref()
	}
}

/// Outcome of a verify hook.
#[derive(Clone, Debug, PartialEq)]
pub enum Verified<U> {
	/// Login accepted.
	Success {
		/// Authenticated identity.
		user: U,
		/// Optional extra information forwarded to the caller.
		info: Option<JsonValue>,
	},
	/// Login refused without an error.
	Rejected(FailureInfo),
}
impl<U> Verified<U> {
	/// Accepts the login as `user` without extra information.
	pub fn success(user: U) -> Self {
		Self::Success { user, info: None }
	}

	/// Refuses the login with `message`.
	pub fn rejected(message: impl Into<String>) -> Self {
		Self::Rejected(FailureInfo::new(message))
	}
}

/// Information attached to a recoverable authentication failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInfo {
	/// Human-readable reason, when the provider or hook supplied one.
	pub message: Option<String>,
}
impl FailureInfo {
	/// Creates failure information carrying `message`.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: Some(message.into()) }
	}
}

/// Built-in hook: stashes the access token in the session and yields `profile.me`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultVerify;
impl Verify for DefaultVerify {
	type User = JsonValue;

	fn passes_request(&self) -> bool {
		true
	}

	fn verify<'a>(&'a self, context: VerifyContext<'a>) -> VerifyFuture<'a, Self::User> {
		Box::pin(async move {
			if let Some(session) = context.request.and_then(CallbackRequest::session) {
				session.insert(
					SESSION_ACCESS_TOKEN_KEY,
					JsonValue::String(context.grant.access_token.expose().to_owned()),
				);
			}

			Ok(match context.profile.into_me() {
				Some(me) => Verified::success(me),
				None => Verified::rejected("Profile does not include the authenticated user."),
			})
		})
	}
}

/// Adapts an async closure over the grant and profile into a [`Verify`] hook.
///
/// The closure never sees the request.
#[derive(Clone, Copy, Debug)]
pub struct VerifyFn<F>(pub F);
impl<F, Fut, U> Verify for VerifyFn<F>
where
	F: 'static + Send + Sync + Fn(TokenGrant, Profile) -> Fut,
	Fut: 'static + Send + Future<Output = Result<Verified<U>>>,
	U: 'static + Send,
{
	type User = U;

	fn verify<'a>(&'a self, context: VerifyContext<'a>) -> VerifyFuture<'a, Self::User> {
		Box::pin((self.0)(context.grant, context.profile))
	}
}
