//! Walks through the two halves of an Envoy login: sending the user to the authorization
//! endpoint, then handling the callback the provider redirects back to.
//!
//! Set `ENVOY_CLIENT_ID` and `ENVOY_CLIENT_SECRET`, run once to print the authorization URL, then
//! run again with `ENVOY_CALLBACK` set to the full URL Envoy redirected to.

// std
use std::env;
// crates.io
use color_eyre::Result;
// self
use envoy_oauth2::{
	Authentication, CallbackRequest, Strategy, StrategyOptions, flows::Session, url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let options = StrategyOptions::builder()
		.client_id(env::var("ENVOY_CLIENT_ID").unwrap_or_default())
		.client_secret(env::var("ENVOY_CLIENT_SECRET").unwrap_or_default())
		.callback_url("/auth/envoy/callback")
		.scope("public,token.refresh")
		.build()?;
	let strategy = Strategy::new(options)?;
	let session = Session::new();
	let request = match env::var("ENVOY_CALLBACK") {
		Ok(callback) => CallbackRequest::from_url(&Url::parse(&callback)?),
		Err(_) => CallbackRequest::from_url(&Url::parse("http://localhost:3000/login")?),
	}
	.with_session(session.clone());

	match strategy.authenticate(&request).await? {
		Authentication::Redirect(url) => println!("Send your user to {url}."),
		Authentication::Success { user, .. } => {
			println!("Signed in as {user}.");
			println!("Session access token stored: {}.", session.get("accessToken").is_some());
		},
		Authentication::Failure(info) => println!(
			"Login refused: {}.",
			info.message.as_deref().unwrap_or("no reason given")
		),
	}

	Ok(())
}
