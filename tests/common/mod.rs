//! Helpers shared by the integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
// self
use envoy_oauth2::{
	Strategy, StrategyOptions,
	flows::{DefaultVerify, Verify},
	http::ReqwestHttpClient,
	options::StrategyOptionsBuilder,
	reqwest::Client as ReqwestClient,
	url::Url,
};

pub const CLIENT_ID: &str = "ABC123";
pub const CLIENT_SECRET: &str = "secret";
pub const CALLBACK_URL: &str = "https://www.example.net/auth/envoy/callback";
pub const TOKEN_PATH: &str = "/a/auth/v0/token";
pub const GRAPHQL_PATH: &str = "/a/graphql";

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.redirect(envoy_oauth2::reqwest::redirect::Policy::none())
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

pub fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse test URL.")
}

/// Options whose token and GraphQL endpoints point at `server`.
pub fn mock_options(server: &MockServer) -> StrategyOptionsBuilder {
	StrategyOptions::builder()
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.callback_url(CALLBACK_URL)
		.token_url(url(&server.url(TOKEN_PATH)))
		.graphql_url(url(&server.url(GRAPHQL_PATH)))
}

/// Strategy with `verify` that talks to `server` through the test client.
pub fn build_test_strategy_with<V>(options: StrategyOptionsBuilder, verify: V) -> Strategy<V>
where
	V: Verify,
{
	let options = options.build().expect("Test options should build.");

	Strategy::with_http_client(options, verify, test_reqwest_http_client())
		.expect("Test strategy should build.")
}

/// Default-verify strategy against `server`.
pub fn build_test_strategy(server: &MockServer) -> Strategy {
	build_test_strategy_with(mock_options(server), DefaultVerify)
}
