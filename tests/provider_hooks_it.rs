mod common;

// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use envoy_oauth2::{
	Strategy,
	auth::TokenSecret,
	flows::DefaultVerify,
	provider::{EnvoyProvider, ProfileFuture, ProviderStrategy},
};

/// Envoy provider that also asks for a specific audience on both legs of the flow.
struct AudienceProvider {
	inner: EnvoyProvider,
}
impl ProviderStrategy for AudienceProvider {
	fn name(&self) -> &str {
		self.inner.name()
	}

	fn user_profile<'a>(&'a self, access_token: &'a TokenSecret) -> ProfileFuture<'a> {
		self.inner.user_profile(access_token)
	}

	fn authorization_params(&self, params: &mut BTreeMap<String, String>) {
		params.insert("audience".into(), "location-42".into());
	}

	fn augment_token_request(&self, form: &mut BTreeMap<String, String>) {
		form.insert("audience".into(), "location-42".into());
	}
}

fn build_strategy(server: &MockServer) -> Strategy {
	let options = mock_options(server).build().expect("Test options should build.");
	let http_client = test_reqwest_http_client();
	let inner = EnvoyProvider::new(options.provider.clone(), http_client.0.clone());
	let provider: Arc<dyn ProviderStrategy> = Arc::new(AudienceProvider { inner });

	Strategy::with_parts(options, provider, DefaultVerify, http_client)
		.expect("Strategy with custom hooks should build.")
}

#[tokio::test]
async fn authorization_params_extend_the_authorize_url() {
	let server = MockServer::start_async().await;
	let location = build_strategy(&server).authorize_url(Some(&url(CALLBACK_URL)));
	let pairs: Vec<_> = location.query_pairs().into_owned().collect();

	assert!(pairs.contains(&("audience".into(), "location-42".into())));
	assert!(pairs.contains(&("client_id".into(), CLIENT_ID.into())));
}

#[tokio::test]
async fn token_request_hook_extends_the_exchange_form() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.form_urlencoded_tuple("code", "SplxlOBeZQQYbYS6WxSbIA")
				.form_urlencoded_tuple("audience", "location-42");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"2YotnFZFEjr1zCsicMWpAA","token_type":"bearer"}"#);
		})
		.await;
	let grant = build_strategy(&server)
		.exchange_code("SplxlOBeZQQYbYS6WxSbIA", None)
		.await
		.expect("Exchange with extra form parameters should succeed.");

	token_mock.assert_async().await;

	assert_eq!(grant.access_token.expose(), "2YotnFZFEjr1zCsicMWpAA");
}
