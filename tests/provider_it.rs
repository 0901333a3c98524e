#![cfg(feature = "reqwest")]

mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use oauth2_sns::{
	auth::{ClientCredentials, Platform},
	error::{Error, ErrorKind, TransportError},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{Github, ProviderConfig, ProviderDescriptor, ReqwestProvider, SnsProvider},
	url::Url,
};

#[tokio::test]
async fn config_builds_provider_against_overridden_origin() {
	let server = MockServer::start_async().await;
	let config: ProviderConfig = serde_json::from_value(serde_json::json!({
		"platform": "weibo",
		"client_id": CLIENT_ID,
		"client_secret": CLIENT_SECRET,
		"endpoints": { "origin": server.base_url() },
	}))
	.expect("Provider config should deserialize.");
	let provider = config
		.build_with_http_client::<ReqwestHttpClient, ReqwestTransportErrorMapper>(
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
		.expect("Configured provider should build.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/access_token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"WB-T\",\"uid\":42}");
		})
		.await;
	let token = provider
		.access_token("wb-code", STATE, CALLBACK)
		.await
		.expect("Configured provider should exchange the code.");

	mock.assert_async().await;

	assert_eq!(provider.platform(), Platform::Weibo);
	assert_eq!(token.open_id, "42");
}

#[tokio::test]
async fn providers_share_one_contract_behind_dyn() {
	let server = MockServer::start_async().await;
	let providers: Vec<Arc<dyn SnsProvider>> = Platform::ALL
		.into_iter()
		.map(|platform| Arc::new(build_provider(&server, platform)) as Arc<dyn SnsProvider>)
		.collect();

	for (provider, platform) in providers.iter().zip(Platform::ALL) {
		let url = provider.authorize("opaque state", CALLBACK);
		let state = url.query_pairs().find(|(k, _)| k == "state").map(|(_, v)| v.into_owned());
		let redirect =
			url.query_pairs().find(|(k, _)| k == "redirect_uri").map(|(_, v)| v.into_owned());

		assert_eq!(provider.platform(), platform);
		assert_eq!(state.as_deref(), Some("opaque state"));
		assert_eq!(redirect.as_deref(), Some(CALLBACK));
	}
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
	let descriptor = ProviderDescriptor::builder(Platform::Github)
		.origin(Url::parse("http://127.0.0.1:1/").expect("Closed-port origin should parse."))
		.build()
		.expect("Loopback descriptor should build.");
	let provider = ReqwestProvider::with_http_client(
		ClientCredentials::new(CLIENT_ID, CLIENT_SECRET),
		descriptor,
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
	.expect("Provider should build.");
	let err = provider
		.access_token("gh-code", STATE, CALLBACK)
		.await
		.expect_err("Closed port should fail the exchange.");

	assert_eq!(err.kind(), ErrorKind::Transport);
	assert!(err.kind().is_infrastructure());
	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	assert_eq!(err.raw_detail(), None);
}

#[test]
fn mismatched_descriptor_is_a_config_error() {
	let descriptor =
		ProviderDescriptor::for_platform(Platform::Qq).expect("QQ descriptor should build.");
	let err = Github::<ReqwestHttpClient, ReqwestTransportErrorMapper>::with_http_client(
		ClientCredentials::new(CLIENT_ID, CLIENT_SECRET),
		descriptor,
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
	.expect_err("QQ descriptor should not configure a GitHub adapter.");

	assert_eq!(err.kind(), ErrorKind::Config);
}
