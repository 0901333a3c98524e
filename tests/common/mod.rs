//! Fixtures shared by the provider integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
// self
use oauth2_sns::{
	auth::{ClientCredentials, Platform},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{ProviderDescriptor, ReqwestProvider},
	reqwest::Client,
	url::Url,
};

pub const CLIENT_ID: &str = "client-it";
pub const CLIENT_SECRET: &str = "secret-it";
pub const CALLBACK: &str = "https://app.example.com/callback";
pub const STATE: &str = "state-it";

/// Builds a reqwest transport that accepts the self-signed certificates `httpmock` serves.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Rebases `platform`'s production endpoints onto the mock server.
pub fn build_descriptor(server: &MockServer, platform: Platform) -> ProviderDescriptor {
	let origin = Url::parse(&server.base_url()).expect("Mock server base URL should parse.");

	ProviderDescriptor::builder(platform)
		.origin(origin)
		.build()
		.expect("Mock provider descriptor should build successfully.")
}

/// Builds a reqwest-backed provider for `platform` pointed at the mock server.
pub fn build_provider(server: &MockServer, platform: Platform) -> ReqwestProvider {
	ReqwestProvider::with_http_client(
		ClientCredentials::new(CLIENT_ID, CLIENT_SECRET),
		build_descriptor(server, platform),
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
	.expect("Mock provider should build successfully.")
}
