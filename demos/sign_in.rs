//! Walks through a complete QQ sign-in against a local mock server.
//!
//! QQ exercises the longest path: the legacy token endpoint answers with a query string, so the
//! adapter resolves the open id through `/oauth2.0/me` before the profile fetch.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth2_sns::{
	auth::{ClientCredentials, Platform},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{ProviderDescriptor, ReqwestProvider, SnsProvider},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2.0/token").query_param("code", "demo-code");
			then.status(200).body("access_token=demo-access&expires_in=7776000&refresh_token=r");
		})
		.await;
	let identity_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2.0/me").query_param("access_token", "demo-access");
			then.status(200)
				.body("callback( {\"client_id\":\"demo-client\",\"openid\":\"demo-openid\"} );");
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/get_user_info").query_param("openid", "demo-openid");
			then.status(200).header("content-type", "application/json").body(
				"{\"ret\":0,\"msg\":\"\",\"nickname\":\"Demo\",\"gender\":\"女\",\"figureurl_qq\":\"http://qzapp.qlogo.cn/demo/100\"}",
			);
		})
		.await;
	let descriptor =
		ProviderDescriptor::builder(Platform::Qq).origin(Url::parse(&server.base_url())?).build()?;
	let provider = ReqwestProvider::with_http_client(
		ClientCredentials::new("demo-client", "demo-secret"),
		descriptor,
		ReqwestHttpClient::default(),
		ReqwestTransportErrorMapper,
	)?;
	let callback = "https://app.example.com/oauth/callback";

	println!("Redirect the user to: {}", provider.authorize("demo-state", callback));

	let token = provider.access_token("demo-code", "demo-state", callback).await?;
	let info = provider.userinfo(token.access_token.expose(), &token.open_id).await?;

	token_mock.assert_async().await;
	identity_mock.assert_async().await;
	profile_mock.assert_async().await;

	println!("Signed in as {} ({}), gender {}.", info.name, info.qualified_id(), info.gender);

	Ok(())
}
