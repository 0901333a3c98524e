#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use oauth2_sns::{
	auth::{Gender, Platform},
	error::{DecodeError, Error},
	provider::SnsProvider,
};

#[tokio::test]
async fn jsonp_token_with_uid_skips_identity_call() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, Platform::Qq);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/oauth2.0/token")
				.query_param("grant_type", "authorization_code")
				.query_param("client_id", CLIENT_ID)
				.query_param("client_secret", CLIENT_SECRET)
				.query_param("code", "qq-code")
				.query_param("redirect_uri", CALLBACK);
			then.status(200).body("d({\"access_token\":\"T1\",\"uid\":\"99\"})");
		})
		.await;
	let identity_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2.0/me");
			then.status(200).body("callback( {\"client_id\":\"client-it\",\"openid\":\"UNUSED\"} );");
		})
		.await;
	let token = provider
		.access_token("qq-code", STATE, CALLBACK)
		.await
		.expect("QQ token exchange should succeed.");

	token_mock.assert_async().await;
	identity_mock.assert_calls_async(0).await;

	assert_eq!(token.access_token.expose(), "T1");
	assert_eq!(token.open_id, "99");
}

#[tokio::test]
async fn query_string_token_resolves_identity_then_profile() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, Platform::Qq);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2.0/token");
			then.status(200)
				.header("content-type", "text/html")
				.body("access_token=QQ-T&expires_in=7776000&refresh_token=QQ-R");
		})
		.await;
	let identity_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2.0/me").query_param("access_token", "QQ-T");
			then.status(200)
				.body("callback( {\"client_id\":\"client-it\",\"openid\":\"QQ-OPEN\"} );\n");
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/user/get_user_info")
				.query_param("access_token", "QQ-T")
				.query_param("oauth_consumer_key", CLIENT_ID)
				.query_param("openid", "QQ-OPEN");
			then.status(200).header("content-type", "application/json").body(
				"{\"ret\":0,\"msg\":\"\",\"nickname\":\"Kai\",\"gender\":\"男\",\"figureurl_qq_1\":\"http://qzapp/40\",\"figureurl_qq\":\"http://qzapp/100\"}",
			);
		})
		.await;
	let token = provider
		.access_token("qq-code", STATE, CALLBACK)
		.await
		.expect("QQ token exchange should succeed.");

	assert_eq!(token.access_token.expose(), "QQ-T");
	assert_eq!(token.open_id, "QQ-OPEN");

	let info = provider
		.userinfo(token.access_token.expose(), &token.open_id)
		.await
		.expect("QQ profile fetch should succeed.");

	token_mock.assert_async().await;
	identity_mock.assert_async().await;
	profile_mock.assert_async().await;

	assert_eq!(info.platform, Platform::Qq);
	assert_eq!(info.open_id, "QQ-OPEN");
	assert_eq!(info.name, "Kai");
	assert_eq!(info.avatar, "http://qzapp/100");
	assert_eq!(info.gender, Gender::Male);
}

#[tokio::test]
async fn jsonp_token_error_is_rejected() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, Platform::Qq);
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2.0/token");
			then.status(200).body(
				"callback( {\"error\":100019,\"error_description\":\"code to access token error\"} );",
			);
		})
		.await;
	let err = provider
		.access_token("qq-code", STATE, CALLBACK)
		.await
		.expect_err("QQ token error should fail the exchange.");

	match err {
		Error::Provider { code, message, .. } => {
			assert_eq!(code.as_deref(), Some("100019"));
			assert_eq!(message, "code to access token error");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn identity_error_stops_the_exchange() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, Platform::Qq);
	let _token = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2.0/token");
			then.status(200).body("access_token=QQ-T&expires_in=7776000");
		})
		.await;
	let _identity = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2.0/me");
			then.status(200).body(
				"callback( {\"error\":100016,\"error_description\":\"access token check failed\"} );",
			);
		})
		.await;
	let err = provider
		.access_token("qq-code", STATE, CALLBACK)
		.await
		.expect_err("Identity failure should fail the exchange.");

	assert!(matches!(
		err,
		Error::Provider { ref message, .. } if message == "access token check failed"
	));
}

#[tokio::test]
async fn query_string_without_token_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, Platform::Qq);
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2.0/token");
			then.status(200).body("expires_in=7776000");
		})
		.await;
	let err = provider
		.access_token("qq-code", STATE, CALLBACK)
		.await
		.expect_err("Token body without access_token should fail.");

	assert!(matches!(err, Error::Decode(DecodeError::MissingField { field: "access_token", .. })));
}

#[tokio::test]
async fn profile_ret_error_reports_msg() {
	let server = MockServer::start_async().await;
	let provider = build_provider(&server, Platform::Qq);
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/get_user_info");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"ret\":-1,\"msg\":\"client request's parameters are invalid, invalid openid\"}");
		})
		.await;
	let err = provider
		.userinfo("QQ-T", "bogus")
		.await
		.expect_err("Non-zero ret should fail the profile fetch.");

	match err {
		Error::Provider { code, message, .. } => {
			assert_eq!(code.as_deref(), Some("-1"));
			assert_eq!(message, "client request's parameters are invalid, invalid openid");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
