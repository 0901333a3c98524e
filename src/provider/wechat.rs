//! WeChat open-platform adapter (website QR-code login).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Gender, Platform, UserInfo},
	http::ProviderHttpClient,
	oauth::{RawResponse, TransportErrorMapper, nullable, with_query},
	obs::Operation,
	provider::{ProviderFuture, SnsProvider},
};

def_adapter!(Wechat, Platform::Wechat, "WeChat open-platform adapter.");
impl<C, M> Wechat<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	async fn exchange(&self, code: &str) -> Result<AccessToken> {
		let endpoint = &self.descriptor.endpoints.token;
		let form = [
			("appid", self.credentials.client_id.as_str()),
			("secret", self.credentials.client_secret.expose()),
			("code", code),
			("grant_type", "authorization_code"),
		];
		let response = self.facade.post_form(Operation::AccessToken, endpoint, &form, &[]).await?;
		let payload = decode::<TokenPayload>(&response)?;

		if payload.access_token.is_empty() {
			return Err(response.missing("access_token"));
		}
		if payload.openid.is_empty() {
			return Err(response.missing("openid"));
		}

		Ok(AccessToken::new(payload.access_token, payload.openid).with_union_id(payload.unionid))
	}

	async fn profile(&self, access_token: &str, open_id: &str) -> Result<UserInfo> {
		let endpoint = &self.descriptor.endpoints.userinfo;
		let query = [("access_token", access_token), ("openid", open_id), ("lang", "zh_CN")];
		let response = self.facade.get(Operation::Userinfo, endpoint, &query, &[]).await?;
		let payload = decode::<ProfilePayload>(&response)?;

		if payload.openid.is_empty() {
			return Err(response.missing("openid"));
		}

		Ok(UserInfo {
			platform: Platform::Wechat,
			name: payload.nickname,
			open_id: payload.openid,
			union_id: payload.unionid,
			avatar: payload.headimgurl,
			gender: gender(payload.sex),
			raw_detail: response.body,
		})
	}
}
impl<C, M> SnsProvider for Wechat<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn platform(&self) -> Platform {
		Self::PLATFORM
	}

	fn authorize(&self, state: &str, callback: &str) -> Url {
		let mut url = with_query(
			&self.descriptor.endpoints.authorization,
			&[
				("appid", self.credentials.client_id.as_str()),
				("response_type", "code"),
				("scope", "snsapi_login"),
				("state", state),
				("redirect_uri", callback),
			],
		);

		url.set_fragment(Some("wechat_redirect"));

		url
	}

	fn access_token<'a>(
		&'a self,
		code: &'a str,
		_state: &'a str,
		_callback: &'a str,
	) -> ProviderFuture<'a, AccessToken> {
		Box::pin(self.facade.observe(Operation::AccessToken, self.exchange(code)))
	}

	fn userinfo<'a>(
		&'a self,
		access_token: &'a str,
		open_id: &'a str,
	) -> ProviderFuture<'a, UserInfo> {
		Box::pin(self.facade.observe(Operation::Userinfo, self.profile(access_token, open_id)))
	}
}

/// Error envelope shared by every WeChat endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
	#[serde(default)]
	errcode: i64,
	#[serde(default, deserialize_with = "nullable")]
	errmsg: String,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
	#[serde(default, deserialize_with = "nullable")]
	access_token: String,
	#[serde(default, deserialize_with = "nullable")]
	openid: String,
	#[serde(default, deserialize_with = "nullable")]
	unionid: String,
}

#[derive(Debug, Deserialize)]
struct ProfilePayload {
	#[serde(default, deserialize_with = "nullable")]
	openid: String,
	#[serde(default, deserialize_with = "nullable")]
	unionid: String,
	#[serde(default, deserialize_with = "nullable")]
	nickname: String,
	#[serde(default, deserialize_with = "nullable")]
	headimgurl: String,
	#[serde(default)]
	sex: i64,
}

/// Checks the `errcode` envelope before decoding the success shape.
fn decode<T>(response: &RawResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let envelope = response.json::<Envelope>()?;

	if envelope.errcode != 0 {
		return Err(response.rejected(envelope.errcode, &envelope.errmsg));
	}

	Ok(response.json()?)
}

fn gender(sex: i64) -> Gender {
	match sex {
		1 => Gender::Male,
		2 => Gender::Female,
		_ => Gender::Unknown,
	}
}
