//! QQ Connect adapter.
//!
//! QQ is the only provider whose token exchange may need a second round trip: the legacy token
//! endpoint answers with a urlencoded query string that carries no user identifier, so the adapter
//! resolves the open id through the identity endpoint (`/oauth2.0/me`) before returning. Newer
//! deployments answer with JSON or JSONP and may include `openid` directly, in which case the
//! identity call is skipped.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Gender, Platform, UserInfo},
	http::ProviderHttpClient,
	jsonp,
	oauth::{RawResponse, TransportErrorMapper, first_non_empty, identifier, nullable, with_query},
	obs::Operation,
	provider::{ProviderDescriptorError, ProviderFuture, SnsProvider},
};

def_adapter!(Qq, Platform::Qq, "QQ Connect adapter.");
impl<C, M> Qq<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	async fn exchange(&self, code: &str, callback: &str) -> Result<AccessToken> {
		let endpoint = &self.descriptor.endpoints.token;
		let query = [
			("grant_type", "authorization_code"),
			("client_id", self.credentials.client_id.as_str()),
			("client_secret", self.credentials.client_secret.expose()),
			("code", code),
			("redirect_uri", callback),
		];
		let response = self.facade.get(Operation::AccessToken, endpoint, &query, &[]).await?;
		let payload = TokenPayload::parse(&response)?;

		if payload.error != 0 {
			return Err(response.rejected(payload.error, &payload.error_description));
		}
		if payload.access_token.is_empty() {
			return Err(response.missing("access_token"));
		}

		let open_id = first_non_empty([payload.openid.as_str(), payload.uid.as_str()]).to_owned();
		let open_id = if open_id.is_empty() {
			self.facade
				.observe(Operation::ResolveIdentity, self.resolve_identity(&payload.access_token))
				.await?
		} else {
			open_id
		};

		Ok(AccessToken::new(payload.access_token, open_id))
	}

	/// Resolves the open id bound to `access_token`.
	async fn resolve_identity(&self, access_token: &str) -> Result<String> {
		let endpoint = self
			.descriptor
			.endpoints
			.identity
			.as_ref()
			.ok_or(ProviderDescriptorError::MissingIdentityEndpoint { platform: Self::PLATFORM })?;
		let query = [("access_token", access_token)];
		let response = self.facade.get(Operation::ResolveIdentity, endpoint, &query, &[]).await?;
		let payload = response.jsonp::<IdentityPayload>()?;

		if payload.error != 0 {
			return Err(response.rejected(payload.error, &payload.error_description));
		}
		if payload.openid.is_empty() {
			return Err(response.missing("openid"));
		}

		Ok(payload.openid)
	}

	async fn profile(&self, access_token: &str, open_id: &str) -> Result<UserInfo> {
		let endpoint = &self.descriptor.endpoints.userinfo;
		let query = [
			("access_token", access_token),
			("oauth_consumer_key", self.credentials.client_id.as_str()),
			("openid", open_id),
		];
		let response = self.facade.get(Operation::Userinfo, endpoint, &query, &[]).await?;
		let payload = response.jsonp::<ProfilePayload>()?;

		if payload.ret != 0 {
			return Err(response.rejected(payload.ret, &payload.msg));
		}

		let avatar = first_non_empty([
			payload.figureurl_qq.as_str(),
			payload.figureurl_qq_2.as_str(),
			payload.figureurl_qq_1.as_str(),
		])
		.to_owned();

		Ok(UserInfo {
			platform: Platform::Qq,
			name: payload.nickname,
			open_id: open_id.to_owned(),
			union_id: String::new(),
			avatar,
			gender: gender(&payload.gender),
			raw_detail: response.body,
		})
	}
}
impl<C, M> SnsProvider for Qq<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn platform(&self) -> Platform {
		Self::PLATFORM
	}

	fn authorize(&self, state: &str, callback: &str) -> Url {
		with_query(
			&self.descriptor.endpoints.authorization,
			&[
				("client_id", self.credentials.client_id.as_str()),
				("response_type", "code"),
				("state", state),
				("redirect_uri", callback),
			],
		)
	}

	fn access_token<'a>(
		&'a self,
		code: &'a str,
		_state: &'a str,
		callback: &'a str,
	) -> ProviderFuture<'a, AccessToken> {
		Box::pin(self.facade.observe(Operation::AccessToken, self.exchange(code, callback)))
	}

	fn userinfo<'a>(
		&'a self,
		access_token: &'a str,
		open_id: &'a str,
	) -> ProviderFuture<'a, UserInfo> {
		Box::pin(self.facade.observe(Operation::Userinfo, self.profile(access_token, open_id)))
	}
}

#[derive(Debug, Default, Deserialize)]
struct TokenPayload {
	#[serde(default)]
	error: i64,
	#[serde(default, deserialize_with = "nullable")]
	error_description: String,
	#[serde(default, deserialize_with = "nullable")]
	access_token: String,
	#[serde(default, deserialize_with = "identifier")]
	openid: String,
	#[serde(default, deserialize_with = "identifier")]
	uid: String,
}
impl TokenPayload {
	/// Parses a token body served as JSONP, bare JSON, or a urlencoded query string.
	fn parse(response: &RawResponse) -> Result<Self> {
		let body = response.body.trim();

		if jsonp::unwrap(body).is_some() || body.starts_with('{') {
			return Ok(response.jsonp()?);
		}

		let mut payload = Self::default();

		for (key, value) in form_urlencoded::parse(body.as_bytes()) {
			match key.as_ref() {
				"access_token" => payload.access_token = value.into_owned(),
				"openid" => payload.openid = value.into_owned(),
				"uid" => payload.uid = value.into_owned(),
				_ => (),
			}
		}

		Ok(payload)
	}
}

#[derive(Debug, Deserialize)]
struct IdentityPayload {
	#[serde(default)]
	error: i64,
	#[serde(default, deserialize_with = "nullable")]
	error_description: String,
	#[serde(default, deserialize_with = "identifier")]
	openid: String,
}

#[derive(Debug, Deserialize)]
struct ProfilePayload {
	#[serde(default)]
	ret: i64,
	#[serde(default, deserialize_with = "nullable")]
	msg: String,
	#[serde(default, deserialize_with = "nullable")]
	nickname: String,
	#[serde(default, deserialize_with = "nullable")]
	figureurl_qq: String,
	#[serde(default, deserialize_with = "nullable")]
	figureurl_qq_2: String,
	#[serde(default, deserialize_with = "nullable")]
	figureurl_qq_1: String,
	#[serde(default, deserialize_with = "nullable")]
	gender: String,
}

fn gender(value: &str) -> Gender {
	match value {
		"男" => Gender::Male,
		"女" => Gender::Female,
		_ => Gender::Unknown,
	}
}
