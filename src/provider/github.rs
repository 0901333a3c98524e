//! GitHub OAuth App adapter.

// crates.io
use oauth2::http::header::{AUTHORIZATION, USER_AGENT};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Gender, Platform, UserInfo},
	http::ProviderHttpClient,
	oauth::{TransportErrorMapper, accept_json, first_non_empty, identifier, nullable, with_query},
	obs::Operation,
	provider::{ProviderFuture, SnsProvider},
};

/// GitHub rejects API calls without a `User-Agent`.
const AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

def_adapter!(Github, Platform::Github, "GitHub OAuth App adapter.");
impl<C, M> Github<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	async fn exchange(&self, code: &str, state: &str, callback: &str) -> Result<AccessToken> {
		let endpoint = &self.descriptor.endpoints.token;
		let form = [
			("client_id", self.credentials.client_id.as_str()),
			("client_secret", self.credentials.client_secret.expose()),
			("code", code),
			("redirect_uri", callback),
			("state", state),
		];
		let response =
			self.facade.post_form(Operation::AccessToken, endpoint, &form, &[accept_json()]).await?;
		let payload = response.json::<TokenPayload>()?;

		if !payload.error.is_empty() {
			let message =
				first_non_empty([payload.error_description.as_str(), payload.error.as_str()]);

			return Err(response.rejected(&payload.error, message));
		}
		if payload.access_token.is_empty() {
			return Err(response.missing("access_token"));
		}

		// The token response carries no user identifier; `userinfo` supplies it.
		Ok(AccessToken::new(payload.access_token, String::new()))
	}

	async fn profile(&self, access_token: &str) -> Result<UserInfo> {
		let endpoint = &self.descriptor.endpoints.userinfo;
		let bearer = format!("bearer {access_token}");
		let headers = [(AUTHORIZATION, bearer.as_str()), accept_json(), (USER_AGENT, AGENT)];
		let response = self.facade.get(Operation::Userinfo, endpoint, &[], &headers).await?;
		let payload = response.json::<ProfilePayload>()?;

		if !payload.message.is_empty() {
			return Err(Error::provider(
				Platform::Github,
				response.status.map(|status| status.to_string()),
				payload.message,
				response.body,
			));
		}
		if payload.id.is_empty() {
			return Err(response.missing("id"));
		}

		let name = first_non_empty([payload.name.as_str(), payload.login.as_str()]).to_owned();

		Ok(UserInfo {
			platform: Platform::Github,
			name,
			open_id: payload.id,
			union_id: String::new(),
			avatar: payload.avatar_url,
			gender: Gender::Unknown,
			raw_detail: response.body,
		})
	}
}
impl<C, M> SnsProvider for Github<C, M>
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
				("state", state),
				("redirect_uri", callback),
			],
		)
	}

	fn access_token<'a>(
		&'a self,
		code: &'a str,
		state: &'a str,
		callback: &'a str,
	) -> ProviderFuture<'a, AccessToken> {
		Box::pin(self.facade.observe(Operation::AccessToken, self.exchange(code, state, callback)))
	}

	/// GitHub identifies the user by the token alone, so `open_id` is ignored.
	fn userinfo<'a>(
		&'a self,
		access_token: &'a str,
		_open_id: &'a str,
	) -> ProviderFuture<'a, UserInfo> {
		Box::pin(self.facade.observe(Operation::Userinfo, self.profile(access_token)))
	}
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
	#[serde(default, deserialize_with = "nullable")]
	error: String,
	#[serde(default, deserialize_with = "nullable")]
	error_description: String,
	#[serde(default, deserialize_with = "nullable")]
	access_token: String,
}

#[derive(Debug, Deserialize)]
struct ProfilePayload {
	#[serde(default, deserialize_with = "nullable")]
	message: String,
	#[serde(default, deserialize_with = "identifier")]
	id: String,
	#[serde(default, deserialize_with = "nullable")]
	login: String,
	#[serde(default, deserialize_with = "nullable")]
	name: String,
	#[serde(default, deserialize_with = "nullable")]
	avatar_url: String,
}
