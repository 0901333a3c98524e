//! Sina Weibo adapter.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Gender, Platform, UserInfo},
	http::ProviderHttpClient,
	oauth::{TransportErrorMapper, accept_json, first_non_empty, identifier, nullable, with_query},
	obs::Operation,
	provider::{ProviderFuture, SnsProvider},
};

def_adapter!(Weibo, Platform::Weibo, "Sina Weibo adapter.");
impl<C, M> Weibo<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	async fn exchange(&self, code: &str, callback: &str) -> Result<AccessToken> {
		let endpoint = &self.descriptor.endpoints.token;
		let form = [
			("client_id", self.credentials.client_id.as_str()),
			("client_secret", self.credentials.client_secret.expose()),
			("code", code),
			("redirect_uri", callback),
			("grant_type", "authorization_code"),
		];
		let response =
			self.facade.post_form(Operation::AccessToken, endpoint, &form, &[accept_json()]).await?;
		let payload = response.json::<TokenPayload>()?;

		if payload.error_code > 0 {
			let message =
				first_non_empty([payload.error_description.as_str(), payload.error.as_str()]);

			return Err(response.rejected(payload.error_code, message));
		}
		if payload.access_token.is_empty() {
			return Err(response.missing("access_token"));
		}
		if payload.uid.is_empty() {
			return Err(response.missing("uid"));
		}

		Ok(AccessToken::new(payload.access_token, payload.uid))
	}

	async fn profile(&self, access_token: &str, open_id: &str) -> Result<UserInfo> {
		let endpoint = &self.descriptor.endpoints.userinfo;
		let query = [("access_token", access_token), ("uid", open_id)];
		let response = self.facade.get(Operation::Userinfo, endpoint, &query, &[]).await?;
		let payload = response.json::<ProfilePayload>()?;

		if payload.error_code > 0 {
			return Err(response.rejected(payload.error_code, &payload.error));
		}
		if payload.id.is_empty() {
			return Err(response.missing("id"));
		}

		Ok(UserInfo {
			platform: Platform::Weibo,
			name: payload.screen_name,
			open_id: payload.id,
			union_id: String::new(),
			avatar: payload.avatar_hd,
			gender: gender(&payload.gender),
			raw_detail: response.body,
		})
	}
}
impl<C, M> SnsProvider for Weibo<C, M>
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

#[derive(Debug, Deserialize)]
struct TokenPayload {
	#[serde(default)]
	error_code: i64,
	#[serde(default, deserialize_with = "nullable")]
	error: String,
	#[serde(default, deserialize_with = "nullable")]
	error_description: String,
	#[serde(default, deserialize_with = "nullable")]
	access_token: String,
	#[serde(default, deserialize_with = "identifier")]
	uid: String,
}

#[derive(Debug, Deserialize)]
struct ProfilePayload {
	#[serde(default)]
	error_code: i64,
	#[serde(default, deserialize_with = "nullable")]
	error: String,
	#[serde(default, deserialize_with = "identifier")]
	id: String,
	#[serde(default, deserialize_with = "nullable")]
	screen_name: String,
	#[serde(default, deserialize_with = "nullable")]
	avatar_hd: String,
	#[serde(default, deserialize_with = "nullable")]
	gender: String,
}

fn gender(value: &str) -> Gender {
	match value {
		"f" => Gender::Female,
		"m" => Gender::Male,
		_ => Gender::Unknown,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::ClientCredentials, oauth::DefaultTransportErrorMapper, provider::ProviderDescriptor,
		tests::NoopHttpClient,
	};

	#[test]
	fn gender_letters_map_to_gender() {
		assert_eq!(gender("f"), Gender::Female);
		assert_eq!(gender("m"), Gender::Male);
		assert_eq!(gender("n"), Gender::Unknown);
		assert_eq!(gender(""), Gender::Unknown);
	}

	#[test]
	fn authorize_url_carries_documented_parameters() {
		let adapter = Weibo::<NoopHttpClient, DefaultTransportErrorMapper>::with_http_client(
			ClientCredentials::new("wb-app", "wb-secret"),
			ProviderDescriptor::for_platform(Platform::Weibo)
				.expect("Weibo descriptor should build."),
			NoopHttpClient,
			DefaultTransportErrorMapper,
		)
		.expect("Weibo adapter should build.");
		let url = adapter.authorize("xyz", "https://app.example.com/weibo");
		let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

		assert_eq!(url.host_str(), Some("api.weibo.com"));
		assert_eq!(
			pairs,
			[
				("client_id".to_owned(), "wb-app".to_owned()),
				("response_type".to_owned(), "code".to_owned()),
				("state".to_owned(), "xyz".to_owned()),
				("redirect_uri".to_owned(), "https://app.example.com/weibo".to_owned()),
			]
		);
		assert_eq!(url.fragment(), None);
	}
}
