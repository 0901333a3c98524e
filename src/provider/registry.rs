//! Closed provider set and configuration-driven construction.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientCredentials, Platform, Secret, UserInfo},
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	provider::{
		EndpointOverrides, Github, ProviderDescriptor, ProviderDescriptorError, ProviderFuture,
		Qq, SnsProvider, Wechat, Weibo,
	},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestProvider = Provider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// One adapter per supported platform, selected at runtime.
///
/// Every variant implements [`SnsProvider`]; the enum delegates to whichever adapter it holds.
pub enum Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// WeChat open platform.
	Wechat(Wechat<C, M>),
	/// Sina Weibo.
	Weibo(Weibo<C, M>),
	/// QQ Connect.
	Qq(Qq<C, M>),
	/// GitHub.
	Github(Github<C, M>),
}
impl<C, M> Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the adapter matching `descriptor.platform` on top of a shared transport.
	pub fn with_http_client(
		credentials: ClientCredentials,
		descriptor: ProviderDescriptor,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let http_client = http_client.into();
		let mapper = mapper.into();
		let provider = match descriptor.platform {
			Platform::Wechat => Self::Wechat(Wechat::with_http_client(
				credentials,
				descriptor,
				http_client,
				mapper,
			)?),
			Platform::Weibo =>
				Self::Weibo(Weibo::with_http_client(credentials, descriptor, http_client, mapper)?),
			Platform::Qq =>
				Self::Qq(Qq::with_http_client(credentials, descriptor, http_client, mapper)?),
			Platform::Github => Self::Github(Github::with_http_client(
				credentials,
				descriptor,
				http_client,
				mapper,
			)?),
		};

		Ok(provider)
	}

	/// Returns the wrapped adapter as a trait object.
	pub fn as_dyn(&self) -> &dyn SnsProvider {
		match self {
			Self::Wechat(adapter) => adapter,
			Self::Weibo(adapter) => adapter,
			Self::Qq(adapter) => adapter,
			Self::Github(adapter) => adapter,
		}
	}

	/// Returns the descriptor of the wrapped adapter.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		match self {
			Self::Wechat(adapter) => adapter.descriptor(),
			Self::Weibo(adapter) => adapter.descriptor(),
			Self::Qq(adapter) => adapter.descriptor(),
			Self::Github(adapter) => adapter.descriptor(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Provider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates the adapter for `platform`'s production endpoints backed by a default reqwest
	/// client.
	pub fn new(platform: Platform, credentials: ClientCredentials) -> Result<Self> {
		Self::with_http_client(
			credentials,
			ProviderDescriptor::for_platform(platform)?,
			ReqwestHttpClient::default(),
			ReqwestTransportErrorMapper,
		)
	}
}
impl<C, M> SnsProvider for Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn platform(&self) -> Platform {
		self.as_dyn().platform()
	}

	fn authorize(&self, state: &str, callback: &str) -> Url {
		self.as_dyn().authorize(state, callback)
	}

	fn access_token<'a>(
		&'a self,
		code: &'a str,
		state: &'a str,
		callback: &'a str,
	) -> ProviderFuture<'a, AccessToken> {
		self.as_dyn().access_token(code, state, callback)
	}

	fn userinfo<'a>(
		&'a self,
		access_token: &'a str,
		open_id: &'a str,
	) -> ProviderFuture<'a, UserInfo> {
		self.as_dyn().userinfo(access_token, open_id)
	}
}
impl<C, M> Debug for Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Wechat(adapter) => Debug::fmt(adapter, f),
			Self::Weibo(adapter) => Debug::fmt(adapter, f),
			Self::Qq(adapter) => Debug::fmt(adapter, f),
			Self::Github(adapter) => Debug::fmt(adapter, f),
		}
	}
}

/// Serializable provider configuration.
///
/// ```
/// use oauth2_sns::{auth::Platform, provider::ProviderConfig};
///
/// let config: ProviderConfig = serde_json::from_str(
/// 	r#"{ "platform": "qq", "client_id": "101", "client_secret": "s3cr3t" }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.platform, Platform::Qq);
/// assert!(config.descriptor().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
	/// Platform to sign in with.
	pub platform: Platform,
	/// Application identifier issued by the provider.
	pub client_id: String,
	/// Application secret issued by the provider.
	pub client_secret: Secret,
	/// Endpoint overrides applied on top of the production endpoints.
	#[serde(default)]
	pub endpoints: EndpointOverrides,
}
impl ProviderConfig {
	/// Builds the validated descriptor for this configuration.
	pub fn descriptor(&self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		ProviderDescriptor::builder(self.platform).overrides(self.endpoints.clone()).build()
	}

	/// Returns the client credentials for this configuration.
	pub fn credentials(&self) -> ClientCredentials {
		ClientCredentials::new(self.client_id.clone(), self.client_secret.clone())
	}

	/// Builds a provider that reuses the caller-provided transport + mapper pair.
	pub fn build_with_http_client<C, M>(
		&self,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Provider<C, M>>
	where
		C: ?Sized + ProviderHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		Provider::with_http_client(self.credentials(), self.descriptor()?, http_client, mapper)
	}

	/// Builds a provider backed by a default reqwest client.
	#[cfg(feature = "reqwest")]
	pub fn build(&self) -> Result<ReqwestProvider> {
		self.build_with_http_client(ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
