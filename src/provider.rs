//! Provider contract, descriptors, and the per-platform adapters.
//!
//! [`SnsProvider`] is the object-safe capability every adapter implements. `descriptor` holds the
//! validated endpoint metadata adapters are pinned to, `registry` exposes the closed
//! [`Provider`] enum that selects an adapter by [`Platform`], and the remaining modules implement
//! one provider dialect each.

macro_rules! def_adapter {
	($name:ident, $platform:expr, $doc:literal) => {
		#[doc = $doc]
		///
		/// Adapters hold only immutable credentials, a descriptor, and shared transport handles, so
		/// one instance can serve concurrent calls behind an `Arc`.
		pub struct $name<C, M>
		where
			C: ?Sized + $crate::http::ProviderHttpClient,
			M: ?Sized + $crate::oauth::TransportErrorMapper<C::TransportError>,
		{
			credentials: $crate::auth::ClientCredentials,
			descriptor: $crate::provider::ProviderDescriptor,
			facade: $crate::oauth::RequestFacade<C, M>,
		}
		impl<C, M> $name<C, M>
		where
			C: ?Sized + $crate::http::ProviderHttpClient,
			M: ?Sized + $crate::oauth::TransportErrorMapper<C::TransportError>,
		{
			/// Platform implemented by this adapter.
			pub const PLATFORM: $crate::auth::Platform = $platform;

			/// Creates an adapter that reuses the caller-provided transport + mapper pair.
			///
			/// Fails when `descriptor` belongs to another platform.
			pub fn with_http_client(
				credentials: $crate::auth::ClientCredentials,
				descriptor: $crate::provider::ProviderDescriptor,
				http_client: impl Into<std::sync::Arc<C>>,
				mapper: impl Into<std::sync::Arc<M>>,
			) -> $crate::error::Result<Self> {
				if descriptor.platform != Self::PLATFORM {
					return Err($crate::error::ConfigError::PlatformMismatch {
						expected: Self::PLATFORM,
						found: descriptor.platform,
					}
					.into());
				}

				let facade = $crate::oauth::RequestFacade::new(
					Self::PLATFORM,
					http_client.into(),
					mapper.into(),
				);

				Ok(Self { credentials, descriptor, facade })
			}

			/// Returns the client credentials issued by the provider.
			pub fn credentials(&self) -> &$crate::auth::ClientCredentials {
				&self.credentials
			}

			/// Returns the descriptor the adapter talks to.
			pub fn descriptor(&self) -> &$crate::provider::ProviderDescriptor {
				&self.descriptor
			}
		}
		#[cfg(feature = "reqwest")]
		impl $name<$crate::http::ReqwestHttpClient, $crate::oauth::ReqwestTransportErrorMapper> {
			/// Creates an adapter for the production endpoints backed by a default reqwest client.
			pub fn new(credentials: $crate::auth::ClientCredentials) -> $crate::error::Result<Self> {
				Self::with_http_client(
					credentials,
					$crate::provider::ProviderDescriptor::for_platform($platform)?,
					$crate::http::ReqwestHttpClient::default(),
					$crate::oauth::ReqwestTransportErrorMapper,
				)
			}
		}
		impl<C, M> std::fmt::Debug for $name<C, M>
		where
			C: ?Sized + $crate::http::ProviderHttpClient,
			M: ?Sized + $crate::oauth::TransportErrorMapper<C::TransportError>,
		{
			fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
				f.debug_struct(stringify!($name))
					.field("credentials", &self.credentials)
					.field("descriptor", &self.descriptor)
					.finish()
			}
		}
	};
}

pub mod descriptor;
pub mod github;
pub mod qq;
pub mod registry;
pub mod wechat;
pub mod weibo;

pub use descriptor::*;
pub use github::*;
pub use qq::*;
pub use registry::*;
pub use wechat::*;
pub use weibo::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Platform, UserInfo},
};

/// Boxed future returned by [`SnsProvider`] operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Uniform sign-in contract implemented by every provider adapter.
///
/// The trait is object safe, so heterogeneous adapters can live behind
/// `Arc<dyn SnsProvider>` or inside the [`Provider`] enum.
///
/// Operations fail with [`Error::Transport`](crate::error::Error::Transport),
/// [`Error::Decode`](crate::error::Error::Decode), or
/// [`Error::Provider`](crate::error::Error::Provider). Configuration errors only come from
/// construction.
pub trait SnsProvider
where
	Self: Send + Sync,
{
	/// Platform this adapter talks to.
	fn platform(&self) -> Platform;

	/// Builds the URL the end user is redirected to.
	///
	/// Pure: performs no I/O. `state` and `callback` are carried verbatim (URL-escaped) so the
	/// provider echoes `state` back to `callback`.
	fn authorize(&self, state: &str, callback: &str) -> Url;

	/// Exchanges an authorization `code` for an access token and the user's open identifier.
	///
	/// `state` and `callback` must match the values used to build the authorization URL. Providers
	/// that ignore either parameter never send it.
	fn access_token<'a>(
		&'a self,
		code: &'a str,
		state: &'a str,
		callback: &'a str,
	) -> ProviderFuture<'a, AccessToken>;

	/// Fetches and normalizes the profile of the user identified by `open_id`.
	fn userinfo<'a>(
		&'a self,
		access_token: &'a str,
		open_id: &'a str,
	) -> ProviderFuture<'a, UserInfo>;
}
