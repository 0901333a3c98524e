//! One OAuth 2.0 sign-in contract for WeChat, Weibo, QQ, and GitHub.
//!
//! Each provider's token exchange, error envelope, and profile payload is normalized into a single
//! [`auth::AccessToken`] and [`auth::UserInfo`] shape behind the [`provider::SnsProvider`] trait.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod http;
pub mod jsonp;
pub mod oauth;
pub mod obs;
pub mod provider;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};

#[cfg(test)]
mod tests {
	// std
	use std::future::{self, Ready};
	// crates.io
	use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
	// self
	use crate::http::{ProviderHttpClient, ResponseMetadataSlot};

	/// Transport that fails every request, for unit tests that never reach the network.
	#[derive(Clone, Debug, Default)]
	pub(crate) struct NoopHttpClient;
	impl ProviderHttpClient for NoopHttpClient {
		type Handle = NoopHttpClient;
		type TransportError = std::io::Error;

		fn with_metadata(&self, _slot: ResponseMetadataSlot) -> Self::Handle {
			NoopHttpClient
		}
	}
	impl<'c> AsyncHttpClient<'c> for NoopHttpClient {
		type Error = HttpClientError<std::io::Error>;
		type Future = Ready<Result<HttpResponse, Self::Error>>;

		fn call(&'c self, _request: HttpRequest) -> Self::Future {
			future::ready(Err(HttpClientError::Other("offline".into())))
		}
	}
}
