//! Provider descriptor data structures and the production endpoint table.
//!
//! A [`ProviderDescriptor`] pins an adapter to one platform and the endpoints it talks to.
//! Descriptors start from each provider's documented production URLs and can be overridden per
//! endpoint, or rebased wholesale onto another origin (a proxy, a mock server).

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::Platform};

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint users are redirected to.
	pub authorization: Url,
	/// Token endpoint used for the authorization-code exchange.
	pub token: Url,
	/// Identity endpoint that resolves an open identifier from an access token (QQ only).
	pub identity: Option<Url>,
	/// Profile endpoint.
	pub userinfo: Url,
}

/// Immutable provider descriptor consumed by adapters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
	/// Platform the endpoints belong to.
	pub platform: Platform,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
}
impl ProviderDescriptor {
	/// Creates a new builder seeded with `platform`'s production endpoints.
	pub fn builder(platform: Platform) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(platform)
	}

	/// Returns the descriptor for `platform`'s production endpoints.
	pub fn for_platform(platform: Platform) -> Result<Self, ProviderDescriptorError> {
		Self::builder(platform).build()
	}
}

/// Optional per-endpoint overrides, typically loaded from configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointOverrides {
	/// Origin every non-overridden endpoint is rebased onto, keeping its path.
	pub origin: Option<Url>,
	/// Authorization endpoint override.
	pub authorization: Option<Url>,
	/// Token endpoint override.
	pub token: Option<Url>,
	/// Identity endpoint override (QQ only).
	pub identity: Option<Url>,
	/// Profile endpoint override.
	pub userinfo: Option<Url>,
}

pub(crate) struct DefaultEndpoints {
	pub(crate) authorization: &'static str,
	pub(crate) token: &'static str,
	pub(crate) identity: Option<&'static str>,
	pub(crate) userinfo: &'static str,
}

pub(crate) const fn default_endpoints(platform: Platform) -> DefaultEndpoints {
	match platform {
		Platform::Wechat => DefaultEndpoints {
			authorization: "https://open.weixin.qq.com/connect/qrconnect",
			token: "https://api.weixin.qq.com/sns/oauth2/access_token",
			identity: None,
			userinfo: "https://api.weixin.qq.com/sns/userinfo",
		},
		Platform::Weibo => DefaultEndpoints {
			authorization: "https://api.weibo.com/oauth2/authorize",
			token: "https://api.weibo.com/oauth2/access_token",
			identity: None,
			userinfo: "https://api.weibo.com/2/users/show.json",
		},
		Platform::Qq => DefaultEndpoints {
			authorization: "https://graph.qq.com/oauth2.0/authorize",
			token: "https://graph.qq.com/oauth2.0/token",
			identity: Some("https://graph.qq.com/oauth2.0/me"),
			userinfo: "https://graph.qq.com/user/get_user_info",
		},
		Platform::Github => DefaultEndpoints {
			authorization: "https://github.com/login/oauth/authorize",
			token: "https://github.com/login/oauth/access_token",
			identity: None,
			userinfo: "https://api.github.com/user",
		},
	}
}
