//! Normalized result of an authorization-code exchange.

// self
use crate::{_prelude::*, auth::Secret};

/// Access token plus the identifiers a provider returned alongside it.
///
/// Produced once per successful exchange and owned by the caller afterwards; adapters keep no
/// reference to it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Bearer credential for subsequent profile calls.
	pub access_token: Secret,
	/// Provider-scoped user identifier.
	#[serde(rename = "openid")]
	pub open_id: String,
	/// Cross-application identifier. Only WeChat populates it; empty elsewhere.
	#[serde(rename = "unionid")]
	pub union_id: String,
}
impl AccessToken {
	/// Creates a token without a union identifier.
	pub fn new(access_token: impl Into<Secret>, open_id: impl Into<String>) -> Self {
		Self { access_token: access_token.into(), open_id: open_id.into(), union_id: String::new() }
	}

	/// Attaches a union identifier.
	pub fn with_union_id(mut self, union_id: impl Into<String>) -> Self {
		self.union_id = union_id.into();

		self
	}
}
