//! Normalized end-user profile returned by every provider adapter.

// self
use crate::{_prelude::*, auth::Platform};

/// Gender as reported by a provider.
///
/// Only an unambiguous provider signal moves a profile away from [`Gender::Unknown`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
	/// Female.
	Female,
	/// Male.
	Male,
	/// Not reported, or reported in a form that does not map cleanly.
	#[default]
	Unknown,
}
impl Gender {
	/// Returns a stable lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Gender::Female => "female",
			Gender::Male => "male",
			Gender::Unknown => "unknown",
		}
	}
}
impl Display for Gender {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Provider profile normalized into one shape.
///
/// `raw_detail` keeps the verbatim profile response for operator inspection. It never leaves the
/// process through serde.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
	/// Platform that produced the profile.
	pub platform: Platform,
	/// Display name or nickname.
	pub name: String,
	/// Provider-scoped user identifier.
	#[serde(rename = "openid")]
	pub open_id: String,
	/// Cross-application identifier (WeChat only).
	#[serde(rename = "unionid")]
	pub union_id: String,
	/// Avatar image URL.
	pub avatar: String,
	/// Reported gender.
	pub gender: Gender,
	/// Verbatim profile response body.
	#[serde(skip)]
	pub raw_detail: String,
}
impl UserInfo {
	/// Creates an empty profile for `platform` with an unknown gender.
	pub fn new(platform: Platform) -> Self {
		Self {
			platform,
			name: String::new(),
			open_id: String::new(),
			union_id: String::new(),
			avatar: String::new(),
			gender: Gender::Unknown,
			raw_detail: String::new(),
		}
	}

	/// Returns `platform:open_id`, safe to use as a key across providers.
	pub fn qualified_id(&self) -> String {
		format!("{}:{}", self.platform, self.open_id)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn new_profile_defaults_to_unknown_gender() {
		let info = UserInfo::new(Platform::Github);

		assert_eq!(info.gender, Gender::Unknown);
		assert!(info.open_id.is_empty());
	}

	#[test]
	fn serialization_skips_raw_detail() {
		let mut info = UserInfo::new(Platform::Wechat);

		info.open_id = "O1".into();
		info.name = "Ann".into();
		info.gender = Gender::Female;
		info.raw_detail = "{\"openid\":\"O1\",\"secret_field\":true}".into();

		let json = serde_json::to_value(&info).expect("Profile should serialize.");

		assert_eq!(json["platform"], "wechat");
		assert_eq!(json["openid"], "O1");
		assert_eq!(json["gender"], "female");
		assert!(json.get("raw_detail").is_none());
		assert!(!json.to_string().contains("secret_field"));
	}

	#[test]
	fn qualified_id_scopes_by_platform() {
		let mut weibo = UserInfo::new(Platform::Weibo);
		let mut qq = UserInfo::new(Platform::Qq);

		weibo.open_id = "42".into();
		qq.open_id = "42".into();

		assert_eq!(weibo.qualified_id(), "weibo:42");
		assert_ne!(weibo.qualified_id(), qq.qualified_id());
	}
}
