//! Closed set of identity providers supported by the crate.

// self
use crate::_prelude::*;

/// Error returned when a platform tag cannot be recognized.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown platform `{tag}`.")]
pub struct UnknownPlatform {
	/// Tag that failed to parse.
	pub tag: String,
}

/// Identity provider an adapter talks to.
///
/// Open identifiers are scoped to their platform; compare them only together with the platform
/// (see [`UserInfo::qualified_id`](crate::auth::UserInfo::qualified_id)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
	/// WeChat Open Platform (QR-code web login).
	Wechat,
	/// Sina Weibo.
	Weibo,
	/// QQ Connect.
	Qq,
	/// GitHub.
	Github,
}
impl Platform {
	/// Every supported platform, in declaration order.
	pub const ALL: [Platform; 4] = [Platform::Wechat, Platform::Weibo, Platform::Qq, Platform::Github];

	/// Returns a stable label suitable for serialization, span fields, and metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			Platform::Wechat => "wechat",
			Platform::Weibo => "weibo",
			Platform::Qq => "qq",
			Platform::Github => "github",
		}
	}
}
impl Display for Platform {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Platform {
	type Err = UnknownPlatform;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let tag = s.trim();

		[
			(Platform::Wechat, "messaging"),
			(Platform::Weibo, "microblog"),
			(Platform::Qq, "social"),
			(Platform::Github, "codehost"),
		]
		.into_iter()
		.find(|(platform, alias)| {
			tag.eq_ignore_ascii_case(platform.as_str()) || tag.eq_ignore_ascii_case(alias)
		})
		.map(|(platform, _)| platform)
		.ok_or_else(|| UnknownPlatform { tag: s.to_owned() })
	}
}
