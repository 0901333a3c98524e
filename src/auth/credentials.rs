//! Client credentials issued by a provider's developer console.

// self
use crate::{_prelude::*, auth::Secret};

/// Application credentials held by an adapter for its whole lifetime.
///
/// WeChat calls these `appid`/`secret`; the other providers use `client_id`/`client_secret`.
/// Adapters translate the names on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
	/// Public application identifier.
	pub client_id: String,
	/// Confidential application secret.
	pub client_secret: Secret,
}
impl ClientCredentials {
	/// Creates a new credential pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<Secret>) -> Self {
		Self { client_id: client_id.into(), client_secret: client_secret.into() }
	}
}
