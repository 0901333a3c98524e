// std
use std::net::{Ipv4Addr, Ipv6Addr};
// crates.io
use url::{Host, ParseError};
// self
use crate::{
	_prelude::*,
	auth::Platform,
	provider::{
		EndpointOverrides, ProviderDescriptor, ProviderEndpoints, descriptor::default_endpoints,
	},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Endpoint could not be parsed or rebased.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: ParseError,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Platform needs an identity endpoint but none was configured.
	#[error("{platform} requires an identity endpoint.")]
	MissingIdentityEndpoint {
		/// Platform being described.
		platform: Platform,
	},
	/// An identity endpoint was configured for a platform that never calls one.
	#[error("{platform} does not use an identity endpoint.")]
	UnexpectedIdentityEndpoint {
		/// Platform being described.
		platform: Platform,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Platform for the descriptor being constructed.
	pub platform: Platform,
	/// Origin that default endpoints are rebased onto.
	pub origin: Option<Url>,
	/// Authorization endpoint override.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint override.
	pub token_endpoint: Option<Url>,
	/// Identity endpoint override.
	pub identity_endpoint: Option<Url>,
	/// Profile endpoint override.
	pub userinfo_endpoint: Option<Url>,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided platform.
	pub fn new(platform: Platform) -> Self {
		Self {
			platform,
			origin: None,
			authorization_endpoint: None,
			token_endpoint: None,
			identity_endpoint: None,
			userinfo_endpoint: None,
		}
	}

	/// Rebases every non-overridden endpoint onto `origin`, keeping the default path.
	///
	/// A path on `origin` acts as a prefix: `https://proxy.example.com/qq/` turns
	/// `https://graph.qq.com/oauth2.0/me` into `https://proxy.example.com/qq/oauth2.0/me`.
	pub fn origin(mut self, origin: Url) -> Self {
		self.origin = Some(origin);

		self
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the identity endpoint.
	pub fn identity_endpoint(mut self, url: Url) -> Self {
		self.identity_endpoint = Some(url);

		self
	}

	/// Sets the profile endpoint.
	pub fn userinfo_endpoint(mut self, url: Url) -> Self {
		self.userinfo_endpoint = Some(url);

		self
	}

	/// Applies every override present in `overrides`.
	pub fn overrides(mut self, overrides: EndpointOverrides) -> Self {
		let EndpointOverrides { origin, authorization, token, identity, userinfo } = overrides;

		self.origin = origin.or(self.origin);
		self.authorization_endpoint = authorization.or(self.authorization_endpoint);
		self.token_endpoint = token.or(self.token_endpoint);
		self.identity_endpoint = identity.or(self.identity_endpoint);
		self.userinfo_endpoint = userinfo.or(self.userinfo_endpoint);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let defaults = default_endpoints(self.platform);
		let origin = self.origin.as_ref();
		let authorization =
			resolve("authorization", self.authorization_endpoint, defaults.authorization, origin)?;
		let token = resolve("token", self.token_endpoint, defaults.token, origin)?;
		let userinfo = resolve("userinfo", self.userinfo_endpoint, defaults.userinfo, origin)?;
		let identity = match (self.identity_endpoint, defaults.identity) {
			(Some(url), Some(_)) => Some(url),
			(None, Some(default)) => Some(resolve("identity", None, default, origin)?),
			(Some(_), None) =>
				return Err(ProviderDescriptorError::UnexpectedIdentityEndpoint {
					platform: self.platform,
				}),
			(None, None) => None,
		};
		let descriptor = ProviderDescriptor {
			platform: self.platform,
			endpoints: ProviderEndpoints { authorization, token, identity, userinfo },
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("userinfo", &self.endpoints.userinfo)?;

		match (&self.endpoints.identity, default_endpoints(self.platform).identity) {
			(Some(identity), Some(_)) => validate_endpoint("identity", identity),
			(None, Some(_)) =>
				Err(ProviderDescriptorError::MissingIdentityEndpoint { platform: self.platform }),
			(Some(_), None) =>
				Err(ProviderDescriptorError::UnexpectedIdentityEndpoint { platform: self.platform }),
			(None, None) => Ok(()),
		}
	}
}

fn resolve(
	endpoint: &'static str,
	explicit: Option<Url>,
	default: &str,
	origin: Option<&Url>,
) -> Result<Url, ProviderDescriptorError> {
	if let Some(url) = explicit {
		return Ok(url);
	}

	let invalid = |source| ProviderDescriptorError::InvalidEndpoint { endpoint, source };
	let default = Url::parse(default).map_err(invalid)?;
	let Some(origin) = origin else {
		return Ok(default);
	};
	let mut base = origin.clone();

	if !base.path().ends_with('/') {
		let path = format!("{}/", base.path());

		base.set_path(&path);
	}

	base.join(default.path().trim_start_matches('/')).map_err(invalid)
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => Ipv4Addr::is_loopback(&ip),
		Some(Host::Ipv6(ip)) => Ipv6Addr::is_loopback(&ip),
		None => false,
	}
}
