//! Error types shared across the transport, decoding, and provider layers.

// self
use crate::{_prelude::*, auth::Platform};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by every provider operation.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The HTTP call could not be built or sent (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The response body matched neither the success nor the error shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// The provider's payload reported a failure (bad code, expired token, invalid client).
	#[error("{platform} rejected the request: {message}")]
	Provider {
		/// Platform that reported the failure.
		platform: Platform,
		/// Provider error code (`errcode`, `error_code`, `error`, `ret`), when present.
		code: Option<String>,
		/// Provider-supplied description, passed through unmodified.
		message: String,
		/// Verbatim response body.
		detail: String,
	},
}
impl Error {
	/// Returns the coarse classification of the error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Config(_) => ErrorKind::Config,
			Error::Transport(_) => ErrorKind::Transport,
			Error::Decode(_) => ErrorKind::Decode,
			Error::Provider { .. } => ErrorKind::Provider,
		}
	}

	/// Returns the raw response body that caused the failure, when one was received.
	pub fn raw_detail(&self) -> Option<&str> {
		match self {
			Error::Provider { detail, .. } => Some(detail),
			Error::Decode(e) => Some(e.detail()),
			_ => None,
		}
	}

	pub(crate) fn provider(
		platform: Platform,
		code: Option<String>,
		message: impl Into<String>,
		detail: impl Into<String>,
	) -> Self {
		Self::Provider { platform, code, message: message.into(), detail: detail.into() }
	}
}

impl From<crate::provider::ProviderDescriptorError> for Error {
	fn from(e: crate::provider::ProviderDescriptorError) -> Self {
		Self::Config(e.into())
	}
}

/// Coarse error classes surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// See [`Error::Config`].
	Config,
	/// See [`Error::Transport`].
	Transport,
	/// See [`Error::Decode`].
	Decode,
	/// See [`Error::Provider`].
	Provider,
}
impl ErrorKind {
	/// Returns `true` for infrastructure faults that should not be reported as user input problems.
	pub const fn is_infrastructure(self) -> bool {
		!matches!(self, ErrorKind::Provider)
	}
}

/// Configuration failures raised while building providers.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Descriptor belongs to a different platform than the adapter.
	#[error("Descriptor for {found} cannot configure a {expected} adapter.")]
	PlatformMismatch {
		/// Platform the adapter implements.
		expected: Platform,
		/// Platform declared by the descriptor.
		found: Platform,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Failures raised while sending a request (construction, network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The transport gave up waiting for the provider.
	#[error("Request to the provider timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// The outgoing request could not be constructed (e.g. a caller value that is not a valid
	/// header).
	#[error("Request to the provider could not be constructed.")]
	Request(#[from] oauth2::http::Error),
	/// Transport failure that carries only a message.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Response bodies that could not be decoded into the expected shape.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body was not valid JSON for the expected schema.
	#[error("Provider returned malformed JSON at `{path}`.", path = .source.path())]
	Json {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Verbatim response body.
		detail: String,
	},
	/// Body decoded but lacked a field required for a usable result.
	#[error("Provider response is missing `{field}`.")]
	MissingField {
		/// Name of the missing field.
		field: &'static str,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Verbatim response body.
		detail: String,
	},
}
impl DecodeError {
	/// Returns the verbatim response body.
	pub fn detail(&self) -> &str {
		match self {
			DecodeError::Json { detail, .. } | DecodeError::MissingField { detail, .. } => detail,
		}
	}

	/// Returns the HTTP status of the undecodable response, when known.
	pub fn status(&self) -> Option<u16> {
		match self {
			DecodeError::Json { status, .. } | DecodeError::MissingField { status, .. } => *status,
		}
	}
}
