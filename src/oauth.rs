//! Request facade shared by every provider adapter.
//!
//! Adapters describe *what* to send (endpoint, query, form, headers); the facade builds the
//! [`HttpRequest`], dispatches it through a [`ProviderHttpClient`], classifies transport failures
//! with a [`TransportErrorMapper`], and hands back the raw body for dialect-specific decoding.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE, HeaderName},
	},
};
use serde::{Deserializer, de::DeserializeOwned};
// self
use crate::{
	_prelude::*,
	auth::Platform,
	error::{DecodeError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	jsonp,
	obs::{self, CallOutcome, CallSpan, Operation},
};

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(
		&self,
		platform: Platform,
		operation: Operation,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Mapper for arbitrary transports; every transport-specific failure becomes a network error.
#[derive(Clone, Debug, Default)]
pub struct DefaultTransportErrorMapper;
impl<E> TransportErrorMapper<E> for DefaultTransportErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(
		&self,
		_platform: Platform,
		operation: Operation,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<E>,
	) -> Error {
		map_common_transport_error(operation, meta, err)
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		_platform: Platform,
		operation: Operation,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => TransportError::from(*inner).into(),
			other => map_common_transport_error(operation, meta, other),
		}
	}
}

/// Builds, dispatches, and observes provider requests for one platform.
pub(crate) struct RequestFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	platform: Platform,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> RequestFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(platform: Platform, http_client: Arc<C>, error_mapper: Arc<M>) -> Self {
		Self { platform, http_client, error_mapper }
	}

	/// Runs `fut` inside a call span and records attempt/outcome metrics.
	pub(crate) async fn observe<T, Fut>(&self, operation: Operation, fut: Fut) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		let span = CallSpan::new(self.platform, operation);

		obs::record_call_outcome(self.platform, operation, CallOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_call_outcome(self.platform, operation, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(self.platform, operation, CallOutcome::Failure),
		}

		result
	}

	/// Issues a GET with `query` appended to `endpoint`.
	pub(crate) async fn get(
		&self,
		operation: Operation,
		endpoint: &Url,
		query: &[(&str, &str)],
		headers: &[(HeaderName, &str)],
	) -> Result<RawResponse> {
		let url = with_query(endpoint, query);
		let mut builder = Request::builder().method(Method::GET).uri(url.as_str());

		for (name, value) in headers {
			builder = builder.header(name.clone(), *value);
		}

		let request = builder.body(Vec::new()).map_err(TransportError::from)?;

		self.dispatch(operation, request).await
	}

	/// Issues an `application/x-www-form-urlencoded` POST.
	pub(crate) async fn post_form(
		&self,
		operation: Operation,
		endpoint: &Url,
		form: &[(&str, &str)],
		headers: &[(HeaderName, &str)],
	) -> Result<RawResponse> {
		let body = url::form_urlencoded::Serializer::new(String::new())
			.extend_pairs(form.iter().copied())
			.finish();
		let mut builder = Request::builder()
			.method(Method::POST)
			.uri(endpoint.as_str())
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded");

		for (name, value) in headers {
			builder = builder.header(name.clone(), *value);
		}

		let request = builder.body(body.into_bytes()).map_err(TransportError::from)?;

		self.dispatch(operation, request).await
	}

	async fn dispatch(&self, operation: Operation, request: HttpRequest) -> Result<RawResponse> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = handle.call(request).await.map_err(|err| {
			self.error_mapper.map_transport_error(self.platform, operation, meta.take().as_ref(), err)
		})?;

		Ok(RawResponse {
			platform: self.platform,
			status: Some(response.status().as_u16()),
			body: String::from_utf8_lossy(response.body()).into_owned(),
		})
	}
}
impl<C, M> Debug for RequestFacade<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestFacade").field("platform", &self.platform).finish()
	}
}

/// Undecoded provider response.
#[derive(Clone, Debug)]
pub(crate) struct RawResponse {
	pub(crate) platform: Platform,
	pub(crate) status: Option<u16>,
	pub(crate) body: String,
}
impl RawResponse {
	/// Decodes the body as JSON.
	pub(crate) fn json<T>(&self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		self.decode(self.body.trim())
	}

	/// Decodes the body as JSON, stripping a JSONP envelope first when one is present.
	pub(crate) fn jsonp<T>(&self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		self.decode(jsonp::unwrap_or_trim(&self.body))
	}

	/// Decodes `payload`, a view into this response's body, as JSON.
	pub(crate) fn decode<T>(&self, payload: &str) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		let de = &mut serde_json::Deserializer::from_str(payload);

		serde_path_to_error::deserialize(de).map_err(|source| DecodeError::Json {
			source,
			status: self.status,
			detail: self.body.clone(),
		})
	}

	/// Builds the error for a decoded body that lacks a required field.
	pub(crate) fn missing(&self, field: &'static str) -> Error {
		DecodeError::MissingField { field, status: self.status, detail: self.body.clone() }.into()
	}

	/// Builds the error for a body that carries the provider's failure signal.
	pub(crate) fn rejected(&self, code: impl Display, message: &str) -> Error {
		Error::provider(self.platform, Some(code.to_string()), message, self.body.clone())
	}
}

/// Headers shared by JSON-speaking endpoints.
pub(crate) fn accept_json() -> (HeaderName, &'static str) {
	(ACCEPT, "application/json")
}

/// Returns the first non-empty candidate, or an empty string.
pub(crate) fn first_non_empty<'a>(candidates: impl IntoIterator<Item = &'a str>) -> &'a str {
	candidates.into_iter().find(|value| !value.is_empty()).unwrap_or_default()
}

/// Deserializes an identifier that providers send either as a JSON string or a number.
///
/// `null` and absent values become an empty string.
pub(crate) fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Text(String),
		Signed(i64),
		Unsigned(u64),
	}

	Ok(match Option::<Raw>::deserialize(deserializer)? {
		Some(Raw::Text(value)) => value,
		Some(Raw::Signed(value)) => value.to_string(),
		Some(Raw::Unsigned(value)) => value.to_string(),
		None => String::new(),
	})
}

/// Deserializes a string that may be `null`.
pub(crate) fn nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns `endpoint` with `query` appended, URL-escaping every pair.
pub(crate) fn with_query(endpoint: &Url, query: &[(&str, &str)]) -> Url {
	let mut url = endpoint.clone();

	if !query.is_empty() {
		url.query_pairs_mut().extend_pairs(query.iter().copied());
	}

	url
}

fn map_common_transport_error<E>(
	operation: Operation,
	meta: Option<&ResponseMetadata>,
	err: HttpClientError<E>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Http(inner) => TransportError::Request(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		HttpClientError::Reqwest(inner) => TransportError::Network { source: inner }.into(),
		_ => TransportError::Other {
			message: match meta.and_then(|value| value.status) {
				Some(status) => format!("unrecognized failure during {operation} (HTTP {status})"),
				None => format!("unrecognized failure during {operation}"),
			},
		}
		.into(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::header::AUTHORIZATION;
	// self
	use super::*;
	use crate::{error::ErrorKind, tests::NoopHttpClient};

	#[derive(Debug, Deserialize)]
	struct Ids {
		#[serde(default, deserialize_with = "identifier")]
		uid: String,
		#[serde(default, deserialize_with = "nullable")]
		name: String,
	}

	fn raw(body: &str) -> RawResponse {
		RawResponse { platform: Platform::Qq, status: Some(200), body: body.into() }
	}

	#[test]
	fn identifiers_accept_strings_and_numbers() {
		let ids: Ids = raw("{\"uid\":\"99\"}").json().expect("String uid should decode.");

		assert_eq!(ids.uid, "99");

		let ids: Ids = raw("{\"uid\":1404376560}").json().expect("Numeric uid should decode.");

		assert_eq!(ids.uid, "1404376560");

		let ids: Ids = raw("{\"uid\":null,\"name\":null}").json().expect("Nulls should decode.");

		assert!(ids.uid.is_empty());
		assert!(ids.name.is_empty());
	}

	#[test]
	fn jsonp_bodies_decode_like_json() {
		let wrapped: Ids =
			raw("callback( {\"uid\":\"7\"} );\n").jsonp().expect("JSONP body should decode.");
		let bare: Ids = raw("{\"uid\":\"7\"}").jsonp().expect("Bare JSON body should decode.");

		assert_eq!(wrapped.uid, bare.uid);
	}

	#[test]
	fn decode_failures_keep_status_and_body() {
		let response = RawResponse {
			platform: Platform::Weibo,
			status: Some(502),
			body: "<html>bad gateway</html>".into(),
		};
		let err = response.json::<Ids>().expect_err("HTML should not decode as JSON.");

		assert_eq!(err.status(), Some(502));
		assert_eq!(err.detail(), "<html>bad gateway</html>");
	}

	#[test]
	fn rejected_builds_provider_error() {
		let err = raw("{\"ret\":-1,\"msg\":\"client request's parameters are invalid\"}")
			.rejected(-1, "client request's parameters are invalid");

		match err {
			Error::Provider { platform, code, message, detail } => {
				assert_eq!(platform, Platform::Qq);
				assert_eq!(code.as_deref(), Some("-1"));
				assert_eq!(message, "client request's parameters are invalid");
				assert!(detail.contains("\"ret\":-1"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn with_query_escapes_values() {
		let endpoint =
			Url::parse("https://graph.qq.com/oauth2.0/me").expect("Endpoint fixture should parse.");
		let url = with_query(&endpoint, &[("access_token", "a b&c")]);

		assert_eq!(url.as_str(), "https://graph.qq.com/oauth2.0/me?access_token=a+b%26c");
		assert_eq!(with_query(&endpoint, &[]).as_str(), endpoint.as_str());
	}

	#[test]
	fn first_non_empty_prefers_earlier_candidates() {
		assert_eq!(first_non_empty(["", "b", "c"]), "b");
		assert_eq!(first_non_empty(["", ""]), "");
	}

	#[test]
	fn default_mapper_wraps_transport_errors() {
		let err = <DefaultTransportErrorMapper as TransportErrorMapper<std::io::Error>>::map_transport_error(
			&DefaultTransportErrorMapper,
			Platform::Github,
			Operation::AccessToken,
			None,
			HttpClientError::Other("connection reset".into()),
		);

		assert!(matches!(err, Error::Transport(TransportError::Other { .. })));
	}

	#[tokio::test]
	async fn unencodable_header_is_a_transport_error() {
		let facade = RequestFacade::new(
			Platform::Github,
			Arc::new(NoopHttpClient),
			Arc::new(DefaultTransportErrorMapper),
		);
		let endpoint = Url::parse("https://api.github.com/user").expect("Endpoint should parse.");
		let err = facade
			.get(Operation::Userinfo, &endpoint, &[], &[(AUTHORIZATION, "bearer bad\ntoken")])
			.await
			.expect_err("A header value with a newline should not build a request.");

		assert!(matches!(err, Error::Transport(TransportError::Request(_))));
		assert_eq!(err.kind(), ErrorKind::Transport);
	}
}
