//! Blocking transport primitives shared by the handshake and the request dispatcher.
//!
//! [`ApiHttpClient`] is the crate's only dependency on an HTTP stack. Requests and
//! responses use the `http` types re-exported by `oauth2`, so a custom transport (a
//! context-aware client with deadlines, a recording fake, etc.) plugs into both the OAuth
//! 1.0a endpoints and the `oauth2` token exchanges through [`SyncHandle`].

// std
use std::ops::Deref;
// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse, SyncHttpClient,
	http::{
		Method, Request,
		header::{HeaderName, HeaderValue, USER_AGENT},
	},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Blocking HTTP transport used for every outbound call.
///
/// Implementations must be `Send + Sync + 'static` so one provider can serve many
/// concurrent callers. Timeouts and cancellation belong to the implementation; the crate
/// imposes none.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and returns the full response, whatever its status.
	fn execute(
		&self,
		request: HttpRequest,
	) -> Result<HttpResponse, HttpClientError<Self::TransportError>>;
}

/// Borrowing adapter exposing an [`ApiHttpClient`] as an [`oauth2::SyncHttpClient`].
pub struct SyncHandle<'c, C>(pub &'c C)
where
	C: ?Sized + ApiHttpClient;
impl<C> SyncHttpClient for SyncHandle<'_, C>
where
	C: ?Sized + ApiHttpClient,
{
	type Error = HttpClientError<C::TransportError>;

	fn call(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
		self.0.execute(request)
	}
}

/// Thin wrapper around the blocking [`ReqwestClient`].
///
/// Token endpoints answer directly, so custom clients should disable redirect following.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing blocking reqwest client.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that never follows redirects.
	pub fn without_redirects() -> Result<Self, ConfigError> {
		let client =
			ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError<ReqwestError>> {
		let response = self.0.execute(request.try_into().map_err(Box::new)?).map_err(Box::new)?;
		let status = response.status();
		let headers = response.headers().to_owned();
		let mut response_new = HttpResponse::new(response.bytes().map_err(Box::new)?.to_vec());

		*response_new.status_mut() = status;
		*response_new.headers_mut() = headers;

		Ok(response_new)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Starts an outbound request carrying the configured `User-Agent`.
pub(crate) fn build_request(
	method: Method,
	url: &Url,
	user_agent: &str,
	body: Vec<u8>,
) -> Result<HttpRequest, ConfigError> {
	Ok(Request::builder().method(method).uri(url.as_str()).header(USER_AGENT, user_agent).body(body)?)
}

/// Inserts (or replaces) a header, rejecting names and values that cannot go on the wire.
pub(crate) fn insert_header(
	request: &mut HttpRequest,
	name: &str,
	value: &str,
) -> Result<(), ConfigError> {
	let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
	let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
	let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;

	request.headers_mut().insert(header_name, header_value);

	Ok(())
}

/// Full response body decoded as text, lossily.
pub(crate) fn body_text(response: &HttpResponse) -> String {
	String::from_utf8_lossy(response.body()).into_owned()
}

/// Converts a transport failure into the crate taxonomy without reinterpreting it.
pub(crate) fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::Network { source: inner }.into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) =>
			TransportError::network(std::io::Error::other(message)).into(),
		other => TransportError::network(std::io::Error::other(other.to_string())).into(),
	}
}
