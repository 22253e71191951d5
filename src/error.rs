//! Crate-level error types shared across configuration, flows, dispatch, and stores.

// self
use crate::{_prelude::*, config::Mode};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; fatal, never retryable.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Missing, expired, or rejected credentials; recovery requires a new handshake.
	#[error(transparent)]
	Authentication(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS, I/O).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Session store failure (corrupt or unreadable payloads, backend errors).
	#[error("{0}")]
	SessionStore(
		#[from]
		#[source]
		crate::store::StoreError,
	),

	/// Access token was renewed but the store rejected the renewed session.
	///
	/// The remote side has already replaced the previous token, so the renewed session is
	/// carried here and must be persisted by the caller.
	#[error("Session was refreshed but could not be saved: {source}")]
	RefreshedSessionNotSaved {
		/// Renewed session holding the only valid access token.
		session: Box<crate::auth::Session>,
		/// Store failure.
		#[source]
		source: crate::store::StoreError,
	},

	/// Remote API answered with a non-200 status; `message` is the verbatim response body.
	#[error("Remote API returned HTTP {status}: {message}")]
	RemoteApi {
		/// HTTP status code returned by the API.
		status: u16,
		/// Full response body decoded as text.
		message: String,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Header value cannot be represented on the wire.
	#[error("Header `{name}` has an invalid name or value.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// An endpoint or resource URL cannot be parsed.
	#[error("URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Resource resolves to a URL outside the configured API base.
	#[error("Resource `{resource}` does not resolve under the API base.")]
	ResourceOutsideApiBase {
		/// Rejected resource path.
		resource: String,
	},
	/// Endpoints must use HTTP(S).
	#[error("The {endpoint} endpoint must use HTTP or HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},

	/// Client key is empty.
	#[error("Client key must not be empty.")]
	MissingClientKey,
	/// Mode signs with RSA but no private key was supplied.
	#[error("The {mode} mode requires an RSA private key.")]
	MissingPrivateKey {
		/// Configured mode.
		mode: Mode,
	},
	/// Mode performs a redirect handshake but no callback URL was supplied.
	#[error("The {mode} mode requires a callback URL.")]
	MissingCallback {
		/// Configured mode.
		mode: Mode,
	},
	/// OAuth 2.0 mode needs a tenant identifier for request routing.
	#[error("The oauth2 mode requires a tenant identifier.")]
	MissingTenant,
	/// Private key file could not be read.
	#[error("Failed to read private key from {path}.")]
	PrivateKeyRead {
		/// Path that was read.
		path: String,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// Private key material is not a decodable PKCS#1/PKCS#8 RSA PEM.
	#[error("Private key is not a valid RSA PEM: {reason}.")]
	InvalidPrivateKey {
		/// Decoder-supplied reason string.
		reason: String,
	},
	/// Request signature could not be computed.
	#[error("Request signing failed: {reason}.")]
	Signing {
		/// Signer-supplied reason string.
		reason: String,
	},
	/// Mode string is not one of `public`, `private`, `partner`, `oauth2`.
	#[error("Unknown application mode `{value}`.")]
	InvalidMode {
		/// Rejected input.
		value: String,
	},
	/// Required environment variable is unset.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidUrl { source }
	}
}

/// Authentication failures; recovery requires restarting the handshake.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Session has no access token yet.
	#[error("Session has no access token; complete the authorization handshake first.")]
	MissingAccessToken,
	/// Session has no pending request token to exchange.
	#[error("Session has no pending request token.")]
	MissingRequestToken,
	/// Session has no authorization URL.
	#[error("An authorization URL has not been set.")]
	MissingAuthUrl,
	/// Callback parameters omit a required value.
	#[error("Callback parameters are missing `{name}`.")]
	MissingCallbackParam {
		/// Parameter name.
		name: &'static str,
	},
	/// Callback referenced a request token other than the pending one.
	#[error("Callback token does not match the pending request token.")]
	TokenMismatch,
	/// OAuth 2.0 `state` returned to the callback does not match the session.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// Session store has no entry for the requested key.
	#[error("No session is stored under `{key}`.")]
	SessionNotFound {
		/// Store key.
		key: String,
	},
	/// Access token expired (or is about to) and the mode cannot refresh silently.
	#[error("The {mode} mode cannot refresh an expiring access token.")]
	RefreshUnsupported {
		/// Configured mode.
		mode: Mode,
	},
	/// Session expired and holds no refresh material.
	#[error("Session expired and carries no refresh material.")]
	SessionExpired,
	/// Partner access token carries no `oauth_session_handle` to refresh with.
	#[error("Access token carries no session handle to refresh with.")]
	MissingSessionHandle,
	/// Token endpoint refused a handshake or refresh request.
	#[error("Token endpoint refused the request{}: {message}", http_status_suffix(.status))]
	TokenEndpoint {
		/// HTTP status, when available.
		status: Option<u16>,
		/// Response body or provider description.
		message: String,
	},
	/// Token endpoint answered 200 but omitted a required field.
	#[error("Token endpoint response is missing `{field}`.")]
	MalformedTokenResponse {
		/// Missing field name.
		field: &'static str,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Remote API rejected the credentials (HTTP 401/403).
	#[error("Remote API rejected the credentials with HTTP {status}: {message}")]
	Rejected {
		/// HTTP status code (401 or 403).
		status: u16,
		/// Full response body decoded as text.
		message: String,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

fn http_status_suffix(status: &Option<u16>) -> String {
	status.map(|status| format!(" with HTTP {status}")).unwrap_or_default()
}
