//! Provider configuration: application mode, credentials, and endpoint set.
//!
//! [`ProviderConfig`] is an immutable value assembled through [`ProviderConfigBuilder`] (or
//! [`ProviderConfig::from_env`]). Every base URL and the user agent live here instead of in
//! process-wide globals, so tests can point separate providers at separate mock servers.

/// Builder API for assembling provider configurations.
pub mod builder;
/// Environment-variable loader.
pub mod env;

pub use builder::*;

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Application type registered with the remote platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
	/// OAuth 1.0a public application (HMAC-SHA1, three-legged).
	#[default]
	Public,
	/// OAuth 1.0a private application (RSA-SHA1, pre-authorized, no redirect).
	Private,
	/// OAuth 1.0a partner application (RSA-SHA1, three-legged, silent refresh).
	Partner,
	/// OAuth 2.0 bearer tokens routed by a tenant header.
	#[serde(rename = "oauth2")]
	OAuth2,
}
impl Mode {
	/// Returns a stable lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Mode::Public => "public",
			Mode::Private => "private",
			Mode::Partner => "partner",
			Mode::OAuth2 => "oauth2",
		}
	}

	/// OAuth 1.0a `oauth_signature_method` for the mode, if it signs requests.
	pub const fn signature_method(self) -> Option<&'static str> {
		match self {
			Mode::Public => Some("HMAC-SHA1"),
			Mode::Private | Mode::Partner => Some("RSA-SHA1"),
			Mode::OAuth2 => None,
		}
	}

	/// Whether the mode signs with an RSA private key.
	pub const fn requires_private_key(self) -> bool {
		matches!(self, Mode::Private | Mode::Partner)
	}

	/// Whether the mode redirects the user and therefore needs a callback URL.
	pub const fn requires_callback(self) -> bool {
		matches!(self, Mode::Public | Mode::Partner | Mode::OAuth2)
	}

	/// Whether an expiring access token can be renewed without the user.
	pub const fn supports_refresh(self) -> bool {
		matches!(self, Mode::Partner | Mode::OAuth2)
	}
}
impl Display for Mode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Mode {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"public" => Ok(Mode::Public),
			"private" => Ok(Mode::Private),
			"partner" => Ok(Mode::Partner),
			"oauth2" => Ok(Mode::OAuth2),
			_ => Err(ConfigError::InvalidMode { value: s.to_owned() }),
		}
	}
}

/// Remote endpoints used by the handshake and the request dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// OAuth 1.0a request-token endpoint.
	pub request_token: Url,
	/// OAuth 1.0a user authorization endpoint.
	pub authorize: Url,
	/// OAuth 1.0a access-token endpoint (also used for partner refreshes).
	pub access_token: Url,
	/// OAuth 2.0 authorization endpoint.
	pub oauth2_authorize: Url,
	/// OAuth 2.0 token endpoint.
	pub oauth2_token: Url,
	/// Accounting API base; resource paths are joined onto it.
	pub api_base: Url,
}
impl Endpoints {
	/// Production endpoint set.
	pub fn production() -> Self {
		Self {
			request_token: known_url("https://api.xero.com/oauth/RequestToken"),
			authorize: known_url("https://api.xero.com/oauth/Authorize"),
			access_token: known_url("https://api.xero.com/oauth/AccessToken"),
			oauth2_authorize: known_url("https://login.xero.com/identity/connect/authorize"),
			oauth2_token: known_url("https://identity.xero.com/connect/token"),
			api_base: known_url("https://api.xero.com/api.xro/2.0/"),
		}
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self::production()
	}
}

/// Immutable provider configuration consumed by [`Provider`](crate::provider::Provider).
#[derive(Clone, Debug)]
pub struct ProviderConfig {
	/// OAuth consumer key (OAuth 2.0 client id).
	pub client_key: String,
	/// OAuth consumer secret (OAuth 2.0 client secret).
	pub client_secret: TokenSecret,
	/// Redirect target after user authorization.
	pub callback_url: Option<Url>,
	/// Application mode selecting the signing algorithm and token shape.
	pub mode: Mode,
	/// PEM-encoded RSA private key for private/partner modes.
	pub private_key_pem: Option<TokenSecret>,
	/// `User-Agent` header sent with every request.
	pub user_agent: String,
	/// Tenant routed via the tenant header in OAuth 2.0 mode.
	pub tenant_id: Option<String>,
	/// Scopes requested on the OAuth 2.0 authorize URL.
	pub scopes: Vec<String>,
	/// Remote endpoint set.
	pub endpoints: Endpoints,
}
impl ProviderConfig {
	/// Creates a new builder for the provided client credentials.
	pub fn builder(
		client_key: impl Into<String>,
		client_secret: impl Into<String>,
	) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(client_key, client_secret)
	}
}

/// Default `User-Agent` identifying this crate.
pub fn default_user_agent() -> String {
	format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn known_url(raw: &'static str) -> Url {
	match Url::parse(raw) {
		Ok(url) => url,
		Err(e) => unreachable!("static endpoint `{raw}` must parse: {e}"),
	}
}
