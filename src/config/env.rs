// std
use std::env;
// self
use crate::{
	_prelude::*,
	config::{Mode, ProviderConfig, ProviderConfigBuilder},
	error::ConfigError,
};

/// Consumer key variable.
pub const KEY_VAR: &str = "XERO_KEY";
/// Consumer secret variable.
pub const SECRET_VAR: &str = "XERO_SECRET";
/// Application mode variable (`public`, `private`, `partner`, `oauth2`).
pub const METHOD_VAR: &str = "XERO_METHOD";
/// PEM private key path variable.
pub const PRIVATE_KEY_PATH_VAR: &str = "XERO_PRIVATE_KEY_PATH";
/// `User-Agent` override variable.
pub const USER_AGENT_VAR: &str = "XERO_USER_AGENT";
/// Callback URL variable.
pub const CALLBACK_URL_VAR: &str = "XERO_CALLBACK_URL";
/// OAuth 2.0 tenant variable.
pub const TENANT_ID_VAR: &str = "XERO_TENANT_ID";

impl ProviderConfig {
	/// Loads a configuration from the `XERO_*` process environment variables.
	///
	/// `XERO_KEY` and `XERO_SECRET` are required; `XERO_METHOD` defaults to `public`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Loads a configuration through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
		let key = get(KEY_VAR).ok_or(ConfigError::MissingEnv { name: KEY_VAR })?;
		let secret = get(SECRET_VAR).ok_or(ConfigError::MissingEnv { name: SECRET_VAR })?;
		let mode = get(METHOD_VAR).map(|raw| raw.parse::<Mode>()).transpose()?.unwrap_or_default();
		let mut builder = ProviderConfigBuilder::new(key, secret).mode(mode);

		if let Some(path) = get(PRIVATE_KEY_PATH_VAR) {
			builder = builder.private_key_path(path);
		}
		if let Some(user_agent) = get(USER_AGENT_VAR) {
			builder = builder.user_agent(user_agent);
		}
		if let Some(callback) = get(CALLBACK_URL_VAR) {
			builder = builder.callback_url(Url::parse(&callback)?);
		}
		if let Some(tenant) = get(TENANT_ID_VAR) {
			builder = builder.tenant_id(tenant);
		}

		builder.build()
	}
}
