// std
use std::{fs, path::PathBuf};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{Endpoints, Mode, ProviderConfig, default_user_agent},
	error::ConfigError,
};

/// Builder for [`ProviderConfig`] values.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	/// OAuth consumer key.
	pub client_key: String,
	/// OAuth consumer secret.
	pub client_secret: String,
	/// Optional redirect target.
	pub callback_url: Option<Url>,
	/// Application mode.
	pub mode: Mode,
	/// Inline PEM private key.
	pub private_key_pem: Option<String>,
	/// PEM file read during [`build`](Self::build) when no inline key is set.
	pub private_key_path: Option<PathBuf>,
	/// Optional `User-Agent` override.
	pub user_agent: Option<String>,
	/// Optional OAuth 2.0 tenant.
	pub tenant_id: Option<String>,
	/// OAuth 2.0 scopes.
	pub scopes: Vec<String>,
	/// Endpoint set.
	pub endpoints: Endpoints,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the client credentials and production endpoints.
	pub fn new(client_key: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_key: client_key.into(),
			client_secret: client_secret.into(),
			callback_url: None,
			mode: Mode::default(),
			private_key_pem: None,
			private_key_path: None,
			user_agent: None,
			tenant_id: None,
			scopes: Vec::new(),
			endpoints: Endpoints::production(),
		}
	}

	/// Sets the application mode.
	pub fn mode(mut self, mode: Mode) -> Self {
		self.mode = mode;

		self
	}

	/// Sets the callback URL the user is redirected to after authorizing.
	pub fn callback_url(mut self, url: Url) -> Self {
		self.callback_url = Some(url);

		self
	}

	/// Supplies the RSA private key as PEM text.
	pub fn private_key_pem(mut self, pem: impl Into<String>) -> Self {
		self.private_key_pem = Some(pem.into());

		self
	}

	/// Reads the RSA private key from a PEM file during [`build`](Self::build).
	pub fn private_key_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.private_key_path = Some(path.into());

		self
	}

	/// Overrides the `User-Agent` header.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Sets the OAuth 2.0 tenant identifier.
	pub fn tenant_id(mut self, tenant: impl Into<String>) -> Self {
		self.tenant_id = Some(tenant.into());

		self
	}

	/// Sets the OAuth 2.0 scopes requested during authorization.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the endpoint set.
	pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Consumes the builder and validates the mode/credential combination.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		let private_key_pem = match (self.private_key_pem, self.private_key_path) {
			(Some(pem), _) => Some(pem),
			(None, Some(path)) => Some(fs::read_to_string(&path).map_err(|source| {
				ConfigError::PrivateKeyRead { path: path.display().to_string(), source }
			})?),
			(None, None) => None,
		};
		let mut endpoints = self.endpoints;

		if !endpoints.api_base.path().ends_with('/') {
			let path = format!("{}/", endpoints.api_base.path());

			endpoints.api_base.set_path(&path);
		}

		let config = ProviderConfig {
			client_key: self.client_key,
			client_secret: TokenSecret::new(self.client_secret),
			callback_url: self.callback_url,
			mode: self.mode,
			private_key_pem: private_key_pem.map(TokenSecret::new),
			user_agent: self.user_agent.unwrap_or_else(default_user_agent),
			tenant_id: self.tenant_id,
			scopes: self.scopes,
			endpoints,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ProviderConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		if self.client_key.trim().is_empty() {
			return Err(ConfigError::MissingClientKey);
		}
		if self.mode.requires_private_key()
			&& self.private_key_pem.as_ref().is_none_or(|pem| pem.expose().trim().is_empty())
		{
			return Err(ConfigError::MissingPrivateKey { mode: self.mode });
		}
		if self.mode.requires_callback() && self.callback_url.is_none() {
			return Err(ConfigError::MissingCallback { mode: self.mode });
		}
		if self.mode == Mode::OAuth2 && self.tenant_id.as_deref().is_none_or(str::is_empty) {
			return Err(ConfigError::MissingTenant);
		}

		let endpoints = &self.endpoints;

		validate_endpoint("request_token", &endpoints.request_token)?;
		validate_endpoint("authorize", &endpoints.authorize)?;
		validate_endpoint("access_token", &endpoints.access_token)?;
		validate_endpoint("oauth2_authorize", &endpoints.oauth2_authorize)?;
		validate_endpoint("oauth2_token", &endpoints.oauth2_token)?;
		validate_endpoint("api_base", &endpoints.api_base)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"https" | "http" => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}
