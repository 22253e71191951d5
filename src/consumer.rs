//! Mode-selected consumers that sign requests and talk to the token endpoints.
//!
//! A [`Consumer`] is derived once from a [`ProviderConfig`] and carries no session state:
//! OAuth 1.0a modes hold a [`Signer`] (HMAC-SHA1 over the consumer secret for public apps,
//! RSA-SHA1 over the decoded private key for private and partner apps), while OAuth 2.0
//! holds the configured `oauth2` client and tenant.

pub mod bearer;
pub mod key;
pub mod oauth1;
pub mod signer;

pub use bearer::{BearerConsumer, BearerGrant, PkcePair, TENANT_HEADER};
pub use oauth1::OAuth1Consumer;
pub use signer::Signer;

// crates.io
use oauth2::HttpRequest;
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	config::{Mode, ProviderConfig},
	error::ConfigError,
};

/// Credential-bound request authenticator for one application mode.
#[derive(Debug)]
pub enum Consumer {
	/// Public, private, or partner application.
	OAuth1(OAuth1Consumer),
	/// OAuth 2.0 application routed by tenant.
	OAuth2(BearerConsumer),
}
impl Consumer {
	/// Builds the consumer for the configured mode, decoding the private key when needed.
	pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
		let signer = match config.mode {
			Mode::Public => Signer::HmacSha1 { consumer_secret: config.client_secret.clone() },
			mode @ (Mode::Private | Mode::Partner) => {
				let pem =
					config.private_key_pem.as_ref().ok_or(ConfigError::MissingPrivateKey { mode })?;

				Signer::RsaSha1 { key: Box::new(key::decode_private_key(pem.expose())?) }
			},
			Mode::OAuth2 => return Ok(Self::OAuth2(BearerConsumer::from_config(config)?)),
		};

		Ok(Self::OAuth1(OAuth1Consumer::new(config, signer)))
	}

	/// Mode the consumer was built for.
	pub fn mode(&self) -> Mode {
		match self {
			Consumer::OAuth1(consumer) => consumer.mode(),
			Consumer::OAuth2(_) => Mode::OAuth2,
		}
	}

	/// Authenticates an outgoing request with `token`: an OAuth 1.0a signature or a bearer
	/// header plus tenant routing.
	pub fn sign_request(&self, request: &mut HttpRequest, token: &TokenPair) -> Result<()> {
		match self {
			Consumer::OAuth1(consumer) => consumer.sign_request(request, token),
			Consumer::OAuth2(consumer) => consumer.authorize_request(request, token),
		}
	}
}

pub(crate) fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}
