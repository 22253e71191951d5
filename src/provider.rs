//! Provider handle shared by every handshake, refresh, and dispatch call.
//!
//! A [`Provider`] owns the immutable [`ProviderConfig`], the injected transport, and the
//! lazily built [`Consumer`]. It holds no per-user state: sessions are passed in by the
//! caller and persisted through a [`SessionStore`](crate::store::SessionStore).

// self
use crate::{
	_prelude::*,
	auth::Session,
	config::{Mode, ProviderConfig},
	consumer::Consumer,
	flows::RefreshMetrics,
	http::ApiHttpClient,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Stable provider name.
pub const PROVIDER_NAME: &str = "xero";

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default blocking reqwest transport.
pub type ReqwestProvider = Provider<ReqwestHttpClient>;

/// Entry point for the accounting API: authorization handshake, session refresh, and the
/// four request verbs.
///
/// The consumer (signer plus token-endpoint client) is built on first use and then shared
/// by all callers, so a private key that cannot be decoded surfaces on the first call that
/// needs it. Call [`Provider::consumer`] right after construction to fail fast instead.
pub struct Provider<C>
where
	C: ?Sized + ApiHttpClient,
{
	config: ProviderConfig,
	http_client: Arc<C>,
	consumer: RwLock<Option<Arc<Consumer>>>,
	refresh_metrics: Arc<RefreshMetrics>,
}
impl<C> Provider<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a provider that sends every request through `http_client`.
	pub fn with_http_client(config: ProviderConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			config,
			http_client: http_client.into(),
			consumer: RwLock::new(None),
			refresh_metrics: Default::default(),
		}
	}

	/// Provider name used for logging and multi-provider registries.
	pub fn name(&self) -> &'static str {
		PROVIDER_NAME
	}

	/// Immutable configuration.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Configured application mode.
	pub fn mode(&self) -> Mode {
		self.config.mode
	}

	/// Transport used for outbound calls.
	pub fn http_client(&self) -> &C {
		&self.http_client
	}

	/// Refresh attempt/success/failure counters.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.refresh_metrics
	}

	/// Returns the consumer for the configured mode, building it on first use.
	pub fn consumer(&self) -> Result<Arc<Consumer>> {
		if let Some(consumer) = self.consumer.read().as_ref() {
			return Ok(consumer.clone());
		}

		let mut slot = self.consumer.write();

		if let Some(consumer) = slot.as_ref() {
			return Ok(consumer.clone());
		}

		let consumer = Arc::new(Consumer::from_config(&self.config)?);

		*slot = Some(consumer.clone());

		Ok(consumer)
	}

	/// Parses a session previously produced by [`Session::marshal`].
	pub fn unmarshal_session(&self, data: &str) -> Result<Session> {
		Ok(Session::unmarshal(data)?)
	}
}
#[cfg(feature = "reqwest")]
impl Provider<ReqwestHttpClient> {
	/// Creates a provider backed by a default blocking reqwest client.
	pub fn new(config: ProviderConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Debug for Provider<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Provider")
			.field("name", &PROVIDER_NAME)
			.field("mode", &self.config.mode)
			.field("client_key", &self.config.client_key)
			.field("consumer_built", &self.consumer.read().is_some())
			.finish()
	}
}
