//! First handshake leg.

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenPair},
	config::Mode,
	consumer::{self, Consumer, PkcePair},
	flows,
	http::ApiHttpClient,
	obs::{self, FlowKind},
	provider::Provider,
};

const STATE_LEN: usize = 32;

impl<C> Provider<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Starts authorization and returns the session to persist across the redirect.
	///
	/// - Private applications get a fully authorized session whose access token is the
	///   consumer key/secret pair, valid for ten years. No request is sent.
	/// - Public and partner applications obtain a request token; the session carries it and
	///   the authorize URL (`authorize?oauth_token=...`). `state` is not used by OAuth 1.0a.
	/// - OAuth 2.0 builds the authorize URL with `state` (a random value when empty) and a
	///   PKCE challenge; the session keeps `{Token: state, Secret: verifier}` as its pending
	///   request token.
	pub fn begin_auth(&self, state: &str) -> Result<Session> {
		obs::observe(FlowKind::BeginAuth, "begin_auth", || {
			let consumer = self.consumer()?;

			match consumer.as_ref() {
				Consumer::OAuth1(_) if self.mode() == Mode::Private =>
					Ok(self.private_session(OffsetDateTime::now_utc())),
				Consumer::OAuth1(oauth1) => {
					let request_token = oauth1
						.request_token(self.http_client(), self.config().callback_url.as_ref())?;
					let auth_url = oauth1.authorize_url(&request_token);

					Ok(Session {
						auth_url: auth_url.into(),
						request_token: Some(request_token),
						..Default::default()
					})
				},
				Consumer::OAuth2(bearer) => {
					let state = if state.is_empty() {
						consumer::random_string(STATE_LEN)
					} else {
						state.to_owned()
					};
					let pkce = PkcePair::generate();
					let auth_url = bearer.authorize_url(&state, &pkce);

					Ok(Session {
						auth_url: auth_url.into(),
						request_token: Some(TokenPair::new(state, pkce.verifier)),
						..Default::default()
					})
				},
			}
		})
	}

	pub(crate) fn private_session(&self, now: OffsetDateTime) -> Session {
		let config = self.config();

		Session {
			auth_url: config.endpoints.authorize.to_string(),
			request_token: None,
			access_token: Some(TokenPair::new(
				config.client_key.clone(),
				config.client_secret.expose(),
			)),
			access_token_expires: flows::oauth1_expiry(Mode::Private, now),
		}
	}
}
