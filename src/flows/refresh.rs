//! Silent access-token renewal for partner and OAuth 2.0 sessions.
//!
//! [`Provider::get_session_from_store`] loads a session and, when its access token expires
//! within [`REFRESH_WINDOW`], renews it and saves the result before returning. Partner
//! applications exchange the current access token and its `oauth_session_handle` at the
//! access-token endpoint for a new token valid for [`PARTNER_TOKEN_LIFETIME`]; OAuth 2.0
//! runs the refresh-token grant. Public and private applications have no renewal exchange,
//! so an expiring session there is an authentication failure and is left untouched.
//! Nothing is retried.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::Session,
	consumer::Consumer,
	error::AuthError,
	flows::{PARTNER_TOKEN_LIFETIME, REFRESH_WINDOW},
	http::ApiHttpClient,
	obs::{self, FlowKind},
	provider::Provider,
	store::{SessionStore, StoreError},
};

impl<C> Provider<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Loads the session stored under `key`, refreshing and re-saving it when it is about to
	/// expire.
	///
	/// A renewal that cannot be saved fails with [`Error::RefreshedSessionNotSaved`], which
	/// carries the renewed session since the previous token is no longer valid remotely.
	pub fn get_session_from_store(&self, store: &dyn SessionStore, key: &str) -> Result<Session> {
		let mut session = store.load(key).map_err(|err| match err {
			StoreError::NotFound { key } => AuthError::SessionNotFound { key }.into(),
			other => Error::from(other),
		})?;

		if !session.expires_within(REFRESH_WINDOW, OffsetDateTime::now_utc()) {
			return Ok(session);
		}

		self.refresh_access(&mut session)?;

		if let Err(source) = store.save(key, &session) {
			return Err(Error::RefreshedSessionNotSaved { session: Box::new(session), source });
		}

		Ok(session)
	}

	/// Replaces the session's access token with a renewed one.
	///
	/// The session is only mutated on success.
	pub fn refresh_access(&self, session: &mut Session) -> Result<()> {
		obs::observe(FlowKind::Refresh, "refresh_access", || {
			let mode = self.mode();

			if !mode.supports_refresh() {
				return Err(AuthError::RefreshUnsupported { mode }.into());
			}

			self.refresh_metrics().record_attempt();

			let result = self.renew(session);

			match &result {
				Ok(_) => self.refresh_metrics().record_success(),
				Err(_) => self.refresh_metrics().record_failure(),
			}

			result
		})
	}

	fn renew(&self, session: &mut Session) -> Result<()> {
		let consumer = self.consumer()?;
		let current = session.access_token()?;
		let (access_token, expires) = match consumer.as_ref() {
			Consumer::OAuth1(oauth1) => {
				let renewed = oauth1.refresh_access_token(self.http_client(), current)?;

				(renewed, Some(OffsetDateTime::now_utc() + PARTNER_TOKEN_LIFETIME))
			},
			Consumer::OAuth2(bearer) => {
				let refresh_token = current.refresh_token().ok_or(AuthError::SessionExpired)?;
				let grant = bearer.refresh(self.http_client(), refresh_token)?;

				(grant.token, grant.expires_in.map(|lifetime| OffsetDateTime::now_utc() + lifetime))
			},
		};

		session.access_token = Some(access_token);
		session.access_token_expires = expires;

		Ok(())
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::build_test_provider, auth::TokenPair, config::Mode, store::MemoryStore,
	};

	fn expiring_session(minutes: i64) -> Session {
		Session {
			auth_url: "https://api.example.com/oauth/Authorize".into(),
			access_token: Some(TokenPair::new("access", "secret")),
			access_token_expires: Some(OffsetDateTime::now_utc() + Duration::minutes(minutes)),
			..Default::default()
		}
	}

	#[test]
	fn fresh_sessions_are_returned_without_refresh() {
		let provider = build_test_provider(Mode::Public, "http://127.0.0.1:9");
		let store = MemoryStore::default();
		let session = expiring_session(45);

		store.save("user", &session).expect("Fixture session should save.");

		let loaded = provider
			.get_session_from_store(&store, "user")
			.expect("Fresh sessions should load without refresh.");

		assert_eq!(loaded, session);
		assert_eq!(provider.refresh_metrics().attempts(), 0);
	}

	#[test]
	fn missing_entries_are_authentication_failures() {
		let provider = build_test_provider(Mode::Partner, "http://127.0.0.1:9");
		let err = provider
			.get_session_from_store(&MemoryStore::default(), "ghost")
			.expect_err("Missing sessions should fail.");

		assert!(matches!(
			err,
			Error::Authentication(AuthError::SessionNotFound { ref key }) if key == "ghost"
		));
	}

	#[test]
	fn private_sessions_cannot_refresh() {
		let provider = build_test_provider(Mode::Private, "http://127.0.0.1:9");
		let mut session = expiring_session(1);
		let before = session.clone();
		let err = provider.refresh_access(&mut session).expect_err("Private mode cannot refresh.");

		assert!(matches!(
			err,
			Error::Authentication(AuthError::RefreshUnsupported { mode: Mode::Private })
		));
		assert_eq!(session, before);
	}

	#[test]
	fn oauth2_sessions_without_refresh_token_expire() {
		let provider = build_test_provider(Mode::OAuth2, "http://127.0.0.1:9");
		let mut session = expiring_session(1);
		let err = provider.refresh_access(&mut session).expect_err("No refresh token present.");

		assert!(matches!(err, Error::Authentication(AuthError::SessionExpired)));
		assert_eq!(provider.refresh_metrics().failures(), 1);
	}
}
