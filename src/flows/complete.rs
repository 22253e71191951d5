//! Callback leg: exchanges the pending request token (or authorization code) for an
//! access token.

// self
use crate::{
	_prelude::*,
	auth::Session,
	config::Mode,
	consumer::Consumer,
	error::AuthError,
	flows,
	http::ApiHttpClient,
	obs::{self, FlowKind},
	provider::Provider,
};

/// OAuth 1.0a callback parameter carrying the verifier.
pub const VERIFIER_PARAM: &str = "oauth_verifier";
/// OAuth 1.0a callback parameter echoing the authorized request token.
pub const TOKEN_PARAM: &str = "oauth_token";
/// OAuth 2.0 callback parameter carrying the authorization code.
pub const CODE_PARAM: &str = "code";
/// OAuth 2.0 callback parameter echoing the state.
pub const STATE_PARAM: &str = "state";

impl<C> Provider<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Completes authorization from the callback's query parameters.
	///
	/// On success the access token and its expiry are set and the request token is cleared;
	/// on failure the session is left untouched. Private sessions are already authorized, so
	/// this only fills them in when empty.
	pub fn complete_auth(
		&self,
		session: &mut Session,
		params: &HashMap<String, String>,
	) -> Result<()> {
		obs::observe(FlowKind::CompleteAuth, "complete_auth", || {
			let consumer = self.consumer()?;

			if self.mode() == Mode::Private {
				if !session.is_authorized() {
					*session = self.private_session(OffsetDateTime::now_utc());
				}

				return Ok(());
			}

			let pending = session.request_token()?;
			let (access_token, expires) = match consumer.as_ref() {
				Consumer::OAuth1(oauth1) => {
					let verifier = required_param(params, VERIFIER_PARAM)?;

					if params.get(TOKEN_PARAM).is_some_and(|token| *token != pending.token) {
						return Err(AuthError::TokenMismatch.into());
					}

					let access_token =
						oauth1.access_token(self.http_client(), pending, verifier)?;

					(access_token, flows::oauth1_expiry(self.mode(), OffsetDateTime::now_utc()))
				},
				Consumer::OAuth2(bearer) => {
					if required_param(params, STATE_PARAM)? != pending.token {
						return Err(AuthError::StateMismatch.into());
					}

					let code = required_param(params, CODE_PARAM)?;
					let grant =
						bearer.exchange_code(self.http_client(), code, pending.secret.expose())?;
					let expires =
						grant.expires_in.map(|lifetime| OffsetDateTime::now_utc() + lifetime);

					(grant.token, expires)
				},
			};

			session.access_token = Some(access_token);
			session.access_token_expires = expires;
			session.request_token = None;

			Ok(())
		})
	}
}

fn required_param<'a>(
	params: &'a HashMap<String, String>,
	name: &'static str,
) -> Result<&'a str> {
	params
		.get(name)
		.map(String::as_str)
		.filter(|value| !value.is_empty())
		.ok_or_else(|| AuthError::MissingCallbackParam { name }.into())
}
