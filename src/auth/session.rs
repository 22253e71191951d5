//! Caller-owned session carrying the handshake state between redirects.
//!
//! The JSON shape is the contract with external session stores:
//! `{"AuthURL": .., "RequestToken": {"Token", "Secret"} | null, "AccessToken": {..} | null,
//! "AccessTokenExpires": RFC3339 | null}`.

// self
use crate::{_prelude::*, auth::TokenPair, error::AuthError, store::StoreError};

/// Handshake and credential state for one end user.
///
/// A session is usable for signed business requests only once [`Session::access_token`]
/// succeeds. Providers never hold sessions; callers persist them between requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Authorize URL the user is sent to; only meaningful before the redirect.
	#[serde(rename = "AuthURL", default)]
	pub auth_url: String,
	/// Pending request token between `begin_auth` and `complete_auth`.
	#[serde(rename = "RequestToken", default)]
	pub request_token: Option<TokenPair>,
	/// Access token used to sign business requests.
	#[serde(rename = "AccessToken", default)]
	pub access_token: Option<TokenPair>,
	/// Absolute access-token expiry; `None` when the mode enforces none.
	#[serde(rename = "AccessTokenExpires", default, with = "time::serde::rfc3339::option")]
	pub access_token_expires: Option<OffsetDateTime>,
}
impl Session {
	/// Returns the authorize URL, failing when the session never started a handshake.
	pub fn auth_url(&self) -> Result<&str> {
		if self.auth_url.is_empty() {
			Err(AuthError::MissingAuthUrl.into())
		} else {
			Ok(&self.auth_url)
		}
	}

	/// Returns the pending request token.
	pub fn request_token(&self) -> Result<&TokenPair> {
		self.request_token
			.as_ref()
			.filter(|pair| !pair.is_empty())
			.ok_or_else(|| AuthError::MissingRequestToken.into())
	}

	/// Returns the access token used for signing.
	pub fn access_token(&self) -> Result<&TokenPair> {
		self.access_token
			.as_ref()
			.filter(|pair| !pair.is_empty())
			.ok_or_else(|| AuthError::MissingAccessToken.into())
	}

	/// Whether an access token has been issued.
	pub fn is_authorized(&self) -> bool {
		self.access_token().is_ok()
	}

	/// Whether the access token expires within `window` of `now` (or already has).
	pub fn expires_within(&self, window: Duration, now: OffsetDateTime) -> bool {
		self.access_token_expires.is_some_and(|expires| expires - now <= window)
	}

	/// Serializes the session into its opaque store representation.
	pub fn marshal(&self) -> Result<String, StoreError> {
		serde_json::to_string(self).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize session: {e}"),
		})
	}

	/// Parses a session from its opaque store representation.
	pub fn unmarshal(data: &str) -> Result<Self, StoreError> {
		let de = &mut serde_json::Deserializer::from_str(data);

		serde_path_to_error::deserialize(de).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse session at `{}`: {}", e.path(), e.inner()),
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn assert_round_trip(session: Session) {
		let payload = session.marshal().expect("Session should serialize.");
		let restored = Session::unmarshal(&payload).expect("Session should deserialize.");

		assert_eq!(restored, session);
	}

	#[test]
	fn round_trips_every_token_state() {
		assert_round_trip(Session::default());
		assert_round_trip(Session {
			auth_url: "https://api.example.com/oauth/Authorize?oauth_token=req".into(),
			request_token: Some(TokenPair::new("req", "req-secret")),
			..Session::default()
		});
		assert_round_trip(Session {
			auth_url: "https://api.example.com/oauth/Authorize".into(),
			access_token: Some(
				TokenPair::new("acc", "acc-secret").with_data("oauth_session_handle", "h-1"),
			),
			access_token_expires: Some(datetime!(2031-04-05 06:07:08.123456789 UTC)),
			..Session::default()
		});
	}

	#[test]
	fn wire_format_uses_pascal_case_keys() {
		let session = Session {
			auth_url: "https://auth".into(),
			access_token: Some(TokenPair::new("acc", "sec")),
			access_token_expires: Some(datetime!(2030-01-02 03:04:05 UTC)),
			..Session::default()
		};
		let value: serde_json::Value =
			serde_json::from_str(&session.marshal().expect("Session should serialize."))
				.expect("Payload should be JSON.");

		assert_eq!(value["AuthURL"], "https://auth");
		assert_eq!(value["RequestToken"], serde_json::Value::Null);
		assert_eq!(value["AccessToken"]["Token"], "acc");
		assert_eq!(value["AccessToken"]["Secret"], "sec");
		assert_eq!(value["AccessTokenExpires"], "2030-01-02T03:04:05Z");
	}

	#[test]
	fn corrupt_payload_reports_json_path() {
		let err = Session::unmarshal(r#"{"AuthURL":"x","AccessToken":{"Token":7}}"#)
			.expect_err("Numeric tokens should be rejected.");

		match err {
			StoreError::Serialization { message } => assert!(message.contains("AccessToken.Token")),
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn empty_tokens_are_not_usable() {
		let session =
			Session { access_token: Some(TokenPair::new("", "")), ..Session::default() };

		assert!(!session.is_authorized());
		assert!(matches!(session.access_token(), Err(Error::Authentication(AuthError::MissingAccessToken))));
		assert!(matches!(session.auth_url(), Err(Error::Authentication(AuthError::MissingAuthUrl))));
	}

	#[test]
	fn expiry_window_includes_past_instants() {
		let now = datetime!(2030-01-01 12:00 UTC);
		let mut session = Session::default();

		assert!(!session.expires_within(Duration::minutes(5), now));

		session.access_token_expires = Some(now + Duration::minutes(4));

		assert!(session.expires_within(Duration::minutes(5), now));

		session.access_token_expires = Some(now - Duration::hours(1));

		assert!(session.expires_within(Duration::minutes(5), now));

		session.access_token_expires = Some(now + Duration::minutes(30));

		assert!(!session.expires_within(Duration::minutes(5), now));
	}
}
