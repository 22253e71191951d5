//! OAuth token pairs exchanged with the token endpoints.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// `AdditionalData` key holding the partner session handle.
pub const SESSION_HANDLE_KEY: &str = "oauth_session_handle";
/// `AdditionalData` key holding the OAuth 2.0 refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Token + secret pair (request or access token).
///
/// OAuth 2.0 bearer tokens leave `secret` empty. Token-endpoint extras such as the partner
/// session handle travel in `additional_data`, which is omitted from the wire when empty.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Public token value.
	#[serde(rename = "Token")]
	pub token: String,
	/// Token secret used as half of the HMAC key.
	#[serde(rename = "Secret")]
	pub secret: TokenSecret,
	/// Extra fields returned by the token endpoint.
	#[serde(rename = "AdditionalData", default, skip_serializing_if = "BTreeMap::is_empty")]
	pub additional_data: BTreeMap<String, String>,
}
impl TokenPair {
	/// Creates a pair without additional data.
	pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { token: token.into(), secret: TokenSecret::new(secret), additional_data: BTreeMap::new() }
	}

	/// Attaches an additional-data entry.
	pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.additional_data.insert(key.into(), value.into());

		self
	}

	/// Whether the token value is empty.
	pub fn is_empty(&self) -> bool {
		self.token.is_empty()
	}

	/// Partner session handle, when the token endpoint issued one.
	pub fn session_handle(&self) -> Option<&str> {
		self.data(SESSION_HANDLE_KEY)
	}

	/// OAuth 2.0 refresh token, when one was issued.
	pub fn refresh_token(&self) -> Option<&str> {
		self.data(REFRESH_TOKEN_KEY)
	}

	fn data(&self, key: &str) -> Option<&str> {
		self.additional_data.get(key).map(String::as_str).filter(|value| !value.is_empty())
	}
}

impl Debug for TokenPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenPair")
			.field("token", &"<redacted>")
			.field("secret", &self.secret)
			.field(
				"additional_data",
				&self.additional_data.keys().map(|key| (key, "<redacted>")).collect::<BTreeMap<_, _>>(),
			)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_additional_data_is_omitted() {
		let payload = serde_json::to_string(&TokenPair::new("tok", "sec"))
			.expect("Token pair should serialize.");

		assert_eq!(payload, r#"{"Token":"tok","Secret":"sec"}"#);
	}

	#[test]
	fn debug_output_redacts_credentials() {
		let pair = TokenPair::new("bearer-value", "secret-value")
			.with_data(REFRESH_TOKEN_KEY, "refresh-value")
			.with_data(SESSION_HANDLE_KEY, "handle-value");
		let session = crate::auth::Session { access_token: Some(pair), ..Default::default() };
		let rendered = format!("{session:?}");

		for leaked in ["bearer-value", "secret-value", "refresh-value", "handle-value"] {
			assert!(!rendered.contains(leaked), "Debug output leaked `{leaked}`: {rendered}.");
		}

		assert!(rendered.contains("refresh_token"));
		assert!(rendered.contains("oauth_session_handle"));
	}

	#[test]
	fn helpers_read_additional_data() {
		let pair = TokenPair::new("tok", "sec")
			.with_data(SESSION_HANDLE_KEY, "handle-1")
			.with_data(REFRESH_TOKEN_KEY, "");

		assert_eq!(pair.session_handle(), Some("handle-1"));
		assert_eq!(pair.refresh_token(), None);
	}
}
