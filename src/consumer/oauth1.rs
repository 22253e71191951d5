//! OAuth 1.0a consumer: request-token, access-token, and partner refresh exchanges plus
//! per-request signing.

// crates.io
use oauth2::{
	HttpRequest,
	http::{Method, StatusCode, header::AUTHORIZATION},
};
// self
use crate::{
	_prelude::*,
	auth::{SESSION_HANDLE_KEY, TokenPair, TokenSecret},
	config::{Mode, ProviderConfig},
	consumer::{
		self,
		signer::{SignatureRequest, Signer},
	},
	error::{AuthError, ConfigError},
	http::{self, ApiHttpClient},
};

const NONCE_LEN: usize = 32;
const OUT_OF_BAND_CALLBACK: &str = "oob";

/// Signs requests and talks to the OAuth 1.0a token endpoints for one application.
#[derive(Debug)]
pub struct OAuth1Consumer {
	mode: Mode,
	client_key: String,
	signer: Signer,
	user_agent: String,
	request_token_url: Url,
	authorize_url: Url,
	access_token_url: Url,
}
impl OAuth1Consumer {
	/// Binds a signer to the configuration's OAuth 1.0a endpoints.
	pub fn new(config: &ProviderConfig, signer: Signer) -> Self {
		Self {
			mode: config.mode,
			client_key: config.client_key.clone(),
			signer,
			user_agent: config.user_agent.clone(),
			request_token_url: config.endpoints.request_token.clone(),
			authorize_url: config.endpoints.authorize.clone(),
			access_token_url: config.endpoints.access_token.clone(),
		}
	}

	/// Application mode the consumer signs for.
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Signature algorithm in use.
	pub fn signer(&self) -> &Signer {
		&self.signer
	}

	/// Builds an `Authorization` header with a fresh timestamp and nonce.
	pub fn authorization_header(
		&self,
		method: &str,
		url: &Url,
		token: Option<&TokenPair>,
		protocol_params: &[(&str, &str)],
	) -> Result<String> {
		let nonce = consumer::random_string(NONCE_LEN);

		self.signer.authorization_header(&SignatureRequest {
			method,
			url,
			consumer_key: &self.client_key,
			token: token.map(|pair| (pair.token.as_str(), &pair.secret)),
			protocol_params,
			timestamp: OffsetDateTime::now_utc().unix_timestamp(),
			nonce: &nonce,
		})
	}

	/// Signs an outgoing request with `token`, replacing any `Authorization` header.
	pub fn sign_request(&self, request: &mut HttpRequest, token: &TokenPair) -> Result<()> {
		let url = Url::parse(&request.uri().to_string()).map_err(ConfigError::from)?;
		let header =
			self.authorization_header(request.method().as_str(), &url, Some(token), &[])?;

		http::insert_header(request, AUTHORIZATION.as_str(), &header)?;

		Ok(())
	}

	/// Obtains a request token, announcing `callback` (or out-of-band when absent).
	pub fn request_token<C>(&self, http_client: &C, callback: Option<&Url>) -> Result<TokenPair>
	where
		C: ?Sized + ApiHttpClient,
	{
		let callback = callback.map_or(OUT_OF_BAND_CALLBACK, Url::as_str);

		self.call_token_endpoint(
			http_client,
			&self.request_token_url,
			None,
			&[("oauth_callback", callback)],
		)
	}

	/// URL the user visits to authorize `request_token`.
	pub fn authorize_url(&self, request_token: &TokenPair) -> Url {
		let mut url = self.authorize_url.clone();

		url.query_pairs_mut().append_pair("oauth_token", &request_token.token);

		url
	}

	/// Exchanges an authorized request token and its verifier for an access token.
	pub fn access_token<C>(
		&self,
		http_client: &C,
		request_token: &TokenPair,
		verifier: &str,
	) -> Result<TokenPair>
	where
		C: ?Sized + ApiHttpClient,
	{
		self.call_token_endpoint(
			http_client,
			&self.access_token_url,
			Some(request_token),
			&[("oauth_verifier", verifier)],
		)
	}

	/// Exchanges a partner access token for a new one using its session handle.
	///
	/// Other modes have no refresh exchange and fail with [`AuthError::RefreshUnsupported`].
	pub fn refresh_access_token<C>(
		&self,
		http_client: &C,
		access_token: &TokenPair,
	) -> Result<TokenPair>
	where
		C: ?Sized + ApiHttpClient,
	{
		if self.mode != Mode::Partner {
			return Err(AuthError::RefreshUnsupported { mode: self.mode }.into());
		}

		let handle = access_token.session_handle().ok_or(AuthError::MissingSessionHandle)?;
		let mut refreshed = self.call_token_endpoint(
			http_client,
			&self.access_token_url,
			Some(access_token),
			&[(SESSION_HANDLE_KEY, handle)],
		)?;

		refreshed
			.additional_data
			.entry(SESSION_HANDLE_KEY.to_owned())
			.or_insert_with(|| handle.to_owned());

		Ok(refreshed)
	}

	fn call_token_endpoint<C>(
		&self,
		http_client: &C,
		endpoint: &Url,
		token: Option<&TokenPair>,
		protocol_params: &[(&str, &str)],
	) -> Result<TokenPair>
	where
		C: ?Sized + ApiHttpClient,
	{
		let header =
			self.authorization_header(Method::GET.as_str(), endpoint, token, protocol_params)?;
		let mut request = http::build_request(Method::GET, endpoint, &self.user_agent, Vec::new())?;

		http::insert_header(&mut request, AUTHORIZATION.as_str(), &header)?;

		let response = http_client.execute(request).map_err(http::map_transport_error)?;

		if response.status() != StatusCode::OK {
			return Err(AuthError::TokenEndpoint {
				status: Some(response.status().as_u16()),
				message: http::body_text(&response),
			}
			.into());
		}

		parse_token_response(response.body())
	}
}

/// Parses a form-encoded token response; unknown fields land in `additional_data`.
pub fn parse_token_response(body: &[u8]) -> Result<TokenPair> {
	let mut token = None;
	let mut secret = None;
	let mut additional_data = BTreeMap::new();

	for (key, value) in url::form_urlencoded::parse(body) {
		match key.as_ref() {
			"oauth_token" => token = Some(value.into_owned()),
			"oauth_token_secret" => secret = Some(value.into_owned()),
			_ => {
				additional_data.insert(key.into_owned(), value.into_owned());
			},
		}
	}

	let token = token
		.filter(|token| !token.is_empty())
		.ok_or(AuthError::MalformedTokenResponse { field: "oauth_token" })?;
	let secret = secret.ok_or(AuthError::MalformedTokenResponse { field: "oauth_token_secret" })?;

	Ok(TokenPair { token, secret: TokenSecret::new(secret), additional_data })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_response_keeps_extras() {
		let pair = parse_token_response(
			b"oauth_token=tok%2B1&oauth_token_secret=sec&oauth_session_handle=h-9&oauth_expires_in=1800",
		)
		.expect("Token response should parse.");

		assert_eq!(pair.token, "tok+1");
		assert_eq!(pair.secret.expose(), "sec");
		assert_eq!(pair.session_handle(), Some("h-9"));
		assert_eq!(pair.additional_data.get("oauth_expires_in").map(String::as_str), Some("1800"));
	}

	#[test]
	fn token_response_requires_token_and_secret() {
		let missing_token = parse_token_response(b"oauth_token_secret=sec")
			.expect_err("Responses without a token should fail.");
		let missing_secret = parse_token_response(b"oauth_token=tok")
			.expect_err("Responses without a secret should fail.");

		assert!(matches!(
			missing_token,
			Error::Authentication(AuthError::MalformedTokenResponse { field: "oauth_token" })
		));
		assert!(matches!(
			missing_secret,
			Error::Authentication(AuthError::MalformedTokenResponse { field: "oauth_token_secret" })
		));
	}
}
