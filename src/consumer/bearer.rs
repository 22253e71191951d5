//! OAuth 2.0 consumer: authorize URL with PKCE, code exchange, refresh-token grant, and
//! bearer authentication with tenant routing.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use oauth2::{
	AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, HttpRequest, PkceCodeVerifier, RedirectUrl, RefreshToken,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError, BasicTokenResponse},
	http::header::AUTHORIZATION,
};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{REFRESH_TOKEN_KEY, TokenPair},
	config::ProviderConfig,
	consumer,
	error::{AuthError, ConfigError},
	http::{self, ApiHttpClient, SyncHandle},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Header routing a bearer request to one organisation.
pub const TENANT_HEADER: &str = "Xero-tenant-id";

const PKCE_VERIFIER_LEN: usize = 64;
const PKCE_METHOD: &str = "S256";

/// Token material returned by a code exchange or refresh.
#[derive(Clone, Debug)]
pub struct BearerGrant {
	/// Bearer token with an empty secret; the refresh token rides in `additional_data`.
	pub token: TokenPair,
	/// Lifetime reported by the token endpoint.
	pub expires_in: Option<Duration>,
}

/// PKCE verifier and its S256 challenge.
#[derive(Clone)]
pub struct PkcePair {
	/// Secret verifier kept in the session between legs.
	pub verifier: String,
	/// Challenge placed on the authorize URL.
	pub challenge: String,
}
impl PkcePair {
	/// Generates a fresh verifier.
	pub fn generate() -> Self {
		Self::from_verifier(consumer::random_string(PKCE_VERIFIER_LEN))
	}

	/// Derives the S256 challenge for a known verifier.
	pub fn from_verifier(verifier: String) -> Self {
		let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

		Self { verifier, challenge }
	}
}
impl Debug for PkcePair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PkcePair")
			.field("verifier", &"<redacted>")
			.field("challenge", &self.challenge)
			.finish()
	}
}

/// Bearer-token consumer bound to one tenant.
pub struct BearerConsumer {
	oauth_client: ConfiguredBasicClient,
	client_id: String,
	authorize_url: Url,
	redirect_uri: Option<Url>,
	scopes: Vec<String>,
	tenant_id: String,
}
impl BearerConsumer {
	/// Configures the `oauth2` client from the provider configuration.
	pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
		let tenant_id = config.tenant_id.clone().ok_or(ConfigError::MissingTenant)?;
		let auth_url = AuthUrl::new(config.endpoints.oauth2_authorize.to_string())?;
		let token_url = TokenUrl::new(config.endpoints.oauth2_token.to_string())?;
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_key.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);

		if let Some(redirect) = &config.callback_url {
			oauth_client = oauth_client.set_redirect_uri(RedirectUrl::new(redirect.to_string())?);
		}

		Ok(Self {
			oauth_client,
			client_id: config.client_key.clone(),
			authorize_url: config.endpoints.oauth2_authorize.clone(),
			redirect_uri: config.callback_url.clone(),
			scopes: config.scopes.clone(),
			tenant_id,
		})
	}

	/// Tenant routed through [`TENANT_HEADER`].
	pub fn tenant_id(&self) -> &str {
		&self.tenant_id
	}

	/// Builds the authorize URL for `state` and the PKCE challenge.
	pub fn authorize_url(&self, state: &str, pkce: &PkcePair) -> Url {
		let mut url = self.authorize_url.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "code");
		pairs.append_pair("client_id", &self.client_id);

		if let Some(redirect) = &self.redirect_uri {
			pairs.append_pair("redirect_uri", redirect.as_str());
		}
		if !self.scopes.is_empty() {
			pairs.append_pair("scope", &self.scopes.join(" "));
		}

		pairs.append_pair("state", state);
		pairs.append_pair("code_challenge", &pkce.challenge);
		pairs.append_pair("code_challenge_method", PKCE_METHOD);

		drop(pairs);

		url
	}

	/// Exchanges an authorization code plus PKCE verifier for tokens.
	pub fn exchange_code<C>(
		&self,
		http_client: &C,
		code: &str,
		pkce_verifier: &str,
	) -> Result<BearerGrant>
	where
		C: ?Sized + ApiHttpClient,
	{
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_owned()))
			.request(&SyncHandle(http_client))
			.map_err(map_request_error)?;

		Ok(map_token_response(response, None))
	}

	/// Runs the refresh-token grant; the previous refresh token is kept when no new one is
	/// issued.
	pub fn refresh<C>(&self, http_client: &C, refresh_token: &str) -> Result<BearerGrant>
	where
		C: ?Sized + ApiHttpClient,
	{
		let refresh_secret = RefreshToken::new(refresh_token.to_owned());
		let response = self
			.oauth_client
			.exchange_refresh_token(&refresh_secret)
			.request(&SyncHandle(http_client))
			.map_err(map_request_error)?;

		Ok(map_token_response(response, Some(refresh_token)))
	}

	/// Attaches `Authorization: Bearer` and the tenant header.
	pub fn authorize_request(&self, request: &mut HttpRequest, token: &TokenPair) -> Result<()> {
		http::insert_header(request, AUTHORIZATION.as_str(), &format!("Bearer {}", token.token))?;
		http::insert_header(request, TENANT_HEADER, &self.tenant_id)?;

		Ok(())
	}
}
impl Debug for BearerConsumer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerConsumer")
			.field("client_id", &self.client_id)
			.field("authorize_url", &self.authorize_url)
			.field("redirect_uri", &self.redirect_uri)
			.field("scopes", &self.scopes)
			.field("tenant_id", &self.tenant_id)
			.finish()
	}
}

fn map_token_response(response: BasicTokenResponse, previous_refresh: Option<&str>) -> BearerGrant {
	let mut token = TokenPair::new(response.access_token().secret().to_owned(), "");
	let refresh = response
		.refresh_token()
		.map(|token| token.secret().to_owned())
		.or_else(|| previous_refresh.map(str::to_owned));

	if let Some(refresh) = refresh {
		token = token.with_data(REFRESH_TOKEN_KEY, refresh);
	}

	let expires_in = response.expires_in().and_then(|lifetime| Duration::try_from(lifetime).ok());

	BearerGrant { token, expires_in }
}

fn map_request_error<E>(err: BasicRequestTokenError<HttpClientError<E>>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		RequestTokenError::ServerResponse(response) => AuthError::TokenEndpoint {
			status: None,
			message: match response.error_description() {
				Some(description) => format!("{}: {description}", response.error().as_ref()),
				None => response.error().as_ref().to_owned(),
			},
		}
		.into(),
		RequestTokenError::Request(error) => http::map_transport_error(error),
		RequestTokenError::Parse(source, _body) => AuthError::TokenResponseParse { source }.into(),
		RequestTokenError::Other(message) =>
			AuthError::TokenEndpoint { status: None, message }.into(),
	}
}
