//! Demonstrates plugging a custom blocking transport into a [`Provider`].
//!
//! 1. Implement [`ApiHttpClient`] for the transport (here a canned in-memory responder).
//! 2. Pass it to [`Provider::with_http_client`].
//! 3. Run a full public-application handshake and a request without touching the network.

// std
use std::{
	collections::HashMap,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Mutex,
};
// crates.io
use color_eyre::Result;
use url::Url;
// self
use xero_broker::{
	config::{Endpoints, Mode, ProviderConfig},
	dispatch::Headers,
	http::ApiHttpClient,
	oauth2::{HttpClientError, HttpRequest, HttpResponse, http::StatusCode},
	provider::Provider,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let base = "https://accounting.example.com";
	let endpoints = Endpoints {
		request_token: Url::parse(&format!("{base}/oauth/RequestToken"))?,
		authorize: Url::parse(&format!("{base}/oauth/Authorize"))?,
		access_token: Url::parse(&format!("{base}/oauth/AccessToken"))?,
		oauth2_authorize: Url::parse(&format!("{base}/identity/connect/authorize"))?,
		oauth2_token: Url::parse(&format!("{base}/connect/token"))?,
		api_base: Url::parse(&format!("{base}/api.xro/2.0/"))?,
	};
	let config = ProviderConfig::builder("demo-key", "demo-secret")
		.mode(Mode::Public)
		.callback_url(Url::parse("https://app.example.com/callback")?)
		.endpoints(endpoints)
		.build()?;
	let provider = Provider::with_http_client(config, CannedClient::default());
	let mut session = provider.begin_auth("")?;

	println!("Authorize URL: {}", session.auth_url()?);

	let params = HashMap::from([
		("oauth_token".to_owned(), "demo-request".to_owned()),
		("oauth_verifier".to_owned(), "123456".to_owned()),
	]);

	provider.complete_auth(&mut session, &params)?;

	let body = provider.find(&session, "TrackingCategories", &Headers::new(), None)?;

	println!("Response: {}", String::from_utf8_lossy(&body));

	for line in provider.http_client().log.lock().map_err(|_| CannedError)?.iter() {
		println!("{line}");
	}

	Ok(())
}

/// Answers each endpoint with a fixed body and keeps a request log.
#[derive(Default)]
struct CannedClient {
	log: Mutex<Vec<String>>,
}
impl ApiHttpClient for CannedClient {
	type TransportError = CannedError;

	fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError<CannedError>> {
		let path = request.uri().path().to_owned();
		let body: &[u8] = match path.as_str() {
			"/oauth/RequestToken" => b"oauth_token=demo-request&oauth_token_secret=demo-request-secret",
			"/oauth/AccessToken" => b"oauth_token=demo-access&oauth_token_secret=demo-access-secret",
			"/api.xro/2.0/TrackingCategories" => br#"{"TrackingCategories":[]}"#,
			_ => return Err(HttpClientError::Reqwest(Box::new(CannedError))),
		};
		let signed = request.headers().contains_key("authorization");

		self.log
			.lock()
			.map_err(|_| HttpClientError::Reqwest(Box::new(CannedError)))?
			.push(format!("{} {path} (signed: {signed})", request.method()));

		let mut response = HttpResponse::new(body.to_vec());

		*response.status_mut() = StatusCode::OK;

		Ok(response)
	}
}

#[derive(Debug)]
struct CannedError;
impl Display for CannedError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("No canned response for this request.")
	}
}
impl StdError for CannedError {}
