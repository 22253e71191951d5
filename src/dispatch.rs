//! Request dispatcher: the four verbs business resources are built on.
//!
//! | Verb | HTTP |
//! |---|---|
//! | [`find`](Provider::find) | `GET` |
//! | [`create`](Provider::create) | `PUT` |
//! | [`update`](Provider::update) | `POST` |
//! | [`remove`](Provider::remove) | `DELETE` |
//!
//! Every call resolves the resource against the configured API base, applies the caller's
//! headers, always sends the configured `User-Agent`, authenticates with the session's
//! access token, and performs exactly one round trip. A `200` response yields the raw body;
//! `401`/`403` become [`AuthError::Rejected`]; any other status becomes
//! [`Error::RemoteApi`] carrying the body text verbatim.

// crates.io
use oauth2::http::{Method, StatusCode, header::USER_AGENT};
// self
use crate::{
	_prelude::*,
	auth::Session,
	error::{AuthError, ConfigError},
	http::{self, ApiHttpClient},
	obs::{self, FlowKind},
	provider::Provider,
};

/// Caller-supplied request headers (`Accept`, `Content-Type`, ...).
pub type Headers = BTreeMap<String, String>;

impl<C> Provider<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET`s a resource, optionally with URL-encoded query parameters.
	pub fn find(
		&self,
		session: &Session,
		resource: &str,
		headers: &Headers,
		query: Option<&BTreeMap<String, String>>,
	) -> Result<Vec<u8>> {
		self.dispatch(Method::GET, session, resource, headers, query, Vec::new())
	}

	/// `PUT`s an already-serialized body to a resource.
	pub fn create(
		&self,
		session: &Session,
		resource: &str,
		headers: &Headers,
		body: impl Into<Vec<u8>>,
	) -> Result<Vec<u8>> {
		self.dispatch(Method::PUT, session, resource, headers, None, body.into())
	}

	/// `POST`s an already-serialized body to a resource.
	pub fn update(
		&self,
		session: &Session,
		resource: &str,
		headers: &Headers,
		body: impl Into<Vec<u8>>,
	) -> Result<Vec<u8>> {
		self.dispatch(Method::POST, session, resource, headers, None, body.into())
	}

	/// `DELETE`s a resource.
	pub fn remove(&self, session: &Session, resource: &str, headers: &Headers) -> Result<Vec<u8>> {
		self.dispatch(Method::DELETE, session, resource, headers, None, Vec::new())
	}

	/// Absolute URL for `resource` under the API base; a leading `/` is tolerated.
	///
	/// Absolute URLs and paths escaping the base (`../`) are rejected with
	/// [`ConfigError::ResourceOutsideApiBase`] so credentials never leave the API host.
	pub fn resource_url(
		&self,
		resource: &str,
		query: Option<&BTreeMap<String, String>>,
	) -> Result<Url> {
		let api_base = &self.config().endpoints.api_base;
		let outside = || ConfigError::ResourceOutsideApiBase { resource: resource.to_owned() };

		if Url::parse(resource).is_ok() {
			return Err(outside().into());
		}

		let mut url =
			api_base.join(resource.trim_start_matches('/')).map_err(ConfigError::from)?;

		if url.origin() != api_base.origin() || !url.path().starts_with(api_base.path()) {
			return Err(outside().into());
		}

		if let Some(query) = query.filter(|query| !query.is_empty()) {
			url.query_pairs_mut().extend_pairs(query);
		}

		Ok(url)
	}

	fn dispatch(
		&self,
		method: Method,
		session: &Session,
		resource: &str,
		headers: &Headers,
		query: Option<&BTreeMap<String, String>>,
		body: Vec<u8>,
	) -> Result<Vec<u8>> {
		obs::observe(FlowKind::Dispatch, verb_stage(&method), || {
			let access_token = session.access_token()?;
			let consumer = self.consumer()?;
			let url = self.resource_url(resource, query)?;
			let mut request =
				http::build_request(method, &url, &self.config().user_agent, body)?;

			for (name, value) in
				headers.iter().filter(|(name, _)| !name.eq_ignore_ascii_case(USER_AGENT.as_str()))
			{
				http::insert_header(&mut request, name, value)?;
			}

			consumer.sign_request(&mut request, access_token)?;

			let response = self.http_client().execute(request).map_err(http::map_transport_error)?;
			let status = response.status();

			match status {
				StatusCode::OK => Ok(response.into_body()),
				StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::Rejected {
					status: status.as_u16(),
					message: http::body_text(&response),
				}
				.into()),
				_ => Err(Error::RemoteApi {
					status: status.as_u16(),
					message: http::body_text(&response),
				}),
			}
		})
	}
}

fn verb_stage(method: &Method) -> &'static str {
	match *method {
		Method::GET => "find",
		Method::PUT => "create",
		Method::POST => "update",
		Method::DELETE => "remove",
		_ => "dispatch",
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::build_test_provider, config::Mode};

	#[test]
	fn resource_urls_join_base_and_encode_query() {
		let provider = build_test_provider(Mode::Private, "http://127.0.0.1:9/api.xro/2.0");
		let query = BTreeMap::from([
			("where".to_owned(), "Status==\"ACTIVE\"".to_owned()),
			("page".to_owned(), "2".to_owned()),
		]);
		let url = provider
			.resource_url("/Invoices/INV-001", Some(&query))
			.expect("Resource URL should build.");

		assert_eq!(
			url.as_str(),
			"http://127.0.0.1:9/api.xro/2.0/Invoices/INV-001?page=2&where=Status%3D%3D%22ACTIVE%22",
		);
		assert_eq!(
			provider.resource_url("Contacts", Some(&BTreeMap::new())).expect("URL should build.").as_str(),
			"http://127.0.0.1:9/api.xro/2.0/Contacts",
		);
	}

	#[test]
	fn resources_cannot_leave_the_api_base() {
		let provider = build_test_provider(Mode::Private, "http://127.0.0.1:9/api.xro/2.0");

		for resource in [
			"https://evil.example/steal",
			"http://127.0.0.1:9/other",
			"../../oauth/AccessToken",
			"mailto:someone@example.com",
		] {
			let err = provider
				.resource_url(resource, None)
				.expect_err("Resources outside the API base should be rejected.");

			assert!(
				matches!(err, Error::Config(ConfigError::ResourceOutsideApiBase { .. })),
				"Unexpected error for `{resource}`: {err:?}.",
			);
		}

		let session = provider.begin_auth("").expect("Private sessions need no request.");
		let err = provider
			.find(&session, "https://evil.example/steal", &Headers::new(), None)
			.expect_err("Dispatch should refuse foreign hosts before sending.");

		assert!(matches!(err, Error::Config(ConfigError::ResourceOutsideApiBase { .. })));
	}

	#[test]
	fn unauthorized_sessions_fail_before_sending() {
		let provider = build_test_provider(Mode::Public, "http://127.0.0.1:9");
		let err = provider
			.find(&Session::default(), "Contacts", &Headers::new(), None)
			.expect_err("Sessions without access tokens cannot dispatch.");

		assert!(matches!(err, Error::Authentication(AuthError::MissingAccessToken)));
	}

	#[test]
	fn stages_follow_verbs() {
		assert_eq!(verb_stage(&Method::PUT), "create");
		assert_eq!(verb_stage(&Method::PATCH), "dispatch");
	}
}
