#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use xero_broker::{
	_preludet::*,
	auth::{Session, TokenPair},
	config::Mode,
	error::AuthError,
};

fn pending_session(server: &MockServer) -> Session {
	Session {
		auth_url: server.url("/oauth/Authorize?oauth_token=req-token"),
		request_token: Some(TokenPair::new("req-token", "req-secret")),
		..Default::default()
	}
}

fn callback(pairs: &[(&str, &str)]) -> HashMap<String, String> {
	pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn partner_handshake_sets_thirty_minute_expiry() {
	let server = MockServer::start();
	let provider = build_test_provider(Mode::Partner, &server.base_url());
	let mock = server.mock(|when, then| {
		when.method(GET).path("/oauth/AccessToken").header_exists("authorization");
		then.status(200).body(
			"oauth_token=acc-token&oauth_token_secret=acc-secret&oauth_session_handle=handle-1&oauth_expires_in=1800",
		);
	});
	let mut session = pending_session(&server);
	let before = OffsetDateTime::now_utc();

	provider
		.complete_auth(
			&mut session,
			&callback(&[("oauth_token", "req-token"), ("oauth_verifier", "8675309")]),
		)
		.expect("Partner handshake should complete.");

	mock.assert();

	let access_token = session.access_token().expect("Access token should be stored.");
	let expires = session.access_token_expires.expect("Partner sessions expire.");

	assert_eq!(access_token.token, "acc-token");
	assert_eq!(access_token.secret.expose(), "acc-secret");
	assert_eq!(access_token.session_handle(), Some("handle-1"));
	assert!(session.request_token.is_none());
	assert!(expires >= before + Duration::minutes(30));
	assert!(expires <= OffsetDateTime::now_utc() + Duration::minutes(30));
}

#[test]
fn public_handshake_has_no_expiry() {
	let server = MockServer::start();
	let provider = build_test_provider(Mode::Public, &server.base_url());
	let mock = server.mock(|when, then| {
		when.method(GET).path("/oauth/AccessToken");
		then.status(200).body("oauth_token=acc-token&oauth_token_secret=acc-secret");
	});
	let mut session = pending_session(&server);

	provider
		.complete_auth(&mut session, &callback(&[("oauth_verifier", "v-1")]))
		.expect("Public handshake should complete.");

	mock.assert();

	assert!(session.is_authorized());
	assert_eq!(session.access_token_expires, None);
}

#[test]
fn callback_for_another_request_token_is_rejected() {
	let server = MockServer::start();
	let provider = build_test_provider(Mode::Public, &server.base_url());
	let mock = server.mock(|when, then| {
		when.method(GET).path("/oauth/AccessToken");
		then.status(200).body("oauth_token=acc-token&oauth_token_secret=acc-secret");
	});
	let mut session = pending_session(&server);
	let before = session.clone();
	let err = provider
		.complete_auth(
			&mut session,
			&callback(&[("oauth_token", "someone-else"), ("oauth_verifier", "v-1")]),
		)
		.expect_err("Mismatched callback tokens should be rejected.");

	assert!(matches!(err, Error::Authentication(AuthError::TokenMismatch)));
	assert_eq!(session, before);
	assert_eq!(mock.hits(), 0);
}

#[test]
fn missing_verifier_or_request_token_fails() {
	let server = MockServer::start();
	let provider = build_test_provider(Mode::Partner, &server.base_url());
	let mut session = pending_session(&server);
	let err = provider
		.complete_auth(&mut session, &callback(&[("oauth_token", "req-token")]))
		.expect_err("Callbacks without a verifier should fail.");

	assert!(matches!(
		err,
		Error::Authentication(AuthError::MissingCallbackParam { name: "oauth_verifier" })
	));

	let err = provider
		.complete_auth(&mut Session::default(), &callback(&[("oauth_verifier", "v-1")]))
		.expect_err("Sessions without a request token should fail.");

	assert!(matches!(err, Error::Authentication(AuthError::MissingRequestToken)));
}

#[test]
fn access_token_rejection_leaves_session_pending() {
	let server = MockServer::start();
	let provider = build_test_provider(Mode::Partner, &server.base_url());
	let mock = server.mock(|when, then| {
		when.method(GET).path("/oauth/AccessToken");
		then.status(401).body("oauth_problem=token_rejected");
	});
	let mut session = pending_session(&server);
	let before = session.clone();
	let err = provider
		.complete_auth(&mut session, &callback(&[("oauth_verifier", "v-1")]))
		.expect_err("Rejected exchanges should fail.");

	mock.assert();

	assert!(matches!(
		err,
		Error::Authentication(AuthError::TokenEndpoint { status: Some(401), .. })
	));
	assert_eq!(session, before);
}

#[test]
fn private_sessions_complete_without_requests() {
	let server = MockServer::start();
	let provider = build_test_provider(Mode::Private, &server.base_url());
	let mut session = Session::default();

	provider.complete_auth(&mut session, &HashMap::new()).expect("Private completion is local.");

	assert_eq!(session.access_token().expect("Access token should be set.").token, "consumer-key");
}

#[test]
fn oauth2_code_exchange_stores_bearer_and_refresh_tokens() {
	let server = MockServer::start();
	let provider = build_test_provider(Mode::OAuth2, &server.base_url());
	let mut session = provider.begin_auth("state-xyz").expect("OAuth2 begin auth should succeed.");
	let mock = server.mock(|when, then| {
		when.method(POST)
			.path("/connect/token")
			.header("content-type", "application/x-www-form-urlencoded");
		then.status(200).header("content-type", "application/json").body(
			"{\"access_token\":\"bearer-1\",\"refresh_token\":\"refresh-1\",\"token_type\":\"Bearer\",\"expires_in\":1800}",
		);
	});
	let before = OffsetDateTime::now_utc();

	provider
		.complete_auth(&mut session, &callback(&[("state", "state-xyz"), ("code", "code-1")]))
		.expect("OAuth2 code exchange should succeed.");

	mock.assert();

	let access_token = session.access_token().expect("Bearer token should be stored.");
	let expires = session.access_token_expires.expect("Bearer tokens expire.");

	assert_eq!(access_token.token, "bearer-1");
	assert!(access_token.secret.is_empty());
	assert_eq!(access_token.refresh_token(), Some("refresh-1"));
	assert!(session.request_token.is_none());
	assert!(expires >= before + Duration::minutes(30));
}

#[test]
fn oauth2_state_mismatch_is_rejected() {
	let server = MockServer::start();
	let provider = build_test_provider(Mode::OAuth2, &server.base_url());
	let mut session = provider.begin_auth("state-xyz").expect("OAuth2 begin auth should succeed.");
	let err = provider
		.complete_auth(&mut session, &callback(&[("state", "forged"), ("code", "code-1")]))
		.expect_err("Forged state should be rejected.");

	assert!(matches!(err, Error::Authentication(AuthError::StateMismatch)));
	assert!(!session.is_authorized());
}

#[test]
fn oauth2_token_errors_surface_provider_description() {
	let server = MockServer::start();
	let provider = build_test_provider(Mode::OAuth2, &server.base_url());
	let mut session = provider.begin_auth("state-xyz").expect("OAuth2 begin auth should succeed.");
	let mock = server.mock(|when, then| {
		when.method(POST).path("/connect/token");
		then.status(400)
			.header("content-type", "application/json")
			.body("{\"error\":\"invalid_grant\",\"error_description\":\"code already used\"}");
	});
	let err = provider
		.complete_auth(&mut session, &callback(&[("state", "state-xyz"), ("code", "stale")]))
		.expect_err("Invalid grants should fail.");

	mock.assert();

	match err {
		Error::Authentication(AuthError::TokenEndpoint { message, .. }) =>
			assert_eq!(message, "invalid_grant: code already used"),
		other => panic!("Unexpected error: {other:?}."),
	}
}
