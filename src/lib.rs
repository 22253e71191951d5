//! Signed-request core for the Xero accounting API: OAuth 1.0a public/private/partner
//! applications, OAuth 2.0 bearer tenants, persisted sessions, and blocking request dispatch.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod consumer;
pub mod dispatch;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod provider;
pub mod store;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::{Endpoints, Mode, ProviderConfig, ProviderConfigBuilder},
		http::ReqwestHttpClient,
		provider::Provider,
	};

	/// RSA private key used by private/partner fixtures (PKCS#1 PEM).
	pub const TEST_PRIVATE_KEY_PEM: &str = include_str!("../tests/fixtures/partner_pkcs1.pem");

	/// Points every endpoint of a configuration at a mock server base URL.
	pub fn mock_endpoints(base: &str) -> Endpoints {
		let base = base.trim_end_matches('/');
		let url = |path: &str| {
			Url::parse(&format!("{base}{path}")).expect("Failed to parse mock endpoint URL.")
		};

		Endpoints {
			request_token: url("/oauth/RequestToken"),
			authorize: url("/oauth/Authorize"),
			access_token: url("/oauth/AccessToken"),
			oauth2_authorize: url("/identity/connect/authorize"),
			oauth2_token: url("/connect/token"),
			api_base: url("/"),
		}
	}

	/// Starts a configuration builder for `mode` with fixture credentials and mock endpoints.
	pub fn test_config_builder(mode: Mode, base: &str) -> ProviderConfigBuilder {
		let mut builder = ProviderConfig::builder("consumer-key", "consumer-secret")
			.mode(mode)
			.endpoints(mock_endpoints(base))
			.user_agent("xero-broker-tests");

		if matches!(mode, Mode::Public | Mode::Partner | Mode::OAuth2) {
			builder = builder.callback_url(
				Url::parse("https://app.example.com/callback")
					.expect("Failed to parse callback URL fixture."),
			);
		}
		if matches!(mode, Mode::Private | Mode::Partner) {
			builder = builder.private_key_pem(TEST_PRIVATE_KEY_PEM);
		}
		if matches!(mode, Mode::OAuth2) {
			builder = builder.tenant_id("tenant-fixture").scopes(["offline_access", "accounting.transactions"]);
		}

		builder
	}

	/// Builds a reqwest-backed [`Provider`] for `mode` against a mock server base URL.
	pub fn build_test_provider(mode: Mode, base: &str) -> Provider<ReqwestHttpClient> {
		let config = test_config_builder(mode, base)
			.build()
			.expect("Test provider configuration should be valid.");

		Provider::with_http_client(config, ReqwestHttpClient::default())
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Error as ReqwestError, blocking::Client as ReqwestClient};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
