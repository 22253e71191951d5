//! Handshake and refresh flows implemented on [`Provider`](crate::provider::Provider).
//!
//! Private applications skip the redirect entirely: [`begin_auth`](crate::provider::Provider::begin_auth)
//! returns a session already signed with the consumer credentials. Public and partner
//! applications walk `unauthenticated -> request token issued -> access token issued`, and
//! partner sessions then cycle through [`refresh_access`](crate::provider::Provider::refresh_access)
//! every half hour. OAuth 2.0 mirrors the same two legs with a PKCE code exchange.

pub mod begin;
pub mod complete;
pub mod refresh;

pub use refresh::*;

// self
use crate::{_prelude::*, config::Mode};

/// Lifetime given to the pseudo access token of a private application.
pub const PRIVATE_TOKEN_LIFETIME: Duration = Duration::hours(87_600);
/// Lifetime of a partner access token, at issue and after every refresh.
pub const PARTNER_TOKEN_LIFETIME: Duration = Duration::minutes(30);
/// Sessions expiring within this window are refreshed before use.
pub const REFRESH_WINDOW: Duration = Duration::minutes(5);

/// Access-token expiry for a freshly issued OAuth 1.0a token.
pub(crate) fn oauth1_expiry(mode: Mode, now: OffsetDateTime) -> Option<OffsetDateTime> {
	match mode {
		Mode::Private => Some(now + PRIVATE_TOKEN_LIFETIME),
		Mode::Partner => Some(now + PARTNER_TOKEN_LIFETIME),
		Mode::Public | Mode::OAuth2 => None,
	}
}
