//! RSA private key decoding for RSA-SHA1 signing modes.

// crates.io
use rsa::{RsaPrivateKey, pkcs1::DecodeRsaPrivateKey, pkcs8::DecodePrivateKey};
// self
use crate::error::ConfigError;

/// Decodes a PEM RSA private key, accepting PKCS#1 (`RSA PRIVATE KEY`) and PKCS#8
/// (`PRIVATE KEY`) encodings.
pub fn decode_private_key(pem: &str) -> Result<RsaPrivateKey, ConfigError> {
	let pem = pem.trim();

	RsaPrivateKey::from_pkcs1_pem(pem).or_else(|pkcs1| {
		RsaPrivateKey::from_pkcs8_pem(pem).map_err(|pkcs8| ConfigError::InvalidPrivateKey {
			reason: format!("not PKCS#1 ({pkcs1}) nor PKCS#8 ({pkcs8})"),
		})
	})
}
