//! OAuth 1.0a request signing (RFC 5849) with HMAC-SHA1 and RSA-SHA1.
//!
//! The signature base string is `METHOD&enc(base-url)&enc(params)`, where the parameter
//! string holds every `oauth_*` protocol parameter plus the URL's query pairs, each
//! percent-encoded with the RFC 3986 unreserved set and sorted by name then value.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
const OAUTH_VERSION: &str = "1.0";

/// Inputs that fully determine one request signature.
#[derive(Clone, Copy, Debug)]
pub struct SignatureRequest<'a> {
	/// HTTP method.
	pub method: &'a str,
	/// Absolute request URL, including any query string.
	pub url: &'a Url,
	/// Consumer key.
	pub consumer_key: &'a str,
	/// Request or access token; `None` before a request token exists.
	pub token: Option<(&'a str, &'a TokenSecret)>,
	/// Additional `oauth_*` protocol parameters (`oauth_callback`, `oauth_verifier`, ...).
	pub protocol_params: &'a [(&'a str, &'a str)],
	/// Seconds since the Unix epoch.
	pub timestamp: i64,
	/// Single-use nonce.
	pub nonce: &'a str,
}

/// Signature algorithm bound to the consumer's credential material.
pub enum Signer {
	/// HMAC-SHA1 keyed by the consumer secret and token secret (public apps).
	HmacSha1 {
		/// Consumer secret.
		consumer_secret: TokenSecret,
	},
	/// RSA-SHA1 with the application's private key (private and partner apps).
	RsaSha1 {
		/// Decoded private key.
		key: Box<RsaPrivateKey>,
	},
}
impl Signer {
	/// `oauth_signature_method` value.
	pub fn method(&self) -> &'static str {
		match self {
			Signer::HmacSha1 { .. } => "HMAC-SHA1",
			Signer::RsaSha1 { .. } => "RSA-SHA1",
		}
	}

	/// Builds the `Authorization: OAuth ...` header value for the request.
	pub fn authorization_header(&self, request: &SignatureRequest<'_>) -> Result<String> {
		let mut oauth = self.protocol_params(request);
		let base = signature_base_string(request.method, request.url, &oauth);
		let token_secret = request.token.map(|(_, secret)| secret.expose()).unwrap_or_default();
		let signature = self.sign(&base, token_secret)?;

		oauth.push(("oauth_signature".into(), signature));
		oauth.sort();

		let fields = oauth
			.iter()
			.map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
			.collect::<Vec<_>>()
			.join(", ");

		Ok(format!("OAuth {fields}"))
	}

	/// Signs a prepared base string and returns the base64 signature.
	pub fn sign(&self, base: &str, token_secret: &str) -> Result<String> {
		let raw = match self {
			Signer::HmacSha1 { consumer_secret } => {
				let key = format!("{}&{}", encode(consumer_secret.expose()), encode(token_secret));
				let mut mac = HmacSha1::new_from_slice(key.as_bytes())
					.map_err(|e| ConfigError::Signing { reason: e.to_string() })?;

				mac.update(base.as_bytes());

				mac.finalize().into_bytes().to_vec()
			},
			Signer::RsaSha1 { key } => {
				let digest = Sha1::digest(base.as_bytes());

				key.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)
					.map_err(|e| ConfigError::Signing { reason: e.to_string() })?
			},
		};

		Ok(STANDARD.encode(raw))
	}

	fn protocol_params(&self, request: &SignatureRequest<'_>) -> Vec<(String, String)> {
		let mut params = vec![
			("oauth_consumer_key".to_owned(), request.consumer_key.to_owned()),
			("oauth_nonce".to_owned(), request.nonce.to_owned()),
			("oauth_signature_method".to_owned(), self.method().to_owned()),
			("oauth_timestamp".to_owned(), request.timestamp.to_string()),
			("oauth_version".to_owned(), OAUTH_VERSION.to_owned()),
		];

		if let Some((token, _)) = request.token.filter(|(token, _)| !token.is_empty()) {
			params.push(("oauth_token".to_owned(), token.to_owned()));
		}

		params.extend(
			request.protocol_params.iter().map(|(key, value)| ((*key).to_owned(), (*value).to_owned())),
		);

		params
	}
}
impl Debug for Signer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Signer").field(&self.method()).finish()
	}
}

/// Builds the RFC 5849 signature base string from the protocol parameters and the URL.
pub fn signature_base_string(method: &str, url: &Url, oauth: &[(String, String)]) -> String {
	let mut params = oauth
		.iter()
		.map(|(key, value)| (encode(key), encode(value)))
		.chain(url.query_pairs().map(|(key, value)| (encode(&key), encode(&value))))
		.collect::<Vec<_>>();

	params.sort();

	let normalized =
		params.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("&");

	format!(
		"{}&{}&{}",
		method.to_ascii_uppercase(),
		encode(&base_url(url)),
		encode(&normalized)
	)
}

/// Percent-encodes with the RFC 3986 unreserved set.
pub fn encode(value: &str) -> String {
	utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

fn base_url(url: &Url) -> String {
	let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

	match url.port() {
		Some(port) => format!("{}://{host}:{port}{}", url.scheme(), url.path()),
		None => format!("{}://{host}{}", url.scheme(), url.path()),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use rsa::RsaPublicKey;
	// self
	use super::*;
	use crate::consumer::key;

	const PHOTOS_URL: &str = "http://photos.example.net/photos?file=vacation.jpg&size=original";

	fn hmac_signer() -> Signer {
		Signer::HmacSha1 { consumer_secret: TokenSecret::new("kd94hf93k423kf44") }
	}

	fn rsa_signer() -> Signer {
		let key = key::decode_private_key(include_str!("../../tests/fixtures/partner_pkcs1.pem"))
			.expect("Fixture key should decode.");

		Signer::RsaSha1 { key: Box::new(key) }
	}

	fn photos_request<'a>(url: &'a Url, secret: &'a TokenSecret) -> SignatureRequest<'a> {
		SignatureRequest {
			method: "GET",
			url,
			consumer_key: "dpf43f3p2l4k3l03",
			token: Some(("nnch734d00sl2jdk", secret)),
			protocol_params: &[],
			timestamp: 1_191_242_096,
			nonce: "kllo9940pd9333jh",
		}
	}

	#[test]
	fn hmac_matches_published_photos_example() {
		let url = Url::parse(PHOTOS_URL).expect("Photos URL should parse.");
		let secret = TokenSecret::new("pfkkdhi9sl3r4s00");
		let header = hmac_signer()
			.authorization_header(&photos_request(&url, &secret))
			.expect("HMAC signing should succeed.");

		assert!(header.starts_with("OAuth oauth_consumer_key=\"dpf43f3p2l4k3l03\", "));
		assert!(header.contains("oauth_signature=\"tR3%2BTy81lMeYAr%2FFid0kMTYa%2FWM%3D\""));
		assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
		assert!(header.contains("oauth_token=\"nnch734d00sl2jdk\""));
		assert!(header.contains("oauth_version=\"1.0\""));
	}

	#[test]
	fn base_string_sorts_and_encodes_query_pairs() {
		let url = Url::parse(PHOTOS_URL).expect("Photos URL should parse.");
		let oauth = vec![
			("oauth_consumer_key".to_owned(), "dpf43f3p2l4k3l03".to_owned()),
			("oauth_token".to_owned(), "nnch734d00sl2jdk".to_owned()),
			("oauth_signature_method".to_owned(), "HMAC-SHA1".to_owned()),
			("oauth_timestamp".to_owned(), "1191242096".to_owned()),
			("oauth_nonce".to_owned(), "kllo9940pd9333jh".to_owned()),
			("oauth_version".to_owned(), "1.0".to_owned()),
		];

		assert_eq!(
			signature_base_string("get", &url, &oauth),
			"GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal",
		);
	}

	#[test]
	fn base_url_keeps_non_default_ports_only() {
		let default_port = Url::parse("HTTPS://API.Example.com:443/api.xro/2.0/Invoices?page=2")
			.expect("URL fixture should parse.");
		let custom_port =
			Url::parse("http://127.0.0.1:8080/Invoices").expect("URL fixture should parse.");

		assert_eq!(base_url(&default_port), "https://api.example.com/api.xro/2.0/Invoices");
		assert_eq!(base_url(&custom_port), "http://127.0.0.1:8080/Invoices");
	}

	#[test]
	fn encoding_keeps_only_unreserved_characters() {
		assert_eq!(encode("a b+c/d~e-f.g_h*"), "a%20b%2Bc%2Fd~e-f.g_h%2A");
		assert_eq!(encode("ü"), "%C3%BC");
	}

	#[test]
	fn identical_inputs_sign_identically_and_any_change_alters_signature() {
		let url = Url::parse(PHOTOS_URL).expect("Photos URL should parse.");
		let secret = TokenSecret::new("pfkkdhi9sl3r4s00");
		let other_secret = TokenSecret::new("another-secret");
		let other_url = Url::parse("http://photos.example.net/photos?file=vacation.jpg&size=small")
			.expect("URL fixture should parse.");

		for signer in [hmac_signer(), rsa_signer()] {
			let base = photos_request(&url, &secret);
			let first = signer.authorization_header(&base).expect("Signing should succeed.");
			let second = signer.authorization_header(&base).expect("Signing should succeed.");

			assert_eq!(first, second);

			let variants = [
				SignatureRequest { method: "POST", ..base },
				SignatureRequest { url: &other_url, ..base },
				SignatureRequest { timestamp: base.timestamp + 1, ..base },
				SignatureRequest { nonce: "another-nonce", ..base },
				SignatureRequest { protocol_params: &[("oauth_verifier", "1234")], ..base },
			];

			for variant in variants {
				let header = signer.authorization_header(&variant).expect("Signing should succeed.");

				assert_ne!(signature_of(&header), signature_of(&first));
			}

			if matches!(signer, Signer::HmacSha1 { .. }) {
				let header = signer
					.authorization_header(&SignatureRequest {
						token: Some(("nnch734d00sl2jdk", &other_secret)),
						..base
					})
					.expect("Signing should succeed.");

				assert_ne!(signature_of(&header), signature_of(&first));
			}
		}
	}

	#[test]
	fn rsa_signature_verifies_with_public_key() {
		let signer = rsa_signer();
		let base = "GET&https%3A%2F%2Fapi.example.com%2Fapi.xro%2F2.0%2FContacts&oauth_version%3D1.0";
		let signature = signer.sign(base, "ignored").expect("RSA signing should succeed.");
		let Signer::RsaSha1 { key } = &signer else { unreachable!() };
		let public = RsaPublicKey::from(key.as_ref());
		let raw = STANDARD.decode(signature).expect("Signature should be base64.");

		public
			.verify(Pkcs1v15Sign::new::<Sha1>(), &Sha1::digest(base.as_bytes()), &raw)
			.expect("Signature should verify with the public key.");
		assert_eq!(signer.method(), "RSA-SHA1");
	}

	fn signature_of(header: &str) -> &str {
		header
			.split(", ")
			.find_map(|field| field.strip_prefix("oauth_signature=\""))
			.expect("Header should carry a signature.")
	}
}
