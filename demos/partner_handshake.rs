//! Interactive partner (or public) handshake persisted in a file-backed session store.
//!
//! The demo prints the authorize URL, waits for the `oauth_verifier` shown by the remote
//! service, completes the exchange, and then reloads the session through
//! [`Provider::get_session_from_store`] so partner tokens close to expiry are renewed.

// std
use std::{
	collections::HashMap,
	env,
	io::{self, Write},
};
// crates.io
use color_eyre::Result;
// self
use xero_broker::{
	config::ProviderConfig,
	dispatch::Headers,
	provider::Provider,
	store::{FileStore, SessionStore},
};

const SESSION_KEY: &str = "demo-user";

fn main() -> Result<()> {
	color_eyre::install()?;

	let provider = Provider::new(ProviderConfig::from_env()?);
	let store = FileStore::open(env::temp_dir().join("xero_broker_demo_sessions.json"))?;
	let mut session = provider.begin_auth("")?;

	store.save(SESSION_KEY, &session)?;

	println!("Authorize URL: {}", session.auth_url()?);

	let verifier = prompt("Paste the oauth_verifier shown after authorizing")?;
	let params = HashMap::from([("oauth_verifier".to_owned(), verifier)]);

	provider.complete_auth(&mut session, &params)?;
	store.save(SESSION_KEY, &session)?;

	println!("Access token expires: {:?}.", session.access_token_expires);

	let session = provider.get_session_from_store(&store, SESSION_KEY)?;
	let headers = Headers::from([("Accept".to_owned(), "application/json".to_owned())]);
	let organisation = provider.find(&session, "Organisation", &headers, None)?;

	println!("Organisation: {}", String::from_utf8_lossy(&organisation));

	Ok(())
}

fn prompt(label: &str) -> Result<String> {
	print!("{label}: ");
	io::stdout().flush()?;

	let mut buffer = String::new();

	io::stdin().read_line(&mut buffer)?;

	Ok(buffer.trim().to_owned())
}
