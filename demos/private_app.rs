//! Private application walkthrough: no redirect, the consumer credentials sign every call.
//!
//! Reads `XERO_KEY`, `XERO_SECRET`, and `XERO_PRIVATE_KEY_PATH` (plus an optional
//! `XERO_USER_AGENT`) with `XERO_METHOD=private`, then lists the organisation and the first
//! page of contacts.

// std
use std::collections::BTreeMap;
// crates.io
use color_eyre::Result;
// self
use xero_broker::{
	config::{Mode, ProviderConfig},
	dispatch::Headers,
	provider::Provider,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ProviderConfig::from_env()?;

	if config.mode != Mode::Private {
		color_eyre::eyre::bail!("Set XERO_METHOD=private to run this demo.");
	}

	let provider = Provider::new(config);

	// Decode the private key up front instead of on the first request.
	provider.consumer()?;

	let session = provider.begin_auth("")?;
	let headers = Headers::from([("Accept".to_owned(), "application/json".to_owned())]);
	let organisation = provider.find(&session, "Organisation", &headers, None)?;

	println!("Organisation: {}", String::from_utf8_lossy(&organisation));

	let query = BTreeMap::from([("page".to_owned(), "1".to_owned())]);
	let contacts = provider.find(&session, "Contacts", &headers, Some(&query))?;

	println!("Contacts (page 1): {} bytes.", contacts.len());

	Ok(())
}
