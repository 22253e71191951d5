//! Typed persisted-session contract and built-in store implementations.
//!
//! Stores keep sessions in their opaque serialized form ([`Session::marshal`]); the typed
//! boundary lets callers and flows exchange [`Session`] values without manual casts.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::Session};

/// Storage backend contract for caller-owned sessions, keyed per end user.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Loads the session stored under `key`, failing with [`StoreError::NotFound`] if absent.
	fn load(&self, key: &str) -> Result<Session, StoreError>;

	/// Persists or replaces the session stored under `key`.
	fn save(&self, key: &str, session: &Session) -> Result<(), StoreError>;

	/// Deletes the session stored under `key`; absent keys are not an error.
	fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// No session is stored under the key.
	#[error("No session stored under `{key}`.")]
	NotFound {
		/// Requested key.
		key: String,
	},
	/// Stored payload could not be (de)serialized.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let err: Error = store_error.clone().into();

		assert!(matches!(err, Error::SessionStore(_)));
		assert!(err.to_string().contains("database unreachable"));

		let source = StdError::source(&err)
			.expect("Crate error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
