//! Thread-safe in-memory [`SessionStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::Session,
	store::{SessionStore, StoreError},
};

type StoreMap = Arc<RwLock<HashMap<String, String>>>;

/// Keeps serialized sessions in-process; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the raw serialized payload stored under `key`.
	pub fn raw(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	/// Stores a raw payload as-is, bypassing serialization.
	pub fn insert_raw(&self, key: impl Into<String>, payload: impl Into<String>) {
		self.0.write().insert(key.into(), payload.into());
	}

	/// Number of stored sessions.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Whether the store is empty.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl SessionStore for MemoryStore {
	fn load(&self, key: &str) -> Result<Session, StoreError> {
		let payload = self.raw(key).ok_or_else(|| StoreError::NotFound { key: key.to_owned() })?;

		Session::unmarshal(&payload)
	}

	fn save(&self, key: &str, session: &Session) -> Result<(), StoreError> {
		let payload = session.marshal()?;

		self.0.write().insert(key.to_owned(), payload);

		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.0.write().remove(key);

		Ok(())
	}
}
