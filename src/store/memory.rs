//! Thread-safe in-memory [`CredentialsStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::{AccessCredentials, CredentialKey},
	store::{CredentialsStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<CredentialKey, AccessCredentials>>>;

/// Process-lifetime credential storage; records vanish on restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the number of stored credential records.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no credentials are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn save_now(
		map: StoreMap,
		key: CredentialKey,
		credentials: AccessCredentials,
	) -> Result<(), StoreError> {
		map.write().insert(key, credentials);

		Ok(())
	}

	fn fetch_now(map: StoreMap, key: CredentialKey) -> Option<AccessCredentials> {
		map.read().get(&key).cloned()
	}
}
impl CredentialsStore for MemoryStore {
	fn fetch<'a>(&'a self, key: &'a CredentialKey) -> StoreFuture<'a, Option<AccessCredentials>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::fetch_now(map, key)) })
	}

	fn save<'a>(
		&'a self,
		key: &'a CredentialKey,
		credentials: AccessCredentials,
	) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Self::save_now(map, key, credentials) })
	}
}
