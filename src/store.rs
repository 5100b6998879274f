//! Credential storage contracts and built-in store implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AccessCredentials, CredentialKey},
};

/// Boxed future returned by [`CredentialsStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for long-lived access credentials.
///
/// A store holds at most one record per [`CredentialKey`]; saving replaces the previous
/// record wholesale.
pub trait CredentialsStore
where
	Self: Send + Sync,
{
	/// Fetches the credentials stored under `key`, if present.
	fn fetch<'a>(&'a self, key: &'a CredentialKey) -> StoreFuture<'a, Option<AccessCredentials>>;

	/// Persists `credentials` under `key`, overwriting any previous record.
	fn save<'a>(
		&'a self,
		key: &'a CredentialKey,
		credentials: AccessCredentials,
	) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`CredentialsStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
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
	// self
	use super::*;
	use std::error::Error as StdError;

	#[test]
	fn store_error_converts_into_bridge_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let bridge_error: Error = store_error.clone().into();

		assert!(matches!(bridge_error, Error::Storage(_)));
		assert!(bridge_error.to_string().contains("database unreachable"));

		let source = StdError::source(&bridge_error)
			.expect("Bridge error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
