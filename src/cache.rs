//! Time-bounded session cache contracts and the in-memory backend.
//!
//! A cache entry is the whole session triple (auth endpoint, service endpoint, session id)
//! stored as one value, so readers observe either a complete session or nothing. Writes
//! carry a TTL and may request "only if absent" semantics, in which case a live entry wins
//! and is handed back to the caller instead of being replaced.

pub mod memory;
pub mod session;

pub use memory::MemorySessionCache;
pub use session::*;

// self
use crate::{_prelude::*, auth::SessionKey};

/// Boxed future returned by [`SessionCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Session cache contract.
pub trait SessionCache
where
	Self: Send + Sync,
{
	/// Returns the live session stored under `key`; expired entries read as absent.
	fn get<'a>(&'a self, key: &'a SessionKey) -> CacheFuture<'a, Option<CachedSession>>;

	/// Writes `endpoints` under `key` according to `options`.
	fn put<'a>(
		&'a self,
		key: &'a SessionKey,
		endpoints: SessionEndpoints,
		options: PutOptions,
	) -> CacheFuture<'a, PutOutcome>;
}

/// Write options accepted by [`SessionCache::put`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PutOptions {
	/// Time-to-live applied from the moment of the write.
	pub ttl: Duration,
	/// Keeps an existing live entry instead of overwriting it.
	pub only_if_absent: bool,
}
impl PutOptions {
	/// Unconditional write with the provided TTL.
	pub fn new(ttl: Duration) -> Self {
		Self { ttl, only_if_absent: false }
	}

	/// Write that yields to an existing live entry.
	pub fn add_only_if_absent(ttl: Duration) -> Self {
		Self { ttl, only_if_absent: true }
	}
}

/// Result of a [`SessionCache::put`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PutOutcome {
	/// The new session was written.
	Stored(CachedSession),
	/// A live session already existed and was left untouched.
	Kept(CachedSession),
}
impl PutOutcome {
	/// Returns the session that is live in the cache after the write.
	pub fn into_session(self) -> CachedSession {
		match self {
			Self::Stored(session) | Self::Kept(session) => session,
		}
	}

	/// Returns `true` when the write took effect.
	pub fn is_stored(&self) -> bool {
		matches!(self, Self::Stored(_))
	}
}

/// Error type produced by [`SessionCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// The write carried a zero or negative TTL, or one whose expiry overflows.
	#[error("Cache TTL must be positive and representable.")]
	InvalidTtl,
	/// Backend-level failure for the cache engine.
	#[error("Cache backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
