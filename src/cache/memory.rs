//! Thread-safe in-memory [`SessionCache`] with lazy expiry.

// self
use crate::{
	_prelude::*,
	auth::SessionKey,
	cache::{
		CacheError, CacheFuture, CachedSession, PutOptions, PutOutcome, SessionCache,
		SessionEndpoints,
	},
};

type CacheMap = Arc<RwLock<HashMap<SessionKey, CachedSession>>>;

/// Process-local session cache; entries expire after their TTL and are purged lazily.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionCache(CacheMap);
impl MemorySessionCache {
	/// Reads the entry for `key` as observed at `now`.
	pub fn get_at(&self, key: &SessionKey, now: OffsetDateTime) -> Option<CachedSession> {
		{
			let guard = self.0.read();

			match guard.get(key) {
				Some(session) if session.is_live_at(now) => return Some(session.clone()),
				Some(_) => {},
				None => return None,
			}
		}

		let mut guard = self.0.write();

		if guard.get(key).is_some_and(|session| !session.is_live_at(now)) {
			guard.remove(key);
		}

		None
	}

	/// Writes `endpoints` for `key` as if the write happened at `now`.
	pub fn put_at(
		&self,
		key: &SessionKey,
		endpoints: SessionEndpoints,
		options: PutOptions,
		now: OffsetDateTime,
	) -> Result<PutOutcome, CacheError> {
		if !options.ttl.is_positive() {
			return Err(CacheError::InvalidTtl);
		}

		let session =
			CachedSession::new(endpoints, now, options.ttl).ok_or(CacheError::InvalidTtl)?;
		let mut guard = self.0.write();

		if options.only_if_absent {
			if let Some(existing) = guard.get(key).filter(|session| session.is_live_at(now)) {
				return Ok(PutOutcome::Kept(existing.clone()));
			}
		}

		guard.insert(key.to_owned(), session.clone());

		Ok(PutOutcome::Stored(session))
	}

	/// Drops every entry that has expired at `now`, returning how many were removed.
	pub fn purge_expired(&self, now: OffsetDateTime) -> usize {
		let mut guard = self.0.write();
		let before = guard.len();

		guard.retain(|_, session| session.is_live_at(now));

		before - guard.len()
	}

	/// Number of entries currently held, expired or not.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when the cache holds no entries.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl SessionCache for MemorySessionCache {
	fn get<'a>(&'a self, key: &'a SessionKey) -> CacheFuture<'a, Option<CachedSession>> {
		Box::pin(async move { Ok(self.get_at(key, OffsetDateTime::now_utc())) })
	}

	fn put<'a>(
		&'a self,
		key: &'a SessionKey,
		endpoints: SessionEndpoints,
		options: PutOptions,
	) -> CacheFuture<'a, PutOutcome> {
		Box::pin(async move { self.put_at(key, endpoints, options, OffsetDateTime::now_utc()) })
	}
}
