// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::AcquirePath;

/// Thread-safe counters for session acquisitions.
#[derive(Debug, Default)]
pub struct AcquireMetrics {
	attempts: AtomicU64,
	cache_hits: AtomicU64,
	exchanges: AtomicU64,
	fallbacks: AtomicU64,
	failures: AtomicU64,
}
impl AcquireMetrics {
	/// Returns the total number of acquisition attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of acquisitions served from the cache.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of token exchange calls issued.
	pub fn exchanges(&self) -> u64 {
		self.exchanges.load(Ordering::Relaxed)
	}

	/// Returns the number of development username/password logins.
	pub fn fallbacks(&self) -> u64 {
		self.fallbacks.load(Ordering::Relaxed)
	}

	/// Returns the number of acquisitions that ended in an error.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_exchange(&self) {
		self.exchanges.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self, path: AcquirePath) {
		match path {
			AcquirePath::Cached => self.cache_hits.fetch_add(1, Ordering::Relaxed),
			AcquirePath::DevFallback => self.fallbacks.fetch_add(1, Ordering::Relaxed),
			AcquirePath::Exchange | AcquirePath::None => 0,
		};
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
