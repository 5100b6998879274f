//! Observability helpers for session acquisition.
//!
//! - Every acquisition runs inside a `tracing` span named `oauth_session_bridge.acquire`
//!   with a `stage` field; path decisions and failures are logged as events on that span.
//! - Enable the `metrics` feature to increment the `oauth_session_bridge_acquire_total`
//!   counter for every resolved acquisition, labeled by `path` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Route an acquisition took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcquirePath {
	/// Live session served from the cache.
	Cached,
	/// Fresh session minted by a token exchange.
	Exchange,
	/// Username/password development login.
	DevFallback,
	/// No route was available.
	None,
}
impl AcquirePath {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AcquirePath::Cached => "cached",
			AcquirePath::Exchange => "exchange",
			AcquirePath::DevFallback => "dev_fallback",
			AcquirePath::None => "none",
		}
	}
}
impl Display for AcquirePath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcquireOutcome {
	/// A connection was produced.
	Success,
	/// An error was returned to the caller.
	Failure,
}
impl AcquireOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AcquireOutcome::Success => "success",
			AcquireOutcome::Failure => "failure",
		}
	}
}
impl Display for AcquireOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
