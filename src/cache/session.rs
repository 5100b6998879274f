//! Cached session model.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Session triple produced by a successful token exchange, before it is cached.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEndpoints {
	/// SOAP login endpoint the session is bound to.
	#[serde(rename = "authEndPoint")]
	pub auth_endpoint: Url,
	/// Partner API endpoint that serves calls for this session.
	#[serde(rename = "serviceEndPoint")]
	pub service_endpoint: Url,
	/// Remote session identifier; callers must avoid logging it.
	#[serde(rename = "sessionId")]
	pub session_id: TokenSecret,
}
impl SessionEndpoints {
	/// Bundles the three session fields.
	pub fn new(auth_endpoint: Url, service_endpoint: Url, session_id: impl Into<String>) -> Self {
		Self { auth_endpoint, service_endpoint, session_id: TokenSecret::new(session_id) }
	}
}
impl Debug for SessionEndpoints {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionEndpoints")
			.field("auth_endpoint", &self.auth_endpoint.as_str())
			.field("service_endpoint", &self.service_endpoint.as_str())
			.field("session_id", &"<redacted>")
			.finish()
	}
}

/// Immutable cache entry describing a live remote session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSession {
	/// Endpoints and identifier of the session.
	#[serde(flatten)]
	pub endpoints: SessionEndpoints,
	/// Instant the entry was written.
	pub cached_at: OffsetDateTime,
	/// Instant after which the entry reads as absent.
	pub expires_at: OffsetDateTime,
}
impl CachedSession {
	/// Builds an entry written at `now` that lives for `ttl`.
	///
	/// Returns `None` when the expiry instant is not representable.
	pub fn new(endpoints: SessionEndpoints, now: OffsetDateTime, ttl: Duration) -> Option<Self> {
		let expires_at = now.checked_add(ttl)?;

		Some(Self { endpoints, cached_at: now, expires_at })
	}

	/// Returns `true` while the entry has not reached its expiry instant.
	pub fn is_live_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Convenience helper that checks liveness against the current UTC instant.
	pub fn is_live(&self) -> bool {
		self.is_live_at(OffsetDateTime::now_utc())
	}

	/// Time left before expiry at the provided instant, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}

	/// Configured lifetime of the entry.
	pub fn ttl(&self) -> Duration {
		self.expires_at - self.cached_at
	}
}
