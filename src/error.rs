//! Bridge-level error types shared across acquisition, exchanges, caches, and stores.

// self
use crate::_prelude::*;

/// Bridge-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical bridge error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credentials store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Session cache failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token exchange endpoint answered with a non-success response.
	///
	/// `401` and `403` mean the stored grant was rejected; other statuses are worth retrying.
	#[error(transparent)]
	Exchange(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token exchange succeeded at the HTTP level but the payload could not be understood.
	#[error(transparent)]
	Parse(#[from] crate::exchange::ParseError),

	/// Remote connection could not be constructed from the session configuration.
	#[error("Remote connection could not be established: {reason}.")]
	Connection {
		/// Connector-supplied reason string.
		reason: String,
	},
	/// No cached session, no stored grant, and no development fallback.
	#[error("No stored OAuth credentials; the application must be authorized first.")]
	Unauthorized,
}
impl Error {
	/// Classifies the failure into the action a caller should take next.
	pub fn disposition(&self) -> Disposition {
		match self {
			Self::Exchange(TransientError::ExchangeEndpoint {
				status: Some(401 | 403), ..
			}) => Disposition::Reauthorize,
			Self::Storage(_)
			| Self::Cache(_)
			| Self::Exchange(_)
			| Self::Transport(_)
			| Self::Connection { .. } => Disposition::Retry,
			Self::Unauthorized => Disposition::Reauthorize,
			Self::Config(_) | Self::Parse(_) => Disposition::Fatal,
		}
	}

	/// Returns the upstream Retry-After hint, when the exchange endpoint supplied one.
	pub fn retry_after(&self) -> Option<Duration> {
		match self {
			Self::Exchange(TransientError::ExchangeEndpoint { retry_after, .. }) => *retry_after,
			_ => None,
		}
	}
}

/// Caller-facing classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Disposition {
	/// Temporary failure; try again later.
	Retry,
	/// The stored grant is missing or was rejected; send the user through authorization again.
	Reauthorize,
	/// Protocol mismatch or misconfiguration; retrying will not help.
	Fatal,
}

/// Configuration and validation failures raised by the bridge.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Settings failed validation.
	#[error(transparent)]
	Settings(#[from] crate::settings::SettingsError),
	/// Settings document could not be parsed.
	#[error("Settings document is malformed.")]
	SettingsParse {
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Exchange endpoint returned a non-success response.
	#[error("Token exchange endpoint returned an unexpected response: {message}.")]
	ExchangeEndpoint {
		/// Upstream- or bridge-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token exchange endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token exchange endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{cache::CacheError, exchange::ParseError, store::StoreError};

	#[test]
	fn dispositions_separate_retry_reauthorize_and_fatal() {
		let retry: Error = CacheError::Backend { message: "memcache down".into() }.into();
		let storage: Error = StoreError::Backend { message: "disk full".into() }.into();
		let parse: Error = ParseError::NotXml.into();

		assert_eq!(retry.disposition(), Disposition::Retry);
		assert_eq!(storage.disposition(), Disposition::Retry);
		assert_eq!(Error::Unauthorized.disposition(), Disposition::Reauthorize);
		assert_eq!(parse.disposition(), Disposition::Fatal);
	}

	#[test]
	fn rejected_grants_require_reauthorization() {
		let rejected = |status| -> Error {
			TransientError::ExchangeEndpoint {
				message: "token rejected".into(),
				status: Some(status),
				retry_after: None,
			}
			.into()
		};

		assert_eq!(rejected(401).disposition(), Disposition::Reauthorize);
		assert_eq!(rejected(403).disposition(), Disposition::Reauthorize);
		assert_eq!(rejected(500).disposition(), Disposition::Retry);
		assert_eq!(rejected(429).disposition(), Disposition::Retry);
	}

	#[test]
	fn retry_after_is_exposed_for_exchange_failures() {
		let err: Error = TransientError::ExchangeEndpoint {
			message: "throttled".into(),
			status: Some(429),
			retry_after: Some(Duration::seconds(12)),
		}
		.into();

		assert_eq!(err.retry_after(), Some(Duration::seconds(12)));
		assert_eq!(Error::Unauthorized.retry_after(), None);
	}

	#[test]
	fn cache_error_converts_into_bridge_error_with_source() {
		let cache_error = CacheError::Backend { message: "cache region missing".into() };
		let bridge_error: Error = cache_error.clone().into();

		assert!(matches!(bridge_error, Error::Cache(_)));
		assert!(bridge_error.to_string().contains("cache region missing"));

		let source = StdError::source(&bridge_error)
			.expect("Bridge error should expose the original cache error as its source.");

		assert_eq!(source.to_string(), cache_error.to_string());
	}
}
