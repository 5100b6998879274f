//! Remote connection configuration and the connector seam.
//!
//! The bridge never speaks the remote API itself. It hands a [`ConnectionConfig`] to a
//! [`Connector`], which owns the partner-API client and returns whatever connection handle
//! that client exposes.

// self
use crate::{_prelude::*, auth::TokenSecret, cache::CachedSession};

/// Boxed future returned by [`Connector::connect`].
pub type ConnectFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Builds remote connection handles from session configurations.
pub trait Connector
where
	Self: 'static + Send + Sync,
{
	/// Connection handle produced by the underlying client.
	type Connection: Send;

	/// Establishes a connection; failures should surface as [`Error::Connection`].
	fn connect(&self, config: ConnectionConfig) -> ConnectFuture<'_, Self::Connection>;
}

/// How the connection authenticates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionAuth {
	/// Reuse an existing session.
	Session(TokenSecret),
	/// Log in directly with username/password (development fallback only).
	Password {
		/// Login username.
		username: String,
		/// Login password.
		password: TokenSecret,
	},
}

/// Everything a partner-API client needs to open a connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionConfig {
	/// SOAP authentication endpoint.
	pub auth_endpoint: Url,
	/// Service endpoint; absent when the login call is expected to discover it.
	pub service_endpoint: Option<Url>,
	/// Authentication material.
	pub auth: ConnectionAuth,
	/// Idle timeout, when one is imposed.
	pub connection_timeout: Option<Duration>,
	/// Whether responses are validated against the remote schema.
	pub validate_schema: bool,
}
impl ConnectionConfig {
	/// Configuration that reuses a cached session.
	pub fn from_session(session: &CachedSession, connection_timeout: Duration) -> Self {
		Self {
			auth_endpoint: session.endpoints.auth_endpoint.clone(),
			service_endpoint: Some(session.endpoints.service_endpoint.clone()),
			auth: ConnectionAuth::Session(session.endpoints.session_id.clone()),
			connection_timeout: Some(connection_timeout),
			validate_schema: true,
		}
	}

	/// Configuration that logs in with username/password against `auth_endpoint`.
	pub fn with_password(
		auth_endpoint: Url,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			auth_endpoint,
			service_endpoint: None,
			auth: ConnectionAuth::Password {
				username: username.into(),
				password: TokenSecret::new(password),
			},
			connection_timeout: None,
			validate_schema: true,
		}
	}

	/// Session identifier, when the configuration reuses a session.
	pub fn session_id(&self) -> Option<&TokenSecret> {
		match &self.auth {
			ConnectionAuth::Session(id) => Some(id),
			ConnectionAuth::Password { .. } => None,
		}
	}
}

/// Connector that validates the configuration and returns it as the connection.
///
/// Useful when the caller drives its own client, and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigConnector;
impl Connector for ConfigConnector {
	type Connection = ConnectionConfig;

	fn connect(&self, config: ConnectionConfig) -> ConnectFuture<'_, Self::Connection> {
		Box::pin(async move {
			match &config.auth {
				ConnectionAuth::Session(id) if id.is_empty() =>
					Err(Error::Connection { reason: "session identifier is empty".into() }),
				ConnectionAuth::Password { username, .. } if username.is_empty() =>
					Err(Error::Connection { reason: "username is empty".into() }),
				_ => Ok(config),
			}
		})
	}
}
