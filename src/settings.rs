//! Injected static configuration: consumer identity, endpoints, and session windows.
//!
//! [`BridgeSettings`] replaces process-wide constants. Values are validated once by
//! [`BridgeSettingsBuilder`] (HTTPS-only endpoints, positive durations) and then shared
//! read-only by the acquirer and exchangers. Deployments can also load settings from a
//! JSON document via [`BridgeSettings::from_json_str`], which reports the failing path on
//! malformed input.

pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{CredentialKey, SessionKey, TokenSecret},
	error::ConfigError,
};

/// Endpoint set derived from the configured host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeEndpoints {
	/// OAuth-protected login URL that exchanges access credentials for a session.
	pub login: Url,
	/// SOAP authentication endpoint recorded alongside every session.
	pub auth: Url,
	/// User-facing authorization page of the OAuth handshake.
	pub authorization: Url,
	/// Request-token endpoint of the OAuth handshake.
	pub request_token: Url,
	/// Access-token endpoint of the OAuth handshake.
	pub access_token: Url,
	/// Callback URL registered with the remote access application.
	pub callback: Url,
}

/// Validated bridge configuration.
#[derive(Clone, Debug)]
pub struct BridgeSettings {
	/// OAuth consumer key of the remote access application.
	pub consumer_key: String,
	/// OAuth consumer secret of the remote access application.
	pub consumer_secret: TokenSecret,
	/// Endpoints used by exchanges and recorded on sessions.
	pub endpoints: BridgeEndpoints,
	/// Lifetime of cached sessions.
	pub session_ttl: Duration,
	/// Idle timeout stamped on every connection configuration.
	pub connection_timeout: Duration,
	/// Upper bound on a single token exchange call.
	pub exchange_timeout: Duration,
	/// Credentials store key holding the OAuth grant.
	pub credential_key: CredentialKey,
	/// Cache key holding the session triple.
	pub session_key: SessionKey,
}
impl BridgeSettings {
	/// Sessions are cached for 90 minutes.
	pub const DEFAULT_SESSION_TTL: Duration = Duration::seconds(5_400);
	/// Connections time out after 2 hours.
	pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::seconds(7_200);
	/// Token exchanges give up after 30 seconds.
	pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::seconds(30);
	/// Login host used when none is configured.
	pub const DEFAULT_HOST: &'static str = "https://login.salesforce.com";
	/// Remote API version used to derive endpoint paths.
	pub const DEFAULT_API_VERSION: &'static str = "17.0";

	/// Creates a new builder for the provided consumer identity.
	pub fn builder(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
	) -> BridgeSettingsBuilder {
		BridgeSettingsBuilder::new(consumer_key, consumer_secret)
	}

	/// Parses and validates settings from a JSON document.
	///
	/// Durations are expressed in whole seconds (`sessionTtlSecs`, `connectionTimeoutSecs`,
	/// `exchangeTimeoutSecs`); omitted optional fields fall back to the defaults.
	pub fn from_json_str(document: &str) -> Result<Self> {
		let de = &mut serde_json::Deserializer::from_str(document);
		let raw: RawSettings = serde_path_to_error::deserialize(de)
			.map_err(|source| ConfigError::SettingsParse { source })?;

		raw.into_builder().build().map_err(|e| ConfigError::from(e).into())
	}
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawSettings {
	consumer_key: String,
	consumer_secret: String,
	callback_url: Url,
	host: Option<Url>,
	api_version: Option<String>,
	session_ttl_secs: Option<i64>,
	connection_timeout_secs: Option<i64>,
	exchange_timeout_secs: Option<i64>,
	credential_key: Option<CredentialKey>,
	session_key: Option<SessionKey>,
}
impl RawSettings {
	fn into_builder(self) -> BridgeSettingsBuilder {
		let mut builder = BridgeSettingsBuilder::new(self.consumer_key, self.consumer_secret)
			.callback_url(self.callback_url);

		if let Some(host) = self.host {
			builder = builder.host(host);
		}
		if let Some(version) = self.api_version {
			builder = builder.api_version(version);
		}
		if let Some(secs) = self.session_ttl_secs {
			builder = builder.session_ttl(Duration::seconds(secs));
		}
		if let Some(secs) = self.connection_timeout_secs {
			builder = builder.connection_timeout(Duration::seconds(secs));
		}
		if let Some(secs) = self.exchange_timeout_secs {
			builder = builder.exchange_timeout(Duration::seconds(secs));
		}
		if let Some(key) = self.credential_key {
			builder = builder.credential_key(key);
		}
		if let Some(key) = self.session_key {
			builder = builder.session_key(key);
		}

		builder
	}
}
