//! Validating builder for [`BridgeSettings`].

// self
use crate::{
	_prelude::*,
	auth::{CredentialKey, SessionKey, TokenSecret},
	settings::{BridgeEndpoints, BridgeSettings},
};

const LOGIN_PATH: &str = "/services/OAuth/c/";
const AUTH_PATH: &str = "/services/Soap/u/";
const AUTHORIZATION_PATH: &str = "/setup/secur/RemoteAccessAuthorizationPage.apexp";
const REQUEST_TOKEN_PATH: &str = "/_nc_external/system/security/oauth/RequestTokenHandler";
const ACCESS_TOKEN_PATH: &str = "/_nc_external/system/security/oauth/AccessTokenHandler";
const MAX_DURATION: Duration = Duration::days(365);

/// Errors raised while constructing or validating settings.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SettingsError {
	/// Consumer key is required.
	#[error("Consumer key cannot be empty.")]
	EmptyConsumerKey,
	/// Consumer secret is required.
	#[error("Consumer secret cannot be empty.")]
	EmptyConsumerSecret,
	/// Callback URL is required.
	#[error("Missing callback URL.")]
	MissingCallbackUrl,
	/// API version must look like `17.0`.
	#[error("API version `{version}` is not of the form <major>.<minor>.")]
	InvalidApiVersion {
		/// Version string that failed validation.
		version: String,
	},
	/// Endpoint could not be derived from the host.
	#[error("The {endpoint} endpoint could not be derived from the host.")]
	InvalidEndpoint {
		/// Which endpoint failed.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Durations must be strictly positive.
	#[error("The {field} duration must be positive.")]
	NonPositiveDuration {
		/// Which duration failed validation.
		field: &'static str,
	},
	/// Durations are capped so expiry instants stay representable.
	#[error("The {field} duration exceeds {max_days} days.")]
	DurationTooLong {
		/// Which duration failed validation.
		field: &'static str,
		/// Largest accepted duration, in days.
		max_days: i64,
	},
}

/// Builder for [`BridgeSettings`] values.
#[derive(Debug)]
pub struct BridgeSettingsBuilder {
	/// OAuth consumer key.
	pub consumer_key: String,
	/// OAuth consumer secret.
	pub consumer_secret: TokenSecret,
	/// Login host every endpoint is derived from.
	pub host: Option<Url>,
	/// Callback URL registered with the remote access application.
	pub callback_url: Option<Url>,
	/// Remote API version used in endpoint paths.
	pub api_version: String,
	/// Explicit login endpoint overriding the derived one.
	pub login_endpoint: Option<Url>,
	/// Explicit SOAP auth endpoint overriding the derived one.
	pub auth_endpoint: Option<Url>,
	/// Lifetime of cached sessions.
	pub session_ttl: Duration,
	/// Idle timeout stamped on connection configurations.
	pub connection_timeout: Duration,
	/// Upper bound on a single token exchange.
	pub exchange_timeout: Duration,
	/// Credentials store key.
	pub credential_key: CredentialKey,
	/// Session cache key.
	pub session_key: SessionKey,
}
impl BridgeSettingsBuilder {
	/// Creates a new builder seeded with the consumer identity and defaults.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: TokenSecret::new(consumer_secret),
			host: None,
			callback_url: None,
			api_version: BridgeSettings::DEFAULT_API_VERSION.into(),
			login_endpoint: None,
			auth_endpoint: None,
			session_ttl: BridgeSettings::DEFAULT_SESSION_TTL,
			connection_timeout: BridgeSettings::DEFAULT_CONNECTION_TIMEOUT,
			exchange_timeout: BridgeSettings::DEFAULT_EXCHANGE_TIMEOUT,
			credential_key: CredentialKey::default(),
			session_key: SessionKey::default(),
		}
	}

	/// Sets the login host (use a sandbox host for test orgs).
	pub fn host(mut self, url: Url) -> Self {
		self.host = Some(url);

		self
	}

	/// Sets the OAuth callback URL.
	pub fn callback_url(mut self, url: Url) -> Self {
		self.callback_url = Some(url);

		self
	}

	/// Overrides the API version used in derived endpoint paths.
	pub fn api_version(mut self, version: impl Into<String>) -> Self {
		self.api_version = version.into();

		self
	}

	/// Overrides the derived login endpoint.
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.login_endpoint = Some(url);

		self
	}

	/// Overrides the derived SOAP auth endpoint.
	pub fn auth_endpoint(mut self, url: Url) -> Self {
		self.auth_endpoint = Some(url);

		self
	}

	/// Overrides the session cache TTL.
	pub fn session_ttl(mut self, ttl: Duration) -> Self {
		self.session_ttl = ttl;

		self
	}

	/// Overrides the connection timeout.
	pub fn connection_timeout(mut self, timeout: Duration) -> Self {
		self.connection_timeout = timeout;

		self
	}

	/// Overrides the token exchange timeout.
	pub fn exchange_timeout(mut self, timeout: Duration) -> Self {
		self.exchange_timeout = timeout;

		self
	}

	/// Overrides the credentials store key.
	pub fn credential_key(mut self, key: CredentialKey) -> Self {
		self.credential_key = key;

		self
	}

	/// Overrides the session cache key.
	pub fn session_key(mut self, key: SessionKey) -> Self {
		self.session_key = key;

		self
	}

	/// Consumes the builder and validates the resulting settings.
	pub fn build(self) -> Result<BridgeSettings, SettingsError> {
		if self.consumer_key.trim().is_empty() {
			return Err(SettingsError::EmptyConsumerKey);
		}
		if self.consumer_secret.expose().trim().is_empty() {
			return Err(SettingsError::EmptyConsumerSecret);
		}

		validate_api_version(&self.api_version)?;

		let callback = self.callback_url.ok_or(SettingsError::MissingCallbackUrl)?;
		let host = match self.host {
			Some(host) => host,
			None => Url::parse(BridgeSettings::DEFAULT_HOST)
				.map_err(|source| SettingsError::InvalidEndpoint { endpoint: "host", source })?,
		};
		let version = self.api_version.as_str();
		let login = match self.login_endpoint {
			Some(url) => url,
			None => derive(&host, "login", &format!("{LOGIN_PATH}{version}"))?,
		};
		let auth = match self.auth_endpoint {
			Some(url) => url,
			None => derive(&host, "auth", &format!("{AUTH_PATH}{version}"))?,
		};
		let endpoints = BridgeEndpoints {
			login,
			auth,
			authorization: derive(&host, "authorization", AUTHORIZATION_PATH)?,
			request_token: derive(&host, "request_token", REQUEST_TOKEN_PATH)?,
			access_token: derive(&host, "access_token", ACCESS_TOKEN_PATH)?,
			callback,
		};

		validate_endpoint("host", &host)?;
		validate_endpoint("login", &endpoints.login)?;
		validate_endpoint("auth", &endpoints.auth)?;
		validate_endpoint("callback", &endpoints.callback)?;
		validate_duration("session_ttl", self.session_ttl)?;
		validate_duration("connection_timeout", self.connection_timeout)?;
		validate_duration("exchange_timeout", self.exchange_timeout)?;

		Ok(BridgeSettings {
			consumer_key: self.consumer_key,
			consumer_secret: self.consumer_secret,
			endpoints,
			session_ttl: self.session_ttl,
			connection_timeout: self.connection_timeout,
			exchange_timeout: self.exchange_timeout,
			credential_key: self.credential_key,
			session_key: self.session_key,
		})
	}
}

fn derive(host: &Url, endpoint: &'static str, path: &str) -> Result<Url, SettingsError> {
	host.join(path).map_err(|source| SettingsError::InvalidEndpoint { endpoint, source })
}

fn validate_api_version(version: &str) -> Result<(), SettingsError> {
	let valid = version
		.split_once('.')
		.is_some_and(|(major, minor)| {
			!major.is_empty()
				&& !minor.is_empty()
				&& major.chars().all(|c| c.is_ascii_digit())
				&& minor.chars().all(|c| c.is_ascii_digit())
		});

	if valid {
		Ok(())
	} else {
		Err(SettingsError::InvalidApiVersion { version: version.to_owned() })
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), SettingsError> {
	if url.scheme() != "https" {
		Err(SettingsError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

fn validate_duration(field: &'static str, value: Duration) -> Result<(), SettingsError> {
	if !value.is_positive() {
		return Err(SettingsError::NonPositiveDuration { field });
	}
	if value > MAX_DURATION {
		return Err(SettingsError::DurationTooLong { field, max_days: MAX_DURATION.whole_days() });
	}

	Ok(())
}
