//! Session acquisition: reuse a cached session, mint one via token exchange, or refuse.
//!
//! [`SessionAcquirer::acquire_connection`] resolves a connection in this order:
//!
//! 1. A live session in the cache is turned into a connection without touching the
//!    credentials store or the network.
//! 2. Stored access credentials are exchanged for a new session. Exchanges are
//!    singleflight per session key: concurrent cold-cache callers queue on one guard and
//!    re-read the cache once the winner has written it. The session is written with
//!    "add only if absent" semantics and a fixed TTL, and the service endpoint is rewritten
//!    from the enterprise API to the partner API first.
//! 3. With neither, the caller gets [`Error::Unauthorized`], unless the crate was built with
//!    the `dev-fallback` feature and a development login was configured explicitly.
//!
//! Failures are logged on the acquisition span and returned as typed errors; nothing is
//! retried automatically. Use [`Error::disposition`] to decide between retrying,
//! reauthorizing, and giving up.

mod metrics;

pub use metrics::AcquireMetrics;

// self
use crate::{
	_prelude::*,
	auth::{AccessCredentials, SessionKey, TokenSecret},
	cache::{CachedSession, PutOptions, SessionCache},
	connection::{ConnectionConfig, Connector},
	exchange::{self, ExchangeRequest, LoginResponse, SessionExchanger},
	obs::{self, AcquireOutcome, AcquirePath, AcquireSpan},
	settings::BridgeSettings,
	store::CredentialsStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestSessionExchanger;

/// Coordinates the credentials store, session cache, token exchanger, and connector.
///
/// Construct one per process and share it (it is cheap to clone); there is no hidden global
/// state.
pub struct SessionAcquirer<C>
where
	C: Connector,
{
	/// Validated static configuration.
	pub settings: Arc<BridgeSettings>,
	/// Store holding the long-lived OAuth grant.
	pub store: Arc<dyn CredentialsStore>,
	/// Cache holding the short-lived session triple.
	pub cache: Arc<dyn SessionCache>,
	/// Transport performing token exchanges.
	pub exchanger: Arc<dyn SessionExchanger>,
	/// Client that turns configurations into connections.
	pub connector: Arc<C>,
	/// Shared counters for acquisition outcomes.
	pub metrics: Arc<AcquireMetrics>,
	#[cfg(feature = "dev-fallback")]
	dev_fallback: Option<DevCredentials>,
	exchange_guards: Arc<Mutex<HashMap<SessionKey, Arc<AsyncMutex<()>>>>>,
}
impl<C> SessionAcquirer<C>
where
	C: Connector,
{
	/// Creates an acquirer from explicitly constructed collaborators.
	pub fn new(
		settings: BridgeSettings,
		store: Arc<dyn CredentialsStore>,
		cache: Arc<dyn SessionCache>,
		exchanger: Arc<dyn SessionExchanger>,
		connector: impl Into<Arc<C>>,
	) -> Self {
		Self {
			settings: Arc::new(settings),
			store,
			cache,
			exchanger,
			connector: connector.into(),
			metrics: Default::default(),
			#[cfg(feature = "dev-fallback")]
			dev_fallback: None,
			exchange_guards: Default::default(),
		}
	}

	/// Creates an acquirer that exchanges tokens over reqwest, bounded by the configured
	/// exchange timeout.
	#[cfg(feature = "reqwest")]
	pub fn with_reqwest(
		settings: BridgeSettings,
		store: Arc<dyn CredentialsStore>,
		cache: Arc<dyn SessionCache>,
		connector: impl Into<Arc<C>>,
	) -> Result<Self> {
		let exchanger = ReqwestSessionExchanger::new()?.with_timeout(settings.exchange_timeout);

		Ok(Self::new(settings, store, cache, Arc::new(exchanger), connector))
	}

	/// Enables username/password logins when no OAuth grant is stored.
	///
	/// Intended for local development only; every use is logged at `warn`.
	#[cfg(feature = "dev-fallback")]
	pub fn with_dev_fallback(
		mut self,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		self.dev_fallback = Some(DevCredentials {
			username: username.into(),
			password: TokenSecret::new(password),
		});

		self
	}

	/// Produces a connection from the cache, a fresh token exchange, or (in development
	/// builds) a username/password login.
	pub async fn acquire_connection(&self) -> Result<C::Connection> {
		let span = AcquireSpan::new("acquire_connection");
		let mut path = AcquirePath::None;

		self.metrics.record_attempt();

		let result = span
			.in_span(async {
				let result = self.acquire_now(&mut path).await;

				if let Err(err) = &result {
					tracing::warn!(
						error = %err,
						disposition = ?err.disposition(),
						"Session acquisition failed."
					);
				}

				result
			})
			.await;

		span.record_path(path);

		match &result {
			Ok(_) => {
				self.metrics.record_success(path);
				obs::record_acquire_outcome(path, AcquireOutcome::Success);
			},
			Err(_) => {
				self.metrics.record_failure();
				obs::record_acquire_outcome(path, AcquireOutcome::Failure);
			},
		}

		result
	}

	/// Stores the access token + secret, replacing any previous grant.
	pub async fn save_tokens(
		&self,
		access_token: impl Into<String>,
		access_token_secret: impl Into<String>,
	) -> Result<()> {
		let credentials = AccessCredentials::new(access_token, access_token_secret);

		self.store.save(&self.settings.credential_key, credentials).await?;
		tracing::info!(key = %self.settings.credential_key, "Stored OAuth access credentials.");

		Ok(())
	}

	/// Returns `true` once an OAuth grant has been stored.
	pub async fn has_been_authorized(&self) -> Result<bool> {
		Ok(self.store.fetch(&self.settings.credential_key).await?.is_some())
	}

	/// Returns the live cached session, if any.
	pub async fn cached_session(&self) -> Result<Option<CachedSession>> {
		Ok(self.cache.get(&self.settings.session_key).await?)
	}

	/// Caches a session triple with the configured TTL unless a live one already exists.
	///
	/// The service endpoint is rewritten to the partner API before caching. Returns the
	/// session that is live afterwards, which is the existing one when a concurrent writer
	/// got there first.
	pub async fn cache_session(
		&self,
		auth_endpoint: Url,
		service_endpoint: &str,
		session_id: impl Into<String>,
	) -> Result<CachedSession> {
		let login = LoginResponse {
			session_id: TokenSecret::new(session_id),
			server_url: service_endpoint.to_owned(),
		};

		self.cache_login(auth_endpoint, login).await
	}

	async fn acquire_now(&self, path: &mut AcquirePath) -> Result<C::Connection> {
		let key = &self.settings.session_key;

		if let Some(session) = self.cache.get(key).await? {
			*path = AcquirePath::Cached;
			tracing::info!("Connecting via cached session.");

			return self.connect_session(&session).await;
		}
		if let Some(credentials) = self.store.fetch(&self.settings.credential_key).await? {
			let session = self.exchange_singleflight(key, credentials, path).await?;

			return self.connect_session(&session).await;
		}

		self.fallback(path).await
	}

	async fn exchange_singleflight(
		&self,
		key: &SessionKey,
		credentials: AccessCredentials,
		path: &mut AcquirePath,
	) -> Result<CachedSession> {
		let guard = self.exchange_guard(key);
		let result = {
			let _singleflight = guard.lock().await;

			self.exchange_locked(key, credentials, path).await
		};

		self.release_exchange_guard(key, &guard);

		result
	}

	async fn exchange_locked(
		&self,
		key: &SessionKey,
		credentials: AccessCredentials,
		path: &mut AcquirePath,
	) -> Result<CachedSession> {
		if let Some(session) = self.cache.get(key).await? {
			*path = AcquirePath::Cached;
			tracing::info!("Reusing session cached by a concurrent exchange.");

			return Ok(session);
		}

		*path = AcquirePath::Exchange;

		let request = ExchangeRequest::new(&self.settings, &credentials);

		tracing::info!(
			login_url = %request.login_url,
			"Authorized but no cached session; exchanging access credentials."
		);
		self.metrics.record_exchange();

		let body = self.exchanger.exchange(&request).await?;
		let login = exchange::parse_login_response(&body).inspect_err(|err| {
			tracing::error!(error = %err, "Token exchange response could not be parsed.");
		})?;

		self.cache_login(self.settings.endpoints.auth.clone(), login).await
	}

	async fn cache_login(&self, auth_endpoint: Url, login: LoginResponse) -> Result<CachedSession> {
		let endpoints = login.into_endpoints(auth_endpoint)?;

		tracing::info!(
			auth_endpoint = %endpoints.auth_endpoint,
			service_endpoint = %endpoints.service_endpoint,
			ttl_secs = self.settings.session_ttl.whole_seconds(),
			"Caching session."
		);

		let outcome = self
			.cache
			.put(
				&self.settings.session_key,
				endpoints,
				PutOptions::add_only_if_absent(self.settings.session_ttl),
			)
			.await?;

		if !outcome.is_stored() {
			tracing::info!("A live session was already cached; keeping it.");
		}

		Ok(outcome.into_session())
	}

	async fn connect_session(&self, session: &CachedSession) -> Result<C::Connection> {
		let config = ConnectionConfig::from_session(session, self.settings.connection_timeout);

		self.connector.connect(config).await
	}

	#[cfg(feature = "dev-fallback")]
	async fn fallback(&self, path: &mut AcquirePath) -> Result<C::Connection> {
		let Some(dev) = &self.dev_fallback else {
			tracing::warn!("No cached session and no stored OAuth credentials.");

			return Err(Error::Unauthorized);
		};

		*path = AcquirePath::DevFallback;
		tracing::warn!(
			username = %dev.username,
			"No OAuth grant stored; connecting with development username/password."
		);

		let config = ConnectionConfig::with_password(
			self.settings.endpoints.auth.clone(),
			dev.username.clone(),
			dev.password.expose(),
		);

		self.connector.connect(config).await
	}

	#[cfg(not(feature = "dev-fallback"))]
	async fn fallback(&self, _path: &mut AcquirePath) -> Result<C::Connection> {
		tracing::warn!("No cached session and no stored OAuth credentials.");

		Err(Error::Unauthorized)
	}

	fn exchange_guard(&self, key: &SessionKey) -> Arc<AsyncMutex<()>> {
		let mut guards = self.exchange_guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}

	// Drops the map entry once no other caller holds or awaits the guard.
	fn release_exchange_guard(&self, key: &SessionKey, guard: &Arc<AsyncMutex<()>>) {
		let mut guards = self.exchange_guards.lock();

		if Arc::strong_count(guard) == 2
			&& guards.get(key).is_some_and(|held| Arc::ptr_eq(held, guard))
		{
			guards.remove(key);
		}
	}
}
impl<C> Clone for SessionAcquirer<C>
where
	C: Connector,
{
	fn clone(&self) -> Self {
		Self {
			settings: self.settings.clone(),
			store: self.store.clone(),
			cache: self.cache.clone(),
			exchanger: self.exchanger.clone(),
			connector: self.connector.clone(),
			metrics: self.metrics.clone(),
			#[cfg(feature = "dev-fallback")]
			dev_fallback: self.dev_fallback.clone(),
			exchange_guards: self.exchange_guards.clone(),
		}
	}
}
impl<C> Debug for SessionAcquirer<C>
where
	C: Connector,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut debug = f.debug_struct("SessionAcquirer");

		debug.field("settings", &self.settings);
		#[cfg(feature = "dev-fallback")]
		debug.field("dev_fallback_set", &self.dev_fallback.is_some());

		debug.finish()
	}
}

#[cfg(feature = "dev-fallback")]
#[derive(Clone, Debug)]
struct DevCredentials {
	username: String,
	password: TokenSecret,
}
