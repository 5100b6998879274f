//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use parking_lot::Mutex;
use time::Duration;
use url::Url;
// self
use oauth_session_bridge::{
	acquire::SessionAcquirer,
	cache::{MemorySessionCache, SessionCache},
	connection::ConfigConnector,
	error::TransientError,
	exchange::{ExchangeFuture, ExchangeRequest, SessionExchanger},
	settings::{BridgeSettings, BridgeSettingsBuilder},
	store::{CredentialsStore, MemoryStore},
};

/// Acquirer flavour used across the integration tests.
pub type TestAcquirer = SessionAcquirer<ConfigConnector>;

pub const TEST_CONSUMER_KEY: &str = "consumer-key-test";
pub const TEST_CONSUMER_SECRET: &str = "consumer-secret-test";
pub const TEST_CALLBACK: &str = "https://bridge.example.com/callback";

/// Builder rooted at `host` (e.g. an `httpmock` base URL) with the test consumer identity.
pub fn test_settings_builder(host: &str) -> BridgeSettingsBuilder {
	let host = Url::parse(host).expect("Test host should parse as a URL.");
	let callback = Url::parse(TEST_CALLBACK).expect("Test callback should parse as a URL.");

	BridgeSettings::builder(TEST_CONSUMER_KEY, TEST_CONSUMER_SECRET).host(host).callback_url(callback)
}

pub fn test_settings(host: &str) -> BridgeSettings {
	test_settings_builder(host).build().expect("Test settings should pass validation.")
}

/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`.
#[cfg(feature = "reqwest")]
pub fn test_reqwest_client() -> reqwest::Client {
	reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.expect("Failed to build insecure Reqwest client for tests.")
}

/// Constructs an acquirer backed by in-memory stores and the provided exchanger.
pub fn build_test_acquirer(
	settings: BridgeSettings,
	exchanger: Arc<dyn SessionExchanger>,
) -> (TestAcquirer, Arc<MemoryStore>, Arc<MemorySessionCache>) {
	let store_backend = Arc::new(MemoryStore::default());
	let cache_backend = Arc::new(MemorySessionCache::default());
	let store: Arc<dyn CredentialsStore> = store_backend.clone();
	let cache: Arc<dyn SessionCache> = cache_backend.clone();
	let acquirer = SessionAcquirer::new(settings, store, cache, exchanger, ConfigConnector);

	(acquirer, store_backend, cache_backend)
}

/// Minimal SOAP login response carrying `session_id` and `server_url`.
pub fn login_body(session_id: &str, server_url: &str) -> String {
	format!(
		r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com">
	<soapenv:Body>
		<loginResponse>
			<result>
				<passwordExpired>false</passwordExpired>
				<serverUrl>{server_url}</serverUrl>
				<sessionId>{session_id}</sessionId>
				<userId>005x0000000ABCD</userId>
			</result>
		</loginResponse>
	</soapenv:Body>
</soapenv:Envelope>"#
	)
}

#[derive(Clone, Debug)]
pub enum Reply {
	Body(String),
	Status { status: u16, retry_after: Option<Duration> },
}

/// Scripted exchanger that counts calls and remembers every request it saw.
#[derive(Debug)]
pub struct FakeExchanger {
	reply: Reply,
	delay: Option<StdDuration>,
	calls: AtomicUsize,
	requests: Mutex<Vec<ExchangeRequest>>,
}
impl FakeExchanger {
	pub fn replying(body: impl Into<String>) -> Self {
		Self::new(Reply::Body(body.into()))
	}

	pub fn failing(status: u16, retry_after: Option<Duration>) -> Self {
		Self::new(Reply::Status { status, retry_after })
	}

	pub fn new(reply: Reply) -> Self {
		Self { reply, delay: None, calls: AtomicUsize::new(0), requests: Mutex::new(Vec::new()) }
	}

	/// Holds every exchange open for `delay` so concurrent callers overlap.
	pub fn with_delay(mut self, delay: StdDuration) -> Self {
		self.delay = Some(delay);

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn last_request(&self) -> Option<ExchangeRequest> {
		self.requests.lock().last().cloned()
	}
}
impl SessionExchanger for FakeExchanger {
	fn exchange<'a>(&'a self, request: &'a ExchangeRequest) -> ExchangeFuture<'a> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.requests.lock().push(request.clone());

			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}

			match &self.reply {
				Reply::Body(body) => Ok(body.clone()),
				Reply::Status { status, retry_after } => Err(TransientError::ExchangeEndpoint {
					message: format!("HTTP {status}"),
					status: Some(*status),
					retry_after: *retry_after,
				}
				.into()),
			}
		})
	}
}
