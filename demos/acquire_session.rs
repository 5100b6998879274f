//! Demonstrates turning a stored OAuth grant into a cached remote session with the default
//! reqwest transport, then reusing that session on the next acquisition.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use oauth_session_bridge::{
	acquire::SessionAcquirer,
	cache::{MemorySessionCache, SessionCache},
	connection::ConfigConnector,
	http::ReqwestSessionExchanger,
	reqwest::{Client, redirect::Policy},
	settings::BridgeSettings,
	store::{CredentialsStore, MemoryStore},
};

const LOGIN_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com">
	<soapenv:Body>
		<loginResponse>
			<result>
				<serverUrl>https://na1.example.com/services/Soap/c/17.0/00Dx0000000BV7z</serverUrl>
				<sessionId>00Dx0000000BV7z!demo-session</sessionId>
			</result>
		</loginResponse>
	</soapenv:Body>
</soapenv:Envelope>"#;

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/services/OAuth/c/17.0");
			then.status(200).header("content-type", "text/xml").body(LOGIN_RESPONSE);
		})
		.await;
	let settings = BridgeSettings::builder("demo-consumer-key", "demo-consumer-secret")
		.host(Url::parse(&server.url("/"))?)
		.callback_url(Url::parse("https://bridge.example.com/oauth/callback")?)
		.build()?;
	let exchanger = ReqwestSessionExchanger::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(Policy::none())
			.build()?,
	)
	.with_timeout(settings.exchange_timeout);
	let store: Arc<dyn CredentialsStore> = Arc::new(MemoryStore::default());
	let cache: Arc<dyn SessionCache> = Arc::new(MemorySessionCache::default());
	let acquirer = <SessionAcquirer<ConfigConnector>>::new(
		settings,
		store,
		cache,
		Arc::new(exchanger),
		ConfigConnector,
	);

	println!("Authorized before saving tokens: {}.", acquirer.has_been_authorized().await?);

	acquirer.save_tokens("demo-access-token", "demo-access-secret").await?;

	let first = acquirer.acquire_connection().await?;
	let second = acquirer.acquire_connection().await?;

	println!(
		"Connected to {} (session reused: {}).",
		first.service_endpoint.as_ref().map(Url::as_str).unwrap_or("<login discovers endpoint>"),
		first == second
	);
	println!(
		"Exchanges: {}, cache hits: {}.",
		acquirer.metrics.exchanges(),
		acquirer.metrics.cache_hits()
	);

	login_mock.assert_async().await;

	Ok(())
}
