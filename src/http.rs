//! Reqwest-backed token exchange transport.
//!
//! [`ReqwestSessionExchanger`] POSTs to the login URL with an OAuth 1.0a `Authorization`
//! header produced by a [`RequestSigner`]. Responses with a non-success status become
//! [`TransientError::ExchangeEndpoint`] values carrying the status and any `Retry-After`
//! hint; network failures and timeouts become [`TransportError::Network`]. Login calls
//! should not follow redirects, so custom clients passed to
//! [`ReqwestSessionExchanger::with_client`] ought to disable redirect following.

// std
use std::time::Duration as StdDuration;
// crates.io
use reqwest::header::{AUTHORIZATION, HeaderMap, RETRY_AFTER};
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	error::{TransientError, TransportError},
	exchange::{
		ExchangeFuture, ExchangeRequest, OAuthParams, PlaintextSigner, RequestSigner,
		SessionExchanger, authorization_header,
	},
};

const BODY_PREVIEW_LEN: usize = 256;

/// Token exchanger that speaks HTTP through reqwest.
#[derive(Clone)]
pub struct ReqwestSessionExchanger {
	client: ReqwestClient,
	signer: Arc<dyn RequestSigner>,
	timeout: Option<StdDuration>,
}
impl ReqwestSessionExchanger {
	/// Builds an exchanger with a fresh client that never follows redirects.
	pub fn new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self::with_client(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self { client, signer: Arc::new(PlaintextSigner), timeout: None }
	}

	/// Replaces the request signer (defaults to [`PlaintextSigner`]).
	pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
		self.signer = signer;

		self
	}

	/// Bounds each exchange call; non-positive values disable the bound.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = StdDuration::try_from(timeout).ok().filter(|value| !value.is_zero());

		self
	}

	async fn exchange_now(&self, request: &ExchangeRequest) -> Result<String> {
		let header =
			authorization_header(self.signer.as_ref(), request, &OAuthParams::generate());
		let mut builder =
			self.client.post(request.login_url.clone()).header(AUTHORIZATION, header);

		if let Some(timeout) = self.timeout {
			builder = builder.timeout(timeout);
		}

		let response = builder.send().await.map_err(TransportError::from)?;
		let status = response.status();
		let retry_after = parse_retry_after(response.headers());
		let body = response.text().await.map_err(TransportError::from)?;

		if !status.is_success() {
			return Err(TransientError::ExchangeEndpoint {
				message: format!("HTTP {}: {}", status.as_u16(), preview(&body)),
				status: Some(status.as_u16()),
				retry_after,
			}
			.into());
		}

		Ok(body)
	}
}
impl Debug for ReqwestSessionExchanger {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestSessionExchanger")
			.field("signature_method", &self.signer.signature_method())
			.field("timeout", &self.timeout)
			.finish()
	}
}
impl SessionExchanger for ReqwestSessionExchanger {
	fn exchange<'a>(&'a self, request: &'a ExchangeRequest) -> ExchangeFuture<'a> {
		Box::pin(self.exchange_now(request))
	}
}

fn preview(body: &str) -> String {
	let trimmed = body.trim();

	match trimmed.char_indices().nth(BODY_PREVIEW_LEN) {
		Some((idx, _)) => format!("{}...", &trimmed[..idx]),
		None => trimmed.to_owned(),
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(120)));
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);
	}

	#[test]
	fn preview_truncates_long_bodies_on_char_boundaries() {
		let long = "é".repeat(BODY_PREVIEW_LEN + 10);
		let shown = preview(&long);

		assert!(shown.ends_with("..."));
		assert_eq!(shown.chars().count(), BODY_PREVIEW_LEN + 3);
		assert_eq!(preview("  short  "), "short");
	}

	#[test]
	fn timeout_rejects_non_positive_values() {
		let exchanger = ReqwestSessionExchanger::with_client(ReqwestClient::new())
			.with_timeout(Duration::ZERO);

		assert!(exchanger.timeout.is_none());

		let exchanger = exchanger.with_timeout(Duration::seconds(30));

		assert_eq!(exchanger.timeout, Some(StdDuration::from_secs(30)));
	}
}
