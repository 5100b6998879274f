//! Token exchange contracts: turn stored access credentials into a fresh remote session.
//!
//! [`SessionExchanger`] is the bridge's only dependency on the OAuth-protected login call.
//! Implementations receive a fully populated [`ExchangeRequest`] and return the raw
//! response body; parsing lives in [`response`] so every transport shares the same
//! validation rules. The reqwest-backed implementation lives in [`crate::http`].

pub mod response;
pub mod signer;

pub use response::*;
pub use signer::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessCredentials, TokenSecret},
	settings::BridgeSettings,
};

/// Boxed future returned by [`SessionExchanger::exchange`].
pub type ExchangeFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + 'a + Send>>;

/// Performs the network call that converts access credentials into a session.
pub trait SessionExchanger
where
	Self: Send + Sync,
{
	/// Sends `request` to its login URL and returns the response body of a successful call.
	///
	/// Non-success statuses map to [`Error::Exchange`]; network failures map to
	/// [`Error::Transport`].
	fn exchange<'a>(&'a self, request: &'a ExchangeRequest) -> ExchangeFuture<'a>;
}

/// Everything needed to sign and send one token exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeRequest {
	/// OAuth-protected login URL.
	pub login_url: Url,
	/// Callback URL registered with the consumer.
	pub callback_url: Url,
	/// OAuth consumer key.
	pub consumer_key: String,
	/// OAuth consumer secret.
	pub consumer_secret: TokenSecret,
	/// Stored OAuth access token.
	pub access_token: TokenSecret,
	/// Stored OAuth access token secret.
	pub access_token_secret: TokenSecret,
}
impl ExchangeRequest {
	/// Combines the static consumer identity with stored access credentials.
	pub fn new(settings: &BridgeSettings, credentials: &AccessCredentials) -> Self {
		Self {
			login_url: settings.endpoints.login.clone(),
			callback_url: settings.endpoints.callback.clone(),
			consumer_key: settings.consumer_key.clone(),
			consumer_secret: settings.consumer_secret.clone(),
			access_token: credentials.access_token.clone(),
			access_token_secret: credentials.access_token_secret.clone(),
		}
	}
}
