//! OAuth 1.0a request signing seam for token exchanges.
//!
//! Cryptographic signature methods are left to downstream crates; the bridge ships the
//! `PLAINTEXT` method, which is valid over TLS and is what [`PlaintextSigner`] implements.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
// self
use crate::{_prelude::*, exchange::ExchangeRequest};

const NONCE_BYTES: usize = 16;

/// Produces the `oauth_signature` for an exchange request.
pub trait RequestSigner
where
	Self: Send + Sync,
{
	/// Value sent as `oauth_signature_method`.
	fn signature_method(&self) -> &'static str;

	/// Computes the `oauth_signature` value (before header encoding).
	fn sign(&self, request: &ExchangeRequest, params: &OAuthParams) -> String;
}

/// `PLAINTEXT` signature method: `consumer_secret&token_secret`, each percent-encoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaintextSigner;
impl RequestSigner for PlaintextSigner {
	fn signature_method(&self) -> &'static str {
		"PLAINTEXT"
	}

	fn sign(&self, request: &ExchangeRequest, _params: &OAuthParams) -> String {
		format!(
			"{}&{}",
			urlencoding::encode(request.consumer_secret.expose()),
			urlencoding::encode(request.access_token_secret.expose())
		)
	}
}

/// Per-request protocol parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthParams {
	/// Single-use random value.
	pub nonce: String,
	/// Seconds since the Unix epoch.
	pub timestamp: i64,
}
impl OAuthParams {
	/// Generates a fresh nonce stamped with the current time.
	pub fn generate() -> Self {
		let bytes: [u8; NONCE_BYTES] = rand::rng().random();

		Self {
			nonce: URL_SAFE_NO_PAD.encode(bytes),
			timestamp: OffsetDateTime::now_utc().unix_timestamp(),
		}
	}
}

/// Renders the `Authorization: OAuth ...` header value for `request`.
pub fn authorization_header(
	signer: &dyn RequestSigner,
	request: &ExchangeRequest,
	params: &OAuthParams,
) -> String {
	let signature = signer.sign(request, params);
	let timestamp = params.timestamp.to_string();
	let fields = [
		("oauth_callback", request.callback_url.as_str()),
		("oauth_consumer_key", request.consumer_key.as_str()),
		("oauth_nonce", params.nonce.as_str()),
		("oauth_signature", signature.as_str()),
		("oauth_signature_method", signer.signature_method()),
		("oauth_timestamp", timestamp.as_str()),
		("oauth_token", request.access_token.expose()),
		("oauth_version", "1.0"),
	];
	let rendered = fields
		.iter()
		.map(|(name, value)| format!("{name}=\"{}\"", urlencoding::encode(value)))
		.collect::<Vec<_>>()
		.join(", ");

	format!("OAuth {rendered}")
}
