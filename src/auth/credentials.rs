//! Long-lived OAuth access credentials minted by the authorization handshake.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access token + secret pair used to mint short-lived sessions.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCredentials {
	/// OAuth access token.
	pub access_token: TokenSecret,
	/// OAuth access token secret.
	pub access_token_secret: TokenSecret,
}
impl AccessCredentials {
	/// Wraps the provided token and secret.
	pub fn new(access_token: impl Into<String>, access_token_secret: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			access_token_secret: TokenSecret::new(access_token_secret),
		}
	}
}
impl Debug for AccessCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessCredentials")
			.field("access_token", &"<redacted>")
			.field("access_token_secret", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_redacts_both_secrets() {
		let credentials = AccessCredentials::new("token-value", "secret-value");
		let rendered = format!("{credentials:?}");

		assert!(!rendered.contains("token-value"));
		assert!(!rendered.contains("secret-value"));
	}

	#[test]
	fn serializes_with_camel_case_field_names() {
		let payload = serde_json::to_value(AccessCredentials::new("t", "s"))
			.expect("Credentials should serialize to JSON.");

		assert_eq!(payload["accessToken"], "t");
		assert_eq!(payload["accessTokenSecret"], "s");
	}
}
