//! Strongly typed keys addressing the credentials store and the session cache.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_key {
	($name:ident, $doc:literal, $kind:literal, $default:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			#[doc = concat!("Key used when none is configured: `", $default, "`.")]
			pub const DEFAULT: &'static str = $default;

			/// Creates a new key after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Default for $name {
			fn default() -> Self {
				Self(Self::DEFAULT.to_owned())
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const KEY_MAX_LEN: usize = 128;

/// Error returned when key validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The key was empty.
	#[error("{kind} key cannot be empty.")]
	Empty {
		/// Kind of key (credential, session).
		kind: &'static str,
	},
	/// The key contains whitespace or control characters.
	#[error("{kind} key contains whitespace or control characters.")]
	InvalidCharacter {
		/// Kind of key (credential, session).
		kind: &'static str,
	},
	/// The key exceeded the allowed character count.
	#[error("{kind} key exceeds {max} characters.")]
	TooLong {
		/// Kind of key (credential, session).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_key! { CredentialKey, "Key addressing a stored access-credential record.", "Credential", "OAuthCredentials" }
def_key! { SessionKey, "Key addressing a cached remote session.", "Session", "salesforceSession" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(|c| c.is_whitespace() || c.is_control()) {
		return Err(IdentifierError::InvalidCharacter { kind });
	}
	if view.chars().count() > KEY_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: KEY_MAX_LEN });
	}

	Ok(())
}
