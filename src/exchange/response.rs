//! Parsing of the XML login response returned by a token exchange.

// crates.io
use quick_xml::{Reader, events::Event};
// self
use crate::{_prelude::*, auth::TokenSecret, cache::SessionEndpoints};

const ENTERPRISE_SEGMENT: &str = "/c/";
const PARTNER_SEGMENT: &str = "/u/";

/// Failures raised while interpreting an exchange response body.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ParseError {
	/// The body does not look like an XML document.
	#[error("Exchange response is not XML.")]
	NotXml,
	/// The body looked like XML but could not be read.
	#[error("Exchange response XML is malformed: {message}.")]
	Malformed {
		/// Reader-supplied description.
		message: String,
	},
	/// A required element was absent or empty.
	#[error("Exchange response is missing `{field}`.")]
	MissingField {
		/// Element name.
		field: &'static str,
	},
	/// `serverUrl` is not a valid absolute URL.
	#[error("Exchange response carries an invalid serverUrl.")]
	InvalidServerUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Fields extracted from a successful login response.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginResponse {
	/// Session identifier minted by the exchange.
	pub session_id: TokenSecret,
	/// Enterprise API endpoint reported by the remote side.
	pub server_url: String,
}
impl LoginResponse {
	/// Builds the cacheable session triple, rewriting the service endpoint to the partner API.
	pub fn into_endpoints(self, auth_endpoint: Url) -> Result<SessionEndpoints, ParseError> {
		let service_endpoint = Url::parse(&normalize_service_endpoint(&self.server_url))
			.map_err(|source| ParseError::InvalidServerUrl { source })?;

		Ok(SessionEndpoints { auth_endpoint, service_endpoint, session_id: self.session_id })
	}
}
impl Debug for LoginResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginResponse")
			.field("session_id", &"<redacted>")
			.field("server_url", &self.server_url)
			.finish()
	}
}

#[derive(Clone, Copy)]
enum Field {
	SessionId,
	ServerUrl,
}

/// Maps every enterprise API path segment (`/c/`) to the partner API segment (`/u/`).
pub fn normalize_service_endpoint(raw: &str) -> String {
	raw.replace(ENTERPRISE_SEGMENT, PARTNER_SEGMENT)
}

/// Extracts `sessionId` and `serverUrl` from a login response body.
///
/// Element namespaces are ignored and the first occurrence of each element wins. Both
/// elements must be present and non-empty; anything less is rejected so partial sessions
/// never reach the cache.
pub fn parse_login_response(body: &str) -> Result<LoginResponse, ParseError> {
	let body = body.trim_start();

	if !body.starts_with('<') {
		return Err(ParseError::NotXml);
	}

	let mut reader = Reader::from_str(body);

	reader.config_mut().trim_text(true);

	let mut current = None;
	let mut session_id = None;
	let mut server_url = None;

	loop {
		match reader.read_event() {
			Ok(Event::Start(start)) => current = field_for(start.local_name().as_ref()),
			Ok(Event::Text(text)) => {
				let Some(field) = current else { continue };
				let value = text
					.unescape()
					.map_err(|e| ParseError::Malformed { message: e.to_string() })?
					.into_owned();
				let slot = match field {
					Field::SessionId => &mut session_id,
					Field::ServerUrl => &mut server_url,
				};

				if slot.is_none() && !value.is_empty() {
					*slot = Some(value);
				}
			},
			Ok(Event::End(_)) => current = None,
			Ok(Event::Eof) => break,
			Ok(_) => {},
			Err(e) => return Err(ParseError::Malformed { message: e.to_string() }),
		}
	}

	let session_id = session_id.ok_or(ParseError::MissingField { field: "sessionId" })?;
	let server_url = server_url.ok_or(ParseError::MissingField { field: "serverUrl" })?;

	Ok(LoginResponse { session_id: TokenSecret::new(session_id), server_url })
}

fn field_for(local_name: &[u8]) -> Option<Field> {
	match local_name {
		b"sessionId" => Some(Field::SessionId),
		b"serverUrl" => Some(Field::ServerUrl),
		_ => None,
	}
}
