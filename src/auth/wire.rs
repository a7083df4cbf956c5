//! Ticket endpoint paths and JSON payloads.

// self
use crate::{
	_prelude::*,
	auth::{AccessTicket, TicketBuilder},
	error::AuthError,
};

/// Grant value sent by both authentication and refresh requests.
pub(crate) const CLIENT_CREDENTIALS: &str = "client_credentials";

/// Ticket request being issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantKind {
	/// Initial `client_credentials` authentication.
	Authenticate,
	/// Refresh of an expired ticket.
	Refresh,
}

/// Token endpoint family selected once per auth client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TokenEndpoint {
	/// Public application ticket endpoint.
	#[default]
	Standard,
	/// Platform-internal access token endpoint.
	Internal,
}
impl TokenEndpoint {
	/// Selects the endpoint family from the `internal` flag.
	pub const fn from_internal(internal: bool) -> Self {
		if internal { Self::Internal } else { Self::Standard }
	}

	/// Returns the path appended to the authorization host for `grant`.
	///
	/// The internal authenticate path has no `/api` prefix while the internal refresh path
	/// does; both are what the platform serves.
	pub const fn path(self, grant: GrantKind) -> &'static str {
		match (self, grant) {
			(Self::Standard, _) => "/api/platform/applications/authtickets/oauth",
			(Self::Internal, GrantKind::Authenticate) =>
				"/platform/applications/internal/access-tokens/oauth",
			(Self::Internal, GrantKind::Refresh) =>
				"/api/platform/applications/internal/access-tokens/oauth",
		}
	}
}

/// JSON body posted to the token endpoint.
#[derive(Serialize)]
pub(crate) struct TicketRequest<'a> {
	pub(crate) client_id: &'a str,
	pub(crate) client_secret: &'a str,
	pub(crate) grant_type: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) refresh_token: Option<&'a str>,
}

/// Ticket document returned by the token endpoint. Every field is optional so
/// application errors and partial tickets decode before validation.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TicketResponse {
	#[serde(default)]
	pub(crate) access_token: Option<String>,
	#[serde(default)]
	pub(crate) refresh_token: Option<String>,
	#[serde(default)]
	pub(crate) expires_in: Option<f64>,
	#[serde(default, rename = "errorCode")]
	pub(crate) error_code: Option<serde_json::Value>,
	#[serde(default)]
	pub(crate) message: Option<String>,
}
impl TicketResponse {
	/// Decodes the body, pointing at the offending field on failure.
	pub(crate) fn decode(body: &[u8], status: u16) -> Result<Self, AuthError> {
		let de = &mut serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(de)
			.map_err(|source| AuthError::MalformedTicket { source, status: Some(status) })
	}

	/// Returns the application error code when the body signals one.
	pub(crate) fn error_code(&self) -> Option<String> {
		match self.error_code.as_ref()? {
			serde_json::Value::Null | serde_json::Value::Bool(false) => None,
			serde_json::Value::String(code) if code.is_empty() => None,
			serde_json::Value::String(code) => Some(code.clone()),
			serde_json::Value::Number(code) if code.as_f64() == Some(0.0) => None,
			other => Some(other.to_string()),
		}
	}

	/// Validates the document and stamps the expiry relative to `completed_at`.
	pub(crate) fn into_ticket(
		self,
		completed_at: OffsetDateTime,
	) -> Result<AccessTicket, AuthError> {
		if let Some(code) = self.error_code() {
			let message = self.message.unwrap_or_else(|| code.clone());

			return Err(AuthError::Rejected { code, message });
		}

		let mut builder = TicketBuilder::default().issued_at(completed_at);

		if let Some(access_token) = self.access_token {
			builder = builder.access_token(access_token);
		}
		if let Some(refresh_token) = self.refresh_token {
			builder = builder.refresh_token(refresh_token);
		}
		if let Some(expires_in) = self.expires_in {
			if expires_in <= 0.0 {
				return Err(AuthError::NonPositiveExpiresIn { expires_in });
			}

			let expires_at = Duration::checked_seconds_f64(expires_in)
				.and_then(|delta| completed_at.checked_add(delta))
				.ok_or(AuthError::ExpiresInOutOfRange { expires_in })?;

			builder = builder.expires_at(expires_at);
		}

		Ok(builder.build()?)
	}
}
