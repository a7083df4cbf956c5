//! Immutable access tickets, their lifecycle helpers, and builders.

// self
use crate::_prelude::*;

/// Lifecycle status of an [`AccessTicket`] at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
	/// The instant falls strictly before `expires_at`.
	Active,
	/// The instant is at or past `expires_at`.
	Expired,
}

/// Errors produced by [`TicketBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TicketBuilderError {
	/// Issued when no access token value was provided.
	#[error("Ticket is missing access_token.")]
	MissingAccessToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Ticket is missing expires_in.")]
	MissingExpiry,
	/// Issued when the relative expiry overflows the representable date range.
	#[error("Ticket expiry lies outside the supported date range.")]
	ExpiryOutOfRange,
}

/// Redacted secret wrapper keeping bearer material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the value as an `Authorization` header payload.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Application access ticket issued by the authorization host.
///
/// Tickets are replaced wholesale on refresh and never mutated after construction.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTicket {
	/// Bearer token presented to the API.
	pub access_token: TokenSecret,
	/// Refresh token, if the authorization host issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Instant the ticket request completed.
	pub issued_at: OffsetDateTime,
	/// First instant at which the ticket is no longer valid.
	pub expires_at: OffsetDateTime,
}
impl AccessTicket {
	/// Returns a builder for constructing tickets.
	pub fn builder() -> TicketBuilder {
		TicketBuilder::default()
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TicketStatus {
		if instant < self.expires_at { TicketStatus::Active } else { TicketStatus::Expired }
	}

	/// Returns `true` if the ticket has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TicketStatus::Expired)
	}

	/// Returns `true` if the ticket is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for AccessTicket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTicket")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`AccessTicket`].
#[derive(Clone, Debug, Default)]
pub struct TicketBuilder {
	access_token: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl TicketBuilder {
	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Consumes the builder and produces an [`AccessTicket`].
	pub fn build(self) -> Result<AccessTicket, TicketBuilderError> {
		let access_token = self.access_token.ok_or(TicketBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) =>
				issued_at.checked_add(delta).ok_or(TicketBuilderError::ExpiryOutOfRange)?,
			(None, None) => return Err(TicketBuilderError::MissingExpiry),
		};

		Ok(AccessTicket { access_token, refresh_token: self.refresh_token, issued_at, expires_at })
	}
}
