//! Shopper (anonymous or registered customer) tickets returned by storefront auth calls.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Normalized shopper ticket.
///
/// Storefront auth responses carry many more fields; only the ones needed to present and
/// renew the ticket are kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopperTicket {
	/// Bearer token for shopper-scoped calls.
	pub access_token: TokenSecret,
	/// Instant the access token stops being accepted.
	#[serde(with = "time::serde::rfc3339")]
	pub access_token_expiration: OffsetDateTime,
	/// Refresh token, if issued.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Shopper account identifier; absent for anonymous shoppers.
	#[serde(default)]
	pub user_id: Option<String>,
	/// Instant the refresh token stops being accepted.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub refresh_token_expiration: Option<OffsetDateTime>,
}
impl ShopperTicket {
	/// Extracts a shopper ticket from a storefront auth response body.
	pub fn from_response(body: &serde_json::Value) -> Result<Self, serde_json::Error> {
		Self::deserialize(body)
	}

	/// Returns `true` when the access token expiration lies strictly before `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.access_token_expiration < instant
	}

	/// Returns `true` if the ticket is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
