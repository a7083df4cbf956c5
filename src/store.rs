//! Storage contract and the in-memory implementation for the current access ticket.

pub mod memory;

pub use memory::MemoryTicketStore;

// self
use crate::{_prelude::*, auth::AccessTicket};

/// Boxed future returned by [`TicketStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Holder of the single current ticket for one auth client.
///
/// Implementations replace the stored ticket on every save; tickets are never
/// mutated in place.
pub trait TicketStore
where
	Self: Send + Sync,
{
	/// Returns the current ticket, if one has been saved.
	fn load(&self) -> StoreFuture<'_, Option<AccessTicket>>;

	/// Replaces the current ticket.
	fn save(&self, ticket: AccessTicket) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TicketStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
