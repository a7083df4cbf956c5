//! Thread-safe in-memory [`TicketStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::AccessTicket,
	store::{StoreFuture, TicketStore},
};

/// Process-local ticket slot; discarded when the process exits.
#[derive(Clone, Debug, Default)]
pub struct MemoryTicketStore(Arc<RwLock<Option<AccessTicket>>>);
impl MemoryTicketStore {
	/// Creates a store that already holds `ticket`.
	pub fn with_ticket(ticket: AccessTicket) -> Self {
		Self(Arc::new(RwLock::new(Some(ticket))))
	}

	/// Returns the current ticket without going through the async contract.
	pub fn current(&self) -> Option<AccessTicket> {
		self.0.read().clone()
	}
}
impl TicketStore for MemoryTicketStore {
	fn load(&self) -> StoreFuture<'_, Option<AccessTicket>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn save(&self, ticket: AccessTicket) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(ticket);

			Ok(())
		})
	}
}
