// crates.io
use time::{Duration, macros};
// self
use catalog_broker::{
	auth::AccessTicket,
	store::{MemoryTicketStore, TicketStore},
};

fn build_ticket(access: &str, refresh: Option<&str>) -> AccessTicket {
	let issued = macros::datetime!(2025-11-10 12:00 UTC);
	let mut builder = AccessTicket::builder()
		.access_token(access)
		.issued_at(issued)
		.expires_at(issued + Duration::hours(1));

	if let Some(value) = refresh {
		builder = builder.refresh_token(value);
	}

	builder.build().expect("Ticket fixture should build successfully.")
}

#[tokio::test]
async fn save_and_load_round_trip() {
	let store = MemoryTicketStore::default();
	let ticket = build_ticket("access-1", Some("refresh-1"));

	assert!(store.load().await.expect("Loading an empty store should succeed.").is_none());

	store.save(ticket.clone()).await.expect("Saving ticket fixture should succeed.");

	let loaded = store
		.load()
		.await
		.expect("Loading the stored ticket should succeed.")
		.expect("Stored ticket should remain present.");

	assert_eq!(loaded, ticket);
	assert_eq!(store.current(), Some(ticket));
}

#[tokio::test]
async fn save_replaces_previous_ticket_wholesale() {
	let store = MemoryTicketStore::with_ticket(build_ticket("access-old", Some("refresh-old")));

	store
		.save(build_ticket("access-new", None))
		.await
		.expect("Saving the replacement ticket should succeed.");

	let loaded = store.current().expect("Replacement ticket should be present.");

	assert_eq!(loaded.access_token.expose(), "access-new");
	assert!(loaded.refresh_token.is_none());
}

#[tokio::test]
async fn clones_share_the_same_slot() {
	let store = MemoryTicketStore::default();
	let writer = store.clone();
	let task = tokio::spawn(async move {
		writer
			.save(build_ticket("access-shared", None))
			.await
			.expect("Saving from a spawned task should succeed.")
	});

	task.await.expect("Writer task should not panic.");

	assert_eq!(
		store.current().map(|ticket| ticket.access_token.expose().to_owned()),
		Some("access-shared".to_owned()),
	);
}
