//! Demonstrates listing catalog products over the default reqwest transport against a mock
//! platform, showing that the ticket and the listing are both reused on the second call.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use catalog_broker::{
	auth::AuthClient,
	catalog::CatalogClient,
	http::ReqwestHttpClient,
	reqwest::Client,
	store::{MemoryTicketStore, TicketStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let ticket_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/platform/applications/authtickets/oauth");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"refresh_token\":\"demo-refresh\",\"expires_in\":3600}",
			);
		})
		.await;
	let graphql_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"data\":{\"products\":{\"totalCount\":1,\"items\":[{\"productCode\":\"TENT-2P\",\
				 \"price\":{\"price\":249.0},\"content\":{\"productName\":\"Two-person tent\"}}]}}}",
			);
		})
		.await;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let store: Arc<dyn TicketStore> = Arc::new(MemoryTicketStore::default());
	let auth = AuthClient::<ReqwestHttpClient>::builder()
		.client_id("demo-client")
		.shared_secret("demo-secret")
		.auth_host(server.base_url())
		.transport(http_client)
		.store(store)
		.build()?;
	let catalog = CatalogClient::new(Arc::new(auth), &server.base_url())?;

	for product in catalog.list_products().await? {
		println!("{} ({}): {:.2}.", product.title, product.id, product.price);
	}

	let again = catalog.list_products().await?;

	println!("Second listing served {} product(s) from cache.", again.len());

	ticket_mock.assert_calls_async(1).await;
	graphql_mock.assert_calls_async(1).await;

	Ok(())
}
