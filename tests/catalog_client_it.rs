#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use catalog_broker::{
	_preludet::*,
	catalog::{Product, Rating, wire::PRODUCT_QUERY},
	error::FetchError,
};

const CLIENT_ID: &str = "catalog-client";
const SHARED_SECRET: &str = "catalog-secret";
const TICKET_PATH: &str = "/api/platform/applications/authtickets/oauth";

async fn mock_ticket(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TICKET_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"catalog-access\",\"refresh_token\":\"catalog-refresh\",\"expires_in\":3600}",
			);
		})
		.await
}

fn items_body(items: serde_json::Value) -> String {
	serde_json::json!({ "data": { "products": { "totalCount": 0, "items": items } } }).to_string()
}

fn widget() -> Product {
	Product {
		id: "P1".into(),
		title: "Widget".into(),
		price: 9.99,
		description: String::new(),
		category: String::new(),
		image: String::new(),
		rating: Rating { rate: 3.0, count: 0 },
	}
}

#[tokio::test]
async fn get_product_maps_sparse_item_and_caches_it() {
	let server = MockServer::start_async().await;
	let ticket_mock = mock_ticket(&server).await;
	let graphql_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/graphql")
				.header("authorization", "Bearer catalog-access")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"query": PRODUCT_QUERY,
					"variables": { "filter": "productCode eq P1" },
				}));
			then.status(200).header("content-type", "application/json").body(items_body(
				serde_json::json!([{
					"productCode": "P1",
					"price": { "price": 9.99 },
					"content": { "productName": "Widget" },
				}]),
			));
		})
		.await;
	let (catalog, _store) =
		build_reqwest_test_catalog_client(&server.base_url(), CLIENT_ID, SHARED_SECRET);
	let first = catalog.get_product("P1").await.expect("Point lookup should succeed.");
	let second = catalog.get_product("P1").await.expect("Cached point lookup should succeed.");

	assert_eq!(first, Some(widget()));
	assert_eq!(second, first);

	graphql_mock.assert_calls_async(1).await;
	ticket_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn list_products_hits_network_once_and_returns_independent_copies() {
	let server = MockServer::start_async().await;
	let _ticket_mock = mock_ticket(&server).await;
	let graphql_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql").json_body(serde_json::json!({
				"query": PRODUCT_QUERY,
				"variables": { "filter": "" },
			}));
			then.status(200).header("content-type", "application/json").body(items_body(
				serde_json::json!([
					{
						"productCode": "P1",
						"price": { "price": 9.99 },
						"content": { "productName": "Widget" },
					},
					{
						"productCode": "P2",
						"price": { "price": 4.5 },
						"categories": [{ "content": { "name": "Gadgets" } }],
						"content": {
							"productName": "Gizmo",
							"productShortDescription": "Pocket gizmo.",
							"productImages": [{ "imageUrl": "//cdn.example.com/gizmo.png" }],
						},
					},
				]),
			));
		})
		.await;
	let (catalog, _store) =
		build_reqwest_test_catalog_client(&server.base_url(), CLIENT_ID, SHARED_SECRET);
	let mut first = catalog.list_products().await.expect("Listing should succeed.");

	assert_eq!(first.len(), 2);
	assert_eq!(first[1].category, "Gadgets");
	assert_eq!(first[1].image, "//cdn.example.com/gizmo.png");
	assert_eq!(first[1].description, "Pocket gizmo.");

	first[0].title = "Mutated".into();
	first.clear();

	let second = catalog.list_products().await.expect("Cached listing should succeed.");

	assert_eq!(second.len(), 2);
	assert_eq!(second[0], widget());

	graphql_mock.assert_calls_async(1).await;

	assert_eq!(catalog.metrics().queries(), 1);
	assert_eq!(catalog.metrics().cache_hits(), 1);
}

#[tokio::test]
async fn get_products_builds_disjunction_and_overwrites_listing() {
	let server = MockServer::start_async().await;
	let _ticket_mock = mock_ticket(&server).await;
	let listing_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql").json_body(serde_json::json!({
				"query": PRODUCT_QUERY,
				"variables": { "filter": "" },
			}));
			then.status(200).header("content-type", "application/json").body(items_body(
				serde_json::json!([
					{ "productCode": "P1" },
					{ "productCode": "P2" },
					{ "productCode": "P3" },
				]),
			));
		})
		.await;
	let subset_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/graphql")
				.body_includes("productCode eq P3 or productCode eq P1");
			then.status(200).header("content-type", "application/json").body(items_body(
				serde_json::json!([{ "productCode": "P1" }, { "productCode": "P3" }]),
			));
		})
		.await;
	let (catalog, _store) =
		build_reqwest_test_catalog_client(&server.base_url(), CLIENT_ID, SHARED_SECRET);
	let listing = catalog.list_products().await.expect("Listing should succeed.");

	assert_eq!(listing.len(), 3);

	let subset = catalog.get_products(&["P3", "P1"]).await.expect("Batch lookup should succeed.");
	let ids = subset.iter().map(|product| product.id.as_str()).collect::<Vec<_>>();

	assert_eq!(ids, ["P1", "P3"]);

	let after = catalog.list_products().await.expect("Listing should be served from cache.");

	assert_eq!(after, subset);

	listing_mock.assert_calls_async(1).await;
	subset_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn malformed_bodies_yield_no_products() {
	let server = MockServer::start_async().await;
	let _ticket_mock = mock_ticket(&server).await;
	let graphql_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql");
			then.status(500).body("<html>upstream exploded</html>");
		})
		.await;
	let (catalog, _store) =
		build_reqwest_test_catalog_client(&server.base_url(), CLIENT_ID, SHARED_SECRET);
	let listing = catalog.list_products().await.expect("Malformed listing should be empty.");
	let product = catalog.get_product("P9").await.expect("Malformed lookup should be absent.");
	let batch = catalog.get_products(&["P9"]).await.expect("Malformed batch should be empty.");

	assert!(listing.is_empty());
	assert!(product.is_none());
	assert!(batch.is_empty());
	assert!(catalog.cache().listing().is_none());

	graphql_mock.assert_calls_async(3).await;
}

#[tokio::test]
async fn mistyped_fields_keep_item_positions() {
	let server = MockServer::start_async().await;
	let _ticket_mock = mock_ticket(&server).await;
	let _graphql_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql");
			then.status(200).header("content-type", "application/json").body(
				serde_json::json!({ "data": { "products": { "totalCount": 2.0, "items": [
					{ "productCode": "P1", "price": { "price": "9.99" }, "content": { "productName": "Widget" } },
					{ "productCode": "P2" },
				] } } })
				.to_string(),
			);
		})
		.await;
	let (catalog, _store) =
		build_reqwest_test_catalog_client(&server.base_url(), CLIENT_ID, SHARED_SECRET);
	let product = catalog
		.get_product("P1")
		.await
		.expect("Point lookup should succeed.")
		.expect("First item should be returned.");
	let listing = catalog.list_products().await.expect("Listing should succeed.");

	assert_eq!(product, Product { price: 0.0, ..widget() });
	assert_eq!(listing.iter().map(|product| product.id.as_str()).collect::<Vec<_>>(), ["P1", "P2"]);
}

#[tokio::test]
async fn empty_items_are_cached_as_empty_listing() {
	let server = MockServer::start_async().await;
	let _ticket_mock = mock_ticket(&server).await;
	let graphql_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/graphql");
			then.status(200)
				.header("content-type", "application/json")
				.body(items_body(serde_json::json!([])));
		})
		.await;
	let (catalog, _store) =
		build_reqwest_test_catalog_client(&server.base_url(), CLIENT_ID, SHARED_SECRET);

	assert!(catalog.list_products().await.expect("Listing should succeed.").is_empty());
	assert!(catalog.list_products().await.expect("Listing should succeed.").is_empty());
	assert!(catalog.get_product("P1").await.expect("Lookup should succeed.").is_none());

	graphql_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn hosted_headers_are_forwarded() {
	let server = MockServer::start_async().await;
	let _ticket_mock = mock_ticket(&server).await;
	let graphql_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/graphql")
				.header("x-vol-tenant", "100")
				.header("x-vol-site", "200");
			then.status(200)
				.header("content-type", "application/json")
				.body(items_body(serde_json::json!([])));
		})
		.await;
	let (catalog, _store) =
		build_reqwest_test_catalog_client(&server.base_url(), CLIENT_ID, SHARED_SECRET);
	let catalog = catalog.with_api_headers(BTreeMap::from([
		("x-vol-tenant".to_owned(), "100".to_owned()),
		("x-vol-site".to_owned(), "200".to_owned()),
	]));

	catalog.list_products().await.expect("Listing with hosted headers should succeed.");

	graphql_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn unreachable_api_host_is_fetch_error() {
	let server = MockServer::start_async().await;
	let _ticket_mock = mock_ticket(&server).await;
	let (auth, _store) =
		build_reqwest_test_auth_client(&server.base_url(), CLIENT_ID, SHARED_SECRET);
	let catalog = catalog_broker::catalog::CatalogClient::new(Arc::new(auth), "http://127.0.0.1:9")
		.expect("Catalog client should build.");
	let err = catalog.get_product("P1").await.expect_err("Unreachable host should fail.");

	assert!(matches!(err, Error::Fetch(FetchError::Transport { .. })));
	assert!(catalog.cache().lookup("P1").is_none());
}
