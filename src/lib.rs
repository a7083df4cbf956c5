//! Commerce catalog client built on a cached OAuth client-credentials ticket.
//!
//! [`auth::AuthClient`] keeps a bearer ticket fresh against the platform's application
//! token endpoint, [`catalog::CatalogClient`] spends that ticket on GraphQL product queries
//! and memoizes the normalized results, and [`commerce::Commerce`] wires both together
//! from one [`config::ApiConfig`]. [`content`] carries the website-builder settings and the
//! editor's component groups.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod catalog;
pub mod commerce;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod obs;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::AuthClient,
		catalog::CatalogClient,
		http::ReqwestHttpClient,
		store::{MemoryTicketStore, TicketStore},
	};

	/// Auth client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestAuthClient = AuthClient<ReqwestHttpClient>;
	/// Catalog client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestCatalogClient = CatalogClient<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`AuthClient`] backed by an in-memory ticket store and the reqwest transport
	/// used across integration tests.
	pub fn build_reqwest_test_auth_client(
		auth_host: &str,
		client_id: &str,
		shared_secret: &str,
	) -> (ReqwestTestAuthClient, Arc<MemoryTicketStore>) {
		let store_backend = Arc::new(MemoryTicketStore::default());
		let store: Arc<dyn TicketStore> = store_backend.clone();
		let auth = AuthClient::builder()
			.client_id(client_id)
			.shared_secret(shared_secret)
			.auth_host(auth_host)
			.transport(test_reqwest_http_client())
			.store(store)
			.build()
			.expect("Failed to build auth client for tests.");

		(auth, store_backend)
	}

	/// Constructs a [`CatalogClient`] whose auth and GraphQL endpoints both live on `host`.
	pub fn build_reqwest_test_catalog_client(
		host: &str,
		client_id: &str,
		shared_secret: &str,
	) -> (ReqwestTestCatalogClient, Arc<MemoryTicketStore>) {
		let (auth, store) = build_reqwest_test_auth_client(host, client_id, shared_secret);
		let catalog = CatalogClient::new(Arc::new(auth), host)
			.expect("Failed to build catalog client for tests.");

		(catalog, store)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
