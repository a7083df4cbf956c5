//! Product catalog queries over the commerce GraphQL endpoint.
//!
//! Upstream `CatalogItem` documents decode into the partial shapes in [`wire`], which
//! [`product::Product::from`] normalizes in one place with a default for every missing
//! field. [`client::CatalogClient`] issues the queries and memoizes results in a
//! [`cache::ProductCache`].

pub mod cache;
pub mod client;
pub mod filter;
pub mod product;
pub mod wire;

mod metrics;

pub use cache::*;
pub use client::*;
pub use filter::*;
pub use metrics::*;
pub use product::*;
