// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for one catalog client.
#[derive(Debug, Default)]
pub struct CatalogMetrics {
	queries: AtomicU64,
	cache_hits: AtomicU64,
}
impl CatalogMetrics {
	/// Returns the number of GraphQL queries sent upstream.
	pub fn queries(&self) -> u64 {
		self.queries.load(Ordering::Relaxed)
	}

	/// Returns the number of calls answered from the in-process caches.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	pub(crate) fn record_query(&self) {
		self.queries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}
}
