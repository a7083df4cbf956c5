//! In-process product caches shared by the catalog operations.
//!
//! Two slots exist: the full listing and a point-lookup map keyed by product id. Callers
//! only ever receive clones, so mutating a returned product never reaches the cache.

// self
use crate::{_prelude::*, catalog::Product};

/// Listing slot plus point-lookup map; neither expires.
#[derive(Debug, Default)]
pub struct ProductCache {
	listing: RwLock<Option<Vec<Product>>>,
	by_id: RwLock<HashMap<String, Product>>,
}
impl ProductCache {
	/// Returns a copy of the cached listing, if one was stored.
	pub fn listing(&self) -> Option<Vec<Product>> {
		self.listing.read().clone()
	}

	/// Stores `products` as the full listing.
	pub fn replace_listing(&self, products: Vec<Product>) {
		*self.listing.write() = Some(products);
	}

	/// Stores a batch-lookup result in the listing slot.
	///
	/// Batch lookups and full listings share one slot, so after this call
	/// [`ProductCache::listing`] returns the subset.
	pub fn overwrite_listing_with_subset(&self, subset: Vec<Product>) {
		self.replace_listing(subset);
	}

	/// Returns a copy of the product cached under `id`.
	pub fn lookup(&self, id: &str) -> Option<Product> {
		self.by_id.read().get(id).cloned()
	}

	/// Caches `product` under its own id.
	pub fn remember(&self, product: Product) {
		self.by_id.write().insert(product.id.clone(), product);
	}
}
