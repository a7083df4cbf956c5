//! Normalized product shape and the single mapping from upstream catalog items.

// self
use crate::{_prelude::*, catalog::wire::CatalogItem};

/// Rating assigned to every product; the catalog has no review data.
pub const DEFAULT_RATING: Rating = Rating { rate: 3.0, count: 0 };

/// Normalized product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
	/// Stable catalog code.
	pub id: String,
	/// Display name.
	pub title: String,
	/// Non-negative list price.
	pub price: f64,
	/// Short description, falling back to the full description.
	pub description: String,
	/// Name of the first category.
	pub category: String,
	/// URL of the first image.
	pub image: String,
	/// Rating summary.
	pub rating: Rating,
}

/// Rating summary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
	/// Average rate.
	pub rate: f64,
	/// Number of ratings.
	pub count: u64,
}

impl From<CatalogItem> for Product {
	fn from(item: CatalogItem) -> Self {
		let CatalogItem { product_code, content, price, categories } = item;
		let content = content.unwrap_or_default();
		let description = non_empty(content.product_short_description)
			.or_else(|| non_empty(content.product_full_description));
		let category = categories
			.and_then(|categories| categories.into_iter().next())
			.and_then(|category| category.content)
			.and_then(|content| content.name);
		let image = content
			.product_images
			.and_then(|images| images.into_iter().next())
			.and_then(|image| image.image_url);
		let price = price
			.and_then(|block| block.price)
			.filter(|price| price.is_finite() && *price > 0.0)
			.unwrap_or(0.0);

		Self {
			id: product_code.unwrap_or_default(),
			title: content.product_name.unwrap_or_default(),
			price,
			description: description.unwrap_or_default(),
			category: category.unwrap_or_default(),
			image: image.unwrap_or_default(),
			rating: DEFAULT_RATING,
		}
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}
