//! GraphQL document, request body, and partial response shapes.
//!
//! Every field is optional: the catalog treats an absent or oddly shaped payload as
//! "no results" rather than an error.

// crates.io
use serde::{Deserializer, de::DeserializeOwned};
// self
use crate::{_prelude::*, catalog::ProductFilter};

/// Product query sent for listings, batch lookups, and point lookups alike.
pub const PRODUCT_QUERY: &str = r#"
query GetProduct($filter: String) {
  products(filter: $filter) {
    totalCount
    items {
      price {
        price
      }
      categories {
        content {
          name
        }
      }
      content {
        productName
        productShortDescription
        productFullDescription
        productImages {
          imageUrl
        }
      }
      productCode
    }
  }
}"#;

/// GraphQL request body.
#[derive(Clone, Debug, Serialize)]
pub struct GraphQlRequest<'a> {
	/// Query document.
	pub query: &'static str,
	/// Query variables.
	pub variables: ProductVariables<'a>,
}
impl<'a> GraphQlRequest<'a> {
	/// Builds the product query for `filter`.
	pub fn products(filter: &'a ProductFilter) -> Self {
		Self { query: PRODUCT_QUERY, variables: ProductVariables { filter: filter.as_str() } }
	}
}

/// Variables for [`PRODUCT_QUERY`].
#[derive(Clone, Debug, Serialize)]
pub struct ProductVariables<'a> {
	/// Filter expression; empty selects every product.
	pub filter: &'a str,
}

/// Top-level GraphQL response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductsEnvelope {
	/// `data` member; absent on GraphQL errors.
	#[serde(default, deserialize_with = "lenient")]
	pub data: Option<ProductsData>,
}
impl ProductsEnvelope {
	/// Decodes `body`, yielding `None` when it is not JSON or lacks `data.products.items`.
	///
	/// Items keep their upstream positions. An entry that is not an object decodes as an
	/// empty [`CatalogItem`].
	pub fn items_from_slice(body: &[u8]) -> Option<Vec<CatalogItem>> {
		let envelope = serde_json::from_slice::<Self>(body).ok()?;
		let items = envelope.data?.products?.items?;

		Some(items.into_iter().map(decode_or_default).collect())
	}
}

/// `data` member of the product query response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductsData {
	/// Product collection.
	#[serde(default, deserialize_with = "lenient")]
	pub products: Option<ProductCollection>,
}

/// Product collection page.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductCollection {
	/// Raw items, decoded one at a time.
	#[serde(default, deserialize_with = "lenient")]
	pub items: Option<Vec<serde_json::Value>>,
}

/// Upstream product representation.
///
/// Every leaf decodes on its own: a value of the wrong type reads as absent and leaves the
/// rest of the item intact.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
	/// Stable product code.
	#[serde(default, deserialize_with = "lenient")]
	pub product_code: Option<String>,
	/// Localized content block.
	#[serde(default, deserialize_with = "lenient")]
	pub content: Option<ItemContent>,
	/// Price block.
	#[serde(default, deserialize_with = "lenient")]
	pub price: Option<PriceBlock>,
	/// Categories the product belongs to; the first one is used.
	#[serde(default, deserialize_with = "lenient_seq")]
	pub categories: Option<Vec<ItemCategory>>,
}

/// Content block of a [`CatalogItem`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContent {
	/// Display name.
	#[serde(default, deserialize_with = "lenient")]
	pub product_name: Option<String>,
	/// Short description; preferred over the full one.
	#[serde(default, deserialize_with = "lenient")]
	pub product_short_description: Option<String>,
	/// Full description.
	#[serde(default, deserialize_with = "lenient")]
	pub product_full_description: Option<String>,
	/// Images; the first one is used.
	#[serde(default, deserialize_with = "lenient_seq")]
	pub product_images: Option<Vec<ProductImage>>,
}

/// Product image entry.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
	/// Image URL.
	#[serde(default, deserialize_with = "lenient")]
	pub image_url: Option<String>,
}

/// Price block of a [`CatalogItem`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PriceBlock {
	/// List price.
	#[serde(default, deserialize_with = "lenient")]
	pub price: Option<f64>,
}

/// Category entry of a [`CatalogItem`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ItemCategory {
	/// Category content block.
	#[serde(default, deserialize_with = "lenient")]
	pub content: Option<CategoryContent>,
}

/// Category content block.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CategoryContent {
	/// Category display name.
	#[serde(default, deserialize_with = "lenient")]
	pub name: Option<String>,
}

fn decode_or_default<T>(value: serde_json::Value) -> T
where
	T: DeserializeOwned + Default,
{
	T::deserialize(value).unwrap_or_else(|_e| {
		#[cfg(feature = "tracing")]
		tracing::debug!(error = %_e, "Catalog entry has an unexpected shape; using defaults.");

		T::default()
	})
}

/// Reads any JSON value and keeps it only if it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned,
{
	let value = serde_json::Value::deserialize(deserializer)?;

	Ok(T::deserialize(value).ok())
}

/// Like [`lenient`] for arrays, defaulting malformed elements so positions are preserved.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned + Default,
{
	match serde_json::Value::deserialize(deserializer)? {
		serde_json::Value::Array(values) =>
			Ok(Some(values.into_iter().map(decode_or_default).collect())),
		_ => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_body_carries_query_and_filter() {
		let filter = ProductFilter::product_code("P1");
		let body = serde_json::to_value(GraphQlRequest::products(&filter))
			.expect("GraphQL request should serialize.");

		assert_eq!(body["variables"]["filter"], "productCode eq P1");
		assert!(body["query"].as_str().is_some_and(|query| query.contains("products(filter: $filter)")));
	}

	#[test]
	fn missing_shapes_yield_none() {
		assert!(ProductsEnvelope::items_from_slice(b"not json").is_none());
		assert!(ProductsEnvelope::items_from_slice(b"null").is_none());
		assert!(ProductsEnvelope::items_from_slice(br#"{"errors":[{"message":"boom"}]}"#).is_none());
		assert!(ProductsEnvelope::items_from_slice(br#"{"data":{"products":{"totalCount":0}}}"#).is_none());
	}

	#[test]
	fn wrong_types_fall_back_per_field() {
		let items = ProductsEnvelope::items_from_slice(
			br#"{"data":{"products":{"items":[
				{"productCode":"P1","price":{"price":"9.99"},"content":{"productName":"Shoe"}},
				"not an object",
				{"productCode":"P2","categories":[{"content":{"name":7}},{"content":{"name":"Tools"}}]}
			]}}}"#,
		)
		.expect("Items should decode.");
		let codes = items.iter().map(|item| item.product_code.as_deref()).collect::<Vec<_>>();

		assert_eq!(codes, [Some("P1"), None, Some("P2")]);
		assert_eq!(items[0].price, Some(PriceBlock { price: None }));
		assert_eq!(
			items[0].content.as_ref().and_then(|content| content.product_name.as_deref()),
			Some("Shoe")
		);

		let categories = items[2].categories.as_ref().expect("Categories should decode.");

		assert_eq!(categories.len(), 2);
		assert_eq!(categories[0].content, Some(CategoryContent { name: None }));
	}

	#[test]
	fn fractional_total_count_does_not_hide_items() {
		let items = ProductsEnvelope::items_from_slice(
			br#"{"data":{"products":{"totalCount":2.0,"items":[{"productCode":"P1"}]}}}"#,
		)
		.expect("Items should decode.");

		assert_eq!(items.len(), 1);
		assert_eq!(items[0].product_code.as_deref(), Some("P1"));
	}
}
