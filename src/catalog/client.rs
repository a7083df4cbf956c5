//! GraphQL catalog client with in-process listing and point-lookup caches.
//!
//! Every upstream query asks the shared [`AuthClient`] for a bearer token first, so an
//! expired ticket is renewed transparently before the request leaves the process.
//! Response bodies are decoded leniently: a body that is not JSON or lacks
//! `data.products.items` yields no products instead of an error. Only transport failures
//! surface as [`FetchError`].

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::AuthClient,
	catalog::{
		CatalogMetrics, Product, ProductCache, ProductFilter,
		wire::{CatalogItem, GraphQlRequest, ProductsEnvelope},
	},
	config,
	error::{ConfigError, FetchError},
	http::{HttpTransport, ResponseMetadataSlot},
	obs::{self, CallKind},
};

/// Path of the GraphQL endpoint below the API host.
pub const GRAPHQL_PATH: &str = "/graphql";

/// Queries normalized products and memoizes them.
pub struct CatalogClient<C>
where
	C: HttpTransport,
{
	auth: Arc<AuthClient<C>>,
	endpoint: String,
	api_headers: BTreeMap<String, String>,
	cache: ProductCache,
	metrics: Arc<CatalogMetrics>,
}
impl<C> CatalogClient<C>
where
	C: HttpTransport,
{
	/// Creates a client that authenticates through `auth` and queries `{api_host}/graphql`.
	///
	/// `https://` is prefixed when `api_host` carries no scheme.
	pub fn new(auth: Arc<AuthClient<C>>, api_host: &str) -> Result<Self, ConfigError> {
		let api_host = config::present(Some(api_host))
			.ok_or(ConfigError::MissingField { field: "api_host" })?;
		let api_host = config::add_protocol_to_host(api_host);
		let endpoint = format!("{}{GRAPHQL_PATH}", api_host.trim_end_matches('/'));

		Url::parse(&endpoint)
			.map_err(|source| ConfigError::InvalidHost { host: api_host, source })?;

		Ok(Self {
			auth,
			endpoint,
			api_headers: BTreeMap::new(),
			cache: ProductCache::default(),
			metrics: Default::default(),
		})
	}

	/// Attaches extra headers (typically `x-vol-*` hosted-runtime headers) to every query.
	pub fn with_api_headers(mut self, headers: BTreeMap<String, String>) -> Self {
		self.api_headers = headers;

		self
	}

	/// Auth client supplying bearer tokens.
	pub fn auth(&self) -> &Arc<AuthClient<C>> {
		&self.auth
	}

	/// Full GraphQL endpoint URL.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Product caches backing this client.
	pub fn cache(&self) -> &ProductCache {
		&self.cache
	}

	/// Query and cache-hit counters.
	pub fn metrics(&self) -> &CatalogMetrics {
		&self.metrics
	}

	/// Returns every product, serving a copy of the cached listing when one exists.
	///
	/// An upstream response without `data.products.items` yields an empty list and leaves
	/// the cache untouched.
	pub async fn list_products(&self) -> Result<Vec<Product>> {
		obs::observe(CallKind::ListProducts, "list_products", async move {
			if let Some(listing) = self.cache.listing() {
				self.metrics.record_cache_hit();

				return Ok(listing);
			}

			let Some(items) = self.query(&ProductFilter::all()).await? else {
				return Ok(Vec::new());
			};
			let products = normalize(items);

			self.cache.replace_listing(products.clone());

			Ok::<_, Error>(products)
		})
		.await
	}

	/// Returns the products whose codes appear in `ids`, in upstream order.
	///
	/// The result replaces the cached listing, so a later [`CatalogClient::list_products`]
	/// serves this subset. An empty `ids` returns immediately without any network call.
	pub async fn get_products<S>(&self, ids: &[S]) -> Result<Vec<Product>>
	where
		S: AsRef<str> + Sync,
	{
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		obs::observe(CallKind::GetProducts, "get_products", async move {
			let filter = ProductFilter::product_codes(ids);
			let Some(items) = self.query(&filter).await? else {
				return Ok(Vec::new());
			};
			let products = normalize(items);

			self.cache.overwrite_listing_with_subset(products.clone());

			Ok::<_, Error>(products)
		})
		.await
	}

	/// Returns the product with code `id`, or `None` when upstream has no match.
	///
	/// Hits are served from the point-lookup cache; fetched products are cached under their
	/// normalized id.
	pub async fn get_product(&self, id: &str) -> Result<Option<Product>> {
		obs::observe(CallKind::GetProduct, "get_product", async move {
			if let Some(product) = self.cache.lookup(id) {
				self.metrics.record_cache_hit();

				return Ok(Some(product));
			}

			let product = self
				.query(&ProductFilter::product_code(id))
				.await?
				.and_then(|items| items.into_iter().next())
				.map(Product::from);

			if let Some(product) = &product {
				self.cache.remember(product.clone());
			}

			Ok::<_, Error>(product)
		})
		.await
	}

	async fn query(&self, filter: &ProductFilter) -> Result<Option<Vec<CatalogItem>>> {
		let token = self.auth.access_token().await?;
		let payload =
			serde_json::to_vec(&GraphQlRequest::products(filter)).map_err(FetchError::Encode)?;
		let mut builder = Request::builder()
			.method(Method::POST)
			.uri(&self.endpoint)
			.header(AUTHORIZATION, token.bearer())
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT, "application/json");

		for (name, value) in &self.api_headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let request = builder.body(payload).map_err(FetchError::from)?;
		let slot = ResponseMetadataSlot::default();
		let handle = self.auth.http_client().with_metadata(slot.clone());

		self.metrics.record_query();

		let response =
			handle.call(request).await.map_err(|err| FetchError::transport(err, slot.take()))?;

		#[cfg(feature = "tracing")]
		tracing::debug!(status = response.status().as_u16(), "Catalog query completed.");

		Ok(ProductsEnvelope::items_from_slice(response.body()))
	}
}
impl<C> Debug for CatalogClient<C>
where
	C: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CatalogClient")
			.field("endpoint", &self.endpoint)
			.field("api_headers", &self.api_headers.keys().collect::<Vec<_>>())
			.finish()
	}
}

fn normalize(items: Vec<CatalogItem>) -> Vec<Product> {
	items.into_iter().map(Product::from).collect()
}
