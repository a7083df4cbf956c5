//! Composition root wiring one shared auth client into the catalog client.

// self
use crate::{
	_prelude::*,
	auth::AuthClient,
	catalog::CatalogClient,
	config::{ApiConfig, HostedConfig},
	error::ConfigError,
	http::HttpTransport,
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, TlsPolicy};

/// Auth and catalog clients sharing one ticket cache.
///
/// Build exactly one per process after configuration is loaded and hand out references.
pub struct Commerce<C>
where
	C: HttpTransport,
{
	auth: Arc<AuthClient<C>>,
	catalog: CatalogClient<C>,
}
impl<C> Commerce<C>
where
	C: HttpTransport,
{
	/// Builds the auth client first, then the catalog client over it.
	///
	/// Fails with [`ConfigError`] before any network call when a value is missing.
	pub fn from_config(
		config: &ApiConfig,
		transport: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		let auth = Arc::new(AuthClient::builder().config(config).transport(transport).build()?);
		let api_host = config.api_host.as_deref().unwrap_or_default();
		let catalog = CatalogClient::new(auth.clone(), api_host)?;

		Ok(Self { auth, catalog })
	}

	/// Forwards the hosted-runtime `x-vol-*` headers on every catalog query.
	pub fn with_hosted(mut self, hosted: &HostedConfig) -> Self {
		self.catalog = self.catalog.with_api_headers(hosted.api_headers());

		self
	}

	/// Shared auth client.
	pub fn auth(&self) -> &Arc<AuthClient<C>> {
		&self.auth
	}

	/// Catalog client.
	pub fn catalog(&self) -> &CatalogClient<C> {
		&self.catalog
	}
}
#[cfg(feature = "reqwest")]
impl Commerce<ReqwestHttpClient> {
	/// Loads [`ApiConfig`] and, when present, [`HostedConfig`] from the environment and builds
	/// the clients over a reqwest transport honoring `tls`.
	pub fn from_env(tls: TlsPolicy) -> Result<Self, ConfigError> {
		let config = ApiConfig::from_env()?;
		let commerce = Self::from_config(&config, ReqwestHttpClient::with_tls_policy(tls)?)?;

		#[cfg(feature = "tracing")]
		tracing::info!(config = ?config, "Commerce clients constructed.");

		Ok(match HostedConfig::from_env()? {
			Some(hosted) => commerce.with_hosted(&hosted),
			None => commerce,
		})
	}
}
impl<C> Debug for Commerce<C>
where
	C: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Commerce")
			.field("auth", &self.auth)
			.field("catalog", &self.catalog)
			.finish()
	}
}
