//! Client-credentials auth client with an expiry-driven ticket cache.
//!
//! [`AuthClient::access_token`] walks a small cycle per client: with no stored ticket it
//! authenticates, with an expired ticket it refreshes, otherwise it hands back the cached
//! bearer token. Expiry is compared against the wall clock at the start of every call.
//! The whole check-then-request sequence runs under a singleflight guard so concurrent
//! callers on a multi-threaded runtime piggy-back on one upstream request.
//!
//! Refresh requests carry the previous refresh token but keep
//! `grant_type=client_credentials`; the platform accepts that shape and it is what the
//! ticket endpoint has always been sent.

// crates.io
use oauth2::{
	AsyncHttpClient, ClientSecret,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{
		AccessTicket, TicketMetrics, TokenSecret,
		wire::{CLIENT_CREDENTIALS, GrantKind, TicketRequest, TicketResponse, TokenEndpoint},
	},
	config::{self, ApiConfig},
	error::{AuthError, ConfigError},
	http::{HttpTransport, ResponseMetadataSlot},
	obs::{self, CallKind},
	store::{MemoryTicketStore, TicketStore},
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, TlsPolicy};

/// Obtains and keeps fresh a bearer ticket for one application.
pub struct AuthClient<C>
where
	C: HttpTransport,
{
	http_client: Arc<C>,
	store: Arc<dyn TicketStore>,
	client_id: String,
	shared_secret: ClientSecret,
	auth_host: String,
	endpoint: TokenEndpoint,
	metrics: Arc<TicketMetrics>,
	singleflight: Arc<AsyncMutex<()>>,
}
impl<C> AuthClient<C>
where
	C: HttpTransport,
{
	/// Returns a builder; credentials, host, and transport are all required.
	pub fn builder() -> AuthClientBuilder<C> {
		AuthClientBuilder::default()
	}

	/// Counters for upstream ticket requests issued by this client.
	pub fn metrics(&self) -> &TicketMetrics {
		&self.metrics
	}

	/// Store holding the current ticket.
	pub fn store(&self) -> &Arc<dyn TicketStore> {
		&self.store
	}

	/// Endpoint family chosen at construction.
	pub fn endpoint(&self) -> TokenEndpoint {
		self.endpoint
	}

	/// Normalized authorization host, always carrying a scheme.
	pub fn auth_host(&self) -> &str {
		&self.auth_host
	}

	/// Full token endpoint URL used for `grant`.
	pub fn endpoint_url(&self, grant: GrantKind) -> String {
		format!("{}{}", self.auth_host, self.endpoint.path(grant))
	}

	pub(crate) fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Performs the `client_credentials` grant and stores the resulting ticket.
	pub async fn authenticate(&self) -> Result<AccessTicket, AuthError> {
		obs::observe(CallKind::Authenticate, "authenticate", async move {
			self.issue(GrantKind::Authenticate, None).await
		})
		.await
	}

	/// Requests a replacement for `current`, carrying its refresh token, and stores it.
	pub async fn refresh_ticket(&self, current: &AccessTicket) -> Result<AccessTicket, AuthError> {
		obs::observe(CallKind::Refresh, "refresh_ticket", async move {
			self.issue(GrantKind::Refresh, current.refresh_token.as_ref().map(TokenSecret::expose))
				.await
		})
		.await
	}

	/// Returns a valid bearer token, authenticating or refreshing as needed.
	pub async fn access_token(&self) -> Result<TokenSecret, AuthError> {
		obs::observe(CallKind::AccessToken, "access_token", async move {
			let _singleflight = self.singleflight.lock().await;
			let now = OffsetDateTime::now_utc();
			let ticket = match self.store.load().await? {
				None => self.authenticate().await?,
				Some(current) if current.is_expired_at(now) => self.refresh_ticket(&current).await?,
				Some(current) => current,
			};

			Ok::<_, AuthError>(ticket.access_token)
		})
		.await
	}

	async fn issue(
		&self,
		grant: GrantKind,
		refresh_token: Option<&str>,
	) -> Result<AccessTicket, AuthError> {
		let request = TicketRequest {
			client_id: &self.client_id,
			client_secret: self.shared_secret.secret(),
			grant_type: CLIENT_CREDENTIALS,
			refresh_token,
		};

		self.metrics.record_sent(grant);

		let result = async {
			let ticket = self.request_ticket(grant, &request).await?;

			self.store.save(ticket.clone()).await?;

			Ok::<_, AuthError>(ticket)
		}
		.await;

		if result.is_err() {
			self.metrics.record_failed(grant);
		}

		result
	}

	async fn request_ticket(
		&self,
		grant: GrantKind,
		body: &TicketRequest<'_>,
	) -> Result<AccessTicket, AuthError> {
		let payload = serde_json::to_vec(body).map_err(AuthError::Encode)?;
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.endpoint_url(grant))
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT, "application/json")
			.body(payload)?;
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());
		let response =
			handle.call(request).await.map_err(|err| AuthError::transport(err, slot.take()))?;
		let status = response.status();

		if status.is_server_error() {
			return Err(AuthError::ServerStatus {
				status: status.as_u16(),
				reason: status.canonical_reason().unwrap_or("Server Error").to_owned(),
			});
		}

		let completed_at = OffsetDateTime::now_utc();

		TicketResponse::decode(response.body(), status.as_u16())?.into_ticket(completed_at)
	}
}
#[cfg(feature = "reqwest")]
impl AuthClient<ReqwestHttpClient> {
	/// Builds a client from `config` over a reqwest transport honoring `tls`.
	pub fn from_config(config: &ApiConfig, tls: TlsPolicy) -> Result<Self, ConfigError> {
		Self::builder()
			.config(config)
			.transport(ReqwestHttpClient::with_tls_policy(tls)?)
			.build()
	}
}
impl<C> Debug for AuthClient<C>
where
	C: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthClient")
			.field("client_id", &self.client_id)
			.field("auth_host", &self.auth_host)
			.field("endpoint", &self.endpoint)
			.finish()
	}
}

/// Builder for [`AuthClient`].
pub struct AuthClientBuilder<C>
where
	C: HttpTransport,
{
	client_id: Option<String>,
	shared_secret: Option<String>,
	auth_host: Option<String>,
	http_client: Option<Arc<C>>,
	store: Option<Arc<dyn TicketStore>>,
	internal: bool,
}
impl<C> AuthClientBuilder<C>
where
	C: HttpTransport,
{
	/// Copies credentials and the authorization host from `config`.
	pub fn config(mut self, config: &ApiConfig) -> Self {
		self.client_id = config.client_id.clone();
		self.shared_secret = config.shared_secret.clone();
		self.auth_host = config.auth_host.clone();

		self
	}

	/// Sets the application client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the application shared secret.
	pub fn shared_secret(mut self, secret: impl Into<String>) -> Self {
		self.shared_secret = Some(secret.into());

		self
	}

	/// Sets the authorization host; `https://` is prefixed when no scheme is given.
	pub fn auth_host(mut self, host: impl Into<String>) -> Self {
		self.auth_host = Some(host.into());

		self
	}

	/// Sets the HTTP transport.
	pub fn transport(mut self, http_client: impl Into<Arc<C>>) -> Self {
		self.http_client = Some(http_client.into());

		self
	}

	/// Replaces the default in-memory ticket store.
	pub fn store(mut self, store: Arc<dyn TicketStore>) -> Self {
		self.store = Some(store);

		self
	}

	/// Targets the platform-internal token endpoint instead of the standard one.
	pub fn internal(mut self, internal: bool) -> Self {
		self.internal = internal;

		self
	}

	/// Validates the configuration and produces an [`AuthClient`].
	pub fn build(self) -> Result<AuthClient<C>, ConfigError> {
		let client_id = required(self.client_id, "client_id")?;
		let shared_secret = required(self.shared_secret, "shared_secret")?;
		let auth_host = required(self.auth_host, "auth_host")?;
		let http_client = self.http_client.ok_or(ConfigError::MissingTransport)?;
		let auth_host = config::add_protocol_to_host(&auth_host);

		Url::parse(&auth_host)
			.map_err(|source| ConfigError::InvalidHost { host: auth_host.clone(), source })?;

		Ok(AuthClient {
			http_client,
			store: self.store.unwrap_or_else(|| Arc::new(MemoryTicketStore::default())),
			client_id,
			shared_secret: ClientSecret::new(shared_secret),
			auth_host: auth_host.trim_end_matches('/').to_owned(),
			endpoint: TokenEndpoint::from_internal(self.internal),
			metrics: Default::default(),
			singleflight: Default::default(),
		})
	}
}
impl<C> Default for AuthClientBuilder<C>
where
	C: HttpTransport,
{
	fn default() -> Self {
		Self {
			client_id: None,
			shared_secret: None,
			auth_host: None,
			http_client: None,
			store: None,
			internal: false,
		}
	}
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
	value.filter(|value| !value.is_empty()).ok_or(ConfigError::MissingField { field })
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use oauth2::{HttpClientError, HttpRequest, HttpResponse};
	// self
	use super::*;
	use crate::auth::TicketMetricsSnapshot;

	#[derive(Debug)]
	struct NetworkDisabled;
	impl Display for NetworkDisabled {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("Network disabled.")
		}
	}
	impl StdError for NetworkDisabled {}

	#[derive(Clone, Default)]
	struct OfflineTransport {
		calls: Arc<AtomicUsize>,
	}
	impl HttpTransport for OfflineTransport {
		type Handle = OfflineHandle;
		type TransportError = NetworkDisabled;

		fn with_metadata(&self, _slot: ResponseMetadataSlot) -> Self::Handle {
			OfflineHandle { calls: self.calls.clone() }
		}
	}

	struct OfflineHandle {
		calls: Arc<AtomicUsize>,
	}
	impl<'c> AsyncHttpClient<'c> for OfflineHandle {
		type Error = HttpClientError<NetworkDisabled>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, _request: HttpRequest) -> Self::Future {
			self.calls.fetch_add(1, Ordering::SeqCst);

			Box::pin(async { Err(HttpClientError::Reqwest(Box::new(NetworkDisabled))) })
		}
	}

	fn complete_builder(transport: OfflineTransport) -> AuthClientBuilder<OfflineTransport> {
		AuthClient::builder()
			.client_id("client")
			.shared_secret("secret")
			.auth_host("auth.example.com")
			.transport(transport)
	}

	#[test]
	fn build_rejects_missing_or_empty_credentials() {
		let missing_id = AuthClient::<OfflineTransport>::builder()
			.shared_secret("secret")
			.auth_host("auth.example.com")
			.transport(OfflineTransport::default())
			.build()
			.expect_err("Missing client id should fail.");

		assert!(matches!(missing_id, ConfigError::MissingField { field: "client_id" }));

		let empty_secret = complete_builder(OfflineTransport::default())
			.shared_secret("")
			.build()
			.expect_err("Empty shared secret should fail.");

		assert!(matches!(empty_secret, ConfigError::MissingField { field: "shared_secret" }));

		let missing_host = AuthClient::<OfflineTransport>::builder()
			.client_id("client")
			.shared_secret("secret")
			.transport(OfflineTransport::default())
			.build()
			.expect_err("Missing auth host should fail.");

		assert!(matches!(missing_host, ConfigError::MissingField { field: "auth_host" }));
	}

	#[test]
	fn build_requires_transport() {
		let err = AuthClient::<OfflineTransport>::builder()
			.client_id("client")
			.shared_secret("secret")
			.auth_host("auth.example.com")
			.build()
			.expect_err("Missing transport should fail.");

		assert!(matches!(err, ConfigError::MissingTransport));
	}

	#[test]
	fn host_without_scheme_gains_https() {
		let client = complete_builder(OfflineTransport::default())
			.build()
			.expect("Complete builder should succeed.");

		assert_eq!(client.auth_host(), "https://auth.example.com");
		assert_eq!(
			client.endpoint_url(GrantKind::Authenticate),
			"https://auth.example.com/api/platform/applications/authtickets/oauth",
		);

		let internal = complete_builder(OfflineTransport::default())
			.auth_host("http://auth.local/")
			.internal(true)
			.build()
			.expect("Internal builder should succeed.");

		assert_eq!(
			internal.endpoint_url(GrantKind::Authenticate),
			"http://auth.local/platform/applications/internal/access-tokens/oauth",
		);
	}

	#[tokio::test]
	async fn fresh_ticket_is_served_without_network() {
		let transport = OfflineTransport::default();
		let ticket = AccessTicket::builder()
			.access_token("cached")
			.expires_in(Duration::minutes(30))
			.build()
			.expect("Ticket fixture should build.");
		let client = complete_builder(transport.clone())
			.store(Arc::new(MemoryTicketStore::with_ticket(ticket)))
			.build()
			.expect("Complete builder should succeed.");
		let token = client.access_token().await.expect("Cached token should be returned.");

		assert_eq!(token.expose(), "cached");
		assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn transport_failure_surfaces_as_auth_error() {
		let transport = OfflineTransport::default();
		let client = complete_builder(transport.clone()).build().expect("Builder should succeed.");
		let err = client.access_token().await.expect_err("Offline transport should fail.");

		assert!(matches!(err, AuthError::Transport { status: None, .. }));
		assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
		assert_eq!(
			client.metrics().snapshot(),
			TicketMetricsSnapshot { authentications: 1, authentication_failures: 1, ..Default::default() }
		);
		assert!(client.store().load().await.expect("Load should succeed.").is_none());
	}
}
