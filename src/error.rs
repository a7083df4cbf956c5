//! Crate-level error types shared by the auth client, catalog client, and configuration layer.

// self
use crate::{_prelude::*, auth::TicketBuilderError, http::ResponseMetadata, store::StoreError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Missing or invalid configuration.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Access ticket could not be obtained or refreshed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Catalog query failed in transport.
	#[error(transparent)]
	Fetch(#[from] FetchError),
}

/// Configuration and validation failures raised while constructing clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required configuration value is absent or empty.
	#[error("Configuration is missing `{field}`.")]
	MissingField {
		/// Name of the missing field.
		field: &'static str,
	},
	/// No HTTP transport was supplied to the client builder.
	#[error("Auth client requires an HTTP transport implementation.")]
	MissingTransport,
	/// A host value cannot be parsed as a URL after protocol normalization.
	#[error("Host `{host}` is not a valid URL.")]
	InvalidHost {
		/// Normalized host value that failed to parse.
		host: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Environment-sourced configuration could not be extracted.
	#[error("Configuration could not be loaded from the environment.")]
	Load(#[from] Box<figment::Error>),
	/// Hosted-environment configuration JSON is malformed.
	#[error("Hosted configuration could not be parsed.")]
	HostedParse(#[source] serde_json::Error),
	/// Hosted-environment configuration variable holds non-UTF-8 bytes.
	#[error("Hosted configuration variable `{var}` is not valid UTF-8.")]
	HostedNotUnicode {
		/// Name of the offending variable.
		var: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<figment::Error> for ConfigError {
	fn from(e: figment::Error) -> Self {
		Self::Load(Box::new(e))
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while authenticating or refreshing the access ticket.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Authorization host answered with a 5xx status.
	#[error("Authorization server failed with status {status}: {reason}.")]
	ServerStatus {
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase for the status.
		reason: String,
	},
	/// Authorization host returned an application-level error in the ticket body.
	#[error("Authorization server rejected the request: {message}.")]
	Rejected {
		/// Application error code echoed in `errorCode`.
		code: String,
		/// Human-readable message echoed in `message`.
		message: String,
	},
	/// Ticket body is not the expected JSON document.
	#[error("Authorization server returned a malformed ticket.")]
	MalformedTicket {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Ticket body lacks a required field.
	#[error(transparent)]
	IncompleteTicket(#[from] TicketBuilderError),
	/// Ticket declared a lifetime of zero or less.
	#[error("The expires_in value must be positive, got {expires_in}.")]
	NonPositiveExpiresIn {
		/// Declared lifetime in seconds.
		expires_in: f64,
	},
	/// Ticket declared a lifetime that overflows the supported date range.
	#[error("The expires_in value {expires_in} is out of range.")]
	ExpiresInOutOfRange {
		/// Declared lifetime in seconds.
		expires_in: f64,
	},
	/// Token request could not be assembled.
	#[error("Token request could not be built.")]
	Request(#[from] oauth2::http::Error),
	/// Token request body could not be encoded.
	#[error("Token request body could not be encoded.")]
	Encode(#[source] serde_json::Error),
	/// Transport failed before a response was received.
	#[error("Network error occurred while calling the authorization server.")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
		/// Last observed HTTP status, when available.
		status: Option<u16>,
	},
	/// Ticket store failed to load or save the current ticket.
	#[error(transparent)]
	Store(#[from] StoreError),
}
impl AuthError {
	/// Wraps a transport failure together with whatever response metadata was captured.
	pub fn transport(
		src: impl 'static + Send + Sync + std::error::Error,
		meta: Option<ResponseMetadata>,
	) -> Self {
		Self::Transport { source: Box::new(src), status: meta.and_then(|value| value.status) }
	}
}

/// Failures raised while querying the catalog endpoint.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// Transport failed before a response was received.
	#[error("Network error occurred while querying the catalog.")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
		/// Last observed HTTP status, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Catalog request could not be assembled.
	#[error("Catalog request could not be built.")]
	Request(#[from] oauth2::http::Error),
	/// Catalog request body could not be encoded.
	#[error("Catalog request body could not be encoded.")]
	Encode(#[source] serde_json::Error),
}
impl FetchError {
	/// Wraps a transport failure together with whatever response metadata was captured.
	pub fn transport(
		src: impl 'static + Send + Sync + std::error::Error,
		meta: Option<ResponseMetadata>,
	) -> Self {
		let meta = meta.unwrap_or_default();

		Self::Transport {
			source: Box::new(src),
			status: meta.status,
			retry_after: meta.retry_after,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn auth_errors_convert_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "ticket cache unreachable".into() };
		let error: Error = AuthError::from(store_error).into();

		assert!(matches!(error, Error::Auth(AuthError::Store(_))));
		assert!(error.to_string().contains("ticket cache unreachable"));
	}

	#[test]
	fn fetch_transport_error_keeps_metadata() {
		let err = FetchError::transport(
			std::io::Error::other("connection reset"),
			Some(ResponseMetadata { status: Some(502), retry_after: Some(Duration::seconds(3)) }),
		);

		match err {
			FetchError::Transport { status, retry_after, source } => {
				assert_eq!(status, Some(502));
				assert_eq!(retry_after, Some(Duration::seconds(3)));
				assert_eq!(source.to_string(), "connection reset");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn missing_field_names_the_field() {
		let err = ConfigError::MissingField { field: "shared_secret" };

		assert_eq!(err.to_string(), "Configuration is missing `shared_secret`.");
	}
}
