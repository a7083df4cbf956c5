//! Environment-sourced API configuration and host helpers.
//!
//! [`ApiConfig`] mirrors the four values the platform needs (`client_id`, `shared_secret`,
//! `auth_host`, `api_host`). Values load from `NEXT_PUBLIC_KIBO_*` variables first and are
//! overridden by `KIBO_*` variables. Nothing is validated at load time; clients validate
//! during construction so a partially configured environment fails where it is used.
//!
//! [`HostedConfig`] reads the hosted-runtime `mozuHosted` JSON document and turns its
//! `sdkConfig` entries into `x-vol-*` request headers.

// std
use std::env::VarError;
// crates.io
use figment::{Figment, providers::Env};
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment prefix used by browser-exposed builds.
pub const PUBLIC_ENV_PREFIX: &str = "NEXT_PUBLIC_KIBO_";
/// Environment prefix used by server-side builds; takes precedence.
pub const ENV_PREFIX: &str = "KIBO_";
/// Environment variable carrying the hosted-runtime configuration document.
pub const HOSTED_ENV_VAR: &str = "mozuHosted";

const HEADER_PREFIX: &str = "x-vol-";
const HOSTED_HEADER_KEYS: [&str; 6] =
	["app-claims", "user-claims", "tenant", "site", "master-catalog", "catalog"];

/// Credentials and hosts used to reach the commerce platform.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
	/// Application client identifier.
	pub client_id: Option<String>,
	/// Application shared secret; never logged.
	pub shared_secret: Option<String>,
	/// Authorization host, with or without a scheme.
	pub auth_host: Option<String>,
	/// API host serving `/graphql`, with or without a scheme.
	pub api_host: Option<String>,
}
impl ApiConfig {
	/// Loads the configuration from `NEXT_PUBLIC_KIBO_*` and `KIBO_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::figment().extract().map_err(ConfigError::from)
	}

	/// Figment layering used by [`ApiConfig::from_env`]; later providers win.
	pub fn figment() -> Figment {
		Figment::new().merge(Env::prefixed(PUBLIC_ENV_PREFIX)).merge(Env::prefixed(ENV_PREFIX))
	}

	/// Returns `true` when every value is present and non-empty.
	pub fn is_complete(&self) -> bool {
		[&self.client_id, &self.shared_secret, &self.auth_host, &self.api_host]
			.into_iter()
			.all(|value| present(value.as_deref()).is_some())
	}

	/// Returns a copy whose hosts carry an explicit scheme.
	pub fn with_normalized_hosts(mut self) -> Self {
		self.auth_host = self.auth_host.as_deref().map(add_protocol_to_host);
		self.api_host = self.api_host.as_deref().map(add_protocol_to_host);

		self
	}
}
impl Debug for ApiConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiConfig")
			.field("client_id", &self.client_id)
			.field("shared_secret", &self.shared_secret.as_ref().map(|_| "<redacted>"))
			.field("auth_host", &self.auth_host)
			.field("api_host", &self.api_host)
			.finish()
	}
}

/// Hosted-runtime settings forwarded to the API as `x-vol-*` headers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct HostedConfig {
	/// Raw `sdkConfig` entries keyed by header suffix.
	#[serde(flatten)]
	pub values: BTreeMap<String, serde_json::Value>,
}
impl HostedConfig {
	/// Parses the `sdkConfig` object out of a hosted-runtime JSON document.
	pub fn from_json(document: &str) -> Result<Self, ConfigError> {
		#[derive(Deserialize)]
		struct Document {
			#[serde(rename = "sdkConfig", default)]
			sdk_config: HostedConfig,
		}

		serde_json::from_str::<Document>(document)
			.map(|doc| doc.sdk_config)
			.map_err(ConfigError::HostedParse)
	}

	/// Reads [`HOSTED_ENV_VAR`]; returns `Ok(None)` when the variable is unset.
	pub fn from_env() -> Result<Option<Self>, ConfigError> {
		Self::from_var(std::env::var(HOSTED_ENV_VAR))
	}

	fn from_var(var: Result<String, VarError>) -> Result<Option<Self>, ConfigError> {
		match var {
			Ok(document) => Self::from_json(&document).map(Some),
			Err(VarError::NotPresent) => Ok(None),
			Err(VarError::NotUnicode(_)) => Err(ConfigError::HostedNotUnicode { var: HOSTED_ENV_VAR }),
		}
	}

	/// Maps every recognized, non-empty entry to its `x-vol-<key>` header.
	pub fn api_headers(&self) -> BTreeMap<String, String> {
		HOSTED_HEADER_KEYS
			.iter()
			.filter_map(|key| {
				let value = match self.values.get(*key)? {
					serde_json::Value::Null | serde_json::Value::Bool(false) => return None,
					serde_json::Value::String(text) => present(Some(text.as_str()))?.to_owned(),
					other => other.to_string(),
				};

				Some((format!("{HEADER_PREFIX}{key}"), value))
			})
			.collect()
	}
}

/// Prefixes `https://` unless the host already names an `http://` or `https://` scheme.
pub fn add_protocol_to_host(host: &str) -> String {
	if host.is_empty() || host.contains("http://") || host.contains("https://") {
		host.to_owned()
	} else {
		format!("https://{host}")
	}
}

/// Treats empty strings as absent, matching how credentials are validated.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.is_empty())
}
