//! Website-builder content SDK settings and component group registry.
//!
//! Component groups organize editor components: a group either collects components that
//! name it explicitly or, for catch-all groups, every component that names no group.

// crates.io
use figment::{Figment, providers::Env};
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment prefix of the website-builder settings.
pub const CONTENT_ENV_PREFIX: &str = "NEXT_PUBLIC_WEBSITE_BUILDER_API_";

/// Website-builder API settings.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentSdkConfig {
	/// API key; never logged.
	#[serde(rename = "key", default)]
	pub api_key: Option<String>,
	/// API host.
	#[serde(rename = "host", default)]
	pub api_host: Option<String>,
	/// Tenant identifier.
	#[serde(rename = "tenant", default)]
	pub api_tenant: Option<String>,
	/// Whether unpublished (preview) content is requested.
	#[serde(skip)]
	pub preview: bool,
}
impl ContentSdkConfig {
	/// Loads `NEXT_PUBLIC_WEBSITE_BUILDER_API_{KEY,HOST,TENANT}`.
	///
	/// `preview` is a caller choice and never read from the environment.
	pub fn from_env(preview: bool) -> Result<Self, ConfigError> {
		let mut config = Self::figment().extract::<Self>()?;

		config.preview = preview;

		Ok(config)
	}

	/// Figment used by [`ContentSdkConfig::from_env`].
	pub fn figment() -> Figment {
		Figment::new().merge(Env::prefixed(CONTENT_ENV_PREFIX))
	}
}
impl Debug for ContentSdkConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ContentSdkConfig")
			.field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
			.field("api_host", &self.api_host)
			.field("api_tenant", &self.api_tenant)
			.field("preview", &self.preview)
			.finish()
	}
}

/// Membership rule of a [`ComponentGroup`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupFilter {
	/// Components whose group names this one.
	#[default]
	Explicit,
	/// Components that name no group.
	Ungrouped,
}

/// Named group shown in the page editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentGroup {
	/// Identifier referenced by component manifests.
	pub name: String,
	/// Display label.
	pub label: String,
	/// Display description.
	pub description: String,
	/// Membership rule.
	pub filter: GroupFilter,
}
impl ComponentGroup {
	/// Creates an explicit-membership group.
	pub fn new(
		name: impl Into<String>,
		label: impl Into<String>,
		description: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			label: label.into(),
			description: description.into(),
			filter: GroupFilter::Explicit,
		}
	}

	/// Replaces the membership rule.
	pub fn with_filter(mut self, filter: GroupFilter) -> Self {
		self.filter = filter;

		self
	}

	/// Returns `true` when a component declaring `component_group` belongs here.
	///
	/// An empty group name counts as no group.
	pub fn accepts(&self, component_group: Option<&str>) -> bool {
		match (self.filter, component_group.filter(|group| !group.is_empty())) {
			(GroupFilter::Explicit, Some(group)) => group == self.name,
			(GroupFilter::Ungrouped, None) => true,
			_ => false,
		}
	}
}

/// Ordered set of component groups, unique by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupRegistry(Vec<ComponentGroup>);
impl GroupRegistry {
	/// Registry holding the storefront's standard groups.
	pub fn default_groups() -> Self {
		let mut registry = Self::default();

		registry.register(ComponentGroup::new(
			"basic",
			"Basic",
			"Components for simple content creation",
		));
		registry.register(ComponentGroup::new(
			"sample",
			"Sample Ecommerce",
			"Sample ecommerce components",
		));
		registry.register(ComponentGroup::new("kibo", "Kibo Commerce", "Kibo Commerce components"));
		registry.register(
			ComponentGroup::new("custom", "Custom", "Assorted custom components")
				.with_filter(GroupFilter::Ungrouped),
		);

		registry
	}

	/// Adds `group`, replacing an existing group of the same name in its original position.
	pub fn register(&mut self, group: ComponentGroup) {
		match self.0.iter_mut().find(|existing| existing.name == group.name) {
			Some(existing) => *existing = group,
			None => self.0.push(group),
		}
	}

	/// Groups in registration order.
	pub fn groups(&self) -> &[ComponentGroup] {
		&self.0
	}

	/// Looks a group up by name.
	pub fn get(&self, name: &str) -> Option<&ComponentGroup> {
		self.0.iter().find(|group| group.name == name)
	}

	/// First group, in registration order, that accepts a component declaring
	/// `component_group`.
	pub fn group_for(&self, component_group: Option<&str>) -> Option<&ComponentGroup> {
		self.0.iter().find(|group| group.accepts(component_group))
	}
}
