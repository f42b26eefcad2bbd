//! Endpoint descriptors and the merge that produces them.

use std::collections::BTreeMap;

use ctype_primitives::{DisplayName, EndpointKey};
use ctype_router::BeforeHook;
use ctype_views::{Events, Helpers, LifecycleHooks};

mod builder;
mod options;

pub use builder::{BaseOptions, build};
pub use options::EndpointOptions;


/// Per-display bindings supplied by the user.
#[derive(Debug, Clone, Default)]
pub struct DisplayOverride {
	pub helpers: Helpers,
	pub events: Events,
	pub hooks: LifecycleHooks,
}

impl DisplayOverride {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn helper(mut self, name: impl Into<String>, helper: ctype_views::Helper) -> Self {
		self.helpers.insert(name.into(), helper);
		self
	}

	pub fn event(mut self, selector: impl Into<String>, handler: ctype_views::EventHandler) -> Self {
		self.events.insert(selector.into(), handler);
		self
	}

	pub fn hooks(mut self, hooks: LifecycleHooks) -> Self {
		self.hooks.merge(hooks);
		self
	}

	/// Layers `other` over `self`; names present in `other` win.
	pub fn merge(&mut self, other: DisplayOverride) {
		self.helpers.extend(other.helpers);
		self.events.extend(other.events);
		self.hooks.merge(other.hooks);
	}

	pub fn is_empty(&self) -> bool {
		self.helpers.is_empty() && self.events.is_empty() && self.hooks.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointMeta {
	/// Page title; may carry inline markup.
	pub title: String,
}

/// Normalized description of one endpoint of a content type.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
	pub key: EndpointKey,
	/// Disabled endpoints get no route and no display selector.
	pub enabled: bool,
	pub path: String,
	/// Route name, `ct.<ctid>.<key>`.
	pub name: String,
	pub layout: String,
	pub before: BeforeHook,
	pub default_display: DisplayName,
	pub displays: BTreeMap<DisplayName, DisplayOverride>,
	pub meta: EndpointMeta,
}

impl EndpointDescriptor {
	/// User overrides for `display`, if any.
	pub fn display_override(&self, display: &DisplayName) -> Option<&DisplayOverride> {
		self.displays.get(display)
	}
}
