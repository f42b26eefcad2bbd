use std::collections::BTreeMap;

use ctype_config::Settings;
use ctype_primitives::{Ctid, DisplayName, EndpointKey, route_name};
use ctype_router::{BeforeHook, PathPattern};
use indexmap::IndexMap;
use tracing::{debug, warn};

use super::{DisplayOverride, EndpointDescriptor, EndpointMeta, EndpointOptions};
use crate::EndpointError;

/// Content-type level values every descriptor is derived from.
#[derive(Debug, Clone)]
pub struct BaseOptions {
	pub ctid: Ctid,
	pub base_path: String,
	pub layout: String,
}

impl BaseOptions {
	fn path(&self, suffix: &str) -> String {
		format!("{}/{}/{suffix}", self.base_path.trim_end_matches('/'), self.ctid)
	}
}

/// Merges the built-in endpoint skeleton with user overrides.
///
/// Each descriptor is layered as optional-field defaults, then the skeleton
/// values for its key, then the user's overrides. User keys outside the
/// built-in set start from the defaults alone. Disabled descriptors are kept.
///
/// `archived` exists only for soft delete: under hard delete it stays
/// disabled whatever the overrides say.
pub fn build(
	base: &BaseOptions,
	user: &IndexMap<EndpointKey, EndpointOptions>,
	settings: &Settings,
) -> Result<IndexMap<EndpointKey, EndpointDescriptor>, EndpointError> {
	let mut descriptors = IndexMap::new();
	for key in EndpointKey::BUILTIN {
		let descriptor = skeleton(base, &key, settings);
		descriptors.insert(key, descriptor);
	}

	for (key, options) in user {
		let descriptor = descriptors
			.entry(key.clone())
			.or_insert_with(|| defaults(base, key));
		apply(descriptor, options.clone());
	}

	if !settings.is_soft_delete()
		&& let Some(archived) = descriptors.get_mut(&EndpointKey::Archived)
		&& archived.enabled
	{
		warn!(
			ctid = %base.ctid,
			endpoint = "archived",
			"archived endpoint requires soft delete, keeping it disabled"
		);
		archived.enabled = false;
	}

	for descriptor in descriptors.values() {
		PathPattern::parse(&descriptor.path).map_err(|source| EndpointError::InvalidPath {
			key: descriptor.key.clone(),
			source,
		})?;
	}

	debug!(
		ctid = %base.ctid,
		enabled = descriptors.values().filter(|d| d.enabled).count(),
		total = descriptors.len(),
		"built endpoint descriptors"
	);
	Ok(descriptors)
}

/// Optional-field defaults shared by every endpoint.
fn defaults(base: &BaseOptions, key: &EndpointKey) -> EndpointDescriptor {
	let mut displays = BTreeMap::new();
	displays.insert(DisplayName::default_display(), DisplayOverride::default());
	EndpointDescriptor {
		key: key.clone(),
		enabled: true,
		path: base.path(key.as_str()),
		name: route_name(&base.ctid, key),
		layout: base.layout.clone(),
		before: BeforeHook::noop(),
		default_display: DisplayName::default_display(),
		displays,
		meta: EndpointMeta {
			title: format!("{key} <strong>{}</strong>", base.ctid),
		},
	}
}

fn skeleton(base: &BaseOptions, key: &EndpointKey, settings: &Settings) -> EndpointDescriptor {
	let mut descriptor = defaults(base, key);
	let ctid = &base.ctid;
	let (suffix, title) = match key {
		EndpointKey::Index => ("index", format!("List all documents of type <strong>{ctid}</strong>")),
		EndpointKey::Create => ("create", format!("Create new <strong>{ctid}</strong>")),
		EndpointKey::Archived => (
			"archived",
			format!("List archived documents of type <strong>{ctid}</strong>"),
		),
		EndpointKey::Read => (":_id", format!("View <strong>{ctid}</strong>")),
		EndpointKey::Update => (":_id/edit", format!("Update <strong>{ctid}</strong>")),
		EndpointKey::Delete => (":_id/delete", format!("Delete <strong>{ctid}</strong>")),
		EndpointKey::Custom(_) => return descriptor,
	};
	descriptor.path = base.path(suffix);
	descriptor.meta.title = title;
	if *key == EndpointKey::Archived {
		descriptor.enabled = settings.is_soft_delete();
	}
	descriptor
}

fn apply(descriptor: &mut EndpointDescriptor, options: EndpointOptions) {
	if let Some(enabled) = options.enabled {
		descriptor.enabled = enabled;
	}
	if let Some(path) = options.path {
		descriptor.path = path;
	}
	if let Some(layout) = options.layout {
		descriptor.layout = layout;
	}
	if let Some(display) = options.display {
		descriptor.default_display = display;
	}
	if let Some(before) = options.before {
		descriptor.before = before;
	}
	if let Some(title) = options.title {
		descriptor.meta.title = title;
	}
	for (display, overrides) in options.displays {
		descriptor
			.displays
			.entry(display)
			.or_default()
			.merge(overrides);
	}
}
