use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ctype_primitives::{RouteParams, Value, ViewId};

use crate::{EventHandler, Events, Helper, HelperContext, Helpers, LifecycleHooks};

/// Everything a render function can see.
pub struct RenderScope<'a> {
	pub view: &'a ViewId,
	/// Evaluated helpers.
	pub data: &'a BTreeMap<String, Value>,
	/// Output of the nested view, for wrappers and layouts.
	pub content: Option<&'a str>,
}

impl RenderScope<'_> {
	/// Looks up a dotted path (`ct.meta.title`) in the evaluated helpers.
	pub fn lookup(&self, path: &str) -> Option<&Value> {
		let mut parts = path.split('.');
		let mut current = self.data.get(parts.next()?)?;
		for part in parts {
			current = match current {
				Value::Object(map) => map.get(part)?,
				Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
				_ => return None,
			};
		}
		Some(current)
	}

	pub fn lookup_str(&self, path: &str) -> Option<&str> {
		self.lookup(path).and_then(Value::as_str)
	}
}

pub type RenderFn = Arc<dyn Fn(&RenderScope<'_>) -> String + Send + Sync>;

/// Where a namespace entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewSource {
	/// Shipped with the crate (the `default` theme).
	Builtin,
	/// Registered by the application.
	Runtime,
	/// Cloned from another entry for one content type.
	Specialized,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
	pub view: ViewId,
	pub data: BTreeMap<String, Value>,
	pub body: String,
}

/// A named, renderable unit with attached bindings.
#[derive(Clone)]
pub struct View {
	id: ViewId,
	source: ViewSource,
	render: RenderFn,
	helpers: Helpers,
	events: Events,
	hooks: LifecycleHooks,
}

impl View {
	pub fn new(id: ViewId, render: impl Fn(&RenderScope<'_>) -> String + Send + Sync + 'static) -> Self {
		Self::with_source(id, ViewSource::Runtime, Arc::new(render))
	}

	pub(crate) fn with_source(id: ViewId, source: ViewSource, render: RenderFn) -> Self {
		Self {
			id,
			source,
			render,
			helpers: Helpers::new(),
			events: Events::new(),
			hooks: LifecycleHooks::default(),
		}
	}

	pub fn id(&self) -> &ViewId {
		&self.id
	}

	pub fn source(&self) -> ViewSource {
		self.source
	}

	pub fn helpers(&self) -> &Helpers {
		&self.helpers
	}

	pub fn events(&self) -> &Events {
		&self.events
	}

	pub fn hooks(&self) -> &LifecycleHooks {
		&self.hooks
	}

	pub fn with_helper(mut self, name: impl Into<String>, helper: Helper) -> Self {
		self.helpers.insert(name.into(), helper);
		self
	}

	pub fn with_event(mut self, selector: impl Into<String>, handler: EventHandler) -> Self {
		self.events.insert(selector.into(), handler);
		self
	}

	pub fn with_hooks(mut self, hooks: LifecycleHooks) -> Self {
		self.hooks.merge(hooks);
		self
	}

	pub(crate) fn helpers_mut(&mut self) -> &mut Helpers {
		&mut self.helpers
	}

	pub(crate) fn events_mut(&mut self) -> &mut Events {
		&mut self.events
	}

	pub(crate) fn hooks_mut(&mut self) -> &mut LifecycleHooks {
		&mut self.hooks
	}

	/// New entry under `id` sharing this view's render function.
	///
	/// Bindings are not copied: the clone starts bare so each content type
	/// attaches its own.
	pub fn specialize(&self, id: ViewId) -> View {
		Self::with_source(id, ViewSource::Specialized, self.render.clone())
	}

	pub fn shares_render_with(&self, other: &View) -> bool {
		Arc::ptr_eq(&self.render, &other.render)
	}

	/// Evaluates every helper against `params`.
	pub fn evaluate(&self, params: &RouteParams) -> BTreeMap<String, Value> {
		let cx = HelperContext {
			view: &self.id,
			params,
		};
		self.helpers
			.iter()
			.map(|(name, helper)| (name.clone(), helper.evaluate(&cx)))
			.collect()
	}

	/// Evaluates helpers and runs the render function; lifecycle hooks are
	/// driven by the namespace.
	pub fn render(&self, params: &RouteParams, content: Option<&str>) -> Rendered {
		let data = self.evaluate(params);
		let body = (self.render)(&RenderScope {
			view: &self.id,
			data: &data,
			content,
		});
		Rendered {
			view: self.id.clone(),
			data,
			body,
		}
	}
}

impl fmt::Debug for View {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("View")
			.field("id", &self.id.to_string())
			.field("source", &self.source)
			.field("helpers", &self.helpers.keys().collect::<Vec<_>>())
			.field("events", &self.events.keys().collect::<Vec<_>>())
			.field("hooks", &self.hooks)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use ctype_primitives::ThemeName;
	use serde_json::json;

	use super::*;

	fn id() -> ViewId {
		ViewId::wrapper(ThemeName::default_theme())
	}

	#[test]
	fn lookup_walks_objects_and_arrays() {
		let data: BTreeMap<String, Value> =
			[("ct".to_string(), json!({ "meta": { "title": "T" }, "fields": [{ "key": "body" }] }))]
				.into_iter()
				.collect();
		let view_id = id();
		let scope = RenderScope {
			view: &view_id,
			data: &data,
			content: None,
		};
		assert_eq!(scope.lookup_str("ct.meta.title"), Some("T"));
		assert_eq!(scope.lookup_str("ct.fields.0.key"), Some("body"));
		assert_eq!(scope.lookup("ct.meta.missing"), None);
		assert_eq!(scope.lookup("nothing"), None);
	}

	#[test]
	fn specialize_shares_render_but_not_bindings() {
		let source = View::new(id(), |scope| scope.content.unwrap_or_default().to_string())
			.with_helper("x", Helper::value(1));
		let clone = source.specialize(ViewId::not_found(ThemeName::default_theme()));

		assert!(clone.shares_render_with(&source));
		assert!(clone.helpers().is_empty());
		assert_eq!(clone.source(), ViewSource::Specialized);
		assert_eq!(
			clone.render(&RouteParams::new(), Some("inner")).body,
			"inner"
		);
	}

	#[test]
	fn computed_helpers_see_route_params() {
		let view = View::new(id(), |scope| {
			scope.lookup_str("doc").unwrap_or("none").to_string()
		})
		.with_helper(
			"doc",
			Helper::computed(|cx| json!(cx.params.id().unwrap_or("none"))),
		);

		let params = RouteParams::new().with("_id", "a1");
		assert_eq!(view.render(&params, None).body, "a1");
		assert_eq!(view.render(&RouteParams::new(), None).body, "none");
	}
}
