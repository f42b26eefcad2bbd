//! Theme registration and the built-in `default` theme.
//!
//! A theme is a set of source views: one display view per endpoint and display
//! name, one wrapper and one not-found view. The `default` theme renders plain
//! text from the `ct` helper and is always present, so resolution has a
//! terminal view to fall back to.

use std::fmt::Write as _;
use std::sync::Arc;

use ctype_primitives::{DisplayName, EndpointKey, ThemeName, Value, ViewId};

use crate::view::{RenderFn, RenderScope, ViewSource};
use crate::{View, ViewError, ViewNamespace};

/// Collects the source views of one theme before registering them.
pub struct ThemeBuilder {
	theme: ThemeName,
	source: ViewSource,
	views: Vec<View>,
}

impl ThemeBuilder {
	pub fn new(theme: ThemeName) -> Self {
		Self {
			theme,
			source: ViewSource::Runtime,
			views: Vec::new(),
		}
	}

	fn builtin() -> Self {
		Self {
			source: ViewSource::Builtin,
			..Self::new(ThemeName::default_theme())
		}
	}

	pub fn theme(&self) -> &ThemeName {
		&self.theme
	}

	fn push(mut self, id: ViewId, render: RenderFn) -> Self {
		self.views.push(View::with_source(id, self.source, render));
		self
	}

	/// Adds the view for `display` of endpoint `key`.
	pub fn display(
		self,
		key: EndpointKey,
		display: DisplayName,
		render: impl Fn(&RenderScope<'_>) -> String + Send + Sync + 'static,
	) -> Self {
		let id = ViewId::display(key, self.theme.clone(), display);
		self.push(id, Arc::new(render))
	}

	pub fn wrapper(self, render: impl Fn(&RenderScope<'_>) -> String + Send + Sync + 'static) -> Self {
		let id = ViewId::wrapper(self.theme.clone());
		self.push(id, Arc::new(render))
	}

	pub fn not_found(
		self,
		render: impl Fn(&RenderScope<'_>) -> String + Send + Sync + 'static,
	) -> Self {
		let id = ViewId::not_found(self.theme.clone());
		self.push(id, Arc::new(render))
	}

	/// Registers every collected view; fails on the first id already taken.
	///
	/// Views registered before the failure stay registered.
	pub fn register(self, ns: &ViewNamespace) -> Result<usize, ViewError> {
		let count = self.views.len();
		for view in self.views {
			ns.register(view)?;
		}
		Ok(count)
	}
}

/// Registers the built-in `default` theme, skipping views already present.
///
/// Returns the number of views inserted.
pub fn register_default_theme(ns: &ViewNamespace) -> usize {
	let display = DisplayName::default_display;
	let builder = ThemeBuilder::builtin()
		.display(EndpointKey::Index, display(), render_list)
		.display(EndpointKey::Archived, display(), render_list)
		.display(EndpointKey::Create, display(), render_form)
		.display(EndpointKey::Read, display(), render_item)
		.display(EndpointKey::Update, display(), render_form)
		.display(EndpointKey::Delete, display(), render_delete)
		.wrapper(render_wrapper)
		.not_found(render_not_found);

	builder
		.views
		.into_iter()
		.filter(|view| !ns.exists(view.id()))
		.map(|view| ns.register(view))
		.filter(Result::is_ok)
		.count()
}

fn text(scope: &RenderScope<'_>, path: &str) -> String {
	match scope.lookup(path) {
		Some(Value::String(s)) => s.clone(),
		Some(Value::Null) | None => String::new(),
		Some(other) => other.to_string(),
	}
}

fn fields(scope: &RenderScope<'_>) -> Vec<(String, String)> {
	let Some(Value::Array(fields)) = scope.lookup("ct.fields") else {
		return Vec::new();
	};
	fields
		.iter()
		.filter_map(|f| {
			let key = f.get("key")?.as_str()?;
			let label = f.get("value").and_then(Value::as_str).unwrap_or(key);
			Some((key.to_string(), label.to_string()))
		})
		.collect()
}

fn field_text(doc: &Value, key: &str) -> String {
	match doc.get(key) {
		Some(Value::String(s)) => s.clone(),
		Some(Value::Null) | None => String::new(),
		Some(other) => other.to_string(),
	}
}

fn render_wrapper(scope: &RenderScope<'_>) -> String {
	scope.content.unwrap_or_default().to_string()
}

fn render_list(scope: &RenderScope<'_>) -> String {
	let mut out = format!("# {}\n", text(scope, "ct.meta.title"));
	let items = match scope.lookup("items.cursor") {
		Some(Value::Array(items)) => items.as_slice(),
		_ => &[],
	};
	if items.is_empty() {
		out.push_str(&text(scope, "ct.labels.noItemsFound"));
		out.push('\n');
		return out;
	}
	let _ = writeln!(
		out,
		"{} {} {}",
		text(scope, "ct.labels.totalItemsPrefix"),
		text(scope, "items.total"),
		text(scope, "ct.labels.totalItemsSuffix"),
	);
	for item in items {
		let _ = writeln!(
			out,
			"- {} [{}]",
			field_text(item, "title"),
			field_text(item, "_id")
		);
	}
	out
}

fn render_form(scope: &RenderScope<'_>) -> String {
	let mut out = format!("# {}\n", text(scope, "ct.meta.title"));
	let _ = writeln!(
		out,
		"form {} ({}) on {}",
		text(scope, "formId"),
		text(scope, "formType"),
		text(scope, "formCollection"),
	);
	let item = scope.lookup("item").cloned().unwrap_or(Value::Null);
	for (key, label) in fields(scope) {
		let _ = writeln!(out, "[{label}] {}", field_text(&item, &key));
	}
	out
}

fn render_item(scope: &RenderScope<'_>) -> String {
	let mut out = format!("# {}\n", text(scope, "ct.meta.title"));
	match scope.lookup("item") {
		Some(item @ Value::Object(_)) => {
			for (key, label) in fields(scope) {
				let _ = writeln!(out, "{label}: {}", field_text(item, &key));
			}
		}
		_ => {
			out.push_str(&text(scope, "ct.labels.noItemsFound"));
			out.push('\n');
		}
	}
	out
}

fn render_delete(scope: &RenderScope<'_>) -> String {
	let mut out = format!("# {}\n", text(scope, "ct.meta.title"));
	let _ = writeln!(
		out,
		"{} {}. {}",
		text(scope, "ct.labels.deletePrefix"),
		text(scope, "item._id"),
		text(scope, "ct.labels.deleteSuffix"),
	);
	let _ = writeln!(out, "[{}]", text(scope, "ct.labels.confirmOk"));
	out
}

fn render_not_found(scope: &RenderScope<'_>) -> String {
	format!(
		"no view for display {:?} of endpoint {:?}\n",
		text(scope, "ctNotFound.requestedDisplay"),
		text(scope, "ctNotFound.endpoint"),
	)
}

#[cfg(test)]
mod tests {
	use ctype_primitives::RouteParams;
	use serde_json::json;

	use super::*;
	use crate::Helper;

	#[test]
	fn default_theme_covers_every_builtin_endpoint() {
		let ns = ViewNamespace::new();
		assert_eq!(register_default_theme(&ns), 8);
		for key in EndpointKey::BUILTIN {
			let id = ViewId::display(key, ThemeName::default_theme(), DisplayName::default_display());
			assert!(ns.exists(&id), "missing {id}");
		}
		assert!(ns.exists(&ViewId::wrapper(ThemeName::default_theme())));
		assert!(ns.exists(&ViewId::not_found(ThemeName::default_theme())));
		assert_eq!(register_default_theme(&ns), 0);
	}

	#[test]
	fn builder_rejects_taken_ids() {
		let ns = ViewNamespace::with_default_theme();
		let dark = ThemeName::new("dark").unwrap();
		let count = ThemeBuilder::new(dark)
			.display(EndpointKey::Index, DisplayName::new("cards").unwrap(), |_| String::new())
			.wrapper(|s| s.content.unwrap_or_default().to_string())
			.register(&ns)
			.unwrap();
		assert_eq!(count, 2);

		let err = ThemeBuilder::new(ThemeName::default_theme())
			.wrapper(|_| String::new())
			.register(&ns)
			.unwrap_err();
		assert!(matches!(err, ViewError::AlreadyRegistered(_)));
	}

	#[test]
	fn list_renders_labels_and_items() {
		let ns = ViewNamespace::with_default_theme();
		let id = ViewId::display(
			EndpointKey::Index,
			ThemeName::default_theme(),
			DisplayName::default_display(),
		);
		ns.attach_helpers(
			&id,
			[
				(
					"ct".to_string(),
					Helper::value(json!({
						"meta": { "title": "List" },
						"labels": { "totalItemsPrefix": "Found", "totalItemsSuffix": "item/s." }
					})),
				),
				(
					"items".to_string(),
					Helper::value(json!({ "cursor": [{ "_id": "a", "title": "First" }], "total": 1 })),
				),
			]
			.into_iter()
			.collect(),
		)
		.unwrap();

		let body = ns.render(&id, &RouteParams::new(), None).unwrap().body;
		assert_eq!(body, "# List\nFound 1 item/s.\n- First [a]\n");
	}
}
