use std::collections::BTreeMap;

use ctype_primitives::{DisplayName, EndpointKey, Value};
use ctype_router::BeforeHook;
use ctype_views::Helper;

use super::DisplayOverride;
use crate::EndpointError;

/// User overrides for one endpoint. Every field set here wins over the
/// built-in skeleton.
#[derive(Debug, Clone, Default)]
pub struct EndpointOptions {
	pub enabled: Option<bool>,
	pub path: Option<String>,
	pub layout: Option<String>,
	pub display: Option<DisplayName>,
	pub before: Option<BeforeHook>,
	pub title: Option<String>,
	pub displays: BTreeMap<DisplayName, DisplayOverride>,
}

impl EndpointOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = Some(enabled);
		self
	}

	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	pub fn layout(mut self, layout: impl Into<String>) -> Self {
		self.layout = Some(layout.into());
		self
	}

	pub fn display(mut self, display: DisplayName) -> Self {
		self.display = Some(display);
		self
	}

	pub fn before(mut self, before: BeforeHook) -> Self {
		self.before = Some(before);
		self
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn display_override(mut self, display: DisplayName, overrides: DisplayOverride) -> Self {
		self.displays.entry(display).or_default().merge(overrides);
		self
	}

	/// Parses the data-only part of an endpoint override.
	///
	/// Accepted fields: `enabled`, `path`, `layout`, `display`, `meta.title`
	/// and `displays.<name>.helpers` (static helper values). Functions such
	/// as guards, handlers and hooks can only be supplied through the builder.
	pub fn from_json(key: &EndpointKey, value: &Value) -> Result<Self, EndpointError> {
		let invalid = |field: &str, expected: &'static str| EndpointError::InvalidField {
			key: key.clone(),
			field: field.to_string(),
			expected,
		};
		let Value::Object(fields) = value else {
			return Err(invalid("", "a table"));
		};

		let mut options = Self::new();
		for (field, value) in fields {
			match field.as_str() {
				"enabled" => {
					options.enabled = Some(value.as_bool().ok_or_else(|| invalid(field.as_str(), "a boolean"))?)
				}
				"path" => options.path = Some(string(value).ok_or_else(|| invalid(field.as_str(), "a string"))?),
				"layout" => {
					options.layout = Some(string(value).ok_or_else(|| invalid(field.as_str(), "a string"))?)
				}
				"display" => {
					let name = value.as_str().ok_or_else(|| invalid(field.as_str(), "a display name"))?;
					options.display =
						Some(DisplayName::new(name).map_err(|_| invalid(field.as_str(), "a display name"))?);
				}
				"meta" => {
					let title = value
						.get("title")
						.and_then(Value::as_str)
						.ok_or_else(|| invalid("meta.title", "a string"))?;
					options.title = Some(title.to_string());
				}
				"displays" => {
					let Value::Object(displays) = value else {
						return Err(invalid(field.as_str(), "a table of displays"));
					};
					for (name, spec) in displays {
						let field = format!("displays.{name}");
						let display =
							DisplayName::new(name.as_str()).map_err(|_| invalid(field.as_str(), "a display name"))?;
						let mut overrides = DisplayOverride::new();
						match spec.get("helpers") {
							None => {}
							Some(Value::Object(helpers)) => {
								for (name, value) in helpers {
									overrides
										.helpers
										.insert(name.clone(), Helper::value(value.clone()));
								}
							}
							Some(_) => return Err(invalid(format!("{field}.helpers").as_str(), "a table")),
						}
						options.displays.insert(display, overrides);
					}
				}
				_ => {
					return Err(invalid(
						field.as_str(),
						"one of enabled, path, layout, display, meta, displays",
					));
				}
			}
		}
		Ok(options)
	}
}

fn string(value: &Value) -> Option<String> {
	value.as_str().map(str::to_string)
}
