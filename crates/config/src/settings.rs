//! Process-wide settings shared by every content type.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ConfigError, Result};

/// Router backend selector.
///
/// Unknown names are kept verbatim so the router layer can report them when
/// it is asked to bind routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RouterKind {
	IronRouter,
	FlowRouter,
	Unsupported(String),
}

impl RouterKind {
	pub fn as_str(&self) -> &str {
		match self {
			Self::IronRouter => "iron_router",
			Self::FlowRouter => "flow_router",
			Self::Unsupported(name) => name,
		}
	}

	pub fn is_supported(&self) -> bool {
		!matches!(self, Self::Unsupported(_))
	}
}

impl From<String> for RouterKind {
	fn from(value: String) -> Self {
		match value.as_str() {
			"iron_router" => Self::IronRouter,
			"flow_router" => Self::FlowRouter,
			_ => Self::Unsupported(value),
		}
	}
}

impl From<&str> for RouterKind {
	fn from(value: &str) -> Self {
		Self::from(value.to_string())
	}
}

impl From<RouterKind> for String {
	fn from(value: RouterKind) -> Self {
		match value {
			RouterKind::Unsupported(name) => name,
			other => other.as_str().to_string(),
		}
	}
}

impl fmt::Display for RouterKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How documents are deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteType {
	/// Documents are marked with an `archived` timestamp.
	Soft,
	/// Documents are removed.
	#[default]
	Hard,
}

impl DeleteType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Soft => "soft",
			Self::Hard => "hard",
		}
	}

	pub fn is_soft(self) -> bool {
		self == Self::Soft
	}
}

impl std::str::FromStr for DeleteType {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"soft" => Ok(Self::Soft),
			"hard" => Ok(Self::Hard),
			_ => Err(ConfigError::InvalidValue {
				key: "deleteType".into(),
				value: s.into(),
			}),
		}
	}
}

/// Value returned by [`Settings::get_setting`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
	Str(String),
	List(Vec<String>),
}

impl SettingValue {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			Self::List(_) => None,
		}
	}
}

impl fmt::Display for SettingValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Str(s) => f.write_str(s),
			Self::List(items) => f.write_str(&items.join(",")),
		}
	}
}

/// Settings for all content types.
///
/// Built once at startup, optionally adjusted through
/// [`Settings::configure`], then handed to the content-type registry which
/// never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
	pub router: RouterKind,
	pub delete_type: DeleteType,
	/// Built-in schema fields grafted onto every collection.
	pub default_fields: Vec<String>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			router: RouterKind::FlowRouter,
			delete_type: DeleteType::Hard,
			default_fields: vec!["title".into(), "created".into(), "updated".into()],
		}
	}
}

/// Partial settings merged by [`Settings::configure`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
	#[serde(default)]
	pub router: Option<RouterKind>,
	#[serde(default, alias = "delete_type")]
	pub delete_type: Option<DeleteType>,
	#[serde(default, alias = "default_fields")]
	pub default_fields: Option<Vec<String>>,
}

impl Settings {
	pub const KEYS: [&'static str; 3] = ["router", "deleteType", "defaultFields"];

	/// Merges `patch` over the current settings; fields present in the patch win.
	pub fn configure(&mut self, patch: SettingsPatch) {
		if let Some(router) = patch.router {
			self.router = router;
		}
		if let Some(delete_type) = patch.delete_type {
			self.delete_type = delete_type;
		}
		if let Some(fields) = patch.default_fields {
			self.default_fields = fields;
		}
		debug!(
			router = %self.router,
			delete_type = self.delete_type.as_str(),
			default_fields = ?self.default_fields,
			"settings configured"
		);
	}

	/// Builder form of [`Settings::configure`].
	pub fn configured(mut self, patch: SettingsPatch) -> Self {
		self.configure(patch);
		self
	}

	pub fn get_setting(&self, key: &str) -> Option<SettingValue> {
		match key {
			"router" => Some(SettingValue::Str(self.router.as_str().to_string())),
			"deleteType" => Some(SettingValue::Str(self.delete_type.as_str().to_string())),
			"defaultFields" => Some(SettingValue::List(self.default_fields.clone())),
			_ => None,
		}
	}

	/// Compares a setting against a string value, as templates do.
	pub fn setting_equals(&self, key: &str, value: &str) -> bool {
		self.get_setting(key)
			.is_some_and(|setting| setting.to_string() == value)
	}

	/// Sets one setting from its textual form (`deleteType=soft` on a command line).
	pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
		match key {
			"router" => self.router = RouterKind::from(value),
			"deleteType" => self.delete_type = value.parse()?,
			"defaultFields" => {
				self.default_fields = value
					.split(',')
					.map(str::trim)
					.filter(|f| !f.is_empty())
					.map(String::from)
					.collect();
			}
			_ => return Err(ConfigError::UnknownSetting(key.to_string())),
		}
		Ok(())
	}

	pub fn is_soft_delete(&self) -> bool {
		self.delete_type.is_soft()
	}

	/// Fields to graft onto a collection schema: the configured defaults plus
	/// `archived` when soft delete is enabled.
	pub fn effective_default_fields(&self) -> Vec<String> {
		let mut fields = self.default_fields.clone();
		if self.is_soft_delete() && !fields.iter().any(|f| f == "archived") {
			fields.push("archived".into());
		}
		fields
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn defaults() {
		let settings = Settings::default();
		assert_eq!(settings.router, RouterKind::FlowRouter);
		assert_eq!(settings.delete_type, DeleteType::Hard);
		assert_eq!(
			settings.get_setting("defaultFields"),
			Some(SettingValue::List(vec![
				"title".into(),
				"created".into(),
				"updated".into()
			]))
		);
		assert_eq!(settings.get_setting("missing"), None);
	}

	#[test]
	fn configure_merges_present_fields_only() {
		let mut settings = Settings::default();
		settings.configure(SettingsPatch {
			delete_type: Some(DeleteType::Soft),
			..Default::default()
		});
		assert_eq!(settings.router, RouterKind::FlowRouter);
		assert!(settings.is_soft_delete());
		assert!(settings.setting_equals("deleteType", "soft"));
		assert!(!settings.setting_equals("router", "iron_router"));
	}

	#[test]
	fn archived_field_follows_delete_type() {
		let hard = Settings::default();
		assert!(!hard.effective_default_fields().contains(&"archived".to_string()));

		let mut soft = Settings::default();
		soft.set("deleteType", "soft").unwrap();
		assert_eq!(
			soft.effective_default_fields(),
			vec!["title", "created", "updated", "archived"]
		);
	}

	#[test]
	fn unknown_router_is_preserved() {
		let mut settings = Settings::default();
		settings.set("router", "page_router").unwrap();
		assert_eq!(settings.router, RouterKind::Unsupported("page_router".into()));
		assert!(!settings.router.is_supported());
	}

	#[test]
	fn set_rejects_bad_input() {
		let mut settings = Settings::default();
		assert!(matches!(
			settings.set("deleteType", "maybe"),
			Err(ConfigError::InvalidValue { .. })
		));
		assert!(matches!(
			settings.set("theme", "dark"),
			Err(ConfigError::UnknownSetting(_))
		));
	}
}
