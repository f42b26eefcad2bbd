//! Declarative description of an admin: settings, collections and content types.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ConfigError, Result, SettingsPatch};

/// Parsed admin configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
	#[serde(default)]
	pub settings: SettingsPatch,
	#[serde(default, rename = "collection")]
	pub collections: Vec<CollectionConfig>,
	#[serde(default, rename = "content_type")]
	pub content_types: Vec<ContentTypeConfig>,
}

/// In-memory collection seeded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
	pub name: String,
	/// Declared schema fields; a collection without fields has no schema.
	#[serde(default)]
	pub fields: Vec<FieldConfig>,
	#[serde(default)]
	pub documents: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
	pub key: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub optional: bool,
}

/// One content type declaration.
///
/// Endpoint overrides stay as raw JSON values here; the content-type layer
/// validates them so misconfigured fields are reported against the endpoint
/// they belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentTypeConfig {
	pub ctid: String,
	pub collection: String,
	#[serde(default)]
	pub theme: Option<String>,
	#[serde(default, alias = "basePath")]
	pub base_path: Option<String>,
	#[serde(default)]
	pub layout: Option<String>,
	#[serde(default)]
	pub labels: BTreeMap<String, String>,
	#[serde(default)]
	pub endpoints: BTreeMap<String, Value>,
	/// Initial display per endpoint key.
	#[serde(default)]
	pub displays: BTreeMap<String, String>,
}

impl AdminConfig {
	/// Parse a TOML string into an [`AdminConfig`].
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
		self.collections.iter().find(|c| c.name == name)
	}
}
