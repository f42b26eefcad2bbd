use std::collections::BTreeMap;

use serde_json::Value;

/// Built-in label strings, overridable per key.
pub const DEFAULT_LABELS: [(&str, &str); 12] = [
	("backToIndex", "Back to Index"),
	("backToDocument", "Back to Document"),
	("confirmOk", "Yes, I'm sure"),
	("deletePrefix", "You are about to delete the document"),
	("deleteSuffix", "This action is unrecoverable. Are you sure?"),
	("linkView", "View"),
	("linkEdit", "Edit"),
	("linkDelete", "Delete"),
	("linkCreate", "Create new document"),
	("totalItemsPrefix", "Found"),
	("totalItemsSuffix", "item/s."),
	("noItemsFound", "No documents found."),
];

/// Label dictionary exposed to views as `ct.labels`.
///
/// Overrides may also introduce keys the built-in views never read, for
/// custom themes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
	pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
		let mut labels = Self::default();
		labels
			.0
			.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
		labels
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn to_value(&self) -> Value {
		Value::Object(
			self.0
				.iter()
				.map(|(k, v)| (k.clone(), Value::String(v.clone())))
				.collect(),
		)
	}
}

impl Default for Labels {
	fn default() -> Self {
		Self(
			DEFAULT_LABELS
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn overrides_replace_and_extend() {
		let overrides: BTreeMap<String, String> = [
			("linkEdit".to_string(), "Modify".to_string()),
			("linkArchive".to_string(), "Archive".to_string()),
		]
		.into_iter()
		.collect();
		let labels = Labels::with_overrides(&overrides);

		assert_eq!(labels.get("linkEdit"), Some("Modify"));
		assert_eq!(labels.get("linkArchive"), Some("Archive"));
		assert_eq!(labels.get("noItemsFound"), Some("No documents found."));
		assert_eq!(labels.iter().count(), DEFAULT_LABELS.len() + 1);
	}
}
