use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use ctype_primitives::{ARCHIVED_FIELD, Document, Value};
use tracing::{debug, warn};

use crate::{CollectionRegistry, StoreError, default_field};

/// Schema and soft-delete calls addressed by collection name.
#[derive(Clone)]
pub struct Methods {
	collections: Arc<CollectionRegistry>,
}

impl Methods {
	pub fn new(collections: Arc<CollectionRegistry>) -> Self {
		Self { collections }
	}

	pub fn collections(&self) -> &Arc<CollectionRegistry> {
		&self.collections
	}

	/// Grafts the named default fields onto the collection's schema.
	///
	/// Unknown field names are skipped and an unknown collection is ignored;
	/// returns the fields that were attached.
	pub fn alter_schema(&self, collection: &str, fields: &[String]) -> Vec<String> {
		let Some(instance) = self.collections.get(collection) else {
			warn!(collection, "alter_schema: unknown collection, schema left untouched");
			return Vec::new();
		};

		let mut attached = Vec::with_capacity(fields.len());
		for field in fields {
			match default_field(field) {
				Some(schema) => {
					instance.attach_schema(schema);
					attached.push(field.clone());
				}
				None => debug!(collection, field = %field, "alter_schema: no default schema for field"),
			}
		}
		attached
	}

	/// Marks a document as archived with the current UTC timestamp.
	pub fn archive(&self, collection: &str, id: &str) -> Result<(), StoreError> {
		let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
		self.set_archived(collection, id, Value::String(now))
	}

	/// Clears the archive mark of a document.
	pub fn restore(&self, collection: &str, id: &str) -> Result<(), StoreError> {
		self.set_archived(collection, id, Value::Null)
	}

	fn set_archived(&self, collection: &str, id: &str, value: Value) -> Result<(), StoreError> {
		let instance = self
			.collections
			.get(collection)
			.ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

		let archived = !value.is_null();
		let mut set = Document::new();
		set.insert(ARCHIVED_FIELD.into(), value);
		if instance.update(id, set)? == 0 {
			return Err(StoreError::DocumentNotFound {
				collection: collection.to_string(),
				id: id.to_string(),
			});
		}
		debug!(collection, id, archived, "archive state changed");
		Ok(())
	}
}
