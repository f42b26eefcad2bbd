use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};
use ctype_config::CollectionConfig;
use ctype_primitives::{CREATED_FIELD, Document, ID_FIELD, UPDATED_FIELD, Value};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::trace;

use crate::{Collection, Cursor, FieldDef, FieldKind, Query, Schema, StoreError};

/// Insertion-ordered in-process collection.
pub struct MemoryCollection {
	name: String,
	schema: RwLock<Option<Schema>>,
	docs: RwLock<IndexMap<String, Document>>,
	next_id: AtomicU64,
}

impl MemoryCollection {
	/// Creates an empty collection without a schema.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			schema: RwLock::new(None),
			docs: RwLock::new(IndexMap::new()),
			next_id: AtomicU64::new(1),
		}
	}

	pub fn with_schema(self, schema: Schema) -> Self {
		*self.schema.write() = Some(schema);
		self
	}

	/// Builds a collection from its configuration, inserting the seed documents.
	///
	/// A configuration without fields yields a collection without a schema.
	pub fn from_config(config: &CollectionConfig) -> Result<Self, StoreError> {
		let mut collection = Self::new(config.name.clone());
		if !config.fields.is_empty() {
			let schema = config.fields.iter().fold(Schema::new(), |schema, field| {
				let mut def = FieldDef::new(FieldKind::String);
				def.label = field.label.clone();
				def.optional = field.optional;
				schema.field(field.key.clone(), def)
			});
			collection = collection.with_schema(schema);
		}
		for doc in &config.documents {
			collection.insert(doc.clone())?;
		}
		Ok(collection)
	}

	pub fn len(&self) -> usize {
		self.docs.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.docs.read().is_empty()
	}

	fn generate_id(&self) -> String {
		let n = self.next_id.fetch_add(1, Ordering::Relaxed);
		format!("{}-{n}", self.name)
	}

	/// Sets `field` to the current UTC time when the schema declares it and
	/// the document does not carry a value already.
	fn stamp(&self, doc: &mut Document, field: &str) {
		let declared = self
			.schema
			.read()
			.as_ref()
			.is_some_and(|schema| schema.contains(field));
		if !declared || doc.get(field).is_some_and(|v| !v.is_null()) {
			return;
		}
		let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
		doc.insert(field.into(), Value::String(now));
	}
}

impl Collection for MemoryCollection {
	fn name(&self) -> &str {
		&self.name
	}

	fn schema(&self) -> Option<Schema> {
		self.schema.read().clone()
	}

	fn attach_schema(&self, schema: Schema) {
		let mut current = self.schema.write();
		match current.as_mut() {
			Some(existing) => existing.attach(schema),
			None => *current = Some(schema),
		}
	}

	fn find(&self, query: &Query) -> Cursor {
		let docs = self.docs.read();
		Cursor::new(docs.values().filter(|d| query.matches(d)).cloned().collect())
	}

	fn find_one(&self, query: &Query) -> Option<Document> {
		self.docs.read().values().find(|d| query.matches(d)).cloned()
	}

	fn update(&self, id: &str, mut set: Document) -> Result<usize, StoreError> {
		self.stamp(&mut set, UPDATED_FIELD);
		let mut docs = self.docs.write();
		let Some(doc) = docs.get_mut(id) else {
			return Ok(0);
		};
		for (field, value) in set {
			if field == ID_FIELD {
				continue;
			}
			doc.insert(field, value);
		}
		trace!(collection = %self.name, id, "document updated");
		Ok(1)
	}

	fn insert(&self, mut doc: Document) -> Result<String, StoreError> {
		let id = match doc.get(ID_FIELD) {
			Some(Value::String(id)) => id.clone(),
			Some(other) => {
				return Err(StoreError::InvalidId {
					collection: self.name.clone(),
					got: other.to_string(),
				});
			}
			None => self.generate_id(),
		};
		self.stamp(&mut doc, CREATED_FIELD);

		let mut docs = self.docs.write();
		if docs.contains_key(&id) {
			return Err(StoreError::DuplicateId {
				collection: self.name.clone(),
				id,
			});
		}
		doc.insert(ID_FIELD.into(), Value::String(id.clone()));
		docs.insert(id.clone(), doc);
		Ok(id)
	}
}

#[cfg(test)]
mod tests {
	use ctype_config::FieldConfig;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	fn doc(value: Value) -> Document {
		value.as_object().cloned().unwrap_or_default()
	}

	#[test]
	fn insert_generates_ids_and_rejects_duplicates() {
		let c = MemoryCollection::new("articles");
		let id = c.insert(doc(json!({ "title": "a" }))).unwrap();
		assert_eq!(id, "articles-1");
		c.insert(doc(json!({ "_id": "x" }))).unwrap();
		assert_eq!(
			c.insert(doc(json!({ "_id": "x" }))),
			Err(StoreError::DuplicateId {
				collection: "articles".into(),
				id: "x".into()
			})
		);
		assert!(matches!(
			c.insert(doc(json!({ "_id": 3 }))),
			Err(StoreError::InvalidId { .. })
		));
		assert_eq!(c.len(), 2);
	}

	#[test]
	fn update_sets_fields_but_not_id() {
		let c = MemoryCollection::new("articles");
		c.insert(doc(json!({ "_id": "a", "title": "old" }))).unwrap();

		let changed = c
			.update("a", doc(json!({ "title": "new", "_id": "b" })))
			.unwrap();
		assert_eq!(changed, 1);
		let stored = c.find_one(&Query::by_id("a")).unwrap();
		assert_eq!(stored["title"], "new");
		assert_eq!(c.update("missing", Document::new()), Ok(0));
	}

	#[test]
	fn timestamps_follow_the_schema() {
		let c = MemoryCollection::new("articles").with_schema(
			crate::default_field(CREATED_FIELD)
				.unwrap()
				.field(UPDATED_FIELD, FieldDef::new(FieldKind::Date).optional()),
		);
		c.insert(doc(json!({ "_id": "a" }))).unwrap();
		let stored = c.find_one(&Query::by_id("a")).unwrap();
		let created = stored[CREATED_FIELD].as_str().unwrap().to_string();
		assert!(chrono::DateTime::parse_from_rfc3339(&created).is_ok(), "{created}");
		assert!(!stored.contains_key(UPDATED_FIELD));

		c.update("a", doc(json!({ "title": "new" }))).unwrap();
		let stored = c.find_one(&Query::by_id("a")).unwrap();
		assert_eq!(stored[CREATED_FIELD], json!(created));
		let updated = stored[UPDATED_FIELD].as_str().unwrap();
		assert!(chrono::DateTime::parse_from_rfc3339(updated).is_ok(), "{updated}");

		c.insert(doc(json!({ "_id": "b", "created": "2024-01-01T00:00:00.000Z" })))
			.unwrap();
		let stored = c.find_one(&Query::by_id("b")).unwrap();
		assert_eq!(stored[CREATED_FIELD], json!("2024-01-01T00:00:00.000Z"));
	}

	#[test]
	fn no_timestamps_without_schema() {
		let c = MemoryCollection::new("notes");
		c.insert(doc(json!({ "_id": "a" }))).unwrap();
		c.update("a", doc(json!({ "title": "x" }))).unwrap();
		assert_eq!(
			c.find_one(&Query::by_id("a")).unwrap(),
			doc(json!({ "_id": "a", "title": "x" }))
		);
	}

	#[test]
	fn find_filters_and_counts() {
		let c = MemoryCollection::new("articles");
		c.insert(doc(json!({ "_id": "a" }))).unwrap();
		c.insert(doc(json!({ "_id": "b", "archived": "2024-01-01" }))).unwrap();

		assert_eq!(c.find(&Query::new()).count(), 2);
		let live = c.find(&Query::new().live());
		assert_eq!(live.count(), 1);
		assert_eq!(live.to_value(), json!([{ "_id": "a" }]));
	}

	#[test]
	fn attach_schema_merges() {
		let c = MemoryCollection::new("articles");
		assert!(c.schema().is_none());
		c.attach_schema(Schema::new().field("body", FieldDef::new(FieldKind::String)));
		c.attach_schema(crate::default_field("title").unwrap());
		let schema = c.schema().unwrap();
		assert!(schema.contains("body") && schema.contains("title"));
	}

	#[test]
	fn from_config_seeds_documents() {
		let config = CollectionConfig {
			name: "pages".into(),
			fields: vec![FieldConfig {
				key: "body".into(),
				label: Some("Body".into()),
				optional: false,
			}],
			documents: vec![doc(json!({ "_id": "p1", "title": "Home" }))],
		};
		let c = MemoryCollection::from_config(&config).unwrap();
		assert_eq!(c.len(), 1);
		assert_eq!(
			c.schema().unwrap().get("body").unwrap().label.as_deref(),
			Some("Body")
		);

		let bare = MemoryCollection::from_config(&CollectionConfig {
			name: "bare".into(),
			..Default::default()
		})
		.unwrap();
		assert!(bare.schema().is_none());
	}
}
