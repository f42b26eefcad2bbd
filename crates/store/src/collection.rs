use ctype_primitives::{Document, Value};

use crate::{Query, Schema, StoreError};

/// Result set of [`Collection::find`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cursor {
	docs: Vec<Document>,
}

impl Cursor {
	pub fn new(docs: Vec<Document>) -> Self {
		Self { docs }
	}

	pub fn count(&self) -> usize {
		self.docs.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Document> {
		self.docs.iter()
	}

	pub fn to_vec(&self) -> Vec<Document> {
		self.docs.clone()
	}

	pub fn into_vec(self) -> Vec<Document> {
		self.docs
	}

	/// JSON array of the matched documents.
	pub fn to_value(&self) -> Value {
		Value::Array(self.docs.iter().cloned().map(Value::Object).collect())
	}
}

impl IntoIterator for Cursor {
	type Item = Document;
	type IntoIter = std::vec::IntoIter<Document>;

	fn into_iter(self) -> Self::IntoIter {
		self.docs.into_iter()
	}
}

/// Document collection backing a content type.
///
/// Collections are shared (`Arc<dyn Collection>`) between the content type
/// that renders them and the [`Methods`](crate::Methods) that mutate them, so
/// every method takes `&self`.
pub trait Collection: Send + Sync {
	fn name(&self) -> &str;

	/// Attached schema, if any.
	fn schema(&self) -> Option<Schema>;

	/// Merges `schema` into the attached one (creating it when absent).
	fn attach_schema(&self, schema: Schema);

	fn find(&self, query: &Query) -> Cursor;

	fn find_one(&self, query: &Query) -> Option<Document>;

	/// Applies `set` to the document with `id`; returns the number of documents changed.
	fn update(&self, id: &str, set: Document) -> Result<usize, StoreError>;

	/// Stores `doc`, returning its id.
	fn insert(&self, doc: Document) -> Result<String, StoreError>;
}
