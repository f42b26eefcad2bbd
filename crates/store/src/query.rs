use ctype_primitives::{ARCHIVED_FIELD, Document, ID_FIELD, Value};

/// One predicate of a [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
	Eq(String, Value),
	/// Field is missing or null.
	IsNull(String),
	/// Field is present and not null.
	NotNull(String),
}

impl Clause {
	pub fn matches(&self, doc: &Document) -> bool {
		match self {
			Self::Eq(field, value) => doc.get(field) == Some(value),
			Self::IsNull(field) => doc.get(field).is_none_or(Value::is_null),
			Self::NotNull(field) => doc.get(field).is_some_and(|v| !v.is_null()),
		}
	}
}

/// Conjunction of clauses; the empty query matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
	clauses: Vec<Clause>,
}

impl Query {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn by_id(id: impl Into<String>) -> Self {
		Self::new().eq(ID_FIELD, Value::String(id.into()))
	}

	pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.clauses.push(Clause::Eq(field.into(), value.into()));
		self
	}

	pub fn is_null(mut self, field: impl Into<String>) -> Self {
		self.clauses.push(Clause::IsNull(field.into()));
		self
	}

	pub fn not_null(mut self, field: impl Into<String>) -> Self {
		self.clauses.push(Clause::NotNull(field.into()));
		self
	}

	/// Restricts to live documents (`archived == null`).
	pub fn live(self) -> Self {
		self.is_null(ARCHIVED_FIELD)
	}

	/// Restricts to archived documents (`archived != null`).
	pub fn archived(self) -> Self {
		self.not_null(ARCHIVED_FIELD)
	}

	pub fn clauses(&self) -> &[Clause] {
		&self.clauses
	}

	pub fn matches(&self, doc: &Document) -> bool {
		self.clauses.iter().all(|c| c.matches(doc))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn doc(value: Value) -> Document {
		match value {
			Value::Object(map) => map,
			_ => unreachable!(),
		}
	}

	#[test]
	fn missing_field_counts_as_null() {
		let live = doc(json!({ "_id": "a" }));
		let explicit_null = doc(json!({ "_id": "b", "archived": null }));
		let archived = doc(json!({ "_id": "c", "archived": "2024-01-01T00:00:00Z" }));

		let q = Query::new().live();
		assert!(q.matches(&live));
		assert!(q.matches(&explicit_null));
		assert!(!q.matches(&archived));

		let q = Query::new().archived();
		assert!(!q.matches(&live));
		assert!(q.matches(&archived));
	}

	#[test]
	fn clauses_are_conjunctive() {
		let d = doc(json!({ "_id": "a", "title": "x" }));
		assert!(Query::by_id("a").eq("title", "x").matches(&d));
		assert!(!Query::by_id("a").eq("title", "y").matches(&d));
		assert!(Query::new().matches(&d));
	}
}
