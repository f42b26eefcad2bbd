/// Failures reported by collections and schema methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
	#[error("unknown collection: {0}")]
	UnknownCollection(String),
	#[error("no document {id:?} in collection {collection}")]
	DocumentNotFound { collection: String, id: String },
	#[error("document {id:?} already exists in collection {collection}")]
	DuplicateId { collection: String, id: String },
	#[error("collection {0} is already registered")]
	DuplicateCollection(String),
	#[error("document id in collection {collection} must be a string, got {got}")]
	InvalidId { collection: String, got: String },
}
