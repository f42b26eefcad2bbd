use ctype_primitives::{Ctid, EndpointKey, IdError, ViewId};
use ctype_router::RouteError;
use ctype_store::StoreError;
use ctype_views::ViewError;

/// Invalid endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
	#[error("endpoint {key}: field {field:?} must be {expected}")]
	InvalidField {
		key: EndpointKey,
		field: String,
		expected: &'static str,
	},
	#[error("endpoint {key}: invalid path: {source}")]
	InvalidPath {
		key: EndpointKey,
		#[source]
		source: RouteError,
	},
}

/// Failures while binding behavior to a resolved view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
	#[error("cannot attach bindings: view {0} is not registered")]
	ViewNotRegistered(ViewId),
	#[error("no endpoint {0} on this content type")]
	UnknownEndpoint(EndpointKey),
	#[error(transparent)]
	View(ViewError),
}

impl From<ViewError> for ComposeError {
	fn from(err: ViewError) -> Self {
		match err {
			ViewError::NotRegistered(id) => Self::ViewNotRegistered(id),
			other => Self::View(other),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
	#[error("no display selector for endpoint {0}")]
	UnknownEndpoint(EndpointKey),
}

/// Failures of content-type construction, registration and rendering.
#[derive(Debug, thiserror::Error)]
pub enum ContentTypeError {
	#[error("invalid ctid: {0}")]
	InvalidCtid(#[source] IdError),
	#[error("content type {0} has no collection")]
	MissingCollection(String),
	#[error("collection {collection:?} of content type {ctid} has no schema")]
	MissingSchema { ctid: Ctid, collection: String },
	#[error("invalid theme: {0}")]
	InvalidTheme(#[source] IdError),
	#[error("invalid base path {0:?}: must be non-empty and start with '/'")]
	InvalidBasePath(String),
	#[error("invalid layout for content type {0}: must be non-empty")]
	InvalidLayout(Ctid),
	#[error("content type {0} is already registered")]
	DuplicateCtid(Ctid),
	#[error("unknown collection {0:?}")]
	UnknownCollection(String),
	#[error("route {0:?} does not belong to a registered content type")]
	UnknownRoute(String),
	#[error(transparent)]
	Endpoint(#[from] EndpointError),
	#[error(transparent)]
	Compose(#[from] ComposeError),
	#[error(transparent)]
	Selector(#[from] SelectorError),
	#[error(transparent)]
	Route(#[from] RouteError),
	#[error(transparent)]
	Store(#[from] StoreError),
	#[error(transparent)]
	View(#[from] ViewError),
	#[error("invalid identifier: {0}")]
	Id(#[from] IdError),
}
