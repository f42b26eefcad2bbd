/// Failures of route registration, path building and route entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
	#[error("router backend {0:?} is not supported")]
	UnsupportedBackend(String),
	#[error("route {0:?} is already registered")]
	DuplicateRoute(String),
	#[error("no route named {0:?}")]
	UnknownRoute(String),
	#[error("no route matches {0:?}")]
	NoMatch(String),
	#[error("path {path:?} needs parameter {param:?}")]
	MissingParam { path: String, param: String },
	#[error("invalid route path {path:?}: {reason}")]
	InvalidPath { path: String, reason: String },
}
