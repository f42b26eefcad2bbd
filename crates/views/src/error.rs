use ctype_primitives::ViewId;

/// Failures of namespace operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
	#[error("view {0} is not registered")]
	NotRegistered(ViewId),
	#[error("view {0} is already registered")]
	AlreadyRegistered(ViewId),
	#[error("view {0} is not a specialization")]
	NotSpecialized(ViewId),
	#[error("view {view} has no handler for event {event:?}")]
	UnknownEvent { view: ViewId, event: String },
	#[error("handler for {event:?} on view {view} failed: {message}")]
	Handler {
		view: ViewId,
		event: String,
		message: String,
	},
}
