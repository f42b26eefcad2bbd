//! Views and the process-wide view namespace.
//!
//! A [`View`] is a render function plus attached bindings: helpers (data),
//! event handlers and lifecycle hooks. Themes register *source* views under
//! structured [`ViewId`]s; content types never render those directly but
//! [specialize](ViewNamespace::specialize) them under an identity that
//! includes their `ctid`, then attach their own bindings to the clone.
//!
//! [`ViewId`]: ctype_primitives::ViewId

mod binding;
mod error;
mod namespace;
pub mod theme;
mod view;

pub use binding::{
	EventContext, EventError, EventHandler, Events, Helper, HelperContext, Helpers,
	LifecycleContext, LifecycleEvent, LifecycleHook, LifecycleHooks,
};
pub use error::ViewError;
pub use namespace::{InsertAction, ViewNamespace};
pub use theme::{ThemeBuilder, register_default_theme};
pub use view::{RenderFn, RenderScope, Rendered, View, ViewSource};
