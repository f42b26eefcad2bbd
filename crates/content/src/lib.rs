//! Content types: declarative admin surfaces over a collection.
//!
//! A [`ContentType`] turns a ctid, a collection and per-endpoint options into
//! a set of routed endpoints (`index`, `create`, `archived`, `read`, `update`,
//! `delete`, plus any custom ones). Rendering an endpoint goes through three
//! stages:
//!
//! 1. the [`DisplaySelector`] yields the endpoint's active display,
//! 2. the [`ViewResolver`] specializes the theme's view for that display under
//!    a ctid-scoped identity, falling back to the theme's not-found view,
//! 3. the [`BehaviorComposer`] attaches default and user bindings to it.
//!
//! [`ContentTypes`] owns what content types share: settings, the view
//! namespace, the router backend and the collection registry.

mod binder;
mod composer;
mod content_type;
mod content_types;
pub mod endpoint;
mod error;
mod labels;
mod resolver;
mod selector;

pub use binder::{RouteBinder, RouteBinding};
pub use composer::{ARCHIVE_EVENT, BehaviorComposer, CT_HELPER, RESTORE_EVENT, endpoint_query, field_value};
pub use content_type::{
	ContentType, ContentTypeOptions, DEFAULT_BASE_PATH, DEFAULT_LAYOUT, RenderPass,
	WRAPPER_DISPLAY_HELPER, WRAPPER_ENDPOINT_HELPER,
};
pub use content_types::{ContentTypes, Page};
pub use endpoint::{EndpointDescriptor, EndpointMeta, EndpointOptions, DisplayOverride};
pub use error::{ComposeError, ContentTypeError, EndpointError, SelectorError};
pub use labels::{DEFAULT_LABELS, Labels};
pub use resolver::{DisplaySource, NOT_FOUND_HELPER, ViewResolver};
pub use selector::DisplaySelector;
