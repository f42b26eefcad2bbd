//! Core types shared by the content-type admin crates.
//!
//! Everything here is free of collaborator logic: identifiers for content
//! types, endpoints, displays and themes, the structured [`ViewId`] that names
//! every view in the namespace, route parameters, and the [`Signal`] cell that
//! drives display recomputation.

/// Identifier newtypes for content types, endpoints, displays and themes.
pub mod ids;
/// Route parameter bag and route naming.
pub mod route;
/// Observable value cell with synchronous subscribers.
pub mod signal;
/// Structured view identities.
pub mod view_id;

pub use ids::{Ctid, DisplayName, EndpointKey, IdError, ThemeName};
pub use route::{RouteParams, route_name};
pub use serde_json::Value;
pub use signal::{Signal, SubscriptionId};
pub use view_id::{ViewId, ViewPrefix};

/// A stored document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// Field holding the document identifier.
pub const ID_FIELD: &str = "_id";

/// Field holding the archive timestamp when soft delete is enabled.
pub const ARCHIVED_FIELD: &str = "archived";

/// Stamped on insert when the schema has it.
pub const CREATED_FIELD: &str = "created";

/// Stamped on update when the schema has it.
pub const UPDATED_FIELD: &str = "updated";
