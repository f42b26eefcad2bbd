//! Persistence collaborator for content types.
//!
//! The admin engine only needs a narrow slice of a document store: filtered
//! cursors with a count, single-document lookups and `$set`-style updates.
//! [`Collection`] captures that slice; [`MemoryCollection`] is the in-process
//! implementation used by the binary and the tests. [`Methods`] provides the
//! schema-alteration and soft-delete calls that event handlers invoke by
//! collection name.

mod collection;
mod error;
mod memory;
mod methods;
mod query;
mod registry;
mod schema;

pub use collection::{Collection, Cursor};
pub use error::StoreError;
pub use memory::MemoryCollection;
pub use methods::Methods;
pub use query::{Clause, Query};
pub use registry::CollectionRegistry;
pub use schema::{FieldDef, FieldKind, Schema, default_field, DEFAULT_FIELD_NAMES};
