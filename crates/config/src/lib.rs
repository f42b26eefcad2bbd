//! Configuration for content-type admin surfaces.
//!
//! Two layers live here:
//!
//! - [`Settings`]: the process-wide settings (router backend, delete mode,
//!   default schema fields). Built once, optionally adjusted with
//!   [`Settings::configure`], then passed explicitly to every component that
//!   reads it.
//! - [`AdminConfig`]: a TOML description of settings, seed collections and
//!   content types, used by the `ctype` binary.
//!
//! # Example
//!
//! ```toml
//! [settings]
//! router = "iron_router"
//! deleteType = "soft"
//!
//! [[collection]]
//! name = "articles"
//! fields = [{ key = "body", label = "Body" }]
//!
//! [[content_type]]
//! ctid = "article"
//! collection = "articles"
//!
//! [content_type.endpoints.delete]
//! enabled = false
//!
//! [content_type.displays]
//! index = "timeline"
//! ```

pub mod admin;
pub mod error;
pub mod settings;

pub use admin::{AdminConfig, CollectionConfig, ContentTypeConfig, FieldConfig};
pub use error::{ConfigError, Result};
pub use settings::{DeleteType, RouterKind, SettingValue, Settings, SettingsPatch};

#[cfg(test)]
mod tests;

/// Parses an admin description from TOML text.
pub fn load_str(input: &str) -> Result<AdminConfig> {
	AdminConfig::parse(input)
}

/// Reads and parses an admin description from a TOML file.
pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<AdminConfig> {
	AdminConfig::load(path)
}
