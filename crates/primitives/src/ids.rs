use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rejected identifier input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
	#[error("{kind} must not be empty")]
	Empty { kind: &'static str },
	#[error("{kind} {value:?} contains {ch:?}; only ASCII letters, digits, '-' and '_' are allowed")]
	InvalidChar {
		kind: &'static str,
		value: String,
		ch: char,
	},
}

fn validate(kind: &'static str, value: &str) -> Result<(), IdError> {
	if value.is_empty() {
		return Err(IdError::Empty { kind });
	}
	if let Some(ch) = value
		.chars()
		.find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
	{
		return Err(IdError::InvalidChar {
			kind,
			value: value.to_string(),
			ch,
		});
	}
	Ok(())
}

macro_rules! string_id {
	($(#[$meta:meta])* $name:ident, $kind:literal) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);

		impl $name {
			/// Validates and wraps `value`.
			pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
				let value = value.into();
				validate($kind, &value)?;
				Ok(Self(value))
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl FromStr for $name {
			type Err = IdError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}

		impl TryFrom<String> for $name {
			type Error = IdError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}

		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
	};
}

string_id!(
	/// Unique identifier of a content type (`article`, `page`, ...).
	///
	/// Appears in route names (`ct.<ctid>.<key>`), paths and specialized view
	/// identities, so it is restricted to characters safe in all three.
	Ctid,
	"content type id"
);

string_id!(
	/// Name of an alternative rendering of an endpoint.
	DisplayName,
	"display name"
);

string_id!(
	/// Name of a family of built-in views.
	ThemeName,
	"theme name"
);

impl DisplayName {
	pub const DEFAULT: &'static str = "default";

	/// The `default` display every endpoint starts with.
	pub fn default_display() -> Self {
		Self(Self::DEFAULT.to_string())
	}

	pub fn is_default(&self) -> bool {
		self.0 == Self::DEFAULT
	}
}

impl Default for DisplayName {
	fn default() -> Self {
		Self::default_display()
	}
}

impl ThemeName {
	pub const DEFAULT: &'static str = "default";

	/// The theme shipped with the crate; its not-found and wrapper views are
	/// the last resort of every resolution.
	pub fn default_theme() -> Self {
		Self(Self::DEFAULT.to_string())
	}

	pub fn is_default(&self) -> bool {
		self.0 == Self::DEFAULT
	}
}

impl Default for ThemeName {
	fn default() -> Self {
		Self::default_theme()
	}
}

/// One functional admin route of a content type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EndpointKey {
	Index,
	Create,
	Read,
	Update,
	Delete,
	Archived,
	/// User-declared endpoint outside the built-in set.
	Custom(String),
}

impl EndpointKey {
	/// Built-in endpoints in registration order.
	///
	/// `create` and `archived` precede `read` so their static paths win over
	/// the `:_id` segment when routes are matched first-registered-first.
	pub const BUILTIN: [EndpointKey; 6] = [
		EndpointKey::Index,
		EndpointKey::Create,
		EndpointKey::Archived,
		EndpointKey::Read,
		EndpointKey::Update,
		EndpointKey::Delete,
	];

	/// Parses a key, mapping unknown names to [`EndpointKey::Custom`].
	pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
		let value = value.into();
		validate("endpoint key", &value)?;
		Ok(match value.as_str() {
			"index" => Self::Index,
			"create" => Self::Create,
			"read" => Self::Read,
			"update" => Self::Update,
			"delete" => Self::Delete,
			"archived" => Self::Archived,
			_ => Self::Custom(value),
		})
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Index => "index",
			Self::Create => "create",
			Self::Read => "read",
			Self::Update => "update",
			Self::Delete => "delete",
			Self::Archived => "archived",
			Self::Custom(name) => name,
		}
	}

	/// Capitalized segment used inside view names (`CT_Index_...`).
	pub fn view_segment(&self) -> String {
		let name = self.as_str();
		let mut chars = name.chars();
		match chars.next() {
			Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
			None => String::new(),
		}
	}

	pub fn is_builtin(&self) -> bool {
		!matches!(self, Self::Custom(_))
	}

	/// Endpoints addressing a single document through `:_id`.
	pub fn is_item_scoped(&self) -> bool {
		matches!(self, Self::Read | Self::Update | Self::Delete)
	}
}

impl fmt::Display for EndpointKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for EndpointKey {
	type Err = IdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<String> for EndpointKey {
	type Error = IdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<EndpointKey> for String {
	fn from(value: EndpointKey) -> Self {
		match value {
			EndpointKey::Custom(name) => name,
			other => other.as_str().to_string(),
		}
	}
}
