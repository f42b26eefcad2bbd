use indexmap::IndexMap;

/// Value type of a schema field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldKind {
	#[default]
	String,
	Date,
	Number,
	Bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDef {
	pub kind: FieldKind,
	pub label: Option<String>,
	pub optional: bool,
	pub max: Option<usize>,
	/// Managed by the system; form renderers leave it out.
	pub omit_from_forms: bool,
}

impl FieldDef {
	pub fn new(kind: FieldKind) -> Self {
		Self {
			kind,
			..Default::default()
		}
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}
}

/// Ordered field declarations of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
	fields: IndexMap<String, FieldDef>,
}

impl Schema {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn field(mut self, key: impl Into<String>, def: FieldDef) -> Self {
		self.fields.insert(key.into(), def);
		self
	}

	/// Merges `other` into this schema; fields in `other` replace same-named ones.
	pub fn attach(&mut self, other: Schema) {
		self.fields.extend(other.fields);
	}

	pub fn get(&self, key: &str) -> Option<&FieldDef> {
		self.fields.get(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.fields.contains_key(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

/// Fields that [`default_field`] knows how to graft.
pub const DEFAULT_FIELD_NAMES: [&str; 4] = ["title", "created", "updated", "archived"];

/// Built-in schema for one default field, or `None` for unknown names.
pub fn default_field(name: &str) -> Option<Schema> {
	let def = match name {
		"title" => FieldDef {
			kind: FieldKind::String,
			label: Some("Title".into()),
			optional: false,
			max: Some(200),
			omit_from_forms: false,
		},
		"created" => FieldDef {
			kind: FieldKind::Date,
			label: None,
			optional: false,
			max: None,
			omit_from_forms: true,
		},
		"updated" | "archived" => FieldDef {
			kind: FieldKind::Date,
			label: None,
			optional: true,
			max: None,
			omit_from_forms: true,
		},
		_ => return None,
	};
	Some(Schema::new().field(name, def))
}
