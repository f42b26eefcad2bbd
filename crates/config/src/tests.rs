use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

const SAMPLE: &str = r#"
[settings]
router = "iron_router"
deleteType = "soft"

[[collection]]
name = "articles"
fields = [{ key = "body", label = "Body" }]

[[collection.documents]]
_id = "a1"
title = "Hello"

[[content_type]]
ctid = "article"
collection = "articles"
base_path = "/cms"

[content_type.labels]
linkCreate = "New article"

[content_type.endpoints.delete]
enabled = false

[content_type.displays]
index = "timeline"
"#;

#[test]
fn parse_full_sample() {
	let config = AdminConfig::parse(SAMPLE).unwrap();

	assert_eq!(config.settings.router, Some(RouterKind::IronRouter));
	assert_eq!(config.settings.delete_type, Some(DeleteType::Soft));
	assert_eq!(config.settings.default_fields, None);

	let articles = config.collection("articles").unwrap();
	assert_eq!(articles.fields[0].label.as_deref(), Some("Body"));
	assert_eq!(articles.documents.len(), 1);
	assert_eq!(articles.documents[0]["title"], "Hello");

	let ct = &config.content_types[0];
	assert_eq!(ct.ctid, "article");
	assert_eq!(ct.base_path.as_deref(), Some("/cms"));
	assert_eq!(ct.labels["linkCreate"], "New article");
	assert_eq!(ct.endpoints["delete"]["enabled"], false);
	assert_eq!(ct.displays["index"], "timeline");
}

#[test]
fn settings_patch_applies_over_defaults() {
	let config = AdminConfig::parse(SAMPLE).unwrap();
	let settings = Settings::default().configured(config.settings);
	assert_eq!(settings.router, RouterKind::IronRouter);
	assert!(settings.is_soft_delete());
	assert_eq!(settings.default_fields, vec!["title", "created", "updated"]);
}

#[test]
fn unknown_settings_key_is_rejected() {
	let err = AdminConfig::parse("[settings]\ntheme = \"dark\"\n").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn empty_file_is_default() {
	assert_eq!(AdminConfig::parse("").unwrap(), AdminConfig::default());
}

#[test]
fn load_reads_from_disk() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(SAMPLE.as_bytes()).unwrap();
	let config = AdminConfig::load(file.path()).unwrap();
	assert_eq!(config.content_types.len(), 1);

	let missing = AdminConfig::load(file.path().with_extension("missing"));
	assert!(matches!(missing, Err(ConfigError::Io { .. })));
}
