use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use ctype_primitives::{Ctid, DisplayName, EndpointKey, RouteParams, ThemeName, ViewId};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::{EventHandler, Helper, LifecycleHook};

fn index_view() -> ViewId {
	ViewId::display(
		EndpointKey::Index,
		ThemeName::default_theme(),
		DisplayName::default_display(),
	)
}

fn ctid(s: &str) -> Ctid {
	Ctid::new(s).unwrap()
}

#[test]
fn register_rejects_duplicates_and_replace_overwrites() {
	let ns = ViewNamespace::new();
	let id = ViewId::wrapper(ThemeName::default_theme());
	ns.register(View::new(id.clone(), |_| "a".into())).unwrap();
	assert_eq!(
		ns.register(View::new(id.clone(), |_| "b".into())),
		Err(ViewError::AlreadyRegistered(id.clone()))
	);
	assert_eq!(
		ns.replace(View::new(id.clone(), |_| "c".into())),
		InsertAction::ReplacedExisting
	);
	assert_eq!(ns.render(&id, &RouteParams::new(), None).unwrap().body, "c");
}

#[test]
fn specialize_is_memoized() {
	let ns = ViewNamespace::with_default_theme();
	let target = index_view().for_content_type(&ctid("article"));

	assert_eq!(
		ns.specialize(&index_view(), target.clone()),
		Ok(InsertAction::InsertedNew)
	);
	ns.attach_helpers(
		&target,
		[("x".to_string(), Helper::value(1))].into_iter().collect(),
	)
	.unwrap();
	assert_eq!(
		ns.specialize(&index_view(), target.clone()),
		Ok(InsertAction::KeptExisting)
	);
	assert!(ns.get(&target).unwrap().helpers().contains_key("x"));
	assert!(ns.get(&index_view()).unwrap().helpers().is_empty());
}

#[test]
fn specialize_missing_source_fails() {
	let ns = ViewNamespace::new();
	let target = index_view().for_content_type(&ctid("article"));
	assert_eq!(
		ns.specialize(&index_view(), target),
		Err(ViewError::NotRegistered(index_view()))
	);
}

#[test]
fn force_refresh_drops_bindings() {
	let ns = ViewNamespace::with_default_theme();
	let target = index_view().for_content_type(&ctid("article"));
	ns.specialize(&index_view(), target.clone()).unwrap();
	ns.attach_helpers(
		&target,
		[("x".to_string(), Helper::value(1))].into_iter().collect(),
	)
	.unwrap();

	ns.force_refresh(&target).unwrap();
	assert!(ns.get(&target).unwrap().helpers().is_empty());
	assert_eq!(
		ns.force_refresh(&index_view()),
		Err(ViewError::NotSpecialized(index_view()))
	);
}

#[test]
fn attach_to_missing_view_fails() {
	let ns = ViewNamespace::new();
	let id = index_view().for_content_type(&ctid("article"));
	assert_eq!(
		ns.attach_events(&id, Events::new()),
		Err(ViewError::NotRegistered(id.clone()))
	);
	assert_eq!(
		ns.attach_hooks(&id, LifecycleHooks::default()),
		Err(ViewError::NotRegistered(id))
	);
}

#[test]
fn render_runs_lifecycle_in_order() {
	let ns = ViewNamespace::new();
	let id = ViewId::wrapper(ThemeName::default_theme());
	let log = Arc::new(Mutex::new(Vec::new()));
	let push = |tag: &'static str| {
		let log = log.clone();
		LifecycleHook::new(move |_| log.lock().unwrap().push(tag))
	};
	ns.register(View::new(id.clone(), |_| String::new()).with_hooks(LifecycleHooks {
		on_created: Some(push("created")),
		on_rendered: Some(push("rendered")),
		on_destroyed: Some(push("destroyed")),
	}))
	.unwrap();

	ns.render(&id, &RouteParams::new(), None).unwrap();
	ns.destroy(&id, &RouteParams::new()).unwrap();
	assert_eq!(*log.lock().unwrap(), vec!["created", "rendered", "destroyed"]);
}

#[test]
fn fire_dispatches_to_handler() {
	let ns = ViewNamespace::new();
	let id = ViewId::wrapper(ThemeName::default_theme());
	let seen = Arc::new(Mutex::new(None));
	let sink = seen.clone();
	ns.register(View::new(id.clone(), |_| String::new()).with_event(
		"click .ct-archive",
		EventHandler::new(move |cx| {
			*sink.lock().unwrap() = cx.document_id().map(str::to_string);
			Ok(())
		}),
	))
	.unwrap();

	let params = RouteParams::new().with("_id", "doc-1");
	ns.fire(&id, "click .ct-archive", &params, None).unwrap();
	assert_eq!(seen.lock().unwrap().as_deref(), Some("doc-1"));

	ns.fire(&id, "click .ct-archive", &params, Some("doc-2")).unwrap();
	assert_eq!(seen.lock().unwrap().as_deref(), Some("doc-2"));

	assert!(matches!(
		ns.fire(&id, "click .ct-restore", &params, None),
		Err(ViewError::UnknownEvent { .. })
	));
}

#[test]
fn handler_errors_are_reported() {
	let ns = ViewNamespace::new();
	let id = ViewId::wrapper(ThemeName::default_theme());
	ns.register(View::new(id.clone(), |_| String::new()).with_event(
		"click",
		EventHandler::new(|_| Err("boom".into())),
	))
	.unwrap();
	assert_eq!(
		ns.fire(&id, "click", &RouteParams::new(), None),
		Err(ViewError::Handler {
			view: id,
			event: "click".into(),
			message: "boom".into(),
		})
	);
}

#[test]
fn helpers_attached_later_win() {
	let ns = ViewNamespace::with_default_theme();
	let id = index_view();
	ns.attach_helpers(
		&id,
		[
			("a".to_string(), Helper::value(1)),
			("b".to_string(), Helper::value(2)),
		]
		.into_iter()
		.collect(),
	)
	.unwrap();
	ns.attach_helpers(
		&id,
		[("b".to_string(), Helper::value("user"))].into_iter().collect(),
	)
	.unwrap();

	let data = ns.render(&id, &RouteParams::new(), None).unwrap().data;
	assert_eq!(data.get("a"), Some(&json!(1)));
	assert_eq!(data.get("b"), Some(&json!("user")));
}

#[test]
fn concurrent_specialization_inserts_once() {
	let ns = ViewNamespace::with_default_theme();
	let target = index_view().for_content_type(&ctid("article"));
	let inserted = Arc::new(AtomicUsize::new(0));
	let before = ns.len();

	let handles: Vec<_> = (0..8)
		.map(|_| {
			let ns = ns.clone();
			let target = target.clone();
			let inserted = inserted.clone();
			thread::spawn(move || {
				if ns.specialize(&index_view(), target) == Ok(InsertAction::InsertedNew) {
					inserted.fetch_add(1, Ordering::SeqCst);
				}
			})
		})
		.collect();
	for h in handles {
		h.join().unwrap();
	}

	assert_eq!(inserted.load(Ordering::SeqCst), 1);
	assert_eq!(ns.len(), before + 1);
}
