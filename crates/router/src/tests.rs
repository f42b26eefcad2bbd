use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ctype_config::RouterKind;
use ctype_primitives::{Ctid, EndpointKey, RouteParams, ThemeName, ViewId};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::backend::RouteTable;

fn wrapper(key: EndpointKey) -> ViewId {
	ViewId::wrapper(ThemeName::default_theme()).for_endpoint(&key, &Ctid::new("article").unwrap())
}

fn spec(key: EndpointKey, path: &str) -> RouteSpec {
	RouteSpec {
		name: format!("ct.article.{key}"),
		path: path.to_string(),
		wrapper: wrapper(key),
		layout: "ctLayout".to_string(),
		before: BeforeHook::noop(),
	}
}

fn seeded(kind: RouterKind) -> Arc<dyn RouterBackend> {
	let backend = backend_for(&kind).unwrap();
	for (key, path) in [
		(EndpointKey::Index, "/admin/content/article/index"),
		(EndpointKey::Create, "/admin/content/article/create"),
		(EndpointKey::Read, "/admin/content/article/:_id"),
		(EndpointKey::Update, "/admin/content/article/:_id/edit"),
	] {
		backend.register(spec(key, path)).unwrap();
	}
	backend
}

#[rstest]
#[case(RouterKind::IronRouter)]
#[case(RouterKind::FlowRouter)]
fn backends_report_their_kind(#[case] kind: RouterKind) {
	assert_eq!(backend_for(&kind).unwrap().kind(), kind);
}

#[test]
fn unsupported_backend_is_an_error() {
	let kind = RouterKind::from("page_router");
	assert_eq!(
		backend_for(&kind).err(),
		Some(RouteError::UnsupportedBackend("page_router".into()))
	);
}

#[rstest]
#[case(RouterKind::IronRouter)]
#[case(RouterKind::FlowRouter)]
fn duplicate_route_names_are_rejected(#[case] kind: RouterKind) {
	let backend = seeded(kind);
	assert_eq!(
		backend.register(spec(EndpointKey::Index, "/elsewhere")),
		Err(RouteError::DuplicateRoute("ct.article.index".into()))
	);
	assert_eq!(backend.routes().len(), 4);
}

#[rstest]
#[case(RouterKind::IronRouter)]
#[case(RouterKind::FlowRouter)]
fn static_routes_and_params_resolve(#[case] kind: RouterKind) {
	let backend = seeded(kind);
	let visit = backend.enter("/admin/content/article/create").unwrap();
	assert_eq!(visit.route, "ct.article.create");
	assert!(visit.params.is_empty());

	let visit = backend.enter("/admin/content/article/a1").unwrap();
	assert_eq!(visit.route, "ct.article.read");
	assert_eq!(visit.params.id(), Some("a1"));
}

#[rstest]
#[case(RouterKind::IronRouter)]
#[case(RouterKind::FlowRouter)]
fn literal_segments_beat_earlier_params(#[case] kind: RouterKind) {
	let backend = seeded(kind);
	let export = EndpointKey::new("export").unwrap();
	backend
		.register(spec(export, "/admin/content/article/export"))
		.unwrap();

	let visit = backend.enter("/admin/content/article/export").unwrap();
	assert_eq!(visit.route, "ct.article.export");
	assert!(visit.params.is_empty());
	let visit = backend.enter("/admin/content/article/exports").unwrap();
	assert_eq!(visit.route, "ct.article.read");
}

#[test]
fn equally_specific_routes_keep_registration_order() {
	let table = RouteTable::default();
	let kind = RouterKind::IronRouter;
	table
		.insert(&kind, spec(EndpointKey::Read, "/admin/content/article/:_id"))
		.unwrap();
	table
		.insert(&kind, spec(EndpointKey::new("preview").unwrap(), "/admin/content/article/:slug"))
		.unwrap();

	let (route, params) = table.lookup("/admin/content/article/a1").unwrap();
	assert_eq!(route.spec.name, "ct.article.read");
	assert_eq!(params.id(), Some("a1"));
}

#[test]
fn iron_router_renders_the_wrapper() {
	let visit = seeded(RouterKind::IronRouter)
		.enter("/admin/content/article/a1/edit")
		.unwrap();
	assert_eq!(
		visit.outcome,
		VisitOutcome::Render(RenderTarget::View(wrapper(EndpointKey::Update)))
	);
}

#[test]
fn flow_router_renders_layout_with_content_slot() {
	let visit = seeded(RouterKind::FlowRouter)
		.enter("/admin/content/article/index")
		.unwrap();
	assert_eq!(
		visit.outcome,
		VisitOutcome::Render(RenderTarget::Layout {
			layout: "ctLayout".into(),
			content: wrapper(EndpointKey::Index),
		})
	);
}

#[rstest]
#[case(RouterKind::IronRouter)]
#[case(RouterKind::FlowRouter)]
fn before_guard_runs_and_can_redirect(#[case] kind: RouterKind) {
	let backend = backend_for(&kind).unwrap();
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	backend
		.register(RouteSpec {
			before: BeforeHook::new(move |cx| {
				counter.fetch_add(1, Ordering::SeqCst);
				if cx.params.id() == Some("locked") {
					GuardOutcome::Redirect("/login".into())
				} else {
					GuardOutcome::Proceed
				}
			}),
			..spec(EndpointKey::Read, "/admin/content/article/:_id")
		})
		.unwrap();

	let open = backend.enter("/admin/content/article/open").unwrap();
	assert!(matches!(open.outcome, VisitOutcome::Render(_)));
	let locked = backend.enter("/admin/content/article/locked").unwrap();
	assert_eq!(locked.outcome, VisitOutcome::Redirect("/login".into()));
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn path_for_builds_named_routes() {
	let backend = seeded(RouterKind::FlowRouter);
	let params = RouteParams::new().with("_id", "a1");
	assert_eq!(
		backend.path_for("ct.article.update", &params).unwrap(),
		"/admin/content/article/a1/edit"
	);
	assert_eq!(
		backend.path_for("ct.article.index", &RouteParams::new()).unwrap(),
		"/admin/content/article/index"
	);
	assert_eq!(
		backend.path_for("ct.page.index", &RouteParams::new()),
		Err(RouteError::UnknownRoute("ct.page.index".into()))
	);
}

#[test]
fn unmatched_path_is_an_error() {
	assert_eq!(
		seeded(RouterKind::IronRouter).enter("/nowhere"),
		Err(RouteError::NoMatch("/nowhere".into()))
	);
}
