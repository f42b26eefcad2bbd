use ctype_config::RouterKind;
use ctype_primitives::RouteParams;

use crate::backend::RouteTable;
use crate::{
	GuardOutcome, RenderTarget, RouteContext, RouteError, RouteInfo, RouteSpec, RouteVisit,
	RouterBackend, VisitOutcome,
};

/// Backend whose route actions render a layout with the wrapper in its
/// `content` slot. The `before` guard is installed as an enter trigger and
/// runs before the action.
#[derive(Default)]
pub struct FlowRouter {
	table: RouteTable,
}

impl FlowRouter {
	pub fn new() -> Self {
		Self::default()
	}
}

impl RouterBackend for FlowRouter {
	fn kind(&self) -> RouterKind {
		RouterKind::FlowRouter
	}

	fn register(&self, spec: RouteSpec) -> Result<(), RouteError> {
		self.table.insert(&self.kind(), spec)
	}

	fn routes(&self) -> Vec<RouteInfo> {
		self.table.infos()
	}

	fn path_for(&self, name: &str, params: &RouteParams) -> Result<String, RouteError> {
		self.table.path_for(name, params)
	}

	fn enter(&self, path: &str) -> Result<RouteVisit, RouteError> {
		let (route, params) = self.table.lookup(path)?;
		let trigger = route.spec.before.call(&RouteContext {
			route: &route.spec.name,
			path,
			params: &params,
		});
		let outcome = match trigger {
			GuardOutcome::Redirect(to) => VisitOutcome::Redirect(to),
			GuardOutcome::Proceed => VisitOutcome::Render(RenderTarget::Layout {
				layout: route.spec.layout.clone(),
				content: route.spec.wrapper.clone(),
			}),
		};
		Ok(RouteVisit {
			route: route.spec.name.clone(),
			path: path.to_string(),
			params,
			outcome,
		})
	}
}
