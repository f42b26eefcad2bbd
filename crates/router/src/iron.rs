use ctype_config::RouterKind;
use ctype_primitives::RouteParams;
use tracing::trace;

use crate::backend::RouteTable;
use crate::{
	GuardOutcome, RenderTarget, RouteContext, RouteError, RouteInfo, RouteSpec, RouteVisit,
	RouterBackend, VisitOutcome,
};

/// Backend whose routes render a view directly.
///
/// Entering a route runs its pre-render hook: the render target is set to the
/// wrapper first, then the `before` guard runs, then rendering proceeds.
#[derive(Default)]
pub struct IronRouter {
	table: RouteTable,
}

impl IronRouter {
	pub fn new() -> Self {
		Self::default()
	}
}

impl RouterBackend for IronRouter {
	fn kind(&self) -> RouterKind {
		RouterKind::IronRouter
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
		let target = RenderTarget::View(route.spec.wrapper.clone());
		trace!(route = %route.spec.name, target = %target.content(), "render target set");

		let guard = route.spec.before.call(&RouteContext {
			route: &route.spec.name,
			path,
			params: &params,
		});
		let outcome = match guard {
			GuardOutcome::Proceed => VisitOutcome::Render(target),
			GuardOutcome::Redirect(to) => VisitOutcome::Redirect(to),
		};
		Ok(RouteVisit {
			route: route.spec.name.clone(),
			path: path.to_string(),
			params,
			outcome,
		})
	}
}
