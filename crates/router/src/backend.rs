use std::fmt;
use std::sync::Arc;

use ctype_config::RouterKind;
use ctype_primitives::{RouteParams, ViewId};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::{PathPattern, RouteError};

/// What a `before` guard sees when a route is entered.
pub struct RouteContext<'a> {
	pub route: &'a str,
	pub path: &'a str,
	pub params: &'a RouteParams,
}

/// Decision of a `before` guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
	Proceed,
	/// Abort rendering and navigate elsewhere.
	Redirect(String),
}

/// Guard run on route entry, before anything renders.
#[derive(Clone)]
pub struct BeforeHook(Arc<dyn Fn(&RouteContext<'_>) -> GuardOutcome + Send + Sync>);

impl BeforeHook {
	pub fn new(f: impl Fn(&RouteContext<'_>) -> GuardOutcome + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	pub fn noop() -> Self {
		Self::new(|_| GuardOutcome::Proceed)
	}

	pub fn call(&self, cx: &RouteContext<'_>) -> GuardOutcome {
		(self.0)(cx)
	}
}

impl Default for BeforeHook {
	fn default() -> Self {
		Self::noop()
	}
}

impl fmt::Debug for BeforeHook {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("BeforeHook(..)")
	}
}

/// Everything a backend needs to register one endpoint route.
#[derive(Debug, Clone)]
pub struct RouteSpec {
	pub name: String,
	pub path: String,
	/// Wrapper view rendered for the route.
	pub wrapper: ViewId,
	/// Layout the wrapper is slotted into, for backends that render layouts.
	pub layout: String,
	pub before: BeforeHook,
}

/// What a backend renders after a route is entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderTarget {
	/// The view itself is the render target.
	View(ViewId),
	/// A named layout with the view in its `content` slot.
	Layout { layout: String, content: ViewId },
}

impl RenderTarget {
	/// The view that renders the route's own content.
	pub fn content(&self) -> &ViewId {
		match self {
			Self::View(id) | Self::Layout { content: id, .. } => id,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
	Render(RenderTarget),
	Redirect(String),
}

/// Result of entering a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteVisit {
	pub route: String,
	pub path: String,
	pub params: RouteParams,
	pub outcome: VisitOutcome,
}

/// Registered route as listed by [`RouterBackend::routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
	pub name: String,
	pub path: String,
	pub wrapper: ViewId,
}

/// A router the content types register their endpoint routes with.
pub trait RouterBackend: Send + Sync {
	fn kind(&self) -> RouterKind;

	/// Registers a named route; names are unique.
	fn register(&self, spec: RouteSpec) -> Result<(), RouteError>;

	/// Registered routes in registration order.
	fn routes(&self) -> Vec<RouteInfo>;

	/// Builds the concrete path of a named route.
	fn path_for(&self, name: &str, params: &RouteParams) -> Result<String, RouteError>;

	/// Enters `path`: matches it, runs the route's hooks and reports what renders.
	fn enter(&self, path: &str) -> Result<RouteVisit, RouteError>;
}

/// Backend for a supported router kind.
pub fn backend_for(kind: &RouterKind) -> Result<Arc<dyn RouterBackend>, RouteError> {
	match kind {
		RouterKind::IronRouter => Ok(Arc::new(crate::IronRouter::new())),
		RouterKind::FlowRouter => Ok(Arc::new(crate::FlowRouter::new())),
		RouterKind::Unsupported(name) => Err(RouteError::UnsupportedBackend(name.clone())),
	}
}

pub(crate) struct Route {
	pub(crate) spec: RouteSpec,
	pub(crate) pattern: PathPattern,
}

/// Named routes in registration order.
///
/// On entry the matching route with the most literal segments wins, so
/// `/article/export` beats `/article/:_id`; ties go to the earlier route.
#[derive(Default)]
pub(crate) struct RouteTable {
	routes: RwLock<IndexMap<String, Arc<Route>>>,
}

impl RouteTable {
	pub(crate) fn insert(&self, kind: &RouterKind, spec: RouteSpec) -> Result<(), RouteError> {
		let pattern = PathPattern::parse(&spec.path)?;
		let mut routes = self.routes.write();
		if routes.contains_key(&spec.name) {
			return Err(RouteError::DuplicateRoute(spec.name));
		}
		debug!(backend = %kind, route = %spec.name, path = %spec.path, "registered route");
		routes.insert(spec.name.clone(), Arc::new(Route { spec, pattern }));
		Ok(())
	}

	pub(crate) fn infos(&self) -> Vec<RouteInfo> {
		self.routes
			.read()
			.values()
			.map(|r| RouteInfo {
				name: r.spec.name.clone(),
				path: r.spec.path.clone(),
				wrapper: r.spec.wrapper.clone(),
			})
			.collect()
	}

	pub(crate) fn path_for(&self, name: &str, params: &RouteParams) -> Result<String, RouteError> {
		let routes = self.routes.read();
		let route = routes
			.get(name)
			.ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
		route.pattern.build(params)
	}

	/// Most specific route matching `path`, with its captured params.
	pub(crate) fn lookup(&self, path: &str) -> Result<(Arc<Route>, RouteParams), RouteError> {
		let routes = self.routes.read();
		let mut best: Option<(&Arc<Route>, RouteParams)> = None;
		for route in routes.values() {
			let Some(params) = route.pattern.matches(path) else {
				continue;
			};
			let better = best.as_ref().is_none_or(|(current, _)| {
				route.pattern.static_segments() > current.pattern.static_segments()
			});
			if better {
				best = Some((route, params));
			}
		}
		best.map(|(route, params)| (route.clone(), params))
			.ok_or_else(|| RouteError::NoMatch(path.to_string()))
	}
}
