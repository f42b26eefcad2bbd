//! Router backends for content-type endpoint routes.
//!
//! Content types do not route themselves: they describe each endpoint as a
//! [`RouteSpec`] and hand it to a [`RouterBackend`]. Two backends ship here,
//! matching the two router styles the settings can name:
//!
//! - [`IronRouter`]: the wrapper view is the render target, set by a
//!   pre-render hook before the `before` guard runs.
//! - [`FlowRouter`]: the route action renders the endpoint layout with the
//!   wrapper in its `content` slot; `before` runs as an enter trigger.
//!
//! Any other configured router is rejected by [`backend_for`].

mod backend;
mod error;
mod flow;
mod iron;
mod path;

pub use backend::{
	BeforeHook, GuardOutcome, RenderTarget, RouteContext, RouteInfo, RouteSpec, RouteVisit,
	RouterBackend, VisitOutcome, backend_for,
};
pub use error::RouteError;
pub use flow::FlowRouter;
pub use iron::IronRouter;
pub use path::PathPattern;

#[cfg(test)]
mod tests;
