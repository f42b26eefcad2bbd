use std::sync::Arc;

use ctype_primitives::{Ctid, EndpointKey, ThemeName, ViewId};
use ctype_router::{RouteError, RouteSpec, RouterBackend};
use tracing::debug;

use crate::EndpointDescriptor;

/// Route registered for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBinding {
	pub key: EndpointKey,
	pub name: String,
	pub path: String,
	pub wrapper: ViewId,
}

/// Registers endpoint routes with the configured backend.
#[derive(Clone)]
pub struct RouteBinder {
	backend: Arc<dyn RouterBackend>,
}

impl RouteBinder {
	pub fn new(backend: Arc<dyn RouterBackend>) -> Self {
		Self { backend }
	}

	pub fn backend(&self) -> &Arc<dyn RouterBackend> {
		&self.backend
	}

	/// Registers `descriptor`'s route with `wrapper` as its view.
	pub fn bind(
		&self,
		descriptor: &EndpointDescriptor,
		key: &EndpointKey,
		theme: &ThemeName,
		ctid: &Ctid,
		wrapper: &ViewId,
	) -> Result<RouteBinding, RouteError> {
		self.backend.register(RouteSpec {
			name: descriptor.name.clone(),
			path: descriptor.path.clone(),
			wrapper: wrapper.clone(),
			layout: descriptor.layout.clone(),
			before: descriptor.before.clone(),
		})?;
		debug!(
			ctid = %ctid,
			endpoint = %key,
			theme = %theme,
			backend = %self.backend.kind(),
			route = %descriptor.name,
			"bound endpoint route"
		);
		Ok(RouteBinding {
			key: key.clone(),
			name: descriptor.name.clone(),
			path: descriptor.path.clone(),
			wrapper: wrapper.clone(),
		})
	}
}

impl std::fmt::Debug for RouteBinder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteBinder")
			.field("backend", &self.backend.kind())
			.finish()
	}
}
