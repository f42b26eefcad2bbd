use std::sync::Arc;

use ctype_primitives::{RouteParams, ViewId};
use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;
use tracing::debug;

use crate::binding::{EventContext, Events, Helpers, LifecycleContext, LifecycleEvent};
use crate::{LifecycleHooks, Rendered, View, ViewError};

/// Result of a successful insertion into the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAction {
	/// Id was new; view inserted.
	InsertedNew,
	/// Id existed; kept the existing view.
	KeptExisting,
	/// Id existed; replaced with the new view.
	ReplacedExisting,
}

/// Process-wide, append-only map of views keyed by [`ViewId`].
///
/// Cloning yields another handle onto the same namespace.
#[derive(Clone, Default)]
pub struct ViewNamespace {
	views: Arc<RwLock<HashMap<ViewId, View>>>,
}

impl ViewNamespace {
	pub fn new() -> Self {
		Self::default()
	}

	/// Namespace pre-seeded with the built-in `default` theme.
	pub fn with_default_theme() -> Self {
		let ns = Self::new();
		crate::register_default_theme(&ns);
		ns
	}

	/// Registers a new view; fails if the id is taken.
	pub fn register(&self, view: View) -> Result<(), ViewError> {
		let mut views = self.views.write();
		if views.contains_key(view.id()) {
			return Err(ViewError::AlreadyRegistered(view.id().clone()));
		}
		debug!(view = %view.id(), source = ?view.source(), "registered view");
		views.insert(view.id().clone(), view);
		Ok(())
	}

	/// Registers `view`, overwriting any entry with the same id.
	pub fn replace(&self, view: View) -> InsertAction {
		let id = view.id().clone();
		match self.views.write().insert(id.clone(), view) {
			Some(_) => {
				debug!(view = %id, "replaced view");
				InsertAction::ReplacedExisting
			}
			None => InsertAction::InsertedNew,
		}
	}

	pub fn exists(&self, id: &ViewId) -> bool {
		self.views.read().contains_key(id)
	}

	pub fn get(&self, id: &ViewId) -> Option<View> {
		self.views.read().get(id).cloned()
	}

	/// Clones `source` under `target` unless `target` already exists.
	///
	/// Check and insert happen under one write lock so concurrent callers
	/// never produce two entries for the same target.
	pub fn specialize(&self, source: &ViewId, target: ViewId) -> Result<InsertAction, ViewError> {
		let mut views = self.views.write();
		if views.contains_key(&target) {
			return Ok(InsertAction::KeptExisting);
		}
		let clone = views
			.get(source)
			.ok_or_else(|| ViewError::NotRegistered(source.clone()))?
			.specialize(target.clone());
		debug!(source = %source, view = %target, "specialized view");
		views.insert(target, clone);
		Ok(InsertAction::InsertedNew)
	}

	/// Re-clones a specialization from its source, dropping attached bindings.
	pub fn force_refresh(&self, id: &ViewId) -> Result<(), ViewError> {
		let source = id
			.source()
			.ok_or_else(|| ViewError::NotSpecialized(id.clone()))?;
		let mut views = self.views.write();
		let clone = views
			.get(&source)
			.ok_or_else(|| ViewError::NotRegistered(source.clone()))?
			.specialize(id.clone());
		debug!(source = %source, view = %id, "refreshed specialization");
		views.insert(id.clone(), clone);
		Ok(())
	}

	/// Merges `helpers` into the view's helpers; incoming names win.
	pub fn attach_helpers(&self, id: &ViewId, helpers: Helpers) -> Result<(), ViewError> {
		self.with_view_mut(id, |view| view.helpers_mut().extend(helpers))
	}

	/// Merges `events` into the view's handlers; incoming selectors win.
	pub fn attach_events(&self, id: &ViewId, events: Events) -> Result<(), ViewError> {
		self.with_view_mut(id, |view| view.events_mut().extend(events))
	}

	pub fn attach_hooks(&self, id: &ViewId, hooks: LifecycleHooks) -> Result<(), ViewError> {
		self.with_view_mut(id, |view| view.hooks_mut().merge(hooks))
	}

	fn with_view_mut(&self, id: &ViewId, f: impl FnOnce(&mut View)) -> Result<(), ViewError> {
		let mut views = self.views.write();
		let view = views
			.get_mut(id)
			.ok_or_else(|| ViewError::NotRegistered(id.clone()))?;
		f(view);
		Ok(())
	}

	/// Runs one render pass: `on_created`, the render function, `on_rendered`.
	///
	/// The namespace lock is not held while user code runs.
	pub fn render(
		&self,
		id: &ViewId,
		params: &RouteParams,
		content: Option<&str>,
	) -> Result<Rendered, ViewError> {
		let view = self
			.get(id)
			.ok_or_else(|| ViewError::NotRegistered(id.clone()))?;
		let cx = LifecycleContext { view: id, params };
		view.hooks().run(LifecycleEvent::Created, &cx);
		let rendered = view.render(params, content);
		view.hooks().run(LifecycleEvent::Rendered, &cx);
		Ok(rendered)
	}

	/// Runs the view's `on_destroyed` hook.
	pub fn destroy(&self, id: &ViewId, params: &RouteParams) -> Result<(), ViewError> {
		let view = self
			.get(id)
			.ok_or_else(|| ViewError::NotRegistered(id.clone()))?;
		view.hooks().run(
			LifecycleEvent::Destroyed,
			&LifecycleContext { view: id, params },
		);
		Ok(())
	}

	/// Dispatches `event` (e.g. `click .ct-archive`) to the view's handler.
	pub fn fire(
		&self,
		id: &ViewId,
		event: &str,
		params: &RouteParams,
		target: Option<&str>,
	) -> Result<(), ViewError> {
		let handler = {
			let views = self.views.read();
			let view = views
				.get(id)
				.ok_or_else(|| ViewError::NotRegistered(id.clone()))?;
			view.events()
				.get(event)
				.cloned()
				.ok_or_else(|| ViewError::UnknownEvent {
					view: id.clone(),
					event: event.to_string(),
				})?
		};
		handler
			.call(&EventContext {
				view: id,
				params,
				target,
			})
			.map_err(|err| ViewError::Handler {
				view: id.clone(),
				event: event.to_string(),
				message: err.to_string(),
			})
	}

	pub fn len(&self) -> usize {
		self.views.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.views.read().is_empty()
	}

	/// All registered ids, sorted.
	pub fn ids(&self) -> Vec<ViewId> {
		let mut ids: Vec<_> = self.views.read().keys().cloned().collect();
		ids.sort();
		ids
	}
}

impl std::fmt::Debug for ViewNamespace {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewNamespace")
			.field("len", &self.len())
			.finish()
	}
}

#[cfg(test)]
mod tests;
