//! Bindings attached to views: helpers, event handlers and lifecycle hooks.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ctype_primitives::{RouteParams, Value, ViewId};

/// Context handed to computed helpers on every render pass.
pub struct HelperContext<'a> {
	pub view: &'a ViewId,
	pub params: &'a RouteParams,
}

type HelperFn = Arc<dyn Fn(&HelperContext<'_>) -> Value + Send + Sync>;

/// Data binding exposed to a view's render function.
#[derive(Clone)]
pub enum Helper {
	/// Fixed value captured at attach time.
	Value(Value),
	/// Recomputed on every render pass.
	Computed(HelperFn),
}

impl Helper {
	pub fn value(value: impl Into<Value>) -> Self {
		Self::Value(value.into())
	}

	pub fn computed(f: impl Fn(&HelperContext<'_>) -> Value + Send + Sync + 'static) -> Self {
		Self::Computed(Arc::new(f))
	}

	pub fn evaluate(&self, cx: &HelperContext<'_>) -> Value {
		match self {
			Self::Value(v) => v.clone(),
			Self::Computed(f) => f(cx),
		}
	}
}

impl fmt::Debug for Helper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
			Self::Computed(_) => f.write_str("Computed(..)"),
		}
	}
}

/// Helpers keyed by name.
pub type Helpers = BTreeMap<String, Helper>;

/// Context handed to event handlers.
pub struct EventContext<'a> {
	pub view: &'a ViewId,
	pub params: &'a RouteParams,
	/// Document the event targets, when the element carries one.
	pub target: Option<&'a str>,
}

impl EventContext<'_> {
	/// Targeted document id, falling back to the route's `_id`.
	pub fn document_id(&self) -> Option<&str> {
		self.target.or_else(|| self.params.id())
	}
}

/// Error returned by an event handler.
pub type EventError = Box<dyn std::error::Error + Send + Sync>;

type EventFn = Arc<dyn Fn(&EventContext<'_>) -> Result<(), EventError> + Send + Sync>;

/// Handler bound to an event selector such as `click .ct-archive`.
#[derive(Clone)]
pub struct EventHandler(EventFn);

impl EventHandler {
	pub fn new(
		f: impl Fn(&EventContext<'_>) -> Result<(), EventError> + Send + Sync + 'static,
	) -> Self {
		Self(Arc::new(f))
	}

	pub fn call(&self, cx: &EventContext<'_>) -> Result<(), EventError> {
		(self.0)(cx)
	}
}

impl fmt::Debug for EventHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("EventHandler(..)")
	}
}

/// Event handlers keyed by selector.
pub type Events = BTreeMap<String, EventHandler>;

/// Context handed to lifecycle hooks.
pub struct LifecycleContext<'a> {
	pub view: &'a ViewId,
	pub params: &'a RouteParams,
}

#[derive(Clone)]
pub struct LifecycleHook(Arc<dyn Fn(&LifecycleContext<'_>) + Send + Sync>);

impl LifecycleHook {
	pub fn new(f: impl Fn(&LifecycleContext<'_>) + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	pub fn call(&self, cx: &LifecycleContext<'_>) {
		(self.0)(cx)
	}
}

impl fmt::Debug for LifecycleHook {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("LifecycleHook(..)")
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
	Created,
	Rendered,
	Destroyed,
}

/// Creation, render and destruction hooks of a view.
#[derive(Debug, Clone, Default)]
pub struct LifecycleHooks {
	pub on_created: Option<LifecycleHook>,
	pub on_rendered: Option<LifecycleHook>,
	pub on_destroyed: Option<LifecycleHook>,
}

impl LifecycleHooks {
	/// Replaces every hook `other` supplies; hooks it leaves out are kept.
	pub fn merge(&mut self, other: LifecycleHooks) {
		if other.on_created.is_some() {
			self.on_created = other.on_created;
		}
		if other.on_rendered.is_some() {
			self.on_rendered = other.on_rendered;
		}
		if other.on_destroyed.is_some() {
			self.on_destroyed = other.on_destroyed;
		}
	}

	pub fn get(&self, event: LifecycleEvent) -> Option<&LifecycleHook> {
		match event {
			LifecycleEvent::Created => self.on_created.as_ref(),
			LifecycleEvent::Rendered => self.on_rendered.as_ref(),
			LifecycleEvent::Destroyed => self.on_destroyed.as_ref(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.on_created.is_none() && self.on_rendered.is_none() && self.on_destroyed.is_none()
	}

	pub(crate) fn run(&self, event: LifecycleEvent, cx: &LifecycleContext<'_>) {
		if let Some(hook) = self.get(event) {
			hook.call(cx);
		}
	}
}
