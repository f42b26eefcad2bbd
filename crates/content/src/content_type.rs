use std::collections::BTreeMap;
use std::sync::Arc;

use ctype_primitives::{Ctid, DisplayName, EndpointKey, RouteParams, ThemeName, Value, ViewId};
use ctype_store::Collection;
use ctype_views::{Helper, ViewNamespace};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::json;
use tracing::{info, warn};

use crate::endpoint::{self, BaseOptions, EndpointDescriptor, EndpointOptions};
use crate::{
	BehaviorComposer, ComposeError, ContentTypeError, ContentTypes, DisplaySelector, Labels,
	RouteBinder, RouteBinding, SelectorError, ViewResolver,
};

pub const DEFAULT_BASE_PATH: &str = "/admin/content";
pub const DEFAULT_LAYOUT: &str = "ctLayout";

/// Wrapper helper naming the endpoint it serves.
pub const WRAPPER_ENDPOINT_HELPER: &str = "ctEndpoint";
/// Wrapper helper reading the endpoint's active display on every pass.
pub const WRAPPER_DISPLAY_HELPER: &str = "ctDisplay";

/// Construction options of a [`ContentType`].
#[derive(Clone, Default)]
pub struct ContentTypeOptions {
	pub ctid: String,
	pub collection: Option<Arc<dyn Collection>>,
	/// Defaults to `default`.
	pub theme: Option<String>,
	/// Defaults to [`DEFAULT_BASE_PATH`].
	pub base_path: Option<String>,
	/// Defaults to [`DEFAULT_LAYOUT`].
	pub layout: Option<String>,
	pub endpoints: IndexMap<EndpointKey, EndpointOptions>,
	/// Opaque values kept for custom views.
	pub resources: BTreeMap<String, Value>,
	pub labels: BTreeMap<String, String>,
	/// Initial display per endpoint, over each endpoint's default display.
	pub displays: BTreeMap<EndpointKey, DisplayName>,
}

impl ContentTypeOptions {
	pub fn new(ctid: impl Into<String>, collection: Arc<dyn Collection>) -> Self {
		Self {
			ctid: ctid.into(),
			collection: Some(collection),
			..Self::default()
		}
	}

	pub fn theme(mut self, theme: impl Into<String>) -> Self {
		self.theme = Some(theme.into());
		self
	}

	pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
		self.base_path = Some(base_path.into());
		self
	}

	pub fn layout(mut self, layout: impl Into<String>) -> Self {
		self.layout = Some(layout.into());
		self
	}

	pub fn endpoint(mut self, key: EndpointKey, options: EndpointOptions) -> Self {
		self.endpoints.insert(key, options);
		self
	}

	pub fn resource(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.resources.insert(name.into(), value.into());
		self
	}

	pub fn label(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
		self.labels.insert(key.into(), label.into());
		self
	}

	pub fn initial_display(mut self, key: EndpointKey, display: DisplayName) -> Self {
		self.displays.insert(key, display);
		self
	}
}

/// One render pass of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
	pub key: EndpointKey,
	pub display: DisplayName,
	/// Display view the wrapper delegated to.
	pub view: ViewId,
	pub wrapper: ViewId,
	/// Helpers evaluated for the display view.
	pub data: BTreeMap<String, Value>,
	pub body: String,
}

/// Resolves a display and binds behavior to the result.
struct DisplayPipeline {
	resolver: ViewResolver,
	composer: BehaviorComposer,
	theme: ThemeName,
	ctid: Ctid,
	descriptors: Arc<IndexMap<EndpointKey, EndpointDescriptor>>,
}

impl DisplayPipeline {
	fn resolve(&self, key: &EndpointKey, display: &DisplayName) -> Result<ViewId, ComposeError> {
		let descriptor = self
			.descriptors
			.get(key)
			.ok_or_else(|| ComposeError::UnknownEndpoint(key.clone()))?;
		let declared = descriptor.displays.contains_key(display);
		let view = self
			.resolver
			.resolve_display_view(key, &self.theme, display, &self.ctid, declared);
		self.composer.attach(&view, key, display, descriptor)?;
		Ok(view)
	}
}

struct EndpointState {
	route: RouteBinding,
	/// Display view of the latest resolution.
	target: Arc<RwLock<Option<ViewId>>>,
}

/// A content type: one collection exposed through a set of endpoint routes.
pub struct ContentType {
	ctid: Ctid,
	theme: ThemeName,
	base_path: String,
	layout: String,
	collection: Arc<dyn Collection>,
	resources: BTreeMap<String, Value>,
	labels: Labels,
	views: ViewNamespace,
	pipeline: Arc<DisplayPipeline>,
	selector: DisplaySelector,
	endpoints: IndexMap<EndpointKey, EndpointState>,
}

impl ContentType {
	/// Validates `options`, grafts the default schema fields onto the
	/// collection and binds a route for every enabled endpoint.
	///
	/// Does not check ctid uniqueness; [`ContentTypes::register`] does.
	pub fn new(options: ContentTypeOptions, registry: &ContentTypes) -> Result<Self, ContentTypeError> {
		let ctid = Ctid::new(options.ctid.as_str()).map_err(ContentTypeError::InvalidCtid)?;
		let collection = options
			.collection
			.ok_or_else(|| ContentTypeError::MissingCollection(ctid.to_string()))?;
		if collection.schema().is_none() {
			return Err(ContentTypeError::MissingSchema {
				ctid,
				collection: collection.name().to_string(),
			});
		}
		let theme = match options.theme {
			Some(theme) => ThemeName::new(theme).map_err(ContentTypeError::InvalidTheme)?,
			None => ThemeName::default_theme(),
		};
		let base_path = options
			.base_path
			.unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());
		if !base_path.starts_with('/') {
			return Err(ContentTypeError::InvalidBasePath(base_path));
		}
		let layout = options.layout.unwrap_or_else(|| DEFAULT_LAYOUT.to_string());
		if layout.is_empty() {
			return Err(ContentTypeError::InvalidLayout(ctid));
		}

		let settings = registry.settings();
		registry.collections().register(collection.clone())?;
		registry
			.methods()
			.alter_schema(collection.name(), &settings.effective_default_fields());

		let base = BaseOptions {
			ctid: ctid.clone(),
			base_path: base_path.clone(),
			layout: layout.clone(),
		};
		let descriptors = Arc::new(endpoint::build(&base, &options.endpoints, settings)?);
		let labels = Labels::with_overrides(&options.labels);
		let views = registry.views().clone();
		let pipeline = Arc::new(DisplayPipeline {
			resolver: ViewResolver::new(views.clone()),
			composer: BehaviorComposer::new(
				views.clone(),
				ctid.clone(),
				collection.clone(),
				registry.methods().clone(),
				settings.is_soft_delete(),
				&labels,
				&descriptors,
			),
			theme: theme.clone(),
			ctid: ctid.clone(),
			descriptors: descriptors.clone(),
		});
		let selector = DisplaySelector::new(descriptors.values(), &options.displays);
		let binder = RouteBinder::new(registry.backend().clone());

		let mut endpoints = IndexMap::new();
		for descriptor in descriptors.values().filter(|d| d.enabled) {
			let key = &descriptor.key;
			let wrapper = pipeline.resolver.resolve_wrapper_view(key, &theme, &ctid);
			let signal = selector
				.signal(key)
				.cloned()
				.ok_or_else(|| SelectorError::UnknownEndpoint(key.clone()))?;
			views.attach_helpers(
				&wrapper,
				[
					(WRAPPER_ENDPOINT_HELPER.to_string(), Helper::value(key.as_str())),
					(
						WRAPPER_DISPLAY_HELPER.to_string(),
						Helper::computed(move |_| json!(signal.get().as_str())),
					),
				]
				.into_iter()
				.collect(),
			)?;

			let target = Arc::new(RwLock::new(None));
			{
				let pipeline = pipeline.clone();
				let target = target.clone();
				let sub_key = key.clone();
				selector.subscribe(key, move |name| {
					match pipeline.resolve(&sub_key, name) {
						Ok(view) => *target.write() = Some(view),
						Err(err) => warn!(
							ctid = %pipeline.ctid,
							endpoint = %sub_key,
							display = %name,
							error = %err,
							"display change could not be resolved"
						),
					}
				})?;
			}

			let route = binder.bind(descriptor, key, &theme, &ctid, &wrapper)?;
			endpoints.insert(key.clone(), EndpointState { route, target });
		}

		info!(
			ctid = %ctid,
			collection = collection.name(),
			theme = %theme,
			routes = endpoints.len(),
			"content type initialized"
		);
		Ok(Self {
			ctid,
			theme,
			base_path,
			layout,
			collection,
			resources: options.resources,
			labels,
			views,
			pipeline,
			selector,
			endpoints,
		})
	}

	pub fn ctid(&self) -> &Ctid {
		&self.ctid
	}

	pub fn theme(&self) -> &ThemeName {
		&self.theme
	}

	pub fn base_path(&self) -> &str {
		&self.base_path
	}

	pub fn layout(&self) -> &str {
		&self.layout
	}

	pub fn collection(&self) -> &Arc<dyn Collection> {
		&self.collection
	}

	pub fn resources(&self) -> &BTreeMap<String, Value> {
		&self.resources
	}

	pub fn labels(&self) -> &Labels {
		&self.labels
	}

	/// Every descriptor, disabled ones included.
	pub fn descriptors(&self) -> &IndexMap<EndpointKey, EndpointDescriptor> {
		&self.pipeline.descriptors
	}

	pub fn descriptor(&self, key: &EndpointKey) -> Option<&EndpointDescriptor> {
		self.pipeline.descriptors.get(key)
	}

	pub fn routes(&self) -> impl Iterator<Item = &RouteBinding> {
		self.endpoints.values().map(|e| &e.route)
	}

	pub fn route(&self, key: &EndpointKey) -> Option<&RouteBinding> {
		self.endpoints.get(key).map(|e| &e.route)
	}

	pub fn selector(&self) -> &DisplaySelector {
		&self.selector
	}

	pub fn resolver(&self) -> &ViewResolver {
		&self.pipeline.resolver
	}

	pub fn composer(&self) -> &BehaviorComposer {
		&self.pipeline.composer
	}

	pub fn display(&self, key: &EndpointKey) -> Result<DisplayName, SelectorError> {
		self.selector.get(key)
	}

	/// Switches the active display; the endpoint's render target is
	/// recomputed before this returns.
	pub fn set_display(&self, key: &EndpointKey, display: DisplayName) -> Result<bool, SelectorError> {
		self.selector.set(key, display)
	}

	/// Display view of the latest resolution, if the endpoint was rendered
	/// or its display changed.
	pub fn current_target(&self, key: &EndpointKey) -> Option<ViewId> {
		self.endpoints.get(key)?.target.read().clone()
	}

	fn state(&self, key: &EndpointKey) -> Result<&EndpointState, SelectorError> {
		self.endpoints
			.get(key)
			.ok_or_else(|| SelectorError::UnknownEndpoint(key.clone()))
	}

	fn resolve_target(&self, key: &EndpointKey, display: &DisplayName) -> Result<ViewId, ContentTypeError> {
		let state = self.state(key)?;
		let view = self.pipeline.resolve(key, display)?;
		*state.target.write() = Some(view.clone());
		Ok(view)
	}

	/// Runs one render pass: the wrapper reads the active display, the
	/// display view is resolved and bound, then rendered inside the wrapper.
	pub fn render(&self, key: &EndpointKey, params: &RouteParams) -> Result<RenderPass, ContentTypeError> {
		let display = self.selector.get(key)?;
		let view = self.resolve_target(key, &display)?;
		let wrapper = self.state(key)?.route.wrapper.clone();
		let inner = self.views.render(&view, params, None)?;
		let outer = self.views.render(&wrapper, params, Some(&inner.body))?;
		Ok(RenderPass {
			key: key.clone(),
			display,
			view,
			wrapper,
			data: inner.data,
			body: outer.body,
		})
	}

	/// Dispatches a view event (`click .ct-archive`) on the endpoint's
	/// current display view.
	pub fn trigger(
		&self,
		key: &EndpointKey,
		event: &str,
		params: &RouteParams,
		target: Option<&str>,
	) -> Result<(), ContentTypeError> {
		let view = match self.current_target(key) {
			Some(view) => view,
			None => self.resolve_target(key, &self.selector.get(key)?)?,
		};
		Ok(self.views.fire(&view, event, params, target)?)
	}

	/// Runs `on_destroyed` of the endpoint's current display view.
	pub fn leave(&self, key: &EndpointKey, params: &RouteParams) -> Result<(), ContentTypeError> {
		if let Some(view) = self.current_target(key) {
			self.views.destroy(&view, params)?;
		}
		Ok(())
	}
}

impl std::fmt::Debug for ContentType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContentType")
			.field("ctid", &self.ctid)
			.field("theme", &self.theme)
			.field("base_path", &self.base_path)
			.field("collection", &self.collection.name())
			.field("endpoints", &self.endpoints.keys().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}
