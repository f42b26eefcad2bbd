use std::sync::Arc;

use ctype_config::{AdminConfig, ContentTypeConfig, Settings};
use ctype_primitives::{Ctid, DisplayName, EndpointKey, RouteParams};
use ctype_router::{RenderTarget, RouteError, RouterBackend, VisitOutcome, backend_for};
use ctype_store::{CollectionRegistry, MemoryCollection, Methods};
use ctype_views::ViewNamespace;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::endpoint::EndpointOptions;
use crate::{ContentType, ContentTypeError, ContentTypeOptions, RenderPass};

/// Result of entering a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
	Rendered {
		route: String,
		/// Layout the pass is slotted into, for layout-rendering backends.
		layout: Option<String>,
		pass: RenderPass,
	},
	Redirect {
		route: String,
		to: String,
	},
}

/// Application-level registry of content types and their shared collaborators.
pub struct ContentTypes {
	settings: Settings,
	views: ViewNamespace,
	backend: Arc<dyn RouterBackend>,
	collections: Arc<CollectionRegistry>,
	methods: Methods,
	types: RwLock<IndexMap<Ctid, Arc<ContentType>>>,
}

impl ContentTypes {
	/// Registry over a fresh namespace seeded with the `default` theme.
	///
	/// Fails when `settings.router` names an unsupported backend.
	pub fn new(settings: Settings) -> Result<Self, RouteError> {
		Self::with_views(settings, ViewNamespace::with_default_theme())
	}

	/// Registry over an existing namespace, so themes can be registered first.
	pub fn with_views(settings: Settings, views: ViewNamespace) -> Result<Self, RouteError> {
		let backend = backend_for(&settings.router)?;
		let collections = Arc::new(CollectionRegistry::new());
		debug!(router = %settings.router, delete_type = settings.delete_type.as_str(), "content types ready");
		Ok(Self {
			methods: Methods::new(collections.clone()),
			settings,
			views,
			backend,
			collections,
			types: RwLock::new(IndexMap::new()),
		})
	}

	/// Builds settings, in-memory collections and content types from an
	/// admin description.
	pub fn from_config(config: &AdminConfig) -> Result<Self, ContentTypeError> {
		let settings = Settings::default().configured(config.settings.clone());
		let registry = Self::new(settings)?;
		for collection in &config.collections {
			registry
				.collections
				.register(Arc::new(MemoryCollection::from_config(collection)?))?;
		}
		for ct in &config.content_types {
			registry.register(registry.options_from_config(ct)?)?;
		}
		Ok(registry)
	}

	fn options_from_config(&self, config: &ContentTypeConfig) -> Result<ContentTypeOptions, ContentTypeError> {
		let collection = self
			.collections
			.get(&config.collection)
			.ok_or_else(|| ContentTypeError::UnknownCollection(config.collection.clone()))?;
		let mut options = ContentTypeOptions::new(config.ctid.clone(), collection);
		options.theme = config.theme.clone();
		options.base_path = config.base_path.clone();
		options.layout = config.layout.clone();
		options.labels = config.labels.clone();
		for (key, value) in &config.endpoints {
			let key = EndpointKey::new(key.as_str())?;
			let endpoint = EndpointOptions::from_json(&key, value)?;
			options.endpoints.insert(key, endpoint);
		}
		for (key, display) in &config.displays {
			options
				.displays
				.insert(EndpointKey::new(key.as_str())?, DisplayName::new(display.as_str())?);
		}
		Ok(options)
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn views(&self) -> &ViewNamespace {
		&self.views
	}

	pub fn backend(&self) -> &Arc<dyn RouterBackend> {
		&self.backend
	}

	pub fn collections(&self) -> &Arc<CollectionRegistry> {
		&self.collections
	}

	pub fn methods(&self) -> &Methods {
		&self.methods
	}

	/// Constructs and registers a content type; ctids are unique.
	pub fn register(&self, options: ContentTypeOptions) -> Result<Arc<ContentType>, ContentTypeError> {
		let ctid = Ctid::new(options.ctid.as_str()).map_err(ContentTypeError::InvalidCtid)?;
		// Held across construction so two registrations of one ctid cannot
		// both bind routes.
		let mut types = self.types.write();
		if types.contains_key(&ctid) {
			return Err(ContentTypeError::DuplicateCtid(ctid));
		}
		let content_type = Arc::new(ContentType::new(options, self)?);
		types.insert(ctid.clone(), content_type.clone());
		info!(ctid = %ctid, total = types.len(), "content type registered");
		Ok(content_type)
	}

	pub fn get(&self, ctid: &str) -> Option<Arc<ContentType>> {
		let ctid = Ctid::new(ctid).ok()?;
		self.types.read().get(&ctid).cloned()
	}

	/// Registered content types in registration order.
	pub fn content_types(&self) -> Vec<Arc<ContentType>> {
		self.types.read().values().cloned().collect()
	}

	/// Builds the path of a named route.
	pub fn path_for(&self, route: &str, params: &RouteParams) -> Result<String, RouteError> {
		self.backend.path_for(route, params)
	}

	/// Compares a setting with a value in its textual form.
	pub fn setting_equals(&self, key: &str, value: &str) -> bool {
		self.settings.setting_equals(key, value)
	}

	/// Content type and endpoint a route name belongs to.
	pub fn route_target(&self, route: &str) -> Option<(Arc<ContentType>, EndpointKey)> {
		self.types.read().values().find_map(|ct| {
			ct.routes()
				.find(|binding| binding.name == route)
				.map(|binding| (ct.clone(), binding.key.clone()))
		})
	}

	/// Enters `path` through the router backend and renders the matched
	/// endpoint.
	pub fn enter(&self, path: &str) -> Result<Page, ContentTypeError> {
		let visit = self.backend.enter(path)?;
		let target = match visit.outcome {
			VisitOutcome::Redirect(to) => {
				debug!(route = %visit.route, to = %to, "route redirected");
				return Ok(Page::Redirect {
					route: visit.route,
					to,
				});
			}
			VisitOutcome::Render(target) => target,
		};
		let (content_type, key) = self
			.route_target(&visit.route)
			.ok_or_else(|| ContentTypeError::UnknownRoute(visit.route.clone()))?;
		let pass = content_type.render(&key, &visit.params)?;
		let layout = match target {
			RenderTarget::View(_) => None,
			RenderTarget::Layout { layout, .. } => Some(layout),
		};
		Ok(Page::Rendered {
			route: visit.route,
			layout,
			pass,
		})
	}
}

impl std::fmt::Debug for ContentTypes {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContentTypes")
			.field("settings", &self.settings)
			.field("backend", &self.backend.kind())
			.field("types", &self.types.read().keys().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}
