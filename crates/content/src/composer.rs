//! Default and user bindings for resolved display views.

use std::sync::Arc;

use ctype_primitives::{Ctid, DisplayName, EndpointKey, RouteParams, Value, ViewId};
use ctype_store::{Collection, Methods, Query};
use ctype_views::{EventHandler, Events, Helper, Helpers, ViewNamespace};
use indexmap::IndexMap;
use serde_json::json;
use tracing::trace;

use crate::{ComposeError, EndpointDescriptor, Labels};

/// Helper holding the common metadata of every content-type view.
pub const CT_HELPER: &str = "ct";
pub const ARCHIVE_EVENT: &str = "click .ct-archive";
pub const RESTORE_EVENT: &str = "click .ct-restore";

/// Query the default helpers of `key` issue, if the endpoint reads documents.
///
/// Lists and single-document reads skip archived documents under soft
/// delete; the delete confirmation never filters.
pub fn endpoint_query(key: &EndpointKey, soft_delete: bool, params: &RouteParams) -> Option<Query> {
	let live = |query: Query| if soft_delete { query.live() } else { query };
	match key {
		EndpointKey::Index => Some(live(Query::new())),
		EndpointKey::Archived => Some(Query::new().archived()),
		EndpointKey::Read | EndpointKey::Update => Some(live(Query::by_id(params.id()?))),
		EndpointKey::Delete => Some(Query::by_id(params.id()?)),
		EndpointKey::Create | EndpointKey::Custom(_) => None,
	}
}

/// Field of a document by key, for templates addressing fields dynamically.
pub fn field_value<'a>(item: &'a Value, key: &str) -> Option<&'a Value> {
	item.get(key)
}

/// Attaches helpers, events and hooks to the views of one content type.
pub struct BehaviorComposer {
	views: ViewNamespace,
	ctid: Ctid,
	collection: Arc<dyn Collection>,
	methods: Methods,
	soft_delete: bool,
	labels: Value,
	fields: Value,
	path_to: Value,
}

impl BehaviorComposer {
	pub fn new(
		views: ViewNamespace,
		ctid: Ctid,
		collection: Arc<dyn Collection>,
		methods: Methods,
		soft_delete: bool,
		labels: &Labels,
		descriptors: &IndexMap<EndpointKey, EndpointDescriptor>,
	) -> Self {
		let fields = collection
			.schema()
			.map(|schema| {
				schema
					.iter()
					.map(|(key, def)| json!({ "key": key, "value": def.label }))
					.collect::<Vec<_>>()
			})
			.unwrap_or_default();
		let path_to = descriptors
			.values()
			.filter(|d| d.enabled)
			.map(|d| (d.key.to_string(), Value::String(d.name.clone())))
			.collect();
		Self {
			views,
			ctid,
			collection,
			methods,
			soft_delete,
			labels: labels.to_value(),
			fields: Value::Array(fields),
			path_to: Value::Object(path_to),
		}
	}

	/// Binds `view` for `display` of `endpoint`.
	///
	/// Defaults for the endpoint key come first, the `ct` metadata helper is
	/// always set, then the user's overrides for `display` replace defaults of
	/// the same name. Lifecycle hooks are attached only when the user gave some.
	pub fn attach(
		&self,
		view: &ViewId,
		key: &EndpointKey,
		display: &DisplayName,
		endpoint: &EndpointDescriptor,
	) -> Result<(), ComposeError> {
		if !self.views.exists(view) {
			return Err(ComposeError::ViewNotRegistered(view.clone()));
		}

		let mut helpers = self.default_helpers(key);
		helpers.insert(
			CT_HELPER.to_string(),
			Helper::value(self.common(key, display, endpoint)),
		);
		let mut events = self.default_events(key);

		if let Some(user) = endpoint.display_override(display) {
			helpers.extend(user.helpers.clone());
			events.extend(user.events.clone());
			if !user.hooks.is_empty() {
				self.views.attach_hooks(view, user.hooks.clone())?;
			}
		}

		trace!(
			view = %view,
			helpers = helpers.len(),
			events = events.len(),
			"attaching bindings"
		);
		self.views.attach_helpers(view, helpers)?;
		if !events.is_empty() {
			self.views.attach_events(view, events)?;
		}
		Ok(())
	}

	/// Common metadata exposed as `ct`.
	pub fn common(&self, key: &EndpointKey, display: &DisplayName, endpoint: &EndpointDescriptor) -> Value {
		json!({
			"meta": { "title": endpoint.meta.title },
			"fields": self.fields,
			"labels": self.labels,
			"pathTo": self.path_to,
			"ctid": self.ctid.as_str(),
			"endpoint": key.as_str(),
			"display": display.as_str(),
		})
	}

	fn default_helpers(&self, key: &EndpointKey) -> Helpers {
		let mut helpers = Helpers::new();
		let form = |helpers: &mut Helpers, kind: &str| {
			helpers.insert(
				"formCollection".into(),
				Helper::value(self.collection.name()),
			);
			helpers.insert(
				"formId".into(),
				Helper::value(format!("{kind}-form-{}", self.ctid)),
			);
			helpers.insert("formType".into(), Helper::value(kind));
		};

		match key {
			EndpointKey::Index | EndpointKey::Archived => {
				helpers.insert("items".into(), self.items_helper(key));
			}
			EndpointKey::Create => form(&mut helpers, "insert"),
			EndpointKey::Read => {
				helpers.insert("item".into(), self.item_helper(key));
			}
			EndpointKey::Update => {
				form(&mut helpers, "update");
				helpers.insert("item".into(), self.item_helper(key));
			}
			EndpointKey::Delete => {
				helpers.insert(
					"formCollection".into(),
					Helper::value(self.collection.name()),
				);
				helpers.insert("item".into(), self.item_helper(key));
			}
			EndpointKey::Custom(_) => {}
		}
		helpers
	}

	fn items_helper(&self, key: &EndpointKey) -> Helper {
		let collection = self.collection.clone();
		let key = key.clone();
		let soft_delete = self.soft_delete;
		Helper::computed(move |cx| {
			let query = endpoint_query(&key, soft_delete, cx.params).unwrap_or_default();
			let cursor = collection.find(&query);
			json!({ "cursor": cursor.to_value(), "total": cursor.count() })
		})
	}

	fn item_helper(&self, key: &EndpointKey) -> Helper {
		let collection = self.collection.clone();
		let key = key.clone();
		let soft_delete = self.soft_delete;
		Helper::computed(move |cx| {
			endpoint_query(&key, soft_delete, cx.params)
				.and_then(|query| collection.find_one(&query))
				.map_or(Value::Null, Value::Object)
		})
	}

	fn default_events(&self, key: &EndpointKey) -> Events {
		let mut events = Events::new();
		if !self.soft_delete {
			return events;
		}
		match key {
			EndpointKey::Index | EndpointKey::Read | EndpointKey::Update => {
				events.insert(ARCHIVE_EVENT.into(), self.archive_handler(true));
				events.insert(RESTORE_EVENT.into(), self.archive_handler(false));
			}
			EndpointKey::Archived => {
				events.insert(RESTORE_EVENT.into(), self.archive_handler(false));
			}
			_ => {}
		}
		events
	}

	fn archive_handler(&self, archive: bool) -> EventHandler {
		let methods = self.methods.clone();
		let collection = self.collection.name().to_string();
		EventHandler::new(move |cx| {
			let id = cx.document_id().ok_or("event target has no document id")?;
			if archive {
				methods.archive(&collection, id)?;
			} else {
				methods.restore(&collection, id)?;
			}
			Ok(())
		})
	}
}

impl std::fmt::Debug for BehaviorComposer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BehaviorComposer")
			.field("ctid", &self.ctid)
			.field("collection", &self.collection.name())
			.field("soft_delete", &self.soft_delete)
			.finish_non_exhaustive()
	}
}
