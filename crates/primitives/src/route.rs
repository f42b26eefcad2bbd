use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Ctid, EndpointKey};

/// Named route of an endpoint: `ct.<ctid>.<key>`.
pub fn route_name(ctid: &Ctid, key: &EndpointKey) -> String {
	format!("ct.{ctid}.{key}")
}

/// Parameters captured from a matched path (`:_id` and friends).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.insert(name.into(), value.into());
	}

	/// Builder form of [`RouteParams::insert`].
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(name, value);
		self
	}

	/// The `_id` parameter of item-scoped routes.
	pub fn id(&self) -> Option<&str> {
		self.get(crate::ID_FIELD)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn route_names_are_bit_exact() {
		let ctid = Ctid::new("article").unwrap();
		assert_eq!(route_name(&ctid, &EndpointKey::Index), "ct.article.index");
		assert_eq!(route_name(&ctid, &EndpointKey::Archived), "ct.article.archived");
		assert_eq!(
			route_name(&ctid, &EndpointKey::Custom("export".into())),
			"ct.article.export"
		);
	}

	#[test]
	fn params_expose_id() {
		let params = RouteParams::new().with("_id", "a1");
		assert_eq!(params.id(), Some("a1"));
		assert_eq!(RouteParams::new().id(), None);
	}
}
