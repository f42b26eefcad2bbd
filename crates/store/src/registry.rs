use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::{Collection, StoreError};

/// Collections addressable by name.
///
/// Schema and soft-delete methods receive a collection *name*; this registry
/// resolves it to the shared instance.
#[derive(Default)]
pub struct CollectionRegistry {
	by_name: RwLock<HashMap<String, Arc<dyn Collection>>>,
}

impl CollectionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `collection` under its name.
	///
	/// Registering the same instance twice is a no-op; a different instance
	/// with a taken name is rejected.
	pub fn register(&self, collection: Arc<dyn Collection>) -> Result<(), StoreError> {
		let mut by_name = self.by_name.write();
		let name = collection.name().to_string();
		if let Some(existing) = by_name.get(&name) {
			if Arc::ptr_eq(existing, &collection) {
				return Ok(());
			}
			return Err(StoreError::DuplicateCollection(name));
		}
		by_name.insert(name, collection);
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<Arc<dyn Collection>> {
		self.by_name.read().get(name).cloned()
	}

	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.by_name.read().keys().cloned().collect();
		names.sort();
		names
	}

	pub fn len(&self) -> usize {
		self.by_name.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MemoryCollection;

	#[test]
	fn register_is_idempotent_per_instance() {
		let registry = CollectionRegistry::new();
		let articles: Arc<dyn Collection> = Arc::new(MemoryCollection::new("articles"));
		registry.register(articles.clone()).unwrap();
		registry.register(articles).unwrap();
		assert_eq!(registry.len(), 1);

		let impostor: Arc<dyn Collection> = Arc::new(MemoryCollection::new("articles"));
		assert_eq!(
			registry.register(impostor),
			Err(StoreError::DuplicateCollection("articles".into()))
		);
		assert!(registry.get("articles").is_some());
		assert!(registry.get("pages").is_none());
	}
}
