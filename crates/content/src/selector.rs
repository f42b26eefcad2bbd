use std::collections::BTreeMap;

use ctype_primitives::{DisplayName, EndpointKey, Signal, SubscriptionId};
use indexmap::IndexMap;
use tracing::debug;

use crate::{EndpointDescriptor, SelectorError};

/// Active display per enabled endpoint of one content type.
///
/// Each endpoint has its own [`Signal`]; a [`set`](Self::set) notifies that
/// endpoint's subscribers synchronously.
#[derive(Debug, Clone, Default)]
pub struct DisplaySelector {
	cells: IndexMap<EndpointKey, Signal<DisplayName>>,
}

impl DisplaySelector {
	/// One cell per enabled descriptor, starting at `initial[key]` or the
	/// descriptor's default display.
	pub fn new<'a>(
		descriptors: impl IntoIterator<Item = &'a EndpointDescriptor>,
		initial: &BTreeMap<EndpointKey, DisplayName>,
	) -> Self {
		let cells = descriptors
			.into_iter()
			.filter(|d| d.enabled)
			.map(|d| {
				let display = initial
					.get(&d.key)
					.cloned()
					.unwrap_or_else(|| d.default_display.clone());
				(d.key.clone(), Signal::new(display))
			})
			.collect();
		Self { cells }
	}

	fn cell(&self, key: &EndpointKey) -> Result<&Signal<DisplayName>, SelectorError> {
		self.cells
			.get(key)
			.ok_or_else(|| SelectorError::UnknownEndpoint(key.clone()))
	}

	pub fn get(&self, key: &EndpointKey) -> Result<DisplayName, SelectorError> {
		Ok(self.cell(key)?.get())
	}

	/// Sets the active display; returns whether it changed.
	pub fn set(&self, key: &EndpointKey, name: DisplayName) -> Result<bool, SelectorError> {
		let cell = self.cell(key)?;
		debug!(endpoint = %key, display = %name, "display selected");
		Ok(cell.set(name))
	}

	pub fn subscribe(
		&self,
		key: &EndpointKey,
		f: impl Fn(&DisplayName) + Send + Sync + 'static,
	) -> Result<SubscriptionId, SelectorError> {
		Ok(self.cell(key)?.subscribe(f))
	}

	pub fn unsubscribe(&self, key: &EndpointKey, id: SubscriptionId) -> Result<bool, SelectorError> {
		Ok(self.cell(key)?.unsubscribe(id))
	}

	pub fn signal(&self, key: &EndpointKey) -> Option<&Signal<DisplayName>> {
		self.cells.get(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &EndpointKey> {
		self.cells.keys()
	}
}
