use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

/// Handle returned by [`Signal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
	value: RwLock<T>,
	version: AtomicU64,
	next_id: AtomicU64,
	subscribers: Mutex<Vec<(SubscriptionId, Subscriber<T>)>>,
}

/// Mutable value cell with synchronous change notification.
///
/// Clones share the same cell. Subscribers run on the thread calling
/// [`Signal::set`], after the value lock is released, so a subscriber may
/// read the signal (or set another one) without deadlocking.
pub struct Signal<T> {
	inner: Arc<Inner<T>>,
}

impl<T> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Signal")
			.field("value", &*self.inner.value.read())
			.field("version", &self.inner.version.load(Ordering::Acquire))
			.finish()
	}
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Signal<T> {
	pub fn new(value: T) -> Self {
		Self {
			inner: Arc::new(Inner {
				value: RwLock::new(value),
				version: AtomicU64::new(0),
				next_id: AtomicU64::new(0),
				subscribers: Mutex::new(Vec::new()),
			}),
		}
	}

	pub fn get(&self) -> T {
		self.inner.value.read().clone()
	}

	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.inner.value.read())
	}

	/// Number of effective changes since creation.
	pub fn version(&self) -> u64 {
		self.inner.version.load(Ordering::Acquire)
	}

	/// Stores `value` and notifies subscribers.
	///
	/// Setting a value equal to the current one is not a change: no version
	/// bump, no notification. Returns whether the value changed.
	pub fn set(&self, value: T) -> bool {
		{
			let mut current = self.inner.value.write();
			if *current == value {
				return false;
			}
			*current = value.clone();
			self.inner.version.fetch_add(1, Ordering::AcqRel);
		}

		let subscribers: Vec<Subscriber<T>> = self
			.inner
			.subscribers
			.lock()
			.iter()
			.map(|(_, f)| f.clone())
			.collect();
		for subscriber in subscribers {
			subscriber(&value);
		}
		true
	}

	pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
		self.inner.subscribers.lock().push((id, Arc::new(f)));
		id
	}

	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut subscribers = self.inner.subscribers.lock();
		let before = subscribers.len();
		subscribers.retain(|(sid, _)| *sid != id);
		subscribers.len() != before
	}

	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.lock().len()
	}
}
