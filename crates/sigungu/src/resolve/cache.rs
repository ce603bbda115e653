use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ahash::AHashMap as HashMap;
use tokio::sync::OnceCell;

use crate::geocode::GeoPoint;

type Slot = Arc<OnceCell<GeoPoint>>;

/// Memo of resolved inputs, keyed by the exact input string.
///
/// Each key owns a single-flight slot: the first caller runs the lookup and
/// every concurrent caller for the same key waits on it instead of issuing its
/// own requests. Only successful lookups fill a slot, and a filled slot is
/// never overwritten.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<GeoPoint> {
        self.lock().get(key).and_then(|slot| slot.get().cloned())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().get(key).is_some_and(|slot| slot.initialized())
    }

    /// Store `point` unless `key` already resolved. Returns whether it was stored.
    pub fn insert(&self, key: impl Into<String>, point: GeoPoint) -> bool {
        self.lock().entry(key.into()).or_default().set(point).is_ok()
    }

    /// Number of resolved entries; in-flight lookups are not counted.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// The shared slot for `key`, created empty on first use.
    pub(crate) fn slot(&self, key: &str) -> Slot {
        let mut slots = self.lock();
        if let Some(slot) = slots.get(key) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        slots.insert(key.to_string(), Arc::clone(&slot));
        slot
    }

    /// Drop an empty slot nobody else is waiting on.
    pub(crate) fn release(&self, key: &str, slot: Slot) {
        let mut slots = self.lock();
        // the map holds one reference and `slot` the other
        if !slot.initialized()
            && Arc::strong_count(&slot) <= 2
            && slots.get(key).is_some_and(|s| Arc::ptr_eq(s, &slot))
        {
            slots.remove(key);
        }
    }
}
