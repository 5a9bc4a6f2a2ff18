//! In-flight request guards.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashSet;

/// Keys with a request currently in flight.
pub struct InFlight<K: Eq + Hash> {
    active: Arc<DashSet<K>>,
}

impl<K: Eq + Hash> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            active: Arc::new(DashSet::new()),
        }
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for InFlight<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.active.iter().map(|key| format!("{:?}", key.key()))).finish()
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` busy. Returns `None` if it already is.
    ///
    /// The key is released when the returned guard is dropped.
    #[must_use]
    pub fn try_acquire(&self, key: K) -> Option<InFlightGuard<K>> {
        if self.active.insert(key.clone()) {
            Some(InFlightGuard {
                active: Arc::clone(&self.active),
                key,
            })
        } else {
            None
        }
    }

    /// Returns true if `key` has a request in flight.
    #[must_use]
    pub fn is_busy(&self, key: &K) -> bool {
        self.active.contains(key)
    }
}

/// Releases its key on drop, whether the request succeeded or failed.
pub struct InFlightGuard<K: Eq + Hash> {
    active: Arc<DashSet<K>>,
    key: K,
}

impl<K: Eq + Hash> Drop for InFlightGuard<K> {
    fn drop(&mut self) {
        self.active.remove(&self.key);
    }
}
