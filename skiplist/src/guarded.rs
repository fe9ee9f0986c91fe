//! The guarded tier: a sequential container behind a single mutex.
//!
//! This is the simplest way to make the sequential oracle safe to share
//! across threads: exactly one thread touches the skip list at a time,
//! for the full duration of whichever operation it's performing. It
//! trades all concurrency for simplicity and correctness-by-construction,
//! which makes it a useful baseline to measure the lock-coupled and
//! lock-free tiers against.

use parking_lot::{Mutex, MutexGuard};

use crate::sequential::{SequentialSkipMap, SequentialSkipSet};

/// Wraps a `T` behind a single [`parking_lot::Mutex`].
///
/// `Guarded` does not hand the `MutexGuard` itself out to callers; each of
/// [`GuardedSkipSet`] and [`GuardedSkipMap`] gets its own set of wrapper
/// methods below that lock, perform one sequential-tier operation, and
/// unlock again, the same shape as the original `skipper::Guarded<T>`
/// proxy without needing a proxy type to get there.
pub struct Guarded<T> {
    inner: Mutex<T>,
}

impl<T: Default> Default for Guarded<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Guarded<T> {
    /// Wraps `value` behind a mutex.
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }
}

/// A skip-list map guarded by a single mutex.
pub type GuardedSkipMap<K, V> = Guarded<SequentialSkipMap<K, V>>;

/// A skip-list set guarded by a single mutex.
pub type GuardedSkipSet<T> = Guarded<SequentialSkipSet<T>>;

impl<T: Ord> GuardedSkipSet<T> {
    /// Number of elements in the set at the moment the lock was acquired.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the set held no elements at the moment the lock
    /// was acquired.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns `true` if `value` is a member of the set.
    pub fn contains(&self, value: &T) -> bool {
        self.lock().contains(value)
    }

    /// Inserts `value`, returning `true` iff it was not already present.
    pub fn insert(&self, value: T) -> bool {
        self.lock().insert(value)
    }

    /// Removes `value`, returning `true` iff it was present.
    pub fn remove(&self, value: &T) -> bool {
        self.lock().remove(value)
    }
}

impl<K: Ord, V> GuardedSkipMap<K, V> {
    /// Number of entries in the map at the moment the lock was acquired.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the map held no entries at the moment the lock
    /// was acquired.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns `true` if `key` is present in the map.
    pub fn contains_key(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    /// Inserts `key` with `value`, returning the value previously stored
    /// under `key`, if any.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.lock().insert(key, value)
    }

    /// Returns a clone of the value stored under `key`, if present.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.lock().get(key).cloned()
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.lock().remove(key)
    }
}
