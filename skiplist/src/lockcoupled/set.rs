//! The optimistic lock-coupled ordered set, as a map keyed on unit values.

use skiplist_core::SkiplistConfig;

use super::map::LockCoupledSkipMap;

/// A concurrent ordered set with per-node recursive locks and optimistic
/// validation. See [`LockCoupledSkipMap`] for the protocol this wraps.
///
/// # Example
///
/// ```
/// use skiplist::LockCoupledSkipSet;
///
/// let set = LockCoupledSkipSet::new();
/// assert!(set.insert(1));
/// assert!(!set.insert(1));
/// assert!(set.contains(&1));
/// assert!(set.erase(&1));
/// assert!(!set.contains(&1));
/// assert!(!set.erase(&1));
/// ```
pub struct LockCoupledSkipSet<T> {
    inner: LockCoupledSkipMap<T, ()>,
}

impl<T: Ord> Default for LockCoupledSkipSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> LockCoupledSkipSet<T> {
    /// Builds a set using [`SkiplistConfig::default`].
    pub fn new() -> Self {
        Self::with_config(SkiplistConfig::default())
    }

    /// Builds a set with caller-chosen tuning parameters.
    pub fn with_config(config: SkiplistConfig) -> Self {
        Self {
            inner: LockCoupledSkipMap::with_config(config),
        }
    }

    /// Approximate number of elements; see
    /// [`LockCoupledSkipMap::len`] for why this is approximate under
    /// concurrent mutation.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set held no elements at the moment of the
    /// check.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` iff `value` is linked and not logically erased at
    /// the moment this call observes it.
    pub fn contains(&self, value: &T) -> bool {
        self.inner.contains(value)
    }

    /// Inserts `value`. Returns `true` iff this call transitioned it from
    /// absent to present.
    pub fn insert(&self, value: T) -> bool {
        self.inner.insert(value, ())
    }

    /// Removes `value`. Returns `true` iff this call transitioned it from
    /// present to absent.
    pub fn erase(&self, value: &T) -> bool {
        self.inner.erase(value)
    }
}
