//! The lock-free ordered set: CAS-driven insertion, logical deletion via a
//! single `is_erased` flag, arena-backed nodes with no per-node
//! reclamation.

use std::sync::atomic::Ordering;

use skiplist_core::{InsertOutcome, SkiplistConfig};

use crate::arena::Arena;
use crate::level::LevelGenerator;

use super::node::{find, Node, NodePtr};

/// A non-blocking ordered set.
///
/// Every node is allocated out of a fixed-capacity [`Arena`]; once a node
/// is linked in, its address never changes and is never reused, which is
/// what lets `find` dereference pointers without a lock or a guard. The
/// trade is that `insert` can fail with
/// [`InsertOutcome::ArenaExhausted`] once the arena's capacity is used
/// up, and that an erased node's storage is never reclaimed, both
/// accepted consequences of having no safe-memory-reclamation scheme
/// (hazard pointers, epochs) in this tier; see `DESIGN.md`.
///
/// `LEVELS` is the tower capacity, `MaxLevel + 1`; the default of `5`
/// matches the reference `MaxLevel = 4`.
///
/// # Example
///
/// ```
/// use skiplist::LockFreeSkipSet;
///
/// let set: LockFreeSkipSet<i32> = LockFreeSkipSet::new();
/// assert!(set.insert(7));
/// assert!(!set.insert(7));
/// assert!(set.contains(&7));
/// ```
pub struct LockFreeSkipSet<T, const LEVELS: usize = 5> {
    head: NodePtr<T, LEVELS>,
    tail: NodePtr<T, LEVELS>,
    max_level: usize,
    level_generator: LevelGenerator,
    arena: Arena<Node<T, LEVELS>>,
}

// SAFETY: nodes are reached only via atomic loads, published via a
// release CAS before any other thread can observe them, and never freed
// while the set is alive.
unsafe impl<T: Send, const LEVELS: usize> Send for LockFreeSkipSet<T, LEVELS> {}
unsafe impl<T: Send + Sync, const LEVELS: usize> Sync for LockFreeSkipSet<T, LEVELS> {}

impl<T: Ord + Clone, const LEVELS: usize> Default for LockFreeSkipSet<T, LEVELS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone, const LEVELS: usize> LockFreeSkipSet<T, LEVELS> {
    /// Builds a set using [`SkiplistConfig::default`].
    pub fn new() -> Self {
        Self::with_config(SkiplistConfig::default())
    }

    /// Builds a set with caller-chosen tuning parameters.
    ///
    /// # Panics
    ///
    /// Panics if `config.max_level + 1` does not fit in this set's
    /// `LEVELS` const generic parameter.
    pub fn with_config(config: SkiplistConfig) -> Self {
        assert!(
            config.max_level + 1 <= LEVELS,
            "SkiplistConfig::max_level ({}) exceeds LEVELS ({})",
            config.max_level,
            LEVELS
        );
        let tail = Box::into_raw(Box::new(Node::tail()));
        let head = Box::into_raw(Box::new(Node::head(tail)));
        Self {
            head,
            tail,
            max_level: config.max_level,
            level_generator: LevelGenerator::new(config.max_level, config.probability),
            arena: Arena::with_capacity(config.arena_capacity),
        }
    }

    unsafe fn find(&self, key: &T) -> super::node::FindResult<T, LEVELS> {
        find(self.head, self.tail, self.max_level, key)
    }

    /// Returns `true` iff `value` was observed present at the moment
    /// `find` reached its linearization point.
    pub fn contains(&self, value: &T) -> bool {
        unsafe { self.find(value) }.found
    }

    /// Attempts to insert `value`, distinguishing "already present" from
    /// "arena exhausted" instead of collapsing both to `false`.
    pub fn try_insert(&self, value: T) -> InsertOutcome {
        let height = self.level_generator.random_level();

        'retry: loop {
            let result = unsafe { self.find(&value) };
            if result.found {
                return InsertOutcome::AlreadyPresent;
            }

            let node = match self.arena.allocate(Node::data(value.clone(), height)) {
                Some(node) => node,
                None => return InsertOutcome::ArenaExhausted,
            };
            for level in 0..=height {
                unsafe { (*node).forward[level].store(result.successors[level], Ordering::Relaxed) };
            }

            let pred0 = result.predecessors[0];
            let succ0 = result.successors[0];
            let published = unsafe {
                (*pred0).forward[0].compare_exchange(succ0, node, Ordering::Release, Ordering::Relaxed)
            };
            if published.is_err() {
                // The node allocated above is abandoned in the arena; the
                // arena has no way to take it back, and none is needed.
                continue 'retry;
            }

            let mut predecessors = result.predecessors;
            let mut successors = result.successors;
            let mut level = 1;
            while level <= height {
                if unsafe { (*node).is_erased.load(Ordering::SeqCst) } {
                    return InsertOutcome::Inserted;
                }
                let pred = predecessors[level];
                let succ = successors[level];
                let linked = unsafe {
                    (*pred).forward[level].compare_exchange(succ, node, Ordering::Release, Ordering::Relaxed)
                };
                match linked {
                    Ok(_) => level += 1,
                    Err(_) => {
                        let refreshed = unsafe { self.find(&value) };
                        predecessors = refreshed.predecessors;
                        successors = refreshed.successors;
                    }
                }
            }
            return InsertOutcome::Inserted;
        }
    }

    /// Inserts `value`, collapsing "already present" and "arena
    /// exhausted" to the same `false` the way the reference library does
    /// (see `InsertOutcome` for the differentiated alternative).
    pub fn insert(&self, value: T) -> bool {
        self.try_insert(value).inserted()
    }

    /// Logically removes `value`. Returns `true` iff this call's CAS was
    /// the one that flipped `is_erased` from `false` to `true`, the sole
    /// linearization point for erase. Physical unlinking at every level
    /// is left to the opportunistic unlink that `find` performs on later
    /// traversals.
    pub fn remove(&self, value: &T) -> bool {
        let result = unsafe { self.find(value) };
        if !result.found {
            return false;
        }
        let n = result.successors[0];
        unsafe {
            (*n).is_erased
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        }
    }
}

impl<T, const LEVELS: usize> Drop for LockFreeSkipSet<T, LEVELS> {
    fn drop(&mut self) {
        // Data nodes live in `self.arena` and are dropped with it; only
        // the sentinels were allocated outside of it.
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}
