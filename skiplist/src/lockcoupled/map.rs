//! The optimistic lock-coupled ordered map: per-node recursive locks,
//! `is_linked`/`is_erased` flags, and a validated-splice insert/erase
//! protocol. This is the principal concurrent tier.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;
use skiplist_core::SkiplistConfig;

use crate::level::LevelGenerator;

use super::node::{find, Node, NodePtr};

/// An ordered map safe to share across threads, built on a skip list with
/// one recursive lock per node.
///
/// Readers (`contains`, via the shared `find`) never block. Writers
/// (`insert`, `erase`) perform an unlocked search, then acquire locks on
/// only the handful of predecessor nodes the splice touches, validating
/// at each acquisition that the structure has not moved under them since
/// the search. A failed validation releases every lock acquired so far
/// and retries from the top; see the module documentation on
/// linearization points for exactly which instant each operation takes
/// effect at.
///
/// Erased nodes are physically unlinked before `erase` returns, but their
/// storage is never freed while the map is alive: an unsynchronized
/// reader could be mid-traversal through a node at the instant it is
/// unlinked, and reclaiming it safely would need hazard pointers or
/// epochs, which this tier does not implement (see `DESIGN.md`). Live
/// nodes are freed when the map itself is dropped.
pub struct LockCoupledSkipMap<K, V> {
    head: NodePtr<K, V>,
    tail: NodePtr<K, V>,
    max_level: usize,
    level_generator: LevelGenerator,
    len: AtomicUsize,
}

// SAFETY: every node reachable through `head`/`tail` is reached only via
// atomic loads, mutated only under its own lock (or before publication),
// and never freed while reachable; see the module doc for the reclamation
// policy that makes this sound across threads.
unsafe impl<K: Send, V: Send> Send for LockCoupledSkipMap<K, V> {}
unsafe impl<K: Send + Sync, V: Send + Sync> Sync for LockCoupledSkipMap<K, V> {}

impl<K: Ord, V> Default for LockCoupledSkipMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> LockCoupledSkipMap<K, V> {
    /// Builds a map using [`SkiplistConfig::default`].
    pub fn new() -> Self {
        Self::with_config(SkiplistConfig::default())
    }

    /// Builds a map with caller-chosen tuning parameters.
    pub fn with_config(config: SkiplistConfig) -> Self {
        let max_level = config.max_level;
        let tail = Box::into_raw(Box::new(Node::tail(max_level)));
        let head_node = Node::head(max_level);
        for slot in &head_node.forward {
            slot.store(tail, Ordering::Relaxed);
        }
        let head = Box::into_raw(Box::new(head_node));
        Self {
            head,
            tail,
            max_level,
            level_generator: LevelGenerator::new(max_level, config.probability),
            len: AtomicUsize::new(0),
        }
    }

    /// Approximate number of entries. Exact only in the absence of
    /// concurrent writers; otherwise a point-in-time estimate, since no
    /// single instant contains a stable total under concurrent mutation.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Returns `true` if the map held no entries at the moment of the
    /// check.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    unsafe fn find(&self, key: &K) -> super::node::FindResult<K, V> {
        find(self.head, self.tail, self.max_level, key)
    }

    /// Returns `true` iff `key` is linked and not logically erased at the
    /// moment this call observes it.
    pub fn contains(&self, key: &K) -> bool {
        let result = unsafe { self.find(key) };
        match result.matched_level {
            None => false,
            Some(level) => {
                let n = result.successors[level];
                unsafe { (*n).is_linked.load(Ordering::Acquire) && !(*n).is_erased.load(Ordering::Acquire) }
            }
        }
    }

    /// Inserts `key` with `value`. Returns `true` iff this call was the
    /// one that transitioned `key` from absent to present.
    pub fn insert(&self, key: K, value: V) -> bool {
        let height = self.level_generator.random_level();
        let mut value = Some(value);

        loop {
            let result = unsafe { self.find(&key) };

            if let Some(level) = result.matched_level {
                let n = result.successors[level];
                if unsafe { (*n).is_erased.load(Ordering::Acquire) } {
                    trace!("insert retry: matched node already erased");
                    continue;
                }
                while unsafe { !(*n).is_linked.load(Ordering::Acquire) } {
                    std::thread::yield_now();
                }
                return false;
            }

            let mut guards = Vec::with_capacity(height + 1);
            let mut ok = true;
            for i in 0..=height {
                let pred = result.predecessors[i];
                let succ = result.successors[i];
                let guard = unsafe { (*pred).lock.lock() };
                let pred_erased = unsafe { (*pred).is_erased.load(Ordering::Acquire) };
                let succ_erased = succ != self.tail && unsafe { (*succ).is_erased.load(Ordering::Acquire) };
                let still_adjacent = unsafe { (*pred).forward[i].load(Ordering::Acquire) == succ };
                if pred_erased || succ_erased || !still_adjacent {
                    ok = false;
                    break;
                }
                guards.push(guard);
            }
            if !ok {
                trace!("insert retry: predecessor validation failed");
                continue;
            }

            let node = Box::into_raw(Box::new(Node::data(key, value.take(), height)));
            for i in 0..=height {
                unsafe { (*node).forward[i].store(result.successors[i], Ordering::Relaxed) };
            }
            for i in 0..=height {
                let pred = result.predecessors[i];
                unsafe { (*pred).forward[i].store(node, Ordering::Release) };
            }
            unsafe { (*node).is_linked.store(true, Ordering::Release) };
            self.len.fetch_add(1, Ordering::Relaxed);
            return true;
        }
    }

    /// Removes `key`. Returns `true` iff this call was the one that
    /// transitioned `key` from present to absent.
    pub fn erase(&self, key: &K) -> bool {
        let (victim, height, _victim_guard) = loop {
            let result = unsafe { self.find(key) };
            let level = match result.matched_level {
                Some(level) => level,
                None => return false,
            };
            let candidate = result.successors[level];
            if unsafe { !(*candidate).is_linked.load(Ordering::Acquire) } {
                return false;
            }
            let guard = unsafe { (*candidate).lock.lock() };
            if unsafe { (*candidate).is_erased.load(Ordering::Acquire) } {
                return false;
            }
            unsafe { (*candidate).is_erased.store(true, Ordering::SeqCst) };
            let height = unsafe { (*candidate).height };
            break (candidate, height, guard);
        };

        loop {
            let result = unsafe { self.find(key) };
            let mut guards = Vec::with_capacity(height + 1);
            let mut ok = true;
            for i in 0..=height {
                let pred = result.predecessors[i];
                let guard = unsafe { (*pred).lock.lock() };
                let pred_erased = unsafe { (*pred).is_erased.load(Ordering::Acquire) };
                let adjacent_to_victim = unsafe { (*pred).forward[i].load(Ordering::Acquire) == victim };
                if pred_erased || !adjacent_to_victim {
                    ok = false;
                    break;
                }
                guards.push(guard);
            }
            if !ok {
                trace!("erase retry: predecessor validation failed");
                continue;
            }

            for i in (0..=height).rev() {
                let pred = result.predecessors[i];
                let next = unsafe { (*victim).forward[i].load(Ordering::Acquire) };
                unsafe { (*pred).forward[i].store(next, Ordering::Release) };
            }
            self.len.fetch_sub(1, Ordering::Relaxed);
            return true;
        }
    }

    /// Returns a clone of the value stored under `key`, if present and
    /// not concurrently erased.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let result = unsafe { self.find(key) };
        let level = result.matched_level?;
        let n = result.successors[level];
        unsafe {
            if (*n).is_linked.load(Ordering::Acquire) && !(*n).is_erased.load(Ordering::Acquire) {
                (*n).value.clone()
            } else {
                None
            }
        }
    }
}

impl<K, V> Drop for LockCoupledSkipMap<K, V> {
    fn drop(&mut self) {
        unsafe {
            let mut current = (*self.head).forward[0].load(Ordering::Relaxed);
            while current != self.tail {
                let next = (*current).forward[0].load(Ordering::Relaxed);
                drop(Box::from_raw(current));
                current = next;
            }
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn single_threaded_scenario() {
        let map: LockCoupledSkipMap<i32, i32> = LockCoupledSkipMap::new();
        assert!(map.insert(5, 5));
        assert_eq!(map.get(&5), Some(5));
        assert!(!map.insert(5, 9));
        assert_eq!(map.get(&5), Some(5));
        assert!(map.erase(&5));
        assert!(!map.contains(&5));
        assert!(!map.erase(&5));
    }

    #[test]
    fn two_threads_disjoint_ranges() {
        let map: Arc<LockCoupledSkipMap<i32, ()>> = Arc::new(LockCoupledSkipMap::new());
        for k in 2000..2100 {
            map.insert(k, ());
        }

        let inserter = {
            let map = map.clone();
            thread::spawn(move || {
                for k in 0..1000 {
                    map.insert(k, ());
                }
            })
        };
        let eraser = {
            let map = map.clone();
            thread::spawn(move || {
                for k in 2000..2100 {
                    map.erase(&k);
                }
            })
        };
        inserter.join().unwrap();
        eraser.join().unwrap();

        for k in 0..1000 {
            assert!(map.contains(&k));
        }
        for k in 2000..2100 {
            assert!(!map.contains(&k));
        }
    }

    #[test]
    fn concurrent_inserts_of_identical_stream_never_lose_a_key() {
        let map: Arc<LockCoupledSkipMap<i32, ()>> = Arc::new(LockCoupledSkipMap::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let map = map.clone();
            handles.push(thread::spawn(move || {
                for k in 0..500 {
                    map.insert(k, ());
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        for k in 0..500 {
            assert!(map.contains(&k));
        }
        assert_eq!(map.len(), 500);
    }

    #[test]
    fn mutual_exclusion_on_insert_of_same_key() {
        let map: Arc<LockCoupledSkipMap<i32, ()>> = Arc::new(LockCoupledSkipMap::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let map = map.clone();
            handles.push(thread::spawn(move || map.insert(42, ())));
        }
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|&&r| r).count(), 1);
    }
}
