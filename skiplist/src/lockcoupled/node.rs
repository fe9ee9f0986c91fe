//! Node layout and the shared `Find` routine for the optimistic
//! lock-coupled tier.

use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use parking_lot::ReentrantMutex;

pub(super) type NodePtr<K, V> = *mut Node<K, V>;

/// A skip-list node for the lock-coupled tier.
///
/// `forward` links are plain atomic pointers rather than lock-protected
/// fields: `Find` reads them without taking any lock (per the spec, search
/// "ignores lock state and flags"), so every write that publishes a link
/// uses release ordering and every read uses acquire ordering. The
/// recursive `lock` only ever serializes *writers*; it is never consulted
/// by a reader.
pub(super) struct Node<K, V> {
    pub(super) key: Option<K>,
    pub(super) value: Option<V>,
    pub(super) height: usize,
    pub(super) forward: Vec<AtomicPtr<Node<K, V>>>,
    pub(super) lock: ReentrantMutex<()>,
    pub(super) is_linked: AtomicBool,
    pub(super) is_erased: AtomicBool,
}

impl<K, V> Node<K, V> {
    fn with_forward_len(key: Option<K>, value: Option<V>, height: usize, forward_len: usize) -> Self {
        let mut forward = Vec::with_capacity(forward_len);
        forward.resize_with(forward_len, || AtomicPtr::new(ptr::null_mut()));
        Self {
            key,
            value,
            height,
            forward,
            lock: ReentrantMutex::new(()),
            is_linked: AtomicBool::new(false),
            is_erased: AtomicBool::new(false),
        }
    }

    /// A freshly allocated, not-yet-linked data node of tower height `height`.
    pub(super) fn data(key: K, value: Option<V>, height: usize) -> Self {
        Self::with_forward_len(Some(key), value, height, height + 1)
    }

    /// The `head` sentinel: full-height tower, linked from birth.
    pub(super) fn head(max_level: usize) -> Self {
        let node = Self::with_forward_len(None, None, max_level, max_level + 1);
        node.is_linked.store(true, Ordering::Relaxed);
        node
    }

    /// The `tail` sentinel: never traversed into, recognized by identity.
    pub(super) fn tail(max_level: usize) -> Self {
        let node = Self::with_forward_len(None, None, max_level, 0);
        node.is_linked.store(true, Ordering::Relaxed);
        node
    }
}

/// Predecessor/successor arrays and the highest matching level, produced by
/// [`find`].
pub(super) struct FindResult<K, V> {
    pub(super) predecessors: Vec<NodePtr<K, V>>,
    pub(super) successors: Vec<NodePtr<K, V>>,
    pub(super) matched_level: Option<usize>,
}

/// Wait-free search shared by `Contains`, `Insert`, and `Erase`.
///
/// Descends from `max_level` to `0`, recording the deepest predecessor and
/// immediate successor at every level, and the highest level at which a
/// node comparing equal to `key` was observed. Ignores lock state and the
/// `is_linked`/`is_erased` flags entirely; a caller decides what those
/// mean.
///
/// # Safety
///
/// `head` and `tail` must be valid, non-dangling pointers for the
/// lifetime of the call, and every node reachable from `head` must be
/// valid for at least as long.
pub(super) unsafe fn find<K: Ord, V>(
    head: NodePtr<K, V>,
    tail: NodePtr<K, V>,
    max_level: usize,
    key: &K,
) -> FindResult<K, V> {
    let mut predecessors = vec![head; max_level + 1];
    let mut successors = vec![tail; max_level + 1];
    let mut matched_level = None;

    let mut pred = head;
    for level in (0..=max_level).rev() {
        let mut curr = (*pred).forward[level].load(Ordering::Acquire);
        while curr != tail && (*curr).key.as_ref().unwrap() < key {
            pred = curr;
            curr = (*pred).forward[level].load(Ordering::Acquire);
        }
        predecessors[level] = pred;
        successors[level] = curr;

        if matched_level.is_none() && curr != tail {
            let curr_key = (*curr).key.as_ref().unwrap();
            if !(curr_key < key) && !(key < curr_key) {
                matched_level = Some(level);
            }
        }
    }

    FindResult {
        predecessors,
        successors,
        matched_level,
    }
}
