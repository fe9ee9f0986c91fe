//! Node layout and the shared `Find` routine for the lock-free tier.
//!
//! `LEVELS` is the tower's total capacity, i.e. `MaxLevel + 1` (level `0`
//! through level `MaxLevel` inclusive). Fixing it as a const generic
//! parameter gives every node of a given set the same, arena-friendly
//! size, at the cost of the tower height being a compile-time rather than
//! purely construction-time choice (the spec allows either).

use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

pub(super) type NodePtr<T, const LEVELS: usize> = *mut Node<T, LEVELS>;

/// A skip-list node for the lock-free tier. Lives in an [`crate::arena::Arena`]
/// for the lifetime of the owning set; never freed individually.
pub(super) struct Node<T, const LEVELS: usize> {
    pub(super) value: Option<T>,
    pub(super) height: usize,
    pub(super) forward: [AtomicPtr<Node<T, LEVELS>>; LEVELS],
    pub(super) is_erased: AtomicBool,
}

impl<T, const LEVELS: usize> Node<T, LEVELS> {
    pub(super) fn data(value: T, height: usize) -> Self {
        Self {
            value: Some(value),
            height,
            forward: std::array::from_fn(|_| AtomicPtr::new(ptr::null_mut())),
            is_erased: AtomicBool::new(false),
        }
    }

    /// The `head` sentinel, linked to `tail` at every level from birth.
    pub(super) fn head(tail: NodePtr<T, LEVELS>) -> Self {
        Self {
            value: None,
            height: LEVELS - 1,
            forward: std::array::from_fn(|_| AtomicPtr::new(tail)),
            is_erased: AtomicBool::new(false),
        }
    }

    /// The `tail` sentinel. Its `forward` array is never read: every
    /// traversal checks node identity against `tail` before dereferencing
    /// a `forward` slot.
    pub(super) fn tail() -> Self {
        Self {
            value: None,
            height: LEVELS - 1,
            forward: std::array::from_fn(|_| AtomicPtr::new(ptr::null_mut())),
            is_erased: AtomicBool::new(false),
        }
    }
}

pub(super) struct FindResult<T, const LEVELS: usize> {
    pub(super) predecessors: Vec<NodePtr<T, LEVELS>>,
    pub(super) successors: Vec<NodePtr<T, LEVELS>>,
    pub(super) found: bool,
}

/// Searches for `key`, opportunistically unlinking logically erased nodes
/// it passes over along the way.
///
/// # Safety
///
/// `head` and `tail` must be valid for the duration of the call, as must
/// every node reachable from `head`.
pub(super) unsafe fn find<T: Ord, const LEVELS: usize>(
    head: NodePtr<T, LEVELS>,
    tail: NodePtr<T, LEVELS>,
    max_level: usize,
    key: &T,
) -> FindResult<T, LEVELS> {
    'restart: loop {
        let mut predecessors = vec![head; max_level + 1];
        let mut successors = vec![tail; max_level + 1];
        let mut pred = head;

        for level in (0..=max_level).rev() {
            let mut curr = (*pred).forward[level].load(Ordering::Acquire);
            loop {
                let mut succ = if curr == tail {
                    tail
                } else {
                    (*curr).forward[level].load(Ordering::Acquire)
                };

                while curr != tail && (*curr).is_erased.load(Ordering::SeqCst) {
                    match (*pred).forward[level].compare_exchange(
                        curr,
                        succ,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    ) {
                        Ok(_) => {
                            curr = (*pred).forward[level].load(Ordering::Acquire);
                            succ = if curr == tail {
                                tail
                            } else {
                                (*curr).forward[level].load(Ordering::Acquire)
                            };
                        }
                        Err(_) => continue 'restart,
                    }
                }

                if curr != tail && (*curr).value.as_ref().unwrap() < key {
                    pred = curr;
                    curr = succ;
                } else {
                    break;
                }
            }
            predecessors[level] = pred;
            successors[level] = curr;
        }

        let found = {
            let n = successors[0];
            n != tail && (*n).value.as_ref() == Some(key)
        };

        return FindResult {
            predecessors,
            successors,
            found,
        };
    }
}
