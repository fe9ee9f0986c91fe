//! Ordered in-memory associative containers built on skip lists
//!
//! Four concurrency tiers share the same skip-list shape (stacked,
//! singly-linked levels with geometrically distributed tower heights), but
//! differ in how they let multiple threads touch the structure at once:
//!
//! - [`sequential`]: single-owner, no synchronization at all. The oracle
//!   the other three tiers are checked against.
//! - [`guarded`]: a sequential container behind one mutex. Correct by
//!   construction, zero concurrency.
//! - [`lockcoupled`]: per-node recursive locks with optimistic, unlocked
//!   search followed by validated, locked splicing. The principal
//!   concurrent variant.
//! - [`lockfree`]: CAS-driven insertion and logical deletion, with nodes
//!   carved from a bounded arena so reachable addresses never move or get
//!   reused.
//!
//! # Example
//!
//! ```
//! use skiplist::{SequentialSkipMap, LockCoupledSkipSet};
//!
//! let mut map = SequentialSkipMap::new();
//! map.insert(1, "one");
//! assert_eq!(map.get(&1), Some(&"one"));
//!
//! let set = LockCoupledSkipSet::new();
//! assert!(set.insert(7));
//! assert!(set.contains(&7));
//! ```

pub mod arena;
pub mod guarded;
pub mod level;
pub mod lockcoupled;
pub mod lockfree;
pub mod sequential;

pub use guarded::{GuardedSkipMap, GuardedSkipSet};
pub use lockcoupled::{LockCoupledSkipMap, LockCoupledSkipSet};
pub use lockfree::LockFreeSkipSet;
pub use sequential::{SequentialSkipMap, SequentialSkipSet};
