//! The lock-free tier: an ordered set with no blocking operations at all.
//!
//! Insertion is driven by a level-0 CAS that is the sole linearization
//! point; higher levels are linked in afterward on a best-effort basis.
//! Logical deletion flips a single `is_erased` flag; physical unlinking
//! happens lazily, as a side effect of later `find` traversals walking
//! past erased nodes.

mod node;
mod set;

pub use set::LockFreeSkipSet;
