//! Error types for the skiplist containers
//!
//! Most operations in this crate encode success/failure in their return
//! type directly (`bool` for presence, `Option` for lookups) rather than
//! through `Result`, matching the public contract of the skip list's
//! concurrent tiers. The [`Error`] type covers the remaining cases where a
//! caller needs a distinguishable failure reason.

use thiserror::Error;

/// Errors surfaced by the skiplist containers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested key is not present in the map.
    ///
    /// Only returned by fallible accessors; the panicking `Index` impl on
    /// the sequential map signals the same condition without a `Result`,
    /// mirroring `std::collections::HashMap`'s indexing behavior.
    #[error("key not present in map")]
    InvalidKey,
}

/// A specialized `Result` for skiplist operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of an insert attempt on the lock-free tier.
///
/// The spec's public `Insert(k) -> bool` contract collapses "key already
/// present" and "arena exhausted" into the same `false` return, which
/// Design Note #4 flags as an open issue. [`InsertOutcome`] is the
/// differentiated alternative: the arena-backed lock-free set exposes both
/// `insert` (spec-compliant, ambiguous `bool`) and `try_insert` (this enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The value was not previously present and has been linked in.
    Inserted,
    /// The value was already present; no change was made.
    AlreadyPresent,
    /// The arena has no remaining capacity; no change was made.
    ArenaExhausted,
}

impl InsertOutcome {
    /// Collapses this outcome to the spec's ambiguous `bool` contract:
    /// `true` iff the value was newly inserted.
    pub fn inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}
