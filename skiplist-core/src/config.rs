//! Tuning configuration for the skip-list containers

/// Construction-time tuning parameters for a skip-list container.
///
/// All four non-guarded tiers accept a `SkiplistConfig` in their
/// `with_config` constructor; the plain `new()` constructor on every tier
/// uses [`SkiplistConfig::default`], which reproduces the reference
/// library's constants (`MaxLevel = 4`, `Probability = 0.2`, arena capacity
/// 10,000,000).
///
/// # Example
///
/// ```
/// use skiplist_core::SkiplistConfig;
///
/// let config = SkiplistConfig {
///     max_level: 6,
///     probability: 0.25,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkiplistConfig {
    /// Highest level a node's tower may reach (levels are `0..=max_level`).
    pub max_level: usize,

    /// Bernoulli trial success probability used to grow a tower one level
    /// at a time while sampling a node's height. Must lie in `(0.0, 1.0)`.
    pub probability: f64,

    /// Number of node-sized cells preallocated by the lock-free tier's
    /// arena. `Insert` (or `try_insert`) fails once the arena is exhausted.
    pub arena_capacity: usize,
}

impl Default for SkiplistConfig {
    fn default() -> Self {
        Self {
            max_level: 4,
            probability: 0.2,
            arena_capacity: 10_000_000,
        }
    }
}
