//! Shared error and configuration types for the skiplist containers
//!
//! This crate has no data structures of its own; it holds the small amount
//! of ambient code ([`Error`], [`Result`], [`InsertOutcome`],
//! [`SkiplistConfig`]) that every tier in the `skiplist` crate depends on.

pub mod config;
pub mod error;

pub use config::SkiplistConfig;
pub use error::{Error, InsertOutcome, Result};
