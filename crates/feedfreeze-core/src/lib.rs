//! Core of feedfreeze.
//!
//! This crate defines the types and transformations behind freezing a
//! resolved dependency selection into a feed: the version model and range
//! computation, an owned XML tree, feed documents and their pruning,
//! resolver selections, requirement synthesis, feed cache lookup, and user
//! configuration.
//!
//! This crate does not spawn processes; the resolver is run by `feedfreeze-ops`.

pub mod cache;
pub mod config;
pub mod constraints;
pub mod feed;
pub mod prune;
pub mod selections;
pub mod version;
pub mod xml;
