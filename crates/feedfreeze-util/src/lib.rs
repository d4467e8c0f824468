//! Shared utilities for feedfreeze.
//!
//! This crate provides cross-cutting concerns used by the other feedfreeze
//! crates: the unified error type, filesystem helpers, and process spawning.

pub mod errors;
pub mod fs;
pub mod process;
