//! Shared timeline digest domain primitives.
//!
//! This crate owns the tweet contract, window bucket key resolution, and
//! digest rendering. It intentionally excludes AWS SDK, Lambda runtime,
//! and HTTP client concerns.

pub mod contract;
pub mod digest;
pub mod storage_keys;
