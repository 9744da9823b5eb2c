//! AWS-oriented adapters and handlers for the scheduled timeline digest job.
//!
//! This crate owns runtime integration details (the Lambda entrypoint, the
//! OAuth1-signed timeline client, and the gateway traits the S3 and SES
//! adapters implement) on top of the pure contract, window-key, and digest
//! primitives in `tweet_digest_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
