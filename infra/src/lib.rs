//! # Infrastructure Layer
//!
//! Concrete implementations of the auth core's repository interfaces:
//! MySQL session and user repositories using SQLx, and the Redis-backed
//! principal cache.
//!
//! Every operation against an external system runs under the deadline
//! configured for it; a timed-out call fails with a retriable lookup error
//! instead of hanging the request, and single-statement updates mean a
//! timeout never leaves a session mutation half-applied.

pub mod cache;
pub mod database;

use thiserror::Error;

/// Startup-time infrastructure failures (bad URLs, unreachable backends)
///
/// Request-time failures surface through the core's error taxonomy instead.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("connection error: {0}")]
    Connection(String),
}

pub use cache::RedisUserCache;
pub use database::mysql::{MySqlSessionRepository, MySqlUserRepository};
pub use database::create_pool;
