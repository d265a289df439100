//! Cache module - Redis-backed principal cache.

mod user_cache;

pub use user_cache::RedisUserCache;
