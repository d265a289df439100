//! Shared configuration and common types for the Flock server
//!
//! This crate provides functionality used across all server crates:
//! - Environment-driven configuration types
//! - Cross-layer plain types (pagination)

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, CacheConfig, DatabaseConfig, Environment, ServerConfig};
pub use types::{PaginatedResponse, Pagination};
