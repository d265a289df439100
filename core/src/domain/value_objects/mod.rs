//! Value objects exchanged between services and the API layer.

pub mod auth_tokens;

pub use auth_tokens::AuthTokens;
