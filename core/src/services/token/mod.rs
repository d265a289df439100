//! Token codec module
//!
//! Seals claim payloads into tamper-proof, encrypted, self-contained token
//! strings and opens them again. Access and refresh tokens are sealed under
//! two disjoint symmetric keys, so one kind can never be replayed as the
//! other.

mod codec;
mod config;

#[cfg(test)]
mod tests;

pub use codec::{TokenCodec, TokenKind, TOKEN_KEY_LEN};
pub use config::{TokenCodecConfig, TokenKeyError};
