//! Token codec configuration and startup-time key validation.

use thiserror::Error;

/// Key material for the token codec
///
/// Both keys are base64-encoded (standard alphabet) and must decode to
/// exactly 32 bytes. Key problems are configuration errors surfaced at
/// construction, never at request time.
#[derive(Debug, Clone)]
pub struct TokenCodecConfig {
    /// Base64-encoded key sealing access tokens
    pub access_key: String,

    /// Base64-encoded key sealing refresh tokens
    pub refresh_key: String,
}

impl TokenCodecConfig {
    /// Create a new codec configuration
    pub fn new(access_key: impl Into<String>, refresh_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            refresh_key: refresh_key.into(),
        }
    }
}

/// Fatal key-material errors detected while building the codec
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenKeyError {
    #[error("{kind} token key is not valid base64")]
    InvalidEncoding { kind: &'static str },

    #[error("{kind} token key must decode to exactly {expected} bytes, got {actual}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
}
