//! AEAD token codec using AES-256-GCM.

use std::sync::Arc;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{
    engine::general_purpose::{STANDARD as BASE64, URL_SAFE_NO_PAD},
    Engine,
};
use rand::{rngs::OsRng, RngCore};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, RefreshClaims};
use crate::errors::{AuthError, AuthResult};
use crate::services::clock::Clock;

use super::config::{TokenCodecConfig, TokenKeyError};

/// Required decoded key length in bytes (AES-256)
pub const TOKEN_KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes
const NONCE_LEN: usize = 12;

/// Which of the two disjoint keys seals a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Seals and opens self-contained encrypted tokens
///
/// Wire format: `url_base64(nonce || ciphertext)` where the ciphertext is
/// AES-256-GCM over the serde_json claims. The GCM tag makes tampering a
/// decryption failure; the disjoint keys make cross-kind replay one too.
///
/// There is no key rotation and no revocation list at this layer:
/// revocation is structural, through session deletion and version bumps.
pub struct TokenCodec {
    access: Aes256Gcm,
    refresh: Aes256Gcm,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Build a codec from base64 key material
    ///
    /// Fails when either key is not valid base64 or does not decode to
    /// exactly [`TOKEN_KEY_LEN`] bytes. Callers treat this as fatal.
    pub fn new(config: TokenCodecConfig, clock: Arc<dyn Clock>) -> Result<Self, TokenKeyError> {
        let access = Self::cipher("access", &config.access_key)?;
        let refresh = Self::cipher("refresh", &config.refresh_key)?;

        Ok(Self {
            access,
            refresh,
            clock,
        })
    }

    fn cipher(kind: &'static str, key_b64: &str) -> Result<Aes256Gcm, TokenKeyError> {
        let key = BASE64
            .decode(key_b64)
            .map_err(|_| TokenKeyError::InvalidEncoding { kind })?;

        if key.len() != TOKEN_KEY_LEN {
            return Err(TokenKeyError::InvalidLength {
                kind,
                expected: TOKEN_KEY_LEN,
                actual: key.len(),
            });
        }

        Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)))
    }

    fn cipher_for(&self, kind: TokenKind) -> &Aes256Gcm {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Mint an access token for `user_id` under `session_id`
    pub fn mint_access(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        ttl_secs: i64,
    ) -> AuthResult<String> {
        let claims = AccessClaims::new(user_id, session_id, ttl_secs, self.clock.now());
        self.seal(TokenKind::Access, &claims)
    }

    /// Mint a refresh token bound to `session_id` at `version`
    pub fn mint_refresh(
        &self,
        session_id: Uuid,
        version: i32,
        ttl_secs: i64,
    ) -> AuthResult<String> {
        let claims = RefreshClaims::new(session_id, version, ttl_secs, self.clock.now());
        self.seal(TokenKind::Refresh, &claims)
    }

    /// Open an access token
    ///
    /// Returns `InvalidToken` for anything that fails to decode, decrypt,
    /// or parse, and `ExpiredToken` for an authentic token past its expiry.
    pub fn verify_access(&self, token: &str) -> AuthResult<AccessClaims> {
        let claims: AccessClaims = self.open(TokenKind::Access, token)?;
        claims.validate(self.clock.now())?;
        Ok(claims)
    }

    /// Open a refresh token, same contract as [`verify_access`](Self::verify_access)
    pub fn verify_refresh(&self, token: &str) -> AuthResult<RefreshClaims> {
        let claims: RefreshClaims = self.open(TokenKind::Refresh, token)?;
        claims.validate(self.clock.now())?;
        Ok(claims)
    }

    fn seal<T: Serialize>(&self, kind: TokenKind, claims: &T) -> AuthResult<String> {
        let plaintext = serde_json::to_vec(claims)
            .map_err(|e| AuthError::lookup("serializing token claims", e))?;

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher_for(kind)
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_ref())
            .map_err(|_| AuthError::Lookup {
                message: format!("sealing {} token failed", kind.as_str()),
            })?;

        let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(envelope))
    }

    fn open<T: DeserializeOwned>(&self, kind: TokenKind, token: &str) -> AuthResult<T> {
        let envelope = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| AuthError::InvalidToken)?;

        if envelope.len() <= NONCE_LEN {
            return Err(AuthError::InvalidToken);
        }

        let (nonce, ciphertext) = envelope.split_at(NONCE_LEN);

        let plaintext = self
            .cipher_for(kind)
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| AuthError::InvalidToken)?;

        serde_json::from_slice(&plaintext).map_err(|_| AuthError::InvalidToken)
    }
}
