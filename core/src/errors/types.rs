//! Error taxonomy for the authentication core
//!
//! One closed enum covers every failure mode the core can surface. The HTTP
//! boundary matches it exhaustively, so adding a variant is a compile error
//! until every caller has decided how to present it.

use thiserror::Error;

/// Authentication core errors
///
/// The 401-class variants (`InvalidToken`, `ExpiredToken`, `SessionInvalid`,
/// `SessionNotExtendable`, `InvalidCredentials`) are deliberately coarse:
/// callers outside the server must not learn which precise check failed.
/// The precise cause is logged where the variant is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Sign-in with an unknown email or a wrong password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The principal exists but has been deactivated
    #[error("account is not active")]
    AccountInactive,

    /// Token is malformed, forged, or sealed under a different key
    #[error("token is not valid")]
    InvalidToken,

    /// Token is authentic but past its expiry
    #[error("token has expired")]
    ExpiredToken,

    /// Session not found, version mismatch, expired, or renewal cap
    /// exhausted. Merged on purpose so a caller cannot distinguish which.
    #[error("session is not valid")]
    SessionInvalid,

    /// Extension attempted on a session created without remember-me
    #[error("session cannot be extended")]
    SessionNotExtendable,

    /// Lost the optimistic-concurrency race while extending. The only
    /// variant a caller may retry.
    #[error("session extension conflicted with a concurrent update")]
    ExtensionConflict,

    /// Store or cache I/O failure, including deadline expiry. Never
    /// downgraded to a denial: stale identity data must not be served.
    #[error("lookup failure: {message}")]
    Lookup { message: String },
}

impl AuthError {
    /// Build a `Lookup` error from any displayable source
    pub fn lookup(context: &str, source: impl std::fmt::Display) -> Self {
        AuthError::Lookup {
            message: format!("{}: {}", context, source),
        }
    }

    /// Whether the caller may safely retry the failed operation
    pub fn is_retriable(&self) -> bool {
        matches!(self, AuthError::ExtensionConflict)
    }
}
