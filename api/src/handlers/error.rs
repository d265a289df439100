//! Exhaustive mapping from the auth error taxonomy to HTTP responses.
//!
//! The match is intentionally wildcard-free: a new error variant will not
//! compile until this boundary decides how to present it.

use actix_web::{http::StatusCode, HttpResponse};

use flock_core::errors::AuthError;

use crate::dto::ErrorResponse;

/// Convert a domain auth error to its HTTP response
///
/// Everything in the 401 class shares one response body. Which precise
/// check failed is a server-side concern and is logged here, never leaked
/// to the caller.
pub fn handle_auth_error(error: &AuthError) -> HttpResponse {
    match error {
        AuthError::InvalidCredentials => {
            log::warn!("sign-in rejected: invalid credentials");
            ErrorResponse::new("invalid_credentials", "invalid email or password")
                .to_response(StatusCode::UNAUTHORIZED)
        }
        AuthError::AccountInactive => {
            log::warn!("request rejected: account inactive");
            ErrorResponse::new("account_inactive", "account is not active")
                .to_response(StatusCode::FORBIDDEN)
        }
        AuthError::InvalidToken => {
            log::warn!("request rejected: malformed or forged token");
            authentication_required()
        }
        AuthError::ExpiredToken => {
            log::debug!("request rejected: expired token");
            authentication_required()
        }
        AuthError::SessionInvalid => {
            log::debug!("request rejected: session invalid");
            authentication_required()
        }
        AuthError::SessionNotExtendable => {
            log::warn!("extension attempted on non-renewable session");
            authentication_required()
        }
        AuthError::ExtensionConflict => {
            log::warn!("refresh lost an extension race");
            ErrorResponse::new(
                "refresh_conflict",
                "a concurrent refresh updated this session, retry once",
            )
            .to_response(StatusCode::CONFLICT)
        }
        AuthError::Lookup { message } => {
            log::error!("lookup failure: {}", message);
            ErrorResponse::new("internal_error", "an internal error occurred")
                .to_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// The uniform 401 body shared by the whole token/session class
fn authentication_required() -> HttpResponse {
    ErrorResponse::new("authentication_required", "authentication required")
        .to_response(StatusCode::UNAUTHORIZED)
}
