//! Logout endpoint.

use actix_web::{web, HttpResponse};

use flock_core::repositories::{SessionRepository, UserCache, UserRepository};

use crate::dto::LogoutResponse;
use crate::handlers::error::handle_auth_error;
use crate::middleware::auth::AuthContext;

use super::{removal_cookie, AppState};

/// Handler for POST /api/v1/auth/logout
///
/// Requires authentication. Deletes the caller's session, which kills
/// every refresh token ever minted for it, and clears the refresh cookie.
///
/// # Errors
/// - 401 Unauthorized: Missing or invalid access token
/// - 500 Internal Server Error: Store failure
pub async fn logout<U, S, C>(
    state: web::Data<AppState<U, S, C>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    C: UserCache + 'static,
{
    match state.auth_service.logout(auth.session_id).await {
        Ok(()) => HttpResponse::Ok()
            .cookie(removal_cookie(&state.auth_config.refresh_cookie_name))
            .json(LogoutResponse {
                message: "logged out".to_string(),
            }),
        Err(error) => handle_auth_error(&error),
    }
}
