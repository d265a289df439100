//! Token refresh endpoint.

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};

use flock_core::repositories::{SessionRepository, UserCache, UserRepository};

use crate::dto::{ErrorResponse, RefreshTokenRequest, TokenResponse};
use crate::handlers::error::handle_auth_error;

use super::{refresh_cookie, AppState};

/// Handler for POST /api/v1/auth/refresh
///
/// Accepts the refresh token from the session cookie or, as a fallback,
/// from the JSON body. A non-empty cookie always wins.
///
/// A new access token is returned unconditionally on success; the refresh
/// fields (and a replacement cookie) are present only when the session was
/// eligible for extension and the token was rotated.
///
/// # Errors
/// - 400 Bad Request: No refresh token in cookie or body
/// - 401 Unauthorized: Invalid/expired token or dead session
/// - 409 Conflict: Lost a race against a concurrent refresh; retry once
pub async fn refresh<U, S, C>(
    req: HttpRequest,
    state: web::Data<AppState<U, S, C>>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    C: UserCache + 'static,
{
    let cookie_token = req
        .cookie(&state.auth_config.refresh_cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.trim().is_empty());

    let body_token = body
        .and_then(|b| b.into_inner().refresh_token)
        .filter(|v| !v.trim().is_empty());

    // Cookie precedence over body, by design
    let Some(token) = cookie_token.or(body_token) else {
        return ErrorResponse::new("missing_refresh_token", "a refresh token is required")
            .to_response(StatusCode::BAD_REQUEST);
    };

    match state.auth_service.refresh(&token).await {
        Ok(tokens) => {
            let response = TokenResponse::from(tokens);
            let mut builder = HttpResponse::Ok();

            if let Some(rotated) = response.refresh_token.as_deref() {
                // Only remembered sessions rotate, so the cookie lifetime
                // is the renewal period
                builder.cookie(refresh_cookie(
                    &state.auth_config.refresh_cookie_name,
                    rotated,
                    state.auth_config.remember_session_ttl_secs,
                ));
            }

            builder.json(response)
        }
        Err(error) => handle_auth_error(&error),
    }
}
