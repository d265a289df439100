//! Sign-in endpoint.

use actix_web::{http::header, http::StatusCode, web, HttpRequest, HttpResponse};
use validator::Validate;

use flock_core::repositories::{SessionRepository, UserCache, UserRepository};
use flock_core::services::auth::SignInCredentials;

use crate::dto::{ErrorResponse, LoginRequest, TokenResponse};
use crate::handlers::error::handle_auth_error;

use super::{refresh_cookie, AppState};

/// Handler for POST /api/v1/auth/login
///
/// Verifies the presented credentials, creates a session, and returns an
/// access/refresh token pair with absolute expiry timestamps. The refresh
/// token is additionally set as an HttpOnly cookie.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "...",
///     "access_token_expires_in": 1700000900,
///     "refresh_token": "...",
///     "refresh_token_expires_in": 1700086400
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed body
/// - 401 Unauthorized: Unknown email or wrong password
/// - 403 Forbidden: Account deactivated
pub async fn login<U, S, C>(
    req: HttpRequest,
    state: web::Data<AppState<U, S, C>>,
    body: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    C: UserCache + 'static,
{
    if let Err(errors) = body.validate() {
        return ErrorResponse::new("validation_error", errors).to_response(StatusCode::BAD_REQUEST);
    }

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("")
        .to_string();

    let request = body.into_inner();
    let remember_me = request.remember_me;
    let credentials = SignInCredentials {
        email: request.email,
        password: request.password,
        remember_me,
    };

    match state
        .auth_service
        .sign_in(credentials, &user_agent, &ip)
        .await
    {
        Ok(tokens) => {
            let response = TokenResponse::from(tokens);
            let mut builder = HttpResponse::Ok();

            if let Some(token) = response.refresh_token.as_deref() {
                builder.cookie(refresh_cookie(
                    &state.auth_config.refresh_cookie_name,
                    token,
                    state.auth_config.session_ttl_for(remember_me),
                ));
            }

            builder.json(response)
        }
        Err(error) => handle_auth_error(&error),
    }
}
