//! Authentication route handlers
//!
//! - Sign-in (credential verification and token issuance)
//! - Token refresh (with rotation for remembered sessions)
//! - Logout
//! - Session listing

pub mod login;
pub mod logout;
pub mod refresh;
pub mod sessions;

use std::sync::Arc;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};

use flock_core::repositories::{SessionRepository, UserCache, UserRepository};
use flock_core::services::auth::AuthService;
use flock_shared::config::AuthConfig;

/// Shared application state for the auth routes
pub struct AppState<U, S, C>
where
    U: UserRepository,
    S: SessionRepository,
    C: UserCache,
{
    /// The credential issuance service
    pub auth_service: Arc<AuthService<U, S, C>>,

    /// Cookie naming and lifetime policy
    pub auth_config: AuthConfig,
}

/// HttpOnly cookie carrying the refresh token
pub(crate) fn refresh_cookie(name: &str, token: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(name.to_owned(), token.to_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

/// Expired cookie clearing the refresh token
pub(crate) fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name.to_owned(), "").path("/").finish();
    cookie.make_removal();
    cookie
}
