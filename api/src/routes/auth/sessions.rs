//! Session listing endpoint.

use actix_web::{web, HttpResponse};

use flock_core::repositories::{SessionRepository, UserCache, UserRepository};
use flock_shared::types::{PaginatedResponse, Pagination};

use crate::dto::SessionResponse;
use crate::handlers::error::handle_auth_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for GET /api/v1/auth/sessions
///
/// Requires authentication. Lists the caller's sessions, newest first,
/// with `page`/`per_page` query parameters.
pub async fn list_sessions<U, S, C>(
    state: web::Data<AppState<U, S, C>>,
    auth: AuthContext,
    query: web::Query<Pagination>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    C: UserCache + 'static,
{
    let pagination = query.into_inner().validate();

    match state
        .auth_service
        .list_sessions(auth.user.id, &pagination)
        .await
    {
        Ok((sessions, total)) => {
            let data: Vec<SessionResponse> =
                sessions.into_iter().map(SessionResponse::from).collect();
            HttpResponse::Ok().json(PaginatedResponse::new(data, pagination, total))
        }
        Err(error) => handle_auth_error(&error),
    }
}
