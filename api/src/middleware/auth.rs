//! Authentication gateway middleware.
//!
//! Runs once per request needing identity: extracts the bearer credential,
//! verifies it through the auth core, resolves the principal, and injects a
//! typed [`AuthContext`] into the request. Handlers receive the context as
//! an extractor parameter, so a handler that needs identity cannot be
//! written without declaring it.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use flock_core::domain::entities::token::AccessClaims;
use flock_core::domain::entities::user::User;
use flock_core::errors::AuthResult;
use flock_core::repositories::{SessionRepository, UserCache, UserRepository};
use flock_core::services::auth::AuthService;

use crate::handlers::error::handle_auth_error;

/// Identity attached to a request by the gateway
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The resolved, active principal
    pub user: User,

    /// Session the presented access token was minted under
    pub session_id: Uuid,
}

/// Interface the gateway consumes to verify tokens and resolve principals
///
/// Exposed as a trait object so the middleware stays free of the auth
/// service's repository generics. Downstream authorization middleware can
/// consume the same interface.
#[async_trait]
pub trait PrincipalValidator: Send + Sync {
    /// Verify an access token and resolve its principal
    async fn validate_principal(&self, access_token: &str) -> AuthResult<(User, AccessClaims)>;
}

#[async_trait]
impl<U, S, C> PrincipalValidator for AuthService<U, S, C>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    C: UserCache + 'static,
{
    async fn validate_principal(&self, access_token: &str) -> AuthResult<(User, AccessClaims)> {
        AuthService::validate_principal(self, access_token).await
    }
}

/// Authentication gateway middleware factory
pub struct AuthGateway;

impl<S, B> Transform<S, ServiceRequest> for AuthGateway
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGatewayMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGatewayMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Authentication gateway middleware service
pub struct AuthGatewayMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGatewayMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let validator = req
            .app_data::<web::Data<Arc<dyn PrincipalValidator>>>()
            .cloned();

        Box::pin(async move {
            let Some(validator) = validator else {
                // Wiring bug, not a client error
                log::error!("auth gateway mounted without a PrincipalValidator in app data");
                return Err(ErrorInternalServerError("authentication not configured"));
            };

            let Some(token) = extract_bearer_token(&req) else {
                log::debug!("request without usable Authorization header");
                return Ok(reject(req, authentication_required_response()));
            };

            match validator.validate_principal(&token).await {
                Ok((user, claims)) => {
                    req.extensions_mut().insert(AuthContext {
                        user,
                        session_id: claims.session_id,
                    });
                    service
                        .call(req)
                        .await
                        .map(|res| res.map_into_left_body())
                }
                // handle_auth_error logs the expired/malformed/invalid
                // distinction; the response body stays uniform
                Err(error) => Ok(reject(req, handle_auth_error(&error))),
            }
        })
    }
}

/// Extracts the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    let token = req
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn authentication_required_response() -> HttpResponse {
    crate::dto::ErrorResponse::new("authentication_required", "authentication required")
        .to_response(actix_web::http::StatusCode::UNAUTHORIZED)
}

fn reject<B>(req: ServiceRequest, response: HttpResponse) -> ServiceResponse<EitherBody<B>> {
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response.map_into_right_body())
}

/// Extractor for handlers that require an authenticated principal
///
/// A missing context means the gateway never ran on this route, which is a
/// server wiring bug: it maps to an internal error, never to a 401.
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            log::error!(
                "handler for {} requires AuthContext but the auth gateway did not run",
                req.path()
            );
            ErrorInternalServerError("authentication context missing")
        });

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("token_123".to_string()));

        let req_wrong_scheme = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_wrong_scheme), None);

        let req_empty = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_empty), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }
}
