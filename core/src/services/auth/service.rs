//! Auth service implementation.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use flock_shared::types::Pagination;

use crate::domain::entities::session::Session;
use crate::domain::entities::token::AccessClaims;
use crate::domain::entities::user::User;
use crate::domain::value_objects::AuthTokens;
use crate::errors::{AuthError, AuthResult};
use crate::repositories::{SessionRepository, UserCache, UserRepository};
use crate::services::clock::Clock;
use crate::services::session::SessionService;
use crate::services::token::TokenCodec;

use super::config::AuthServiceConfig;

/// Credentials presented at sign-in
#[derive(Debug, Clone)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// Orchestrates sign-in, refresh, logout, and request-time validation
pub struct AuthService<U, S, C>
where
    U: UserRepository,
    S: SessionRepository,
    C: UserCache,
{
    users: U,
    sessions: SessionService<S>,
    cache: C,
    codec: Arc<TokenCodec>,
    config: AuthServiceConfig,
    clock: Arc<dyn Clock>,
}

impl<U, S, C> AuthService<U, S, C>
where
    U: UserRepository,
    S: SessionRepository,
    C: UserCache,
{
    /// Creates a new auth service
    pub fn new(
        users: U,
        sessions: SessionService<S>,
        cache: C,
        codec: Arc<TokenCodec>,
        config: AuthServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            sessions,
            cache,
            codec,
            config,
            clock,
        }
    }

    /// Authenticate credentials and issue a token pair
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller. The bcrypt verification compares in constant time.
    ///
    /// # Returns
    /// * `Ok(AuthTokens)` - Access and refresh tokens with absolute expiries
    /// * `Err(AuthError::InvalidCredentials)` - Unknown email or bad password
    /// * `Err(AuthError::AccountInactive)` - Account deactivated
    pub async fn sign_in(
        &self,
        credentials: SignInCredentials,
        user_agent: &str,
        ip: &str,
    ) -> AuthResult<AuthTokens> {
        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            debug!("sign-in attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let password_ok = bcrypt::verify(&credentials.password, &user.password_hash)
            .map_err(|e| AuthError::lookup("verifying credential hash", e))?;
        if !password_ok {
            debug!(user_id = %user.id, "sign-in attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            warn!(user_id = %user.id, "sign-in attempt on inactive account");
            return Err(AuthError::AccountInactive);
        }

        let session_ttl = self.config.session_ttl_for(credentials.remember_me);
        let session = self
            .sessions
            .create_session(
                user.id,
                user_agent,
                ip,
                session_ttl,
                credentials.remember_me,
                self.config.max_renewal_secs,
            )
            .await?;

        let access_token = self.codec.mint_access(
            user.id,
            session.id,
            self.config.access_token_ttl_secs,
        )?;
        let refresh_token = self
            .codec
            .mint_refresh(session.id, session.version, session_ttl)?;

        let now = self.clock.now();
        let tokens = AuthTokens::access_only(
            access_token,
            (now + Duration::seconds(self.config.access_token_ttl_secs)).timestamp(),
        )
        .with_refresh(
            refresh_token,
            (now + Duration::seconds(session_ttl)).timestamp(),
        );

        debug!(user_id = %user.id, session_id = %session.id, "sign-in succeeded");
        Ok(tokens)
    }

    /// Exchange a refresh token for a new access token, rotating the
    /// refresh token when the session is eligible for extension
    ///
    /// A new access token is always minted on success. The refresh fields
    /// of the result are populated only when the session was extended; a
    /// non-remembered session keeps its original refresh token until its
    /// fixed window ends.
    ///
    /// `ExtensionConflict` means a concurrent refresh won the version race.
    /// It is not retried here: the presented token's version is stale by
    /// definition once the race is lost, so a retry could only report
    /// `SessionInvalid`. The conflict is surfaced as-is and the client may
    /// retry the whole call.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<AuthTokens> {
        let claims = self.codec.verify_refresh(refresh_token)?;
        // The codec already rejected expired tokens; re-check anyway
        claims.validate(self.clock.now())?;

        let (session, user, can_extend) = self
            .sessions
            .validate_session(claims.session_id, claims.version)
            .await?;

        let access_token = self.codec.mint_access(
            user.id,
            session.id,
            self.config.access_token_ttl_secs,
        )?;

        let now = self.clock.now();
        let mut tokens = AuthTokens::access_only(
            access_token,
            (now + Duration::seconds(self.config.access_token_ttl_secs)).timestamp(),
        );

        if can_extend {
            let renewal_secs = self.config.remember_session_ttl_secs;
            let new_refresh = self
                .sessions
                .extend_session(&session, &self.codec, renewal_secs)
                .await?;
            tokens = tokens.with_refresh(
                new_refresh,
                (now + Duration::seconds(renewal_secs)).timestamp(),
            );
        }

        self.sessions.touch_last_used(session.id).await;

        Ok(tokens)
    }

    /// Delete the caller's session
    pub async fn logout(&self, session_id: Uuid) -> AuthResult<()> {
        debug!(session_id = %session_id, "logout");
        self.sessions.invalidate(session_id).await
    }

    /// Verify an access token and resolve its principal
    ///
    /// This is the gateway's entry point and the interface downstream
    /// authorization middleware consumes. Resolution is cache-then-store;
    /// cache failures are hard failures, never silently bypassed.
    pub async fn validate_principal(
        &self,
        access_token: &str,
    ) -> AuthResult<(User, AccessClaims)> {
        let claims = self.codec.verify_access(access_token)?;
        // Defense in depth against parse-time-only expiry checks
        claims.validate(self.clock.now())?;

        let user = self.resolve_user(claims.user_id).await?;

        if !user.is_active {
            warn!(user_id = %user.id, "request from deactivated account");
            return Err(AuthError::AccountInactive);
        }

        Ok((user, claims))
    }

    /// List the sessions belonging to a user
    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> AuthResult<(Vec<Session>, u64)> {
        self.sessions.list_for_user(user_id, pagination).await
    }

    /// Read-through principal lookup
    async fn resolve_user(&self, user_id: Uuid) -> AuthResult<User> {
        if let Some(user) = self.cache.get(user_id).await? {
            return Ok(user);
        }

        let Some(user) = self.users.find_by_id(user_id).await? else {
            // A cryptographically valid token for a vanished principal:
            // treat like any other structurally dead credential.
            warn!(user_id = %user_id, "access token for unknown principal");
            return Err(AuthError::SessionInvalid);
        };

        self.cache.set(&user).await?;
        Ok(user)
    }
}
