//! Authentication request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use flock_core::domain::entities::session::Session;
use flock_core::domain::value_objects::AuthTokens;

/// Body of POST /api/v1/auth/login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 72))]
    pub password: String,

    /// Opt into a renewable long-lived session
    #[serde(default)]
    pub remember_me: bool,
}

/// Body of POST /api/v1/auth/refresh
///
/// The body field is a fallback; a non-empty refresh cookie wins when both
/// are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Token envelope returned by login and refresh
///
/// Expiry fields are absolute unix timestamps. The refresh fields are
/// present only when a refresh token was (re)issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    pub access_token_expires_in: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_in: Option<i64>,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            access_token_expires_in: tokens.access_expires_at,
            refresh_token: tokens.refresh_token,
            refresh_token_expires_in: tokens.refresh_expires_at,
        }
    }
}

/// Body of a successful POST /api/v1/auth/logout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// One session in GET /api/v1/auth/sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub user_agent: String,
    pub ip: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub remember_me: bool,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            user_agent: session.user_agent,
            ip: session.ip,
            created_at: session.created_at,
            expires_at: session.expires_at,
            last_used_at: session.last_used_at,
            remember_me: session.remember_me,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_fields_omitted_when_absent() {
        let response = TokenResponse {
            access_token: "token".to_string(),
            access_token_expires_in: 1_700_000_000,
            refresh_token: None,
            refresh_token_expires_in: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("refresh_token"));
    }

    #[test]
    fn test_login_request_validation() {
        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "long enough password".to_string(),
            remember_me: false,
        };
        assert!(bad_email.validate().is_err());

        let short_password = LoginRequest {
            email: "wren@example.com".to_string(),
            password: "short".to_string(),
            remember_me: false,
        };
        assert!(short_password.validate().is_err());

        let ok = LoginRequest {
            email: "wren@example.com".to_string(),
            password: "long enough password".to_string(),
            remember_me: true,
        };
        assert!(ok.validate().is_ok());
    }
}
