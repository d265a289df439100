//! MySQL implementation of the SessionRepository trait.
//!
//! Sessions are the only rows this layer mutates. The extension update is a
//! single version-conditioned statement, so linearizability per session is
//! the database's problem, not ours.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use tokio::time::timeout;
use uuid::Uuid;

use flock_core::domain::entities::session::Session;
use flock_core::domain::entities::user::User;
use flock_core::errors::{AuthError, AuthResult};
use flock_core::repositories::SessionRepository;
use flock_shared::types::Pagination;

use super::user_repository_impl::row_to_user;

/// MySQL implementation of SessionRepository
pub struct MySqlSessionRepository {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlSessionRepository {
    /// Create a new MySQL session repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    /// * `query_timeout` - Deadline applied to every query
    pub fn new(pool: MySqlPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Run a query under the configured deadline
    async fn with_deadline<T, F>(&self, context: &'static str, fut: F) -> AuthResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match timeout(self.query_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AuthError::lookup(context, e)),
            Err(_) => Err(AuthError::Lookup {
                message: format!("{}: deadline exceeded", context),
            }),
        }
    }
}

/// Convert a row using the session_* aliases to a Session entity
pub(crate) fn row_to_session(row: &MySqlRow) -> AuthResult<Session> {
    let id: String = row
        .try_get("session_id")
        .map_err(|e| AuthError::lookup("reading session id", e))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| AuthError::lookup("reading session user_id", e))?;

    Ok(Session {
        id: Uuid::parse_str(&id).map_err(|e| AuthError::lookup("parsing session id", e))?,
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| AuthError::lookup("parsing session user_id", e))?,
        user_agent: row
            .try_get("user_agent")
            .map_err(|e| AuthError::lookup("reading user_agent", e))?,
        ip: row
            .try_get("ip")
            .map_err(|e| AuthError::lookup("reading ip", e))?,
        version: row
            .try_get("version")
            .map_err(|e| AuthError::lookup("reading version", e))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("session_created_at")
            .map_err(|e| AuthError::lookup("reading session created_at", e))?,
        expires_at: row
            .try_get::<DateTime<Utc>, _>("expires_at")
            .map_err(|e| AuthError::lookup("reading expires_at", e))?,
        last_used_at: row
            .try_get::<Option<DateTime<Utc>>, _>("last_used_at")
            .map_err(|e| AuthError::lookup("reading last_used_at", e))?,
        remember_me: row
            .try_get("remember_me")
            .map_err(|e| AuthError::lookup("reading remember_me", e))?,
        max_renewal_secs: row
            .try_get("max_renewal_secs")
            .map_err(|e| AuthError::lookup("reading max_renewal_secs", e))?,
    })
}

const SESSION_COLUMNS: &str = r#"
    s.id AS session_id, s.user_id, s.user_agent, s.ip, s.version,
    s.created_at AS session_created_at, s.expires_at, s.last_used_at,
    s.remember_me, s.max_renewal_secs
"#;

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        let query = r#"
            INSERT INTO sessions (
                id, user_id, user_agent, ip, version,
                created_at, expires_at, last_used_at, remember_me, max_renewal_secs
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        self.with_deadline(
            "inserting session",
            sqlx::query(query)
                .bind(session.id.to_string())
                .bind(session.user_id.to_string())
                .bind(&session.user_agent)
                .bind(&session.ip)
                .bind(session.version)
                .bind(session.created_at)
                .bind(session.expires_at)
                .bind(session.last_used_at)
                .bind(session.remember_me)
                .bind(session.max_renewal_secs)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find_with_user(&self, session_id: Uuid) -> AuthResult<Option<(Session, User)>> {
        let query = format!(
            r#"
            SELECT
                {SESSION_COLUMNS},
                u.username, u.first_name, u.last_name, u.email, u.password_hash,
                u.is_active, u.created_at AS user_created_at,
                r.name AS role_name, r.level AS role_level
            FROM sessions s
            INNER JOIN users u ON u.id = s.user_id
            INNER JOIN roles r ON r.id = u.role_id
            WHERE s.id = ?
            "#
        );

        let row = self
            .with_deadline(
                "finding session with user",
                sqlx::query(&query)
                    .bind(session_id.to_string())
                    .fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some(row) => {
                let session = row_to_session(&row)?;
                // The join repeats s.user_id as the user's id
                let user = row_to_user(&row, "user_id")?;
                Ok(Some((session, user)))
            }
            None => Ok(None),
        }
    }

    async fn extend(
        &self,
        session_id: Uuid,
        expected_version: i32,
        new_expires_at: DateTime<Utc>,
    ) -> AuthResult<Option<i32>> {
        let query = r#"
            UPDATE sessions
            SET expires_at = ?, version = version + 1
            WHERE id = ? AND version = ?
        "#;

        let result = self
            .with_deadline(
                "extending session",
                sqlx::query(query)
                    .bind(new_expires_at)
                    .bind(session_id.to_string())
                    .bind(expected_version)
                    .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 1 {
            Ok(Some(expected_version + 1))
        } else {
            // Version moved underneath us, or the row is gone
            Ok(None)
        }
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        self.with_deadline(
            "deleting session",
            sqlx::query("DELETE FROM sessions WHERE id = ?")
                .bind(session_id.to_string())
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn touch_last_used(&self, session_id: Uuid, at: DateTime<Utc>) -> AuthResult<()> {
        self.with_deadline(
            "touching session last_used",
            sqlx::query("UPDATE sessions SET last_used_at = ? WHERE id = ?")
                .bind(at)
                .bind(session_id.to_string())
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> AuthResult<(Vec<Session>, u64)> {
        let query = format!(
            r#"
            SELECT COUNT(*) OVER() AS total, {SESSION_COLUMNS}
            FROM sessions s
            WHERE s.user_id = ?
            ORDER BY s.created_at DESC
            LIMIT ? OFFSET ?
            "#
        );

        let rows = self
            .with_deadline(
                "listing sessions",
                sqlx::query(&query)
                    .bind(user_id.to_string())
                    .bind(pagination.limit_i64())
                    .bind(pagination.offset_i64())
                    .fetch_all(&self.pool),
            )
            .await?;

        let total = match rows.first() {
            Some(row) => row
                .try_get::<i64, _>("total")
                .map_err(|e| AuthError::lookup("reading session count", e))?
                as u64,
            None => 0,
        };

        let sessions = rows
            .iter()
            .map(row_to_session)
            .collect::<AuthResult<Vec<_>>>()?;

        Ok((sessions, total))
    }
}
