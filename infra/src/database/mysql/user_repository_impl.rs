//! MySQL implementation of the UserRepository trait.
//!
//! Read-only: account management lives in the identity subsystem, the auth
//! core only resolves principals and credential hashes.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use tokio::time::timeout;
use uuid::Uuid;

use flock_core::domain::entities::user::{Role, User};
use flock_core::errors::{AuthError, AuthResult};
use flock_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
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

/// Convert a row carrying the user_* and role_* aliases to a User entity
///
/// `id_column` names the column holding the user's id; the session join
/// reuses its `user_id` column for it.
pub(crate) fn row_to_user(row: &MySqlRow, id_column: &str) -> AuthResult<User> {
    let id: String = row
        .try_get(id_column)
        .map_err(|e| AuthError::lookup("reading user id", e))?;

    Ok(User {
        id: Uuid::parse_str(&id).map_err(|e| AuthError::lookup("parsing user id", e))?,
        username: row
            .try_get("username")
            .map_err(|e| AuthError::lookup("reading username", e))?,
        first_name: row
            .try_get("first_name")
            .map_err(|e| AuthError::lookup("reading first_name", e))?,
        last_name: row
            .try_get("last_name")
            .map_err(|e| AuthError::lookup("reading last_name", e))?,
        email: row
            .try_get("email")
            .map_err(|e| AuthError::lookup("reading email", e))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| AuthError::lookup("reading password_hash", e))?,
        is_active: row
            .try_get("is_active")
            .map_err(|e| AuthError::lookup("reading is_active", e))?,
        role: Role {
            name: row
                .try_get("role_name")
                .map_err(|e| AuthError::lookup("reading role name", e))?,
            level: row
                .try_get("role_level")
                .map_err(|e| AuthError::lookup("reading role level", e))?,
        },
        created_at: row
            .try_get::<DateTime<Utc>, _>("user_created_at")
            .map_err(|e| AuthError::lookup("reading user created_at", e))?,
    })
}

const USER_QUERY: &str = r#"
    SELECT
        u.id AS user_id, u.username, u.first_name, u.last_name, u.email,
        u.password_hash, u.is_active, u.created_at AS user_created_at,
        r.name AS role_name, r.level AS role_level
    FROM users u
    INNER JOIN roles r ON r.id = u.role_id
"#;

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let query = format!("{USER_QUERY} WHERE u.id = ? LIMIT 1");

        let row = self
            .with_deadline(
                "finding user by id",
                sqlx::query(&query)
                    .bind(id.to_string())
                    .fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row, "user_id")?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let query = format!("{USER_QUERY} WHERE u.email = ? LIMIT 1");

        let row = self
            .with_deadline(
                "finding user by email",
                sqlx::query(&query).bind(email).fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row, "user_id")?)),
            None => Ok(None),
        }
    }
}
