//! Redis implementation of the UserCache trait.
//!
//! Short-TTL JSON entries keyed by principal id. Errors here are hard
//! failures by contract: the gateway would rather fail a request than risk
//! serving a deactivated principal off a sick cache.

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tokio::time::timeout;
use tracing::{debug, info};
use uuid::Uuid;

use flock_core::domain::entities::user::User;
use flock_core::errors::{AuthError, AuthResult};
use flock_core::repositories::UserCache;
use flock_shared::config::CacheConfig;

use crate::InfraError;

/// Redis-backed principal cache
#[derive(Clone)]
pub struct RedisUserCache {
    connection: MultiplexedConnection,
    user_ttl_secs: u64,
    op_timeout: Duration,
}

fn user_key(id: Uuid) -> String {
    format!("user:{}", id)
}

impl RedisUserCache {
    /// Connect to Redis and build the cache
    pub async fn new(config: &CacheConfig) -> Result<Self, InfraError> {
        info!("connecting principal cache to redis");

        let client = Client::open(config.url.as_str())
            .map_err(|e| InfraError::Config(format!("invalid redis URL: {}", e)))?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| InfraError::Connection(format!("failed to connect to redis: {}", e)))?;

        Ok(Self {
            connection,
            user_ttl_secs: config.user_ttl_secs,
            op_timeout: Duration::from_millis(config.op_timeout_ms),
        })
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, id: Uuid) -> AuthResult<Option<User>> {
        let mut connection = self.connection.clone();
        let key = user_key(id);

        let payload: Option<String> = match timeout(self.op_timeout, connection.get(&key)).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => return Err(AuthError::lookup("cache get", e)),
            Err(_) => {
                return Err(AuthError::Lookup {
                    message: "cache get: deadline exceeded".to_string(),
                })
            }
        };

        match payload {
            Some(json) => {
                let user = serde_json::from_str(&json)
                    .map_err(|e| AuthError::lookup("decoding cached user", e))?;
                debug!(user_id = %id, "principal cache hit");
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, user: &User) -> AuthResult<()> {
        let mut connection = self.connection.clone();
        let key = user_key(user.id);

        let json = serde_json::to_string(user)
            .map_err(|e| AuthError::lookup("encoding user for cache", e))?;

        match timeout(
            self.op_timeout,
            connection.set_ex::<_, _, ()>(&key, json, self.user_ttl_secs as u64),
        )
        .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AuthError::lookup("cache set", e)),
            Err(_) => Err(AuthError::Lookup {
                message: "cache set: deadline exceeded".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_format() {
        let id = Uuid::nil();
        assert_eq!(
            user_key(id),
            "user:00000000-0000-0000-0000-000000000000"
        );
    }
}
