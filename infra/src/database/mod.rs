//! Database module - MySQL implementations using SQLx.

pub mod mysql;

use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::info;

use flock_shared::config::DatabaseConfig;

use crate::InfraError;

/// Create the MySQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, InfraError> {
    info!(
        max_connections = config.max_connections,
        "creating database connection pool"
    );

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .connect(&config.url)
        .await
        .map_err(|e| InfraError::Connection(format!("failed to connect to database: {}", e)))
}
