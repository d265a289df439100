use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;

mod app;
mod dto;
mod handlers;
mod middleware;
mod routes;

use flock_core::services::auth::{AuthService, AuthServiceConfig};
use flock_core::services::clock::{Clock, SystemClock};
use flock_core::services::session::SessionService;
use flock_core::services::token::{TokenCodec, TokenCodecConfig};
use flock_infra::{create_pool, MySqlSessionRepository, MySqlUserRepository, RedisUserCache};
use flock_shared::config::AppConfig;

use routes::auth::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    info!(
        "starting flock api server ({} environment)",
        config.environment
    );

    // Backing stores
    let pool = create_pool(&config.database).await?;
    let cache = RedisUserCache::new(&config.cache).await?;

    let query_timeout = Duration::from_millis(config.database.query_timeout_ms);
    let users = MySqlUserRepository::new(pool.clone(), query_timeout);
    let sessions = MySqlSessionRepository::new(pool, query_timeout);

    // Auth core. A bad token key aborts startup here.
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let codec = Arc::new(TokenCodec::new(
        TokenCodecConfig::new(
            config.auth.access_token_key.clone(),
            config.auth.refresh_token_key.clone(),
        ),
        clock.clone(),
    )?);

    let auth_service = Arc::new(AuthService::new(
        users,
        SessionService::new(sessions, clock.clone()),
        cache,
        codec,
        AuthServiceConfig {
            access_token_ttl_secs: config.auth.access_token_ttl_secs,
            session_ttl_secs: config.auth.session_ttl_secs,
            remember_session_ttl_secs: config.auth.remember_session_ttl_secs,
            max_renewal_secs: config.auth.max_renewal_secs,
        },
        clock,
    ));

    let app_state = web::Data::new(AppState {
        auth_service,
        auth_config: config.auth.clone(),
    });

    let bind_address = config.server.bind_address();
    info!("binding to {}", bind_address);

    let mut server = HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .configure(|cfg| app::configure_app(cfg, app_state.clone()))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    Ok(())
}
