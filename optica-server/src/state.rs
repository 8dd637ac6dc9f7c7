//! Application state

use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use crate::auth::{JwtConfig, JwtService, RateLimiter};
use crate::config::Config;
use crate::error::BoxError;
use crate::live::NotificationHub;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// MySQL connection pool
    pub pool: MySqlPool,
    /// Session token service
    pub jwt: JwtService,
    /// Realtime notification rooms
    pub hub: NotificationHub,
    /// Rate limiter for the login route
    pub rate_limiter: RateLimiter,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
}

impl AppState {
    /// Connect, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::with_pool(pool, config))
    }

    pub fn with_pool(pool: MySqlPool, config: &Config) -> Self {
        Self {
            pool,
            jwt: JwtService::new(JwtConfig::new(&config.jwt_secret, config.jwt_expiry_hours)),
            hub: NotificationHub::new(),
            rate_limiter: RateLimiter::new(),
            cookie_secure: config.cookie_secure,
        }
    }
}
