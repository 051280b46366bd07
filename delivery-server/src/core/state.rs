use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtService, RateLimiter};
use crate::core::{Config, ServerError};
use crate::db::DbService;

/// Shared handler state
///
/// Cheap to clone: the pool and services are reference counted.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | pool | SQLite connection pool |
/// | jwt_service | token issue/validation |
/// | rate_limiter | per-IP windows for /token and /register |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub rate_limiter: RateLimiter,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            pool,
            jwt_service,
            rate_limiter: RateLimiter::new(),
        }
    }

    /// Open the database (running migrations) and build the services
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        let db = DbService::new(&config.database_url, config.db_max_connections).await?;
        Ok(Self::new(config.clone(), db.pool))
    }
}
