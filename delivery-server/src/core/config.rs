use thiserror::Error;

use crate::auth::JwtConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Invalid(String),
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ENVIRONMENT | development | development / staging / production |
/// | HTTP_PORT | 8001 | HTTP listen port |
/// | DATABASE_URL | sqlite:delivery.db | SQLite URL |
/// | DB_MAX_CONNECTIONS | 5 | pool size |
/// | JWT_SECRET | generated in development | HS256 key (>= 32 chars) |
/// | JWT_EXPIRATION_MINUTES | 30 | token lifetime |
/// | JWT_ISSUER / JWT_AUDIENCE | delivery-server / delivery-clients | claim checks |
/// | AUTH_FIXED_DELAY_MS | 250 | constant login delay |
/// | LOGIN_RATE_LIMIT | 10 | /token requests per minute per IP (0 = off) |
/// | REGISTER_RATE_LIMIT | 5 | /register requests per minute per IP (0 = off) |
/// | TRUST_FORWARDED_FOR | false | key rate limits on X-Forwarded-For (only behind a proxy) |
/// | CORS_ALLOW_ORIGINS | (permissive) | comma-separated origin list |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_URL=sqlite:/data/delivery.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// development | staging | production
    pub environment: String,
    pub http_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    /// Constant delay applied to every login attempt
    pub auth_fixed_delay_ms: u64,
    /// Requests per minute per IP, 0 disables
    pub login_rate_limit: u32,
    pub register_rate_limit: u32,
    /// Take the client IP from X-Forwarded-For instead of the peer address.
    /// Clients can forge the header, so enable it only behind a proxy that
    /// overwrites it.
    pub trust_forwarded_for: bool,
    /// Empty means any origin
    pub cors_allow_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env_or("ENVIRONMENT", "development");
        let is_development = environment == "development";
        let jwt = JwtConfig::from_env(is_development)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(Self {
            http_port: env_parse("HTTP_PORT", 8001),
            database_url: env_or("DATABASE_URL", "sqlite:delivery.db"),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 5),
            jwt,
            auth_fixed_delay_ms: env_parse("AUTH_FIXED_DELAY_MS", 250),
            login_rate_limit: env_parse("LOGIN_RATE_LIMIT", 10),
            register_rate_limit: env_parse("REGISTER_RATE_LIMIT", 5),
            trust_forwarded_for: env_parse("TRUST_FORWARDED_FOR", false),
            cors_allow_origins: std::env::var("CORS_ALLOW_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            environment,
        })
    }

    /// In-memory configuration for tests: memory SQLite, fixed secret,
    /// no login delay, rate limits off
    pub fn for_tests() -> Self {
        Self {
            environment: "test".into(),
            http_port: 0,
            database_url: "sqlite::memory:".into(),
            db_max_connections: 1,
            jwt: JwtConfig {
                secret: "test-secret-that-is-at-least-32-characters".into(),
                expiration_minutes: 30,
                issuer: "delivery-server".into(),
                audience: "delivery-clients".into(),
            },
            auth_fixed_delay_ms: 0,
            login_rate_limit: 0,
            register_rate_limit: 0,
            trust_forwarded_for: false,
            cors_allow_origins: Vec::new(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
