//! Delivery Server - food-delivery marketplace backend
//!
//! # Module layout
//!
//! ```text
//! delivery-server/src/
//! ├── core/      # config, state, server
//! ├── auth/      # JWT, password hashing, identity extraction, policies, rate limiting
//! ├── db/        # SQLite pool and repositories
//! ├── pricing/   # order total computation
//! ├── orders/    # checkout and fulfilment operations
//! ├── api/       # HTTP routes and handlers
//! └── utils/     # logging, validation, request extractors
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod pricing;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events on the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and initialise logging from the environment
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").ok();
    let dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = dir.as_deref() {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(level.as_deref(), dir.as_deref());
    Ok(())
}
