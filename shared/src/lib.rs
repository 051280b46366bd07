//! Shared types for the delivery platform
//!
//! Error codes, API response structures and domain models used by
//! `delivery-server` and its integration tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
