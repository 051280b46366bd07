//! Data models
//!
//! Shared between delivery-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps Unix millis.

pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod user;

// Re-exports
pub use menu_item::*;
pub use order::*;
pub use restaurant::*;
pub use user::*;
