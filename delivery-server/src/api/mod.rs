//! HTTP API
//!
//! | Module | Routes |
//! |--------|--------|
//! | health | `/health`, `/health/detailed` |
//! | auth | `/register`, `/token` |
//! | users | `/users/me` |
//! | restaurants | `/restaurants`, `/restaurants/{id}`, `/my-restaurants` |
//! | menu_items | `/restaurants/{id}/menu-items`, `/menu-items/{id}` |
//! | orders | `/orders`, `/orders/{id}` |
//!
//! Authentication is per handler through the [`CurrentUser`](crate::auth::CurrentUser)
//! extractor; public routes simply do not ask for it.

pub mod auth;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod restaurants;
pub mod users;

use axum::Router;

use crate::core::ServerState;

/// Create the combined router
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state.clone()))
        .merge(users::router())
        .merge(restaurants::router())
        .merge(menu_items::router())
        .merge(orders::router())
        .with_state(state)
}
