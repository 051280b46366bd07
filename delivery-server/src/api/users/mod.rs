//! Current user profile

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/users/me", get(handler::me).put(handler::update_me))
}
