//! Registration and token exchange
//!
//! Both routes are public and rate limited per client IP.

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::core::ServerState;

pub use handler::{TokenForm, TokenResponse};

pub fn router(state: ServerState) -> Router<ServerState> {
    let register = Router::new()
        .route("/register", post(handler::register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    let token = Router::new()
        .route("/token", post(handler::token))
        .route_layer(middleware::from_fn_with_state(state, login_rate_limit));

    register.merge(token)
}
