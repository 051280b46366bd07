//! Order API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /orders | POST | any |
//! | /orders | GET | any (role scoped) |
//! | /orders/{id} | GET | customer, restaurant owner, admin |
//! | /orders/{id} | PUT | restaurant owner / admin |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list).post(handler::create))
        .route("/orders/{id}", get(handler::get_by_id).put(handler::update))
}
