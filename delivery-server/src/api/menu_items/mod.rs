//! Menu Item API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /restaurants/{id}/menu-items | GET | none |
//! | /restaurants/{id}/menu-items | POST | owner / admin |
//! | /menu-items/{id} | GET | none |
//! | /menu-items/{id} | PUT, DELETE | owner / admin |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/restaurants/{id}/menu-items", get(handler::list))
        .route("/menu-items/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route(
            "/restaurants/{id}/menu-items",
            axum::routing::post(handler::create),
        )
        .route(
            "/menu-items/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        );

    read_routes.merge(manage_routes)
}
