//! Restaurant API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /restaurants | GET | none |
//! | /restaurants | POST | seller / admin |
//! | /restaurants/{id} | GET | none |
//! | /restaurants/{id} | PUT, DELETE | owner / admin |
//! | /my-restaurants | GET | seller / admin |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/restaurants", get(handler::list))
        .route("/restaurants/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/restaurants", axum::routing::post(handler::create))
        .route(
            "/restaurants/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/my-restaurants", get(handler::my_restaurants));

    read_routes.merge(manage_routes)
}
