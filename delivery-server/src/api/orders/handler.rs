//! Order API Handlers
//!
//! Thin wrappers over [`crate::orders`].

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::{OrderCreate, OrderDetail, OrderStatus, OrderUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::Pagination;
use crate::orders;
use crate::utils::{ValidJson, ValidPath, ValidQuery};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<OrderStatus>,
}

/// POST /orders - any authenticated role may place an order
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidJson(payload): ValidJson<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::create_order(&state.pool, &current, payload).await?;
    Ok(Json(detail))
}

/// GET /orders
pub async fn list(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let page = Pagination {
        skip: query.skip,
        limit: query.limit,
    };
    let list = orders::list_orders(&state.pool, &current, query.status, page).await?;
    Ok(Json(list))
}

/// GET /orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(orders::get_order(&state.pool, &current, id).await?))
}

/// PUT /orders/{id}
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<OrderUpdate>,
) -> AppResult<Json<OrderDetail>> {
    Ok(Json(orders::update_order(&state.pool, &current, id, payload).await?))
}
