//! Order operations
//!
//! - [`checkout`]: order creation (validation, pricing, atomic persist)
//! - [`fulfilment`]: status machine, tip and delivery time updates
//!
//! Handlers stay thin: every function here takes the freshly loaded caller
//! and applies the authorization policy itself.

pub mod checkout;
pub mod fulfilment;


pub use checkout::create_order;
pub use fulfilment::{apply_update, update_order};

use std::collections::HashMap;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderDetail, OrderItem, OrderStatus, User};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::auth::policy::{self, OrderScope};
use crate::db::repository::{Pagination, order, restaurant};

pub(crate) fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
}

/// Owner of the restaurant an order was placed with
pub(crate) async fn restaurant_owner_of<'e, E>(executor: E, order: &Order) -> AppResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let restaurant = restaurant::find_by_id(executor, order.restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::RestaurantNotFound,
                format!("Restaurant {} not found", order.restaurant_id),
            )
        })?;
    Ok(restaurant.owner_id)
}

pub(crate) async fn load_detail(pool: &SqlitePool, order: Order) -> AppResult<OrderDetail> {
    let items = order::find_items(pool, order.id).await?;
    Ok(OrderDetail { order, items })
}

/// Attach lines to a page of orders, keeping the page order
async fn attach_items(pool: &SqlitePool, orders: Vec<Order>) -> AppResult<Vec<OrderDetail>> {
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in order::find_items_for_orders(pool, &ids).await? {
        by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderDetail { order, items }
        })
        .collect())
}

/// Role-scoped listing, newest first
pub async fn list_orders(
    pool: &SqlitePool,
    user: &User,
    status: Option<OrderStatus>,
    page: Pagination,
) -> AppResult<Vec<OrderDetail>> {
    let scope = OrderScope::for_user(user);
    let orders = order::list(pool, scope, status, page).await?;
    attach_items(pool, orders).await
}

/// Single order; 404 before the ownership check
pub async fn get_order(pool: &SqlitePool, user: &User, id: i64) -> AppResult<OrderDetail> {
    let found = order::find_by_id(pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let owner_id = restaurant_owner_of(pool, &found).await?;
    policy::require_order_viewer(user, &found, owner_id)?;
    load_detail(pool, found).await
}
