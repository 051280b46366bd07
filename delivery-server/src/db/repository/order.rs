//! Order Repository

use super::{Pagination, RepoError, RepoResult};
use crate::auth::policy::OrderScope;
use shared::models::{Order, OrderItem, OrderStatus};
use shared::util::now_millis;
use sqlx::types::Json;
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

pub async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (
            id, customer_id, restaurant_id, status, delivery_address, delivery_instructions,
            special_instructions, subtotal, delivery_fee, tax_amount, tip_amount, total_amount,
            estimated_delivery_time, actual_delivery_time, payment_status, payment_method,
            created_at, updated_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.restaurant_id)
    .bind(order.status)
    .bind(&order.delivery_address)
    .bind(&order.delivery_instructions)
    .bind(&order.special_instructions)
    .bind(order.subtotal)
    .bind(order.delivery_fee)
    .bind(order.tax_amount)
    .bind(order.tip_amount)
    .bind(order.total_amount)
    .bind(order.estimated_delivery_time)
    .bind(order.actual_delivery_time)
    .bind(order.payment_status)
    .bind(&order.payment_method)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_items (
            id, order_id, menu_item_id, menu_item_name, quantity, unit_price,
            total_price, customizations, special_instructions
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.menu_item_id)
    .bind(&item.menu_item_name)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.total_price)
    .bind(Json(&item.customizations))
    .bind(&item.special_instructions)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Order>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(order)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items =
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ? ORDER BY id")
            .bind(order_id)
            .fetch_all(pool)
            .await?;
    Ok(items)
}

/// Lines for several orders in one query
pub async fn find_items_for_orders(pool: &SqlitePool, order_ids: &[i64]) -> RepoResult<Vec<OrderItem>> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT * FROM order_items WHERE order_id IN (");
    let mut separated = qb.separated(", ");
    for id in order_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY order_id, id");

    let items = qb.build_query_as::<OrderItem>().fetch_all(pool).await?;
    Ok(items)
}

/// Newest first, restricted to what the scope may see
pub async fn list(
    pool: &SqlitePool,
    scope: OrderScope,
    status: Option<OrderStatus>,
    page: Pagination,
) -> RepoResult<Vec<Order>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT o.* FROM orders o");
    match scope {
        OrderScope::Customer(customer_id) => {
            qb.push(" WHERE o.customer_id = ").push_bind(customer_id);
        }
        OrderScope::Seller(owner_id) => {
            qb.push(" JOIN restaurants r ON r.id = o.restaurant_id WHERE r.owner_id = ")
                .push_bind(owner_id);
        }
        OrderScope::All => {
            qb.push(" WHERE 1 = 1");
        }
    }
    if let Some(status) = status {
        qb.push(" AND o.status = ").push_bind(status);
    }
    qb.push(" ORDER BY o.created_at DESC, o.id DESC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let orders = qb.build_query_as::<Order>().fetch_all(pool).await?;
    Ok(orders)
}

/// Persist the fulfilment columns of a merged order
///
/// Runs on the connection that loaded `order`, inside the caller's
/// immediate transaction.
pub async fn update(conn: &mut SqliteConnection, order: &Order) -> RepoResult<Order> {
    let rows = sqlx::query(
        "UPDATE orders SET
            status = ?, tip_amount = ?, total_amount = ?, estimated_delivery_time = ?,
            actual_delivery_time = ?, payment_status = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(order.status)
    .bind(order.tip_amount)
    .bind(order.total_amount)
    .bind(order.estimated_delivery_time)
    .bind(order.actual_delivery_time)
    .bind(order.payment_status)
    .bind(now_millis())
    .bind(order.id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {} not found", order.id)));
    }

    find_by_id(&mut *conn, order.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order.id)))
}
