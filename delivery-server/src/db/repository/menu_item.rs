//! Menu Item Repository
//!
//! Deleted items keep their row (`deleted_at` set) because order lines
//! reference them.

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::types::Json;
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

/// Find a live (not deleted) item
pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<MenuItem>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let item = sqlx::query_as::<_, MenuItem>(
        "SELECT * FROM menu_items WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(item)
}

/// Available items of one restaurant in menu order
pub async fn list_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
    category: Option<&str>,
) -> RepoResult<Vec<MenuItem>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT * FROM menu_items WHERE deleted_at IS NULL AND is_available = 1 AND restaurant_id = ",
    );
    qb.push_bind(restaurant_id);
    if let Some(category) = category {
        qb.push(" AND category = ")
            .push_bind(category)
            .push(" COLLATE NOCASE");
    }
    qb.push(" ORDER BY sort_order, name, id");

    let items = qb.build_query_as::<MenuItem>().fetch_all(pool).await?;
    Ok(items)
}

pub async fn create(pool: &SqlitePool, restaurant_id: i64, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO menu_items (
            id, restaurant_id, name, description, price, image_url, is_available,
            is_vegetarian, is_vegan, is_gluten_free, spice_level, calories, prep_time,
            category, sort_order, customization_options, created_at, updated_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.image_url)
    .bind(data.is_available)
    .bind(data.is_vegetarian)
    .bind(data.is_vegan)
    .bind(data.is_gluten_free)
    .bind(data.spice_level)
    .bind(data.calories)
    .bind(data.prep_time)
    .bind(&data.category)
    .bind(data.sort_order)
    .bind(Json(&data.customization_options))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

/// Write back a merged item loaded in the same transaction
pub async fn update(conn: &mut SqliteConnection, item: &MenuItem) -> RepoResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE menu_items SET
            name = ?, description = ?, price = ?, image_url = ?, is_available = ?,
            is_vegetarian = ?, is_vegan = ?, is_gluten_free = ?, spice_level = ?,
            calories = ?, prep_time = ?, category = ?, sort_order = ?,
            customization_options = ?, updated_at = ?
         WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(&item.name)
    .bind(&item.description)
    .bind(item.price)
    .bind(&item.image_url)
    .bind(item.is_available)
    .bind(item.is_vegetarian)
    .bind(item.is_vegan)
    .bind(item.is_gluten_free)
    .bind(item.spice_level)
    .bind(item.calories)
    .bind(item.prep_time)
    .bind(&item.category)
    .bind(item.sort_order)
    .bind(Json(&item.customization_options))
    .bind(now_millis())
    .bind(item.id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {} not found", item.id)));
    }

    find_by_id(&mut *conn, item.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", item.id)))
}

pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "UPDATE menu_items SET deleted_at = ?, is_available = 0, updated_at = ?
         WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}
