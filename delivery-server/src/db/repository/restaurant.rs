//! Restaurant Repository

use super::{Pagination, RepoError, RepoResult};
use shared::models::{Restaurant, RestaurantCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::types::Json;
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

/// Listing filters
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter<'a> {
    pub cuisine_type: Option<&'a str>,
    pub owner_id: Option<i64>,
}

/// Find by id, active or not
pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Restaurant>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let restaurant = sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(restaurant)
}

/// Active restaurants only, oldest first
pub async fn list(
    pool: &SqlitePool,
    filter: &RestaurantFilter<'_>,
    page: Pagination,
) -> RepoResult<Vec<Restaurant>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT * FROM restaurants WHERE is_active = 1");
    if let Some(cuisine) = filter.cuisine_type {
        qb.push(" AND cuisine_type = ")
            .push_bind(cuisine)
            .push(" COLLATE NOCASE");
    }
    if let Some(owner_id) = filter.owner_id {
        qb.push(" AND owner_id = ").push_bind(owner_id);
    }
    qb.push(" ORDER BY created_at, id LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = qb.build_query_as::<Restaurant>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, owner_id: i64, data: RestaurantCreate) -> RepoResult<Restaurant> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO restaurants (
            id, owner_id, name, description, cuisine_type, phone, email,
            street_address, apartment, city, state, postal_code, latitude, longitude,
            cover_image_url, logo_url, is_active, is_open, average_rating, total_reviews, total_orders,
            delivery_fee, minimum_order, estimated_delivery_time, business_hours, created_at, updated_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 0, 0.0, 0, 0, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(owner_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.cuisine_type)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.street_address)
    .bind(&data.apartment)
    .bind(&data.city)
    .bind(&data.state)
    .bind(&data.postal_code)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(&data.cover_image_url)
    .bind(&data.logo_url)
    .bind(data.delivery_fee)
    .bind(data.minimum_order)
    .bind(data.estimated_delivery_time)
    .bind(Json(&data.business_hours))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create restaurant".into()))
}

/// Persist every mutable column of a merged restaurant
///
/// `r` must have been loaded inside the same immediate transaction, or the
/// write-back can undo a concurrent change such as a soft delete.
pub async fn update(conn: &mut SqliteConnection, r: &Restaurant) -> RepoResult<Restaurant> {
    let rows = sqlx::query(
        "UPDATE restaurants SET
            name = ?, description = ?, cuisine_type = ?, phone = ?, email = ?,
            street_address = ?, apartment = ?, city = ?, state = ?, postal_code = ?,
            latitude = ?, longitude = ?, cover_image_url = ?, logo_url = ?,
            is_active = ?, is_open = ?, delivery_fee = ?, minimum_order = ?,
            estimated_delivery_time = ?, business_hours = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&r.name)
    .bind(&r.description)
    .bind(&r.cuisine_type)
    .bind(&r.phone)
    .bind(&r.email)
    .bind(&r.street_address)
    .bind(&r.apartment)
    .bind(&r.city)
    .bind(&r.state)
    .bind(&r.postal_code)
    .bind(r.latitude)
    .bind(r.longitude)
    .bind(&r.cover_image_url)
    .bind(&r.logo_url)
    .bind(r.is_active)
    .bind(r.is_open)
    .bind(r.delivery_fee)
    .bind(r.minimum_order)
    .bind(r.estimated_delivery_time)
    .bind(Json(&r.business_hours))
    .bind(now_millis())
    .bind(r.id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Restaurant {} not found", r.id)));
    }

    find_by_id(&mut *conn, r.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", r.id)))
}

/// Soft delete: the row stays so historical orders keep their reference
pub async fn deactivate(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE restaurants SET is_active = 0, is_open = 0, updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn increment_total_orders(conn: &mut SqliteConnection, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE restaurants SET total_orders = total_orders + 1 WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
