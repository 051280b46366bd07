//! Menu Item API Handlers
//!
//! Ownership is decided by the parent restaurant.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{MAX_SPICE_LEVEL, MenuItem, MenuItemCreate, MenuItemUpdate, Restaurant};
use sqlx::{Executor, Sqlite, SqliteConnection};

use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db;
use crate::db::repository::{RepoError, menu_item, restaurant};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_minutes, validate_money,
    validate_optional_text, validate_range, validate_required_text,
};
use crate::utils::{ValidJson, ValidPath, ValidQuery};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

async fn load_restaurant<'e, E>(executor: E, id: i64) -> AppResult<Restaurant>
where
    E: Executor<'e, Database = Sqlite>,
{
    restaurant::find_by_id(executor, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::RestaurantNotFound, format!("Restaurant {id} not found"))
    })
}

/// Live item and its restaurant, or 404
async fn load_item(conn: &mut SqliteConnection, id: i64) -> AppResult<(MenuItem, Restaurant)> {
    let item = menu_item::find_by_id(&mut *conn, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
    })?;
    let parent = load_restaurant(&mut *conn, item.restaurant_id).await?;
    Ok((item, parent))
}

fn validate_item(item: &MenuItem) -> AppResult<()> {
    validate_required_text(&item.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&item.category, "category", MAX_NAME_LEN)?;
    validate_optional_text(&item.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&item.image_url, "image_url", MAX_URL_LEN)?;
    validate_money(item.price, "price")?;
    validate_range(item.spice_level, "spice_level", 0, MAX_SPICE_LEVEL)?;
    if let Some(calories) = item.calories {
        validate_range(calories, "calories", 0, i64::from(u16::MAX))?;
    }
    validate_minutes(item.prep_time, "prep_time")?;
    Ok(())
}

/// Unsaved row built from the create payload, used for validation only
fn draft(restaurant_id: i64, p: &MenuItemCreate) -> MenuItem {
    MenuItem {
        id: 0,
        restaurant_id,
        name: p.name.clone(),
        description: p.description.clone(),
        price: p.price,
        image_url: p.image_url.clone(),
        is_available: p.is_available,
        is_vegetarian: p.is_vegetarian,
        is_vegan: p.is_vegan,
        is_gluten_free: p.is_gluten_free,
        spice_level: p.spice_level,
        calories: p.calories,
        prep_time: p.prep_time,
        category: p.category.clone(),
        sort_order: p.sort_order,
        customization_options: Value::Null,
        created_at: 0,
        updated_at: 0,
        deleted_at: None,
    }
}

/// GET /restaurants/{id}/menu-items - available items in menu order
pub async fn list(
    State(state): State<ServerState>,
    ValidPath(restaurant_id): ValidPath<i64>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    load_restaurant(&state.pool, restaurant_id).await?;
    let category = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let items = menu_item::list_by_restaurant(&state.pool, restaurant_id, category).await?;
    Ok(Json(items))
}

/// GET /menu-items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    ValidPath(id): ValidPath<i64>,
) -> AppResult<Json<MenuItem>> {
    let mut conn = state.pool.acquire().await.map_err(RepoError::from)?;
    let (item, _) = load_item(&mut conn, id).await?;
    Ok(Json(item))
}

/// POST /restaurants/{id}/menu-items
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidPath(restaurant_id): ValidPath<i64>,
    ValidJson(payload): ValidJson<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    let parent = load_restaurant(&state.pool, restaurant_id).await?;
    policy::require_restaurant_manager(&current, &parent, "menu_item_create")?;
    validate_item(&draft(restaurant_id, &payload))?;

    let created = menu_item::create(&state.pool, restaurant_id, payload).await?;
    tracing::info!(menu_item_id = created.id, restaurant_id, "Menu item created");
    Ok(Json(created))
}

/// PUT /menu-items/{id}
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let mut tx = db::begin_immediate(&state.pool).await?;
    let (existing, parent) = load_item(&mut tx, id).await?;
    policy::require_restaurant_manager(&current, &parent, "menu_item_update")?;

    let mut merged = existing;
    payload.apply(&mut merged);
    validate_item(&merged)?;

    let saved = menu_item::update(&mut tx, &merged).await?;
    tx.commit().await.map_err(RepoError::from)?;
    tracing::info!(menu_item_id = id, user_id = current.id, "Menu item updated");
    Ok(Json(saved))
}

/// DELETE /menu-items/{id} - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> AppResult<Json<Value>> {
    let (_, parent) = {
        let mut conn = state.pool.acquire().await.map_err(RepoError::from)?;
        load_item(&mut conn, id).await?
    };
    policy::require_restaurant_manager(&current, &parent, "menu_item_delete")?;

    menu_item::soft_delete(&state.pool, id).await?;
    tracing::info!(menu_item_id = id, user_id = current.id, "Menu item deleted");
    Ok(Json(json!({ "message": "Menu item deleted successfully" })))
}
