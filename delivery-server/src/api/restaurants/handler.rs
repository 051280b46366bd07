//! Restaurant API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};

use crate::auth::{CurrentUser, policy};
use crate::core::ServerState;
use crate::db;
use crate::db::repository::restaurant::{self, RestaurantFilter};
use crate::db::repository::{Pagination, RepoError};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    validate_coordinates, validate_email, validate_minutes, validate_money,
    validate_optional_text, validate_required_text,
};
use crate::utils::{ValidJson, ValidPath, ValidQuery};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub cuisine_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

fn restaurant_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::RestaurantNotFound, format!("Restaurant {id} not found"))
}

/// Load a restaurant or 404, active or not
async fn load(state: &ServerState, id: i64) -> AppResult<Restaurant> {
    restaurant::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| restaurant_not_found(id))
}

fn validate_contact(phone: &Option<String>, email: &Option<String>) -> AppResult<()> {
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    if let Some(email) = email {
        validate_email(email)?;
    }
    Ok(())
}

fn validate_create(p: &RestaurantCreate) -> AppResult<()> {
    validate_required_text(&p.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&p.cuisine_type, "cuisine_type", MAX_NAME_LEN)?;
    validate_required_text(&p.street_address, "street_address", MAX_ADDRESS_LEN)?;
    validate_required_text(&p.city, "city", MAX_NAME_LEN)?;
    validate_required_text(&p.state, "state", MAX_NAME_LEN)?;
    validate_required_text(&p.postal_code, "postal_code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&p.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&p.apartment, "apartment", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&p.cover_image_url, "cover_image_url", MAX_URL_LEN)?;
    validate_optional_text(&p.logo_url, "logo_url", MAX_URL_LEN)?;
    validate_contact(&p.phone, &p.email)?;
    validate_coordinates(p.latitude, p.longitude)?;
    validate_money(p.delivery_fee, "delivery_fee")?;
    validate_money(p.minimum_order, "minimum_order")?;
    validate_minutes(p.estimated_delivery_time, "estimated_delivery_time")?;
    Ok(())
}

/// Checked after the patch is merged, so every field is seen in its final state
fn validate_merged(r: &Restaurant) -> AppResult<()> {
    validate_required_text(&r.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&r.cuisine_type, "cuisine_type", MAX_NAME_LEN)?;
    validate_required_text(&r.street_address, "street_address", MAX_ADDRESS_LEN)?;
    validate_required_text(&r.city, "city", MAX_NAME_LEN)?;
    validate_required_text(&r.state, "state", MAX_NAME_LEN)?;
    validate_required_text(&r.postal_code, "postal_code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&r.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&r.apartment, "apartment", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&r.cover_image_url, "cover_image_url", MAX_URL_LEN)?;
    validate_optional_text(&r.logo_url, "logo_url", MAX_URL_LEN)?;
    validate_contact(&r.phone, &r.email)?;
    validate_coordinates(r.latitude, r.longitude)?;
    validate_money(r.delivery_fee, "delivery_fee")?;
    validate_money(r.minimum_order, "minimum_order")?;
    validate_minutes(r.estimated_delivery_time, "estimated_delivery_time")?;
    Ok(())
}

/// GET /restaurants - active restaurants, optional cuisine filter
pub async fn list(
    State(state): State<ServerState>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let filter = RestaurantFilter {
        cuisine_type: query.cuisine_type.as_deref().map(str::trim).filter(|c| !c.is_empty()),
        owner_id: None,
    };
    let page = Pagination {
        skip: query.skip,
        limit: query.limit,
    };
    let restaurants = restaurant::list(&state.pool, &filter, page).await?;
    Ok(Json(restaurants))
}

/// GET /restaurants/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    ValidPath(id): ValidPath<i64>,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(load(&state, id).await?))
}

/// POST /restaurants
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidJson(payload): ValidJson<RestaurantCreate>,
) -> AppResult<Json<Restaurant>> {
    policy::require_restaurant_creator(&current)?;
    validate_create(&payload)?;

    let created = restaurant::create(&state.pool, current.id, payload).await?;
    tracing::info!(restaurant_id = created.id, owner_id = current.id, "Restaurant created");
    Ok(Json(created))
}

/// PUT /restaurants/{id}
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    // a concurrent delete or update must not be overwritten by a stale copy
    let mut tx = db::begin_immediate(&state.pool).await?;
    let existing = restaurant::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| restaurant_not_found(id))?;
    policy::require_restaurant_manager(&current, &existing, "restaurant_update")?;

    let mut merged = existing;
    payload.apply(&mut merged);
    validate_merged(&merged)?;

    let saved = restaurant::update(&mut tx, &merged).await?;
    tx.commit().await.map_err(RepoError::from)?;
    tracing::info!(restaurant_id = id, user_id = current.id, "Restaurant updated");
    Ok(Json(saved))
}

/// DELETE /restaurants/{id} - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> AppResult<Json<Value>> {
    let existing = load(&state, id).await?;
    policy::require_restaurant_manager(&current, &existing, "restaurant_delete")?;

    restaurant::deactivate(&state.pool, id).await?;
    tracing::info!(restaurant_id = id, user_id = current.id, "Restaurant deactivated");
    Ok(Json(json!({ "message": "Restaurant deleted successfully" })))
}

/// GET /my-restaurants - the caller's own active restaurants
pub async fn my_restaurants(
    State(state): State<ServerState>,
    CurrentUser(current): CurrentUser,
    ValidQuery(query): ValidQuery<PageQuery>,
) -> AppResult<Json<Vec<Restaurant>>> {
    policy::require_restaurant_owner_role(&current)?;

    let filter = RestaurantFilter {
        cuisine_type: None,
        owner_id: Some(current.id),
    };
    let page = Pagination {
        skip: query.skip,
        limit: query.limit,
    };
    let restaurants = restaurant::list(&state.pool, &filter, page).await?;
    Ok(Json(restaurants))
}
