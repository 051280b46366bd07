//! Checkout
//!
//! The restaurant, every menu item, the order row, its lines and the
//! restaurant counter are read and written inside one transaction. Any
//! error drops the transaction, which rolls everything back.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderCreate, OrderDetail, OrderItem, OrderStatus, PaymentStatus, User};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use crate::db;
use crate::db::repository::{RepoError, menu_item, order, restaurant};
use crate::pricing::{self, LineInput};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Shape checks that need no database access
pub fn validate_payload(payload: &OrderCreate) -> AppResult<()> {
    validate_required_text(&payload.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.delivery_instructions, "delivery_instructions", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.special_instructions, "special_instructions", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;

    if payload.items.is_empty() {
        return Err(pricing::PricingError::Empty.into());
    }
    for item in &payload.items {
        pricing::validate_quantity(item.menu_item_id, item.quantity)?;
        validate_optional_text(&item.special_instructions, "special_instructions", MAX_NOTE_LEN)?;
    }
    if let Some(tip) = payload.tip_amount {
        pricing::validate_amount("tip_amount", tip)?;
    }
    Ok(())
}

fn menu_item_unavailable(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::MenuItemUnavailable,
        format!("Menu item {id} is not available from this restaurant"),
    )
    .with_detail("menu_item_id", id)
}

/// Place an order for `customer`
///
/// Rejects the whole request when the restaurant is missing or inactive,
/// when any line names a menu item that is missing, deleted, unavailable
/// or sold by another restaurant, or when the subtotal is below the
/// restaurant's minimum order. Nothing is persisted in those cases.
pub async fn create_order(
    pool: &SqlitePool,
    customer: &User,
    payload: OrderCreate,
) -> AppResult<OrderDetail> {
    validate_payload(&payload)?;

    let mut tx = db::begin_immediate(pool).await?;

    let restaurant = restaurant::find_by_id(&mut *tx, payload.restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::RestaurantNotFound,
                format!("Restaurant {} not found", payload.restaurant_id),
            )
        })?;
    if !restaurant.is_active {
        return Err(AppError::with_message(
            ErrorCode::RestaurantInactive,
            format!("Restaurant {} is not accepting orders", restaurant.id),
        ));
    }

    let mut lines = Vec::with_capacity(payload.items.len());
    let mut names = Vec::with_capacity(payload.items.len());
    for requested in &payload.items {
        let item = menu_item::find_by_id(&mut *tx, requested.menu_item_id)
            .await?
            .filter(|m| m.restaurant_id == restaurant.id && m.is_available)
            .ok_or_else(|| menu_item_unavailable(requested.menu_item_id))?;
        lines.push(LineInput {
            menu_item_id: item.id,
            unit_price: item.price,
            quantity: requested.quantity,
        });
        names.push(item.name);
    }

    let quote = pricing::quote(
        &lines,
        restaurant.delivery_fee,
        payload.tip_amount.unwrap_or(0.0),
    )?;

    let minimum = pricing::to_decimal(restaurant.minimum_order);
    if pricing::to_decimal(quote.subtotal) < minimum {
        return Err(AppError::with_message(
            ErrorCode::BelowMinimumOrder,
            format!(
                "Order subtotal {:.2} is below the restaurant minimum of {:.2}",
                quote.subtotal, restaurant.minimum_order
            ),
        )
        .with_detail("subtotal", quote.subtotal)
        .with_detail("minimum_order", restaurant.minimum_order));
    }

    let now = now_millis();
    let new_order = Order {
        id: snowflake_id(),
        customer_id: customer.id,
        restaurant_id: restaurant.id,
        status: OrderStatus::Pending,
        delivery_address: payload.delivery_address.trim().to_string(),
        delivery_instructions: payload.delivery_instructions,
        special_instructions: payload.special_instructions,
        subtotal: quote.subtotal,
        delivery_fee: quote.delivery_fee,
        tax_amount: quote.tax_amount,
        tip_amount: quote.tip_amount,
        total_amount: quote.total_amount,
        estimated_delivery_time: Some(now + restaurant.estimated_delivery_time * MILLIS_PER_MINUTE),
        actual_delivery_time: None,
        payment_status: PaymentStatus::Pending,
        payment_method: payload.payment_method,
        created_at: now,
        updated_at: now,
    };
    order::insert_order(&mut *tx, &new_order).await?;

    let mut items = Vec::with_capacity(lines.len());
    for (((line, requested), name), total_price) in lines
        .iter()
        .zip(payload.items)
        .zip(names)
        .zip(quote.line_totals.iter().copied())
    {
        let item = OrderItem {
            id: snowflake_id(),
            order_id: new_order.id,
            menu_item_id: line.menu_item_id,
            menu_item_name: name,
            quantity: line.quantity,
            unit_price: pricing::to_f64(pricing::to_decimal(line.unit_price)),
            total_price,
            customizations: requested.customizations,
            special_instructions: requested.special_instructions,
        };
        order::insert_item(&mut *tx, &item).await?;
        items.push(item);
    }

    restaurant::increment_total_orders(&mut *tx, restaurant.id).await?;
    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        order_id = new_order.id,
        customer_id = customer.id,
        restaurant_id = restaurant.id,
        lines = items.len(),
        total = new_order.total_amount,
        "Order placed"
    );

    Ok(OrderDetail {
        order: new_order,
        items,
    })
}
