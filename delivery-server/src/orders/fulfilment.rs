//! Fulfilment updates: status, tip, delivery times

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderDetail, OrderStatus, OrderUpdate, TransitionError, User};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{load_detail, order_not_found, restaurant_owner_of};
use crate::auth::policy;
use crate::db;
use crate::db::repository::{RepoError, order};
use crate::pricing;

/// Merge an update into `order`
///
/// Terminal orders reject every update. Changing the tip recomputes the
/// total; nothing else is repriced. Moving to `delivered` stamps
/// `actual_delivery_time` with `now` unless the update carries one.
/// On error `order` is left untouched.
pub fn apply_update(order: &mut Order, update: OrderUpdate, now: i64) -> AppResult<()> {
    let OrderUpdate {
        status,
        tip_amount,
        estimated_delivery_time,
        actual_delivery_time,
    } = update;

    if order.status.is_terminal() {
        return Err(TransitionError::Terminal(order.status).into());
    }

    let next_status = match status {
        Some(to) => order.status.transition(to)?,
        None => order.status,
    };
    if let Some(tip) = tip_amount {
        pricing::validate_amount("tip_amount", tip)?;
    }
    for (field, value) in [
        ("estimated_delivery_time", estimated_delivery_time),
        ("actual_delivery_time", actual_delivery_time),
    ] {
        if let Some(ts) = value
            && ts < 0
        {
            return Err(AppError::validation(format!("{field} must be a Unix timestamp in milliseconds")));
        }
    }

    let delivered_now = next_status == OrderStatus::Delivered && order.status != OrderStatus::Delivered;
    order.status = next_status;

    if let Some(tip) = tip_amount {
        order.tip_amount = pricing::to_f64(pricing::to_decimal(tip));
        order.total_amount =
            pricing::total_for(order.subtotal, order.delivery_fee, order.tax_amount, order.tip_amount);
    }
    if estimated_delivery_time.is_some() {
        order.estimated_delivery_time = estimated_delivery_time;
    }
    if actual_delivery_time.is_some() {
        order.actual_delivery_time = actual_delivery_time;
    } else if delivered_now {
        order.actual_delivery_time = Some(now);
    }
    Ok(())
}

/// `PUT /orders/{id}`
///
/// Customers are refused before the lookup; sellers must own the
/// restaurant the order was placed with. The load, the transition check
/// and the write share one immediate transaction, so two concurrent
/// updates are checked against each other's result.
pub async fn update_order(
    pool: &SqlitePool,
    user: &User,
    id: i64,
    update: OrderUpdate,
) -> AppResult<OrderDetail> {
    policy::require_order_updater_role(user)?;

    let mut tx = db::begin_immediate(pool).await?;
    let existing = order::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    let owner_id = restaurant_owner_of(&mut *tx, &existing).await?;
    policy::require_order_updater(user, owner_id)?;

    let mut merged = existing.clone();
    apply_update(&mut merged, update, now_millis())?;
    let saved = order::update(&mut tx, &merged).await?;
    tx.commit().await.map_err(RepoError::from)?;

    if saved.status != existing.status {
        tracing::info!(
            order_id = id,
            from = existing.status.as_db(),
            to = saved.status.as_db(),
            user_id = user.id,
            "Order status changed"
        );
    }

    load_detail(pool, saved).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PaymentStatus;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: 1,
            customer_id: 2,
            restaurant_id: 3,
            status,
            delivery_address: "1 Main St".to_string(),
            delivery_instructions: None,
            special_instructions: None,
            subtotal: 20.00,
            delivery_fee: 2.99,
            tax_amount: 1.60,
            tip_amount: 0.0,
            total_amount: 24.59,
            estimated_delivery_time: Some(1_000),
            actual_delivery_time: None,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn status(to: OrderStatus) -> OrderUpdate {
        OrderUpdate {
            status: Some(to),
            ..Default::default()
        }
    }

    #[test]
    fn test_walk_the_happy_path() {
        let mut o = order(OrderStatus::Pending);
        for next in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::PickedUp,
            OrderStatus::Delivering,
            OrderStatus::Delivered,
        ] {
            apply_update(&mut o, status(next), 5_000).unwrap();
            assert_eq!(o.status, next);
        }
        assert_eq!(o.actual_delivery_time, Some(5_000));
    }

    #[test]
    fn test_delivered_keeps_supplied_time() {
        let mut o = order(OrderStatus::Delivering);
        let update = OrderUpdate {
            status: Some(OrderStatus::Delivered),
            actual_delivery_time: Some(4_242),
            ..Default::default()
        };
        apply_update(&mut o, update, 9_999).unwrap();
        assert_eq!(o.actual_delivery_time, Some(4_242));
    }

    #[test]
    fn test_skipping_steps_is_rejected_and_order_untouched() {
        let mut o = order(OrderStatus::Pending);
        let update = OrderUpdate {
            status: Some(OrderStatus::Delivered),
            tip_amount: Some(5.0),
            ..Default::default()
        };
        let err = apply_update(&mut o, update, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(o.status, OrderStatus::Pending);
        assert_eq!(o.tip_amount, 0.0);
        assert_eq!(o.total_amount, 24.59);
    }

    #[test]
    fn test_terminal_orders_reject_everything() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let mut o = order(terminal);
            let err = apply_update(&mut o, status(OrderStatus::Preparing), 1).unwrap_err();
            assert_eq!(err.code, ErrorCode::OrderTerminal);

            let tip_only = OrderUpdate {
                tip_amount: Some(2.0),
                ..Default::default()
            };
            let err = apply_update(&mut o, tip_only, 1).unwrap_err();
            assert_eq!(err.code, ErrorCode::OrderTerminal);
        }
    }

    #[test]
    fn test_cancel_from_non_terminal() {
        let mut o = order(OrderStatus::Ready);
        apply_update(&mut o, status(OrderStatus::Cancelled), 1).unwrap();
        assert_eq!(o.status, OrderStatus::Cancelled);
        assert_eq!(o.actual_delivery_time, None);
    }

    #[test]
    fn test_same_status_is_noop() {
        let mut o = order(OrderStatus::Preparing);
        apply_update(&mut o, status(OrderStatus::Preparing), 1).unwrap();
        assert_eq!(o.status, OrderStatus::Preparing);
    }

    #[test]
    fn test_tip_recomputes_total_only() {
        let mut o = order(OrderStatus::Confirmed);
        let update = OrderUpdate {
            tip_amount: Some(5.0),
            ..Default::default()
        };
        apply_update(&mut o, update, 1).unwrap();
        assert_eq!(o.tip_amount, 5.0);
        assert_eq!(o.total_amount, 29.59);
        assert_eq!(o.subtotal, 20.00);
        assert_eq!(o.tax_amount, 1.60);
    }

    #[test]
    fn test_negative_tip_rejected() {
        let mut o = order(OrderStatus::Confirmed);
        let update = OrderUpdate {
            tip_amount: Some(-1.0),
            ..Default::default()
        };
        let err = apply_update(&mut o, update, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
    }

    #[test]
    fn test_estimated_time_update() {
        let mut o = order(OrderStatus::Preparing);
        let update = OrderUpdate {
            estimated_delivery_time: Some(7_000),
            ..Default::default()
        };
        apply_update(&mut o, update, 1).unwrap();
        assert_eq!(o.estimated_delivery_time, Some(7_000));
        assert_eq!(o.status, OrderStatus::Preparing);
    }
}
