//! Authorization predicates
//!
//! Every check takes the freshly loaded caller and the already loaded
//! resource, so a missing resource has been reported as 404 before any of
//! these run.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, Restaurant, Role, User};

use crate::security_log;

/// Which orders a caller may list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// Orders placed by this customer
    Customer(i64),
    /// Orders for restaurants owned by this seller
    Seller(i64),
    All,
}

impl OrderScope {
    pub fn for_user(user: &User) -> Self {
        match user.role {
            Role::Customer => Self::Customer(user.id),
            Role::Seller => Self::Seller(user.id),
            Role::Admin => Self::All,
        }
    }
}

pub fn can_create_restaurant(user: &User) -> bool {
    user.role.can_own_restaurants()
}

/// Restaurant and menu management: admin or the owner
pub fn can_manage_restaurant(user: &User, restaurant: &Restaurant) -> bool {
    user.role.is_admin() || restaurant.owner_id == user.id
}

pub fn can_view_order(user: &User, order: &Order, restaurant_owner_id: i64) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Customer => order.customer_id == user.id,
        Role::Seller => restaurant_owner_id == user.id,
    }
}

pub fn can_update_order(user: &User, restaurant_owner_id: i64) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Customer => false,
        Role::Seller => restaurant_owner_id == user.id,
    }
}

// ── Guards used by handlers ─────────────────────────────────────────

fn deny(user: &User, action: &'static str, code: ErrorCode, message: &str) -> AppError {
    security_log!(
        "WARN",
        "permission_denied",
        user_id = user.id,
        role = user.role.as_db(),
        action = action
    );
    AppError::with_message(code, message)
}

pub fn require_restaurant_creator(user: &User) -> AppResult<()> {
    if can_create_restaurant(user) {
        Ok(())
    } else {
        Err(deny(
            user,
            "restaurant_create",
            ErrorCode::RoleRequired,
            "Only sellers and admins can create restaurants",
        ))
    }
}

pub fn require_restaurant_owner_role(user: &User) -> AppResult<()> {
    if can_create_restaurant(user) {
        Ok(())
    } else {
        Err(deny(
            user,
            "my_restaurants",
            ErrorCode::RoleRequired,
            "Only sellers and admins can access this endpoint",
        ))
    }
}

pub fn require_restaurant_manager(
    user: &User,
    restaurant: &Restaurant,
    action: &'static str,
) -> AppResult<()> {
    if can_manage_restaurant(user, restaurant) {
        Ok(())
    } else {
        Err(deny(
            user,
            action,
            ErrorCode::NotResourceOwner,
            "You can only manage your own restaurants",
        ))
    }
}

pub fn require_order_viewer(user: &User, order: &Order, restaurant_owner_id: i64) -> AppResult<()> {
    if can_view_order(user, order, restaurant_owner_id) {
        return Ok(());
    }
    let message = match user.role {
        Role::Customer => "You can only view your own orders",
        _ => "You can only view orders for your restaurants",
    };
    Err(deny(user, "order_view", ErrorCode::NotResourceOwner, message))
}

/// Role gate applied before the order is even looked up
pub fn require_order_updater_role(user: &User) -> AppResult<()> {
    if user.role == Role::Customer {
        Err(deny(
            user,
            "order_update",
            ErrorCode::PermissionDenied,
            "Customers cannot update order status",
        ))
    } else {
        Ok(())
    }
}

pub fn require_order_updater(user: &User, restaurant_owner_id: i64) -> AppResult<()> {
    if can_update_order(user, restaurant_owner_id) {
        Ok(())
    } else {
        Err(deny(
            user,
            "order_update",
            ErrorCode::NotResourceOwner,
            "You can only update orders for your restaurants",
        ))
    }
}
