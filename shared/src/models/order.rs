//! Order Model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{AppError, ErrorCode};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    PickedUp,
    Delivering,
    Delivered,
    Cancelled,
}

/// Rejected status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("order is already {0} and can no longer be changed")]
    Terminal(OrderStatus),
    #[error("cannot move order from {from} to {to}")]
    Illegal { from: OrderStatus, to: OrderStatus },
}

impl OrderStatus {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::PickedUp => "picked_up",
            Self::Delivering => "delivering",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Next status on the happy path
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::PickedUp),
            Self::PickedUp => Some(Self::Delivering),
            Self::Delivering => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Cancelled || self.next() == Some(to)
    }

    /// Validate a status change. Same-status requests are a no-op.
    pub fn transition(self, to: OrderStatus) -> Result<OrderStatus, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }
        if self == to || self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(TransitionError::Illegal { from: self, to })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db())
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Terminal(status) => {
                AppError::with_message(ErrorCode::OrderTerminal, err.to_string())
                    .with_detail("status", status.as_db())
            }
            TransitionError::Illegal { from, to } => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, err.to_string())
                    .with_detail("from", from.as_db())
                    .with_detail("to", to.as_db())
            }
        }
    }
}

/// Payment placeholder status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

/// Order row; amounts are snapshotted at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub delivery_instructions: Option<String>,
    pub special_instructions: Option<String>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax_amount: f64,
    pub tip_amount: f64,
    pub total_amount: f64,
    /// Unix millis
    pub estimated_delivery_time: Option<i64>,
    /// Unix millis
    pub actual_delivery_time: Option<i64>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line; name and prices are copied from the menu item at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub menu_item_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub customizations: Value,
    pub special_instructions: Option<String>,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Checkout line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub menu_item_id: i64,
    pub quantity: i64,
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub customizations: Value,
}

/// Checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub restaurant_id: i64,
    pub delivery_address: String,
    pub delivery_instructions: Option<String>,
    pub special_instructions: Option<String>,
    pub tip_amount: Option<f64>,
    pub payment_method: Option<String>,
    pub items: Vec<OrderItemCreate>,
}

/// Fulfilment update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub tip_amount: Option<f64>,
    pub estimated_delivery_time: Option<i64>,
    pub actual_delivery_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::PickedUp,
        OrderStatus::Delivering,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn test_happy_path() {
        let mut status = OrderStatus::Pending;
        let mut steps = 0;
        while let Some(next) = status.next() {
            status = status.transition(next).unwrap();
            steps += 1;
        }
        assert_eq!(status, OrderStatus::Delivered);
        assert_eq!(steps, 6);
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        for from in ALL.iter().filter(|s| !s.is_terminal()) {
            assert_eq!(
                from.transition(OrderStatus::Cancelled),
                Ok(OrderStatus::Cancelled)
            );
        }
    }

    #[test]
    fn test_terminal_rejects_everything() {
        for from in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            for to in ALL {
                assert_eq!(from.transition(to), Err(TransitionError::Terminal(from)));
            }
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert_eq!(
            OrderStatus::Pending.transition(OrderStatus::Delivered),
            Err(TransitionError::Illegal {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered
            })
        );
        assert!(OrderStatus::Ready.transition(OrderStatus::Preparing).is_err());
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Ready));
    }

    #[test]
    fn test_same_status_is_noop() {
        assert_eq!(
            OrderStatus::Preparing.transition(OrderStatus::Preparing),
            Ok(OrderStatus::Preparing)
        );
    }

    #[test]
    fn test_transition_error_codes() {
        let err: AppError = TransitionError::Terminal(OrderStatus::Delivered).into();
        assert_eq!(err.code, ErrorCode::OrderTerminal);

        let err: AppError = OrderStatus::Delivered
            .transition(OrderStatus::Preparing)
            .map(|_| ())
            .map_err(AppError::from)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderTerminal);

        let err: AppError = TransitionError::Illegal {
            from: OrderStatus::Pending,
            to: OrderStatus::Ready,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PickedUp).unwrap(),
            "\"picked_up\""
        );
        let status: OrderStatus = serde_json::from_str("\"delivering\"").unwrap();
        assert_eq!(status, OrderStatus::Delivering);
        assert!(serde_json::from_str::<OrderStatus>("\"lost\"").is_err());
    }

    #[test]
    fn test_detail_flattens_order() {
        let detail = OrderDetail {
            order: Order {
                id: 10,
                customer_id: 1,
                restaurant_id: 2,
                status: OrderStatus::Pending,
                delivery_address: "1 Main St".to_string(),
                delivery_instructions: None,
                special_instructions: None,
                subtotal: 20.0,
                delivery_fee: 2.99,
                tax_amount: 1.6,
                tip_amount: 0.0,
                total_amount: 24.59,
                estimated_delivery_time: None,
                actual_delivery_time: None,
                payment_status: PaymentStatus::Pending,
                payment_method: None,
                created_at: 0,
                updated_at: 0,
            },
            items: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 10);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["payment_status"], "pending");
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
