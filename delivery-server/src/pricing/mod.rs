//! Order pricing
//!
//! All arithmetic is done in `Decimal` and converted back to `f64`
//! (rounded to 2 dp, half away from zero) for storage and serialization.

#[cfg(test)]
mod tests;

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

const DECIMAL_PLACES: u32 = 2;

/// Flat sales tax (8%)
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

pub const MAX_QUANTITY: i64 = 99;
pub const MAX_AMOUNT: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("order must contain at least one item")]
    Empty,

    #[error("quantity for menu item {menu_item_id} must be between 1 and {MAX_QUANTITY}, got {quantity}")]
    InvalidQuantity { menu_item_id: i64, quantity: i64 },

    #[error("{field} must be a finite amount between 0 and {MAX_AMOUNT}, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        let message = err.to_string();
        match err {
            PricingError::Empty => AppError::with_message(ErrorCode::OrderEmpty, message),
            PricingError::InvalidQuantity { menu_item_id, quantity } => {
                AppError::with_message(ErrorCode::InvalidQuantity, message)
                    .with_detail("menu_item_id", menu_item_id)
                    .with_detail("quantity", quantity)
            }
            PricingError::InvalidAmount { field, .. } => {
                AppError::with_message(ErrorCode::InvalidAmount, message).with_detail("field", field)
            }
        }
    }
}

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_default()
}

#[inline]
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

pub fn validate_quantity(menu_item_id: i64, quantity: i64) -> Result<(), PricingError> {
    if (1..=MAX_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        Err(PricingError::InvalidQuantity {
            menu_item_id,
            quantity,
        })
    }
}

/// Finite, non-negative and at most `MAX_AMOUNT`
pub fn validate_amount(field: &'static str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() && (0.0..=MAX_AMOUNT).contains(&value) {
        Ok(())
    } else {
        Err(PricingError::InvalidAmount { field, value })
    }
}

/// One resolved order line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineInput {
    pub menu_item_id: i64,
    pub unit_price: f64,
    pub quantity: i64,
}

/// Priced order
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Line totals in input order
    pub line_totals: Vec<f64>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub delivery_fee: f64,
    pub tip_amount: f64,
    pub total_amount: f64,
}

pub fn line_total(unit_price: f64, quantity: i64) -> Decimal {
    round(to_decimal(unit_price) * Decimal::from(quantity))
}

pub fn tax_for(subtotal: Decimal) -> Decimal {
    round(subtotal * TAX_RATE)
}

/// `subtotal + delivery_fee + tax + tip`
pub fn total_for(subtotal: f64, delivery_fee: f64, tax_amount: f64, tip_amount: f64) -> f64 {
    to_f64(to_decimal(subtotal) + to_decimal(delivery_fee) + to_decimal(tax_amount) + to_decimal(tip_amount))
}

/// Price an order: line totals, subtotal, flat tax, fee and tip
pub fn quote(lines: &[LineInput], delivery_fee: f64, tip_amount: f64) -> Result<Quote, PricingError> {
    if lines.is_empty() {
        return Err(PricingError::Empty);
    }
    validate_amount("delivery_fee", delivery_fee)?;
    validate_amount("tip_amount", tip_amount)?;

    let mut subtotal = Decimal::ZERO;
    let mut line_totals = Vec::with_capacity(lines.len());
    for line in lines {
        validate_quantity(line.menu_item_id, line.quantity)?;
        validate_amount("unit_price", line.unit_price)?;
        let total = line_total(line.unit_price, line.quantity);
        subtotal += total;
        line_totals.push(to_f64(total));
    }

    let tax = tax_for(subtotal);
    let fee = to_decimal(delivery_fee);
    let tip = to_decimal(tip_amount);

    Ok(Quote {
        line_totals,
        subtotal: to_f64(subtotal),
        tax_amount: to_f64(tax),
        delivery_fee: to_f64(fee),
        tip_amount: to_f64(tip),
        total_amount: to_f64(subtotal + tax + fee + tip),
    })
}
