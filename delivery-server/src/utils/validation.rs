//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: person, restaurant, menu item, category, cuisine
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, delivery / special instructions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, postal code, payment method
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

pub const MIN_PASSWORD_LEN: usize = 5;
/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

pub const MAX_ADDRESS_LEN: usize = 500;

/// Upper bound for any minutes field (one day)
pub const MAX_MINUTES: i64 = 1440;

pub const MAX_MONEY: f64 = 1_000_000.0;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Trim and lower-case an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Single `@` with non-empty local part and a dotted domain
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let mut parts = email.split('@');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.chars().any(char::is_whitespace)
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::validation("email is not a valid address").with_detail("field", "email"))
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::validation(format!(
            "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Finite, non-negative, at most `MAX_MONEY`
pub fn validate_money(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || !(0.0..=MAX_MONEY).contains(&value) {
        return Err(AppError::validation(format!(
            "{field} must be between 0 and {MAX_MONEY}, got {value}"
        )));
    }
    Ok(())
}

pub fn validate_range(value: i64, field: &str, min: i64, max: i64) -> Result<(), AppError> {
    if !(min..=max).contains(&value) {
        return Err(AppError::validation(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

pub fn validate_minutes(value: i64, field: &str) -> Result<(), AppError> {
    validate_range(value, field, 0, MAX_MINUTES)
}

pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), AppError> {
    if let Some(lat) = latitude
        && !(lat.is_finite() && (-90.0..=90.0).contains(&lat))
    {
        return Err(AppError::validation(format!(
            "latitude must be between -90 and 90, got {lat}"
        )));
    }
    if let Some(lng) = longitude
        && !(lng.is_finite() && (-180.0..=180.0).contains(&lng))
    {
        return Err(AppError::validation(format!(
            "longitude must be between -180 and 180, got {lng}"
        )));
    }
    Ok(())
}
