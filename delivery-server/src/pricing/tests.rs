use super::*;

fn line(id: i64, price: f64, qty: i64) -> LineInput {
    LineInput {
        menu_item_id: id,
        unit_price: price,
        quantity: qty,
    }
}

#[test]
fn test_two_of_ten() {
    let q = quote(&[line(1, 10.00, 2)], 2.99, 0.0).unwrap();
    assert_eq!(q.line_totals, vec![20.00]);
    assert_eq!(q.subtotal, 20.00);
    assert_eq!(q.tax_amount, 1.60);
    assert_eq!(q.delivery_fee, 2.99);
    assert_eq!(q.total_amount, 24.59);
}

#[test]
fn test_total_matches_formula() {
    let lines = [line(1, 12.49, 3), line(2, 0.99, 7), line(3, 8.25, 1)];
    let q = quote(&lines, 4.50, 0.0).unwrap();

    let sum: f64 = lines.iter().map(|l| l.unit_price * l.quantity as f64).sum();
    let expected = sum * 1.08 + 4.50;
    assert!((q.total_amount - expected).abs() < 0.02, "{} vs {}", q.total_amount, expected);
    assert_eq!(q.line_totals.len(), 3);
}

#[test]
fn test_float_noise_is_rounded_away() {
    // 0.1 + 0.2 style noise must not show up in stored amounts
    let q = quote(&[line(1, 0.1, 1), line(2, 0.2, 1)], 0.0, 0.0).unwrap();
    assert_eq!(q.subtotal, 0.30);
    assert_eq!(q.tax_amount, 0.02);
    assert_eq!(q.total_amount, 0.32);
}

#[test]
fn test_tip_is_added() {
    let q = quote(&[line(1, 10.00, 1)], 0.0, 3.00).unwrap();
    assert_eq!(q.tip_amount, 3.00);
    assert_eq!(q.total_amount, 13.80);
}

#[test]
fn test_tax_rounds_half_away_from_zero() {
    // 10.15 * 0.08 = 0.812 -> 0.81, 10.5625 * 0.08 = 0.845 -> 0.85
    assert_eq!(to_f64(tax_for(to_decimal(10.15))), 0.81);
    assert_eq!(to_f64(tax_for(Decimal::new(105625, 4))), 0.85);
}

#[test]
fn test_empty_order_rejected() {
    assert_eq!(quote(&[], 2.99, 0.0), Err(PricingError::Empty));
}

#[test]
fn test_quantity_bounds() {
    assert!(validate_quantity(1, 1).is_ok());
    assert!(validate_quantity(1, MAX_QUANTITY).is_ok());
    assert_eq!(
        quote(&[line(7, 1.0, 0)], 0.0, 0.0),
        Err(PricingError::InvalidQuantity {
            menu_item_id: 7,
            quantity: 0
        })
    );
    assert!(quote(&[line(7, 1.0, 100)], 0.0, 0.0).is_err());
    assert!(quote(&[line(7, 1.0, -2)], 0.0, 0.0).is_err());
}

#[test]
fn test_amount_validation() {
    assert!(validate_amount("tip_amount", 0.0).is_ok());
    assert!(validate_amount("tip_amount", -0.01).is_err());
    assert!(validate_amount("tip_amount", f64::NAN).is_err());
    assert!(validate_amount("tip_amount", f64::INFINITY).is_err());
    assert!(validate_amount("tip_amount", MAX_AMOUNT + 1.0).is_err());
    assert!(quote(&[line(1, 1.0, 1)], 0.0, -5.0).is_err());
}

#[test]
fn test_total_for_recomputes_with_new_tip() {
    assert_eq!(total_for(20.00, 2.99, 1.60, 0.0), 24.59);
    assert_eq!(total_for(20.00, 2.99, 1.60, 5.00), 29.59);
}

#[test]
fn test_pricing_error_to_app_error() {
    let err: AppError = PricingError::Empty.into();
    assert_eq!(err.code, ErrorCode::OrderEmpty);

    let err: AppError = PricingError::InvalidQuantity {
        menu_item_id: 3,
        quantity: 0,
    }
    .into();
    assert_eq!(err.code, ErrorCode::InvalidQuantity);
    assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
}
