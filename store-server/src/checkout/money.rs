//! Money calculation utilities using rust_decimal for precision
//!
//! All discount and subtotal arithmetic is done with `Decimal` internally,
//! then converted to `f64` for storage/serialization.

use rust_decimal::prelude::*;
use shared::error::AppError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum allowed quantity per cart line
pub const MAX_LINE_QUANTITY: i64 = 9999;

fn to_decimal(value: f64, field: &str) -> Result<Decimal, AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::validation(format!("{field} is not representable: {value}")))
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Unit price charged = list price − (list price × discount / 100), 2 dp
pub fn discounted_unit_price(list_price: f64, discount_percentage: f64) -> Result<f64, AppError> {
    if list_price < 0.0 || list_price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "price out of range: {list_price}"
        )));
    }
    if !(0.0..=100.0).contains(&discount_percentage) {
        return Err(AppError::new(shared::error::ErrorCode::InvalidDiscount)
            .with_detail("discount_percentage", discount_percentage));
    }

    let price = to_decimal(list_price, "price")?;
    let discount = to_decimal(discount_percentage, "discount_percentage")?;
    let hundred = Decimal::from(100);

    let unit = price - (price * discount / hundred);
    round_money(unit)
        .to_f64()
        .ok_or_else(|| AppError::internal("unit price conversion failed"))
}

/// Line total = unit price × quantity, 2 dp
pub fn line_total(unit_price: f64, quantity: i64) -> Result<f64, AppError> {
    let unit = to_decimal(unit_price, "unit_price")?;
    let total = unit * Decimal::from(quantity);
    round_money(total)
        .to_f64()
        .ok_or_else(|| AppError::internal("line total conversion failed"))
}

/// Subtotal = Σ unit price × quantity over all lines, 2 dp
pub fn subtotal(lines: &[(f64, i64)]) -> Result<f64, AppError> {
    let mut sum = Decimal::ZERO;
    for (unit_price, quantity) in lines {
        let unit = to_decimal(*unit_price, "unit_price")?;
        sum += unit * Decimal::from(*quantity);
    }
    round_money(sum)
        .to_f64()
        .ok_or_else(|| AppError::internal("subtotal conversion failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_applied_once() {
        // 100 with 10% off → 90.00
        assert_eq!(discounted_unit_price(100.0, 10.0).unwrap(), 90.0);
        // no discount
        assert_eq!(discounted_unit_price(49.99, 0.0).unwrap(), 49.99);
        // full discount
        assert_eq!(discounted_unit_price(250.0, 100.0).unwrap(), 0.0);
    }

    #[test]
    fn test_rounding_half_up() {
        // 33.335 → 33.34 (midpoint away from zero)
        assert_eq!(discounted_unit_price(66.67, 50.0).unwrap(), 33.34);
        // 19.99 * 15% off = 16.9915 → 16.99
        assert_eq!(discounted_unit_price(19.99, 15.0).unwrap(), 16.99);
    }

    #[test]
    fn test_subtotal_from_spec_example() {
        // cart [{price: 100, discount: 10, qty: 2}] → 180.00
        let unit = discounted_unit_price(100.0, 10.0).unwrap();
        assert_eq!(subtotal(&[(unit, 2)]).unwrap(), 180.0);
    }

    #[test]
    fn test_subtotal_multiple_lines() {
        let lines = [(90.0, 2), (16.99, 1), (0.5, 3)];
        assert_eq!(subtotal(&lines).unwrap(), 198.49);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(discounted_unit_price(f64::NAN, 0.0).is_err());
        assert!(discounted_unit_price(-1.0, 0.0).is_err());
        assert!(discounted_unit_price(100.0, 101.0).is_err());
        assert!(discounted_unit_price(100.0, -0.1).is_err());
    }
}
