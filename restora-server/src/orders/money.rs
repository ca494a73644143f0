//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. 各金额字段先各自取 2dp，再用已取整的
//! 值求和，保证落库后 `final = total + tax + delivery − discount` 恒等。

use rust_decimal::prelude::*;

use crate::db::models::OrderItem;
use crate::utils::{AppError, AppResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Sales tax rate (10%)
pub const TAX_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Kitchen buffer added on top of the slowest line (minutes)
pub const PREPARATION_BUFFER_MINUTES: i32 = 5;

/// Maximum allowed price per item (€1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal, treating non-finite input as zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round to 2 decimal places, half-away-from-zero
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a snapshotted order line before totalling
pub fn validate_line(item: &OrderItem) -> AppResult<()> {
    require_finite(item.price, "price")?;
    if item.price < 0.0 {
        return Err(AppError::validation(format!(
            "price must be non-negative, got {}",
            item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.price
        )));
    }
    if item.quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }
    Ok(())
}

/// Order money fields derived from the lines
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub total_amount: f64,
    pub tax_amount: f64,
    pub delivery_fee: f64,
    pub discount_amount: f64,
    pub final_amount: f64,
}

/// Σ price × quantity over the lines
pub fn line_total(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| to_decimal(item.price) * Decimal::from(item.quantity))
        .sum()
}

/// Compute the full money block for an order
///
/// 折扣金额由优惠券层先行裁剪，这里不再二次判断。
pub fn compute_totals(
    items: &[OrderItem],
    delivery_fee: f64,
    discount_amount: f64,
) -> AppResult<OrderTotals> {
    for item in items {
        validate_line(item)?;
    }
    require_finite(delivery_fee, "delivery_fee")?;
    require_finite(discount_amount, "discount_amount")?;
    if delivery_fee < 0.0 {
        return Err(AppError::validation("delivery_fee must be non-negative"));
    }
    if discount_amount < 0.0 {
        return Err(AppError::validation("discount_amount must be non-negative"));
    }

    let total = round2(line_total(items));
    let tax = round2(total * TAX_RATE);
    let delivery = round2(to_decimal(delivery_fee));
    let discount = round2(to_decimal(discount_amount));
    let final_amount = total + tax + delivery - discount;

    Ok(OrderTotals {
        total_amount: to_f64(total),
        tax_amount: to_f64(tax),
        delivery_fee: to_f64(delivery),
        discount_amount: to_f64(discount),
        final_amount: to_f64(final_amount),
    })
}

/// 预计完成分钟数 = 最慢一道菜的备餐时间 + 出餐缓冲
pub fn estimate_minutes(preparation_times: &[i32]) -> i32 {
    preparation_times.iter().copied().max().unwrap_or(0) + PREPARATION_BUFFER_MINUTES
}
