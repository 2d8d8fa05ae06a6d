//! Money calculation utilities using rust_decimal for precision
//!
//! Sums are accumulated as `Decimal` and converted to `f64` only for
//! serialization, so totals do not depend on summation order.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite and negative values count as zero,
/// finite values beyond `Decimal::MAX` saturate
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    if value.is_sign_negative() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or_else(|| {
        if value.is_finite() {
            tracing::warn!(value = ?value, "f64 out of Decimal range in aggregation, saturating");
            Decimal::MAX
        } else {
            tracing::warn!(value = ?value, "Non-finite f64 in aggregation, defaulting to zero");
            Decimal::ZERO
        }
    })
}

/// `a + b`, saturating at `Decimal::MAX`
#[inline]
pub fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        tracing::warn!(lhs = %a, rhs = %b, "Decimal addition overflow in aggregation, saturating");
        Decimal::MAX
    })
}

/// Saturating sum of an iterator
pub fn sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, add)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// `qty x unit` with both operands clamped at zero
#[inline]
pub fn line_amount(qty: f64, unit: f64) -> Decimal {
    let (qty, unit) = (to_decimal(qty), to_decimal(unit));
    qty.checked_mul(unit).unwrap_or_else(|| {
        tracing::warn!(qty = %qty, unit = %unit, "Decimal multiplication overflow in aggregation, saturating");
        Decimal::MAX
    })
}

/// Share of `part` in `total` as a percentage, 0 when total is 0
pub fn percentage(part: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(total))
        .or_else(|| part.checked_div(total)?.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(0.0, to_f64)
}
