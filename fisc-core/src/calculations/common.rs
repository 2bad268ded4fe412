//! Common utility functions for tax calculations.
//!
//! This module provides the rounding conventions shared by the engines.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest whole currency unit, halves away from zero.
///
/// Payroll contributions are declared in whole lei.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisc_core::calculations::common::round_to_unit;
///
/// assert_eq!(round_to_unit(dec!(937.5)), dec!(938));
/// assert_eq!(round_to_unit(dec!(162.7)), dec!(163));
/// assert_eq!(round_to_unit(dec!(374.49)), dec!(374));
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisc_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Picks the highest tier (a minimum-wage multiple) that `amount` reaches and
/// returns the tier amount, or zero when below the lowest tier.
///
/// `tiers` must be in increasing order.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisc_core::calculations::common::pinned_tier_base;
///
/// let tiers = [dec!(6), dec!(12), dec!(24)];
/// assert_eq!(pinned_tier_base(dec!(20000), dec!(4050), &tiers), dec!(0));
/// assert_eq!(pinned_tier_base(dec!(50000), dec!(4050), &tiers), dec!(48600));
/// assert_eq!(pinned_tier_base(dec!(500000), dec!(4050), &tiers), dec!(97200));
/// ```
pub fn pinned_tier_base(
    amount: Decimal,
    minimum_wage: Decimal,
    tiers: &[Decimal],
) -> Decimal {
    tiers
        .iter()
        .rev()
        .map(|multiple| multiple * minimum_wage)
        .find(|threshold| amount >= *threshold)
        .unwrap_or(Decimal::ZERO)
}
