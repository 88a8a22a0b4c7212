//! Common utility functions for loan calculations.
//!
//! This module provides shared functionality used across the calculators:
//! display rounding and the permissive input coercion every calculator
//! relies on.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Calculations never round internally; this is for presenting results.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Largest amount a calculation accepts (one quadrillion pounds).
///
/// Anything larger is capped so that interest, annualisation and multi-year
/// projections stay well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Clamps negative amounts to zero.
///
/// Incomes, balances and sacrifices are never negative; a negative entry is
/// treated as "nothing" rather than rejected.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Coerces a caller-supplied amount into `0..=MAX_AMOUNT`.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::common::{MAX_AMOUNT, coerce_amount};
///
/// assert_eq!(coerce_amount(dec!(-5)), dec!(0));
/// assert_eq!(coerce_amount(dec!(28470)), dec!(28470));
/// assert_eq!(coerce_amount(Decimal::MAX), MAX_AMOUNT);
/// ```
pub fn coerce_amount(value: Decimal) -> Decimal {
    if value > MAX_AMOUNT {
        warn!(value = %value, "capping amount at {}", MAX_AMOUNT);
        return MAX_AMOUNT;
    }
    non_negative(value)
}

/// Parses a user-entered amount, falling back to zero.
///
/// Accepts a leading `£`, comma thousands separators and surrounding
/// whitespace. Empty input is zero; input that still fails to parse is zero
/// and logged, so a calculation can always proceed.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::common::parse_amount;
///
/// assert_eq!(parse_amount("£28,470"), dec!(28470));
/// assert_eq!(parse_amount(""), dec!(0));
/// assert_eq!(parse_amount("lots"), dec!(0));
/// ```
pub fn parse_amount(input: &str) -> Decimal {
    let normalized = input.trim().trim_start_matches('£').replace(',', "");
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .unwrap_or_else(|e| {
            warn!(input = %input, "treating unparseable amount as zero: {}", e);
            Decimal::ZERO
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(1757.704));

        assert_eq!(result, dec!(1757.70));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(213.525));

        assert_eq!(result, dec!(213.53));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-123.455));

        assert_eq!(result, dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_zero() {
        let result = round_half_up(dec!(0.00));

        assert_eq!(result, dec!(0.00));
    }

    // =========================================================================
    // non_negative / coerce_amount tests
    // =========================================================================

    #[test]
    fn non_negative_clamps_negative_to_zero() {
        assert_eq!(non_negative(dec!(-0.01)), dec!(0));
        assert_eq!(non_negative(dec!(42)), dec!(42));
    }

    #[test]
    fn coerce_amount_caps_at_maximum() {
        assert_eq!(coerce_amount(Decimal::MAX), MAX_AMOUNT);
        assert_eq!(coerce_amount(MAX_AMOUNT + dec!(0.01)), MAX_AMOUNT);
        assert_eq!(coerce_amount(MAX_AMOUNT), MAX_AMOUNT);
    }

    #[test]
    fn coerce_amount_clamps_negative_to_zero() {
        assert_eq!(coerce_amount(Decimal::MIN), dec!(0));
        assert_eq!(coerce_amount(dec!(-500)), dec!(0));
    }

    // =========================================================================
    // parse_amount tests
    // =========================================================================

    #[test]
    fn parse_amount_accepts_currency_formatting() {
        assert_eq!(parse_amount("£1,234.56"), dec!(1234.56));
        assert_eq!(parse_amount("  2000 "), dec!(2000));
    }

    #[test]
    fn parse_amount_treats_empty_as_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_treats_garbage_as_zero() {
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("12abc"), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_keeps_sign() {
        assert_eq!(parse_amount("-500"), dec!(-500));
    }

    #[test]
    fn parse_amount_accepts_scientific_notation() {
        assert_eq!(parse_amount("1e3"), dec!(1000));
    }
}
