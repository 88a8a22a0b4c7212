//! Marginal bracket accumulation for income tax and National Insurance,
//! and the income-linked interest ramp used by Plan 2.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::non_negative;
use crate::models::{Plan2InterestConfig, TaxBracket};

/// The part of a total charged within one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub taxable: Decimal,
    pub charge: Decimal,
}

/// `Σ max(0, min(income, max) − min) × rate` over `brackets`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::brackets::accumulate;
/// use loan_core::reference::builtin;
///
/// let config = builtin::tax_year_2024();
///
/// assert_eq!(accumulate(&config.income_tax, dec!(40000)), dec!(5486.00));
/// ```
pub fn accumulate(
    brackets: &[TaxBracket],
    income: Decimal,
) -> Decimal {
    let income = non_negative(income);
    brackets
        .iter()
        .map(|b| b.slice_of(income) * b.rate)
        .sum()
}

/// Per-bracket view of [`accumulate`], one entry per bracket.
pub fn breakdown(
    brackets: &[TaxBracket],
    income: Decimal,
) -> Vec<BracketSlice> {
    let income = non_negative(income);
    brackets
        .iter()
        .map(|b| {
            let taxable = b.slice_of(income);
            BracketSlice {
                min_income: b.min_income,
                max_income: b.max_income,
                rate: b.rate,
                taxable,
                charge: taxable * b.rate,
            }
        })
        .collect()
}

/// Plan 2 interest rate for an annual income.
///
/// RPI at or below the lower threshold, RPI plus the full premium at or above
/// the upper threshold, and a straight line between them.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::brackets::income_linked_rate;
/// use loan_core::models::Plan2InterestConfig;
///
/// let config = Plan2InterestConfig {
///     lower_threshold: dec!(28470),
///     upper_threshold: dec!(51245),
///     rpi: dec!(0.032),
///     max_premium: dec!(0.03),
/// };
///
/// assert_eq!(income_linked_rate(&config, dec!(20000)), dec!(0.032));
/// assert_eq!(income_linked_rate(&config, dec!(60000)), dec!(0.062));
/// ```
pub fn income_linked_rate(
    config: &Plan2InterestConfig,
    income: Decimal,
) -> Decimal {
    let income = non_negative(income);
    if income <= config.lower_threshold {
        return config.rpi;
    }
    if income >= config.upper_threshold {
        return config.rpi + config.max_premium;
    }
    let span = config.upper_threshold - config.lower_threshold;
    config.rpi + (income - config.lower_threshold) / span * config.max_premium
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::BracketKind;
    use crate::reference::builtin;

    fn flat(rate: Decimal) -> Vec<TaxBracket> {
        vec![TaxBracket {
            kind: BracketKind::IncomeTax,
            min_income: dec!(0),
            max_income: None,
            rate,
        }]
    }

    fn interest() -> Plan2InterestConfig {
        builtin::tax_year_2025().plan2_interest
    }

    // =========================================================================
    // accumulate tests
    // =========================================================================

    #[test]
    fn basic_rate_income_tax() {
        let config = builtin::tax_year_2025();

        // (40000 - 12570) * 0.20
        assert_eq!(accumulate(&config.income_tax, dec!(40000)), dec!(5486.00));
    }

    #[test]
    fn higher_rate_income_tax() {
        let config = builtin::tax_year_2025();

        // 37700 * 0.20 + (60000 - 50270) * 0.40 = 7540 + 3892
        assert_eq!(accumulate(&config.income_tax, dec!(60000)), dec!(11432.00));
    }

    #[test]
    fn additional_rate_income_tax() {
        let config = builtin::tax_year_2025();

        // 7540 + 74870 * 0.40 + 24860 * 0.45 = 7540 + 29948 + 11187
        assert_eq!(accumulate(&config.income_tax, dec!(150000)), dec!(48675.00));
    }

    #[test]
    fn national_insurance_main_and_upper_rates() {
        let config = builtin::tax_year_2025();

        // 37700 * 0.08 + 9730 * 0.02 = 3016 + 194.60
        assert_eq!(accumulate(&config.national_insurance, dec!(60000)), dec!(3210.60));
    }

    #[test]
    fn nothing_due_within_allowance() {
        let config = builtin::tax_year_2025();

        assert_eq!(accumulate(&config.income_tax, dec!(12570)), dec!(0));
        assert_eq!(accumulate(&config.income_tax, dec!(-100)), dec!(0));
    }

    #[test]
    fn breakdown_sums_to_accumulate() {
        let config = builtin::tax_year_2025();

        let slices = breakdown(&config.income_tax, dec!(150000));
        let total: Decimal = slices.iter().map(|s| s.charge).sum();

        assert_eq!(slices.len(), 4);
        assert_eq!(slices[1].taxable, dec!(37700));
        assert_eq!(total, accumulate(&config.income_tax, dec!(150000)));
    }

    // =========================================================================
    // income_linked_rate tests
    // =========================================================================

    #[test]
    fn interest_is_rpi_at_lower_threshold() {
        assert_eq!(income_linked_rate(&interest(), dec!(28470)), dec!(0.032));
    }

    #[test]
    fn interest_is_capped_at_upper_threshold() {
        assert_eq!(income_linked_rate(&interest(), dec!(51245)), dec!(0.062));
    }

    #[test]
    fn interest_is_linear_between_thresholds() {
        let config = interest();
        let midpoint = (config.lower_threshold + config.upper_threshold) / dec!(2);

        assert_eq!(income_linked_rate(&config, midpoint), dec!(0.047));
    }

    fn pounds() -> impl Strategy<Value = Decimal> {
        (0i64..500_000).prop_map(Decimal::from)
    }

    proptest! {
        #[test]
        fn prop_single_bracket_matches_flat_rate(income in pounds(), pct in 0i64..=100) {
            let rate = Decimal::new(pct, 2);

            prop_assert_eq!(accumulate(&flat(rate), income), income * rate);
        }

        #[test]
        fn prop_accumulate_is_non_decreasing(a in pounds(), b in pounds()) {
            let config = builtin::tax_year_2025();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

            prop_assert!(accumulate(&config.income_tax, lo) <= accumulate(&config.income_tax, hi));
            prop_assert!(
                accumulate(&config.national_insurance, lo)
                    <= accumulate(&config.national_insurance, hi)
            );
        }

        #[test]
        fn prop_income_linked_rate_stays_in_range(income in pounds()) {
            let config = interest();
            let rate = income_linked_rate(&config, income);

            prop_assert!(rate >= config.rpi);
            prop_assert!(rate <= config.rpi + config.max_premium);
        }
    }
}
