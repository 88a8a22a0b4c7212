//! Percentage-above-threshold repayments.
//!
//! Every student loan deduction is a flat rate on the slice of income above
//! a threshold, with income and threshold expressed over the same period.

use rust_decimal::Decimal;

use crate::calculations::common::non_negative;
use crate::models::{LoanPlan, PayFrequency};

/// Income above `threshold`, never negative.
pub fn income_above_threshold(
    income: Decimal,
    threshold: Decimal,
) -> Decimal {
    non_negative(non_negative(income) - threshold)
}

/// `max(0, income − threshold) × rate`, unrounded.
///
/// Negative income is treated as zero income.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::threshold::threshold_repayment;
///
/// assert_eq!(threshold_repayment(dec!(2373), dec!(2373), dec!(0.09)), dec!(0));
/// assert_eq!(threshold_repayment(dec!(3000), dec!(2373), dec!(0.09)), dec!(56.43));
/// ```
pub fn threshold_repayment(
    income: Decimal,
    threshold: Decimal,
    rate: Decimal,
) -> Decimal {
    income_above_threshold(income, threshold) * rate
}

/// Deduction for one pay period of `frequency` under `plan`.
pub fn period_repayment(
    plan: &LoanPlan,
    pay: Decimal,
    frequency: PayFrequency,
) -> Decimal {
    threshold_repayment(pay, frequency.threshold_for(plan), plan.repayment_rate)
}

/// Annual liability for `plan` on a full year's income.
pub fn annual_repayment(
    plan: &LoanPlan,
    annual_income: Decimal,
) -> Decimal {
    threshold_repayment(annual_income, plan.annual_threshold, plan.repayment_rate)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::reference::builtin;
    use crate::models::PlanId;

    fn plan2() -> LoanPlan {
        builtin::tax_year_2025().plan(PlanId::Plan2).cloned().unwrap()
    }

    #[test]
    fn zero_below_threshold() {
        assert_eq!(threshold_repayment(dec!(20000), dec!(28470), dec!(0.09)), dec!(0));
    }

    #[test]
    fn zero_exactly_at_threshold() {
        assert_eq!(threshold_repayment(dec!(28470), dec!(28470), dec!(0.09)), dec!(0));
    }

    #[test]
    fn just_above_threshold_is_epsilon_times_rate() {
        let result = threshold_repayment(dec!(28470.01), dec!(28470), dec!(0.09));

        assert_eq!(result, dec!(0.0009));
    }

    #[test]
    fn negative_income_is_zero_income() {
        assert_eq!(threshold_repayment(dec!(-5000), dec!(0), dec!(0.09)), dec!(0));
    }

    #[test]
    fn annual_repayment_uses_annual_threshold() {
        // (48000 - 28470) * 0.09 = 1757.70
        assert_eq!(annual_repayment(&plan2(), dec!(48000)), dec!(1757.70));
    }

    #[test]
    fn period_repayment_uses_period_threshold() {
        let plan = plan2();

        // (600 - 547) * 0.09
        assert_eq!(period_repayment(&plan, dec!(600), PayFrequency::Weekly), dec!(4.77));
        // (3000 - 2373) * 0.09
        assert_eq!(period_repayment(&plan, dec!(3000), PayFrequency::Monthly), dec!(56.43));
        assert_eq!(period_repayment(&plan, dec!(2000), PayFrequency::Monthly), dec!(0));
    }

    fn pence() -> impl Strategy<Value = Decimal> {
        (0i64..20_000_000).prop_map(|p| Decimal::new(p, 2))
    }

    proptest! {
        #[test]
        fn prop_repayment_is_monotonic(a in pence(), b in pence()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

            let r_lo = threshold_repayment(lo, dec!(28470), dec!(0.09));
            let r_hi = threshold_repayment(hi, dec!(28470), dec!(0.09));

            prop_assert!(r_lo <= r_hi);
        }

        #[test]
        fn prop_repayment_zero_at_or_below_threshold(income in pence()) {
            let threshold = income + dec!(0.01);

            prop_assert_eq!(threshold_repayment(income, threshold, dec!(0.09)), Decimal::ZERO);
            prop_assert_eq!(threshold_repayment(income, income, dec!(0.09)), Decimal::ZERO);
        }

        #[test]
        fn prop_repayment_is_epsilon_times_rate(epsilon in pence()) {
            let threshold = dec!(28470);

            let result = threshold_repayment(threshold + epsilon, threshold, dec!(0.09));

            prop_assert_eq!(result, epsilon * dec!(0.09));
        }
    }
}
