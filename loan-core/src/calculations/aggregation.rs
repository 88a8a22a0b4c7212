//! Combining several income sources under PAYE.
//!
//! Payroll applies the threshold per employer and per pay period. Jobs at the
//! same employer are run through one payroll, so their pay is combined before
//! the threshold is applied; jobs at different employers each get their own
//! threshold. The borrower's real liability is set on total annual income, so
//! per-employer deductions can fall short of it when several small jobs add
//! up to more than the threshold. That shortfall is reported as the
//! underpayment, not treated as an error.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::non_negative;
use crate::calculations::threshold::{annual_repayment, period_repayment};
use crate::models::{IncomeSource, LoanPlan, PayFrequency};

/// Jobs sharing one payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerGroup {
    /// Employer name, or `None` for a job with no employer recorded.
    pub employer: Option<String>,
    pub job_ids: Vec<u32>,
    pub frequency: PayFrequency,
    pub combined_period_pay: Decimal,
    pub period_threshold: Decimal,
    pub period_deduction: Decimal,
    pub combined_annual_income: Decimal,
    pub annual_deduction: Decimal,
}

/// A job's pro-rata share of its payroll's deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDeduction {
    pub id: u32,
    pub label: String,
    pub employer: Option<String>,
    pub annual_income: Decimal,
    pub annual_deduction: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub groups: Vec<EmployerGroup>,
    pub jobs: Vec<JobDeduction>,
    pub total_annual_income: Decimal,
    /// Sum of all payroll deductions over the year.
    pub paye_collected: Decimal,
    /// Liability on total annual income against the annual threshold.
    pub true_liability: Decimal,
    /// `max(0, true_liability − paye_collected)`.
    pub underpayment: Decimal,
    /// `max(0, paye_collected − true_liability)`.
    pub overcollected: Decimal,
}

/// Runs `sources` through PAYE for `plan` and reconciles against the
/// annual liability.
///
/// A group takes the pay frequency of its first job; pay from jobs on other
/// frequencies is converted through its annual value.
pub fn aggregate(
    plan: &LoanPlan,
    sources: &[IncomeSource],
) -> AggregationResult {
    let mut grouped: BTreeMap<GroupKey, Vec<&IncomeSource>> = BTreeMap::new();
    for source in sources {
        let key = match &source.employer {
            Some(name) if !name.trim().is_empty() => GroupKey::Employer(name.trim().to_string()),
            _ => GroupKey::Solo(source.id),
        };
        grouped.entry(key).or_default().push(source);
    }

    let mut groups = Vec::with_capacity(grouped.len());
    let mut jobs = Vec::with_capacity(sources.len());

    for (key, members) in grouped {
        let frequency = members[0].frequency;
        let periods = Decimal::from(frequency.periods_per_year());
        let combined_annual_income: Decimal = members.iter().map(|s| s.annual_amount()).sum();
        let combined_period_pay = combined_annual_income / periods;
        let period_deduction = period_repayment(plan, combined_period_pay, frequency);
        let annual_deduction = period_deduction * periods;

        for source in &members {
            jobs.push(JobDeduction {
                id: source.id,
                label: source.label.clone(),
                employer: source.employer.clone(),
                annual_income: source.annual_amount(),
                annual_deduction: pro_rata_share(
                    source.annual_amount(),
                    combined_annual_income,
                    annual_deduction,
                ),
            });
        }

        groups.push(EmployerGroup {
            employer: match key {
                GroupKey::Employer(name) => Some(name),
                GroupKey::Solo(_) => None,
            },
            job_ids: members.iter().map(|s| s.id).collect(),
            frequency,
            combined_period_pay,
            period_threshold: frequency.threshold_for(plan),
            period_deduction,
            combined_annual_income,
            annual_deduction,
        });
    }
    jobs.sort_by_key(|j| j.id);

    let total_annual_income: Decimal = groups.iter().map(|g| g.combined_annual_income).sum();
    let paye_collected: Decimal = groups.iter().map(|g| g.annual_deduction).sum();
    let true_liability = annual_repayment(plan, total_annual_income);

    debug!(
        plan = %plan.plan,
        groups = groups.len(),
        total_annual_income = %total_annual_income,
        paye_collected = %paye_collected,
        true_liability = %true_liability,
        "aggregated income sources"
    );

    AggregationResult {
        groups,
        jobs,
        total_annual_income,
        paye_collected,
        true_liability,
        underpayment: non_negative(true_liability - paye_collected),
        overcollected: non_negative(paye_collected - true_liability),
    }
}

/// `(part / whole) × amount`, or zero when `whole` is zero.
pub fn pro_rata_share(
    part: Decimal,
    whole: Decimal,
    amount: Decimal,
) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * amount
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    Employer(String),
    Solo(u32),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::PlanId;
    use crate::reference::builtin;

    fn plan2() -> LoanPlan {
        builtin::tax_year_2025().plan(PlanId::Plan2).cloned().unwrap()
    }

    fn monthly(
        id: u32,
        amount: Decimal,
    ) -> IncomeSource {
        IncomeSource::new(id, format!("job {id}"), amount, PayFrequency::Monthly)
    }

    #[test]
    fn two_small_jobs_at_different_employers_underpay() {
        let sources = vec![
            monthly(1, dec!(2000)).with_employer("Cafe"),
            monthly(2, dec!(2000)).with_employer("Shop"),
        ];

        let result = aggregate(&plan2(), &sources);

        assert_eq!(result.groups.len(), 2);
        assert!(result.jobs.iter().all(|j| j.annual_deduction == dec!(0)));
        assert_eq!(result.total_annual_income, dec!(48000));
        assert_eq!(result.paye_collected, dec!(0));
        assert_eq!(result.true_liability, dec!(1757.70));
        assert_eq!(result.underpayment, dec!(1757.70));
    }

    #[test]
    fn same_employer_jobs_share_one_threshold() {
        let sources = vec![
            monthly(1, dec!(2000)).with_employer("Council"),
            monthly(2, dec!(2000)).with_employer("Council"),
        ];

        let result = aggregate(&plan2(), &sources);

        assert_eq!(result.groups.len(), 1);
        let group = &result.groups[0];
        assert_eq!(group.combined_period_pay, dec!(4000));
        // (4000 - 2373) * 0.09 = 146.43 per month
        assert_eq!(group.period_deduction, dec!(146.43));
        assert_eq!(group.annual_deduction, dec!(1757.16));
        assert_eq!(result.underpayment, dec!(0.54));
    }

    #[test]
    fn equal_jobs_split_group_deduction_evenly() {
        let sources = vec![
            monthly(1, dec!(2000)).with_employer("Council"),
            monthly(2, dec!(2000)).with_employer("Council"),
        ];

        let result = aggregate(&plan2(), &sources);

        assert_eq!(result.jobs[0].annual_deduction, dec!(878.58));
        assert_eq!(result.jobs[1].annual_deduction, dec!(878.58));
    }

    #[test]
    fn jobs_without_employer_are_independent() {
        let sources = vec![monthly(1, dec!(2000)), monthly(2, dec!(2000))];

        let result = aggregate(&plan2(), &sources);

        assert_eq!(result.groups.len(), 2);
        assert!(result.groups.iter().all(|g| g.employer.is_none()));
    }

    #[test]
    fn weekly_job_uses_weekly_threshold() {
        let sources = vec![IncomeSource::new(1, "warehouse", dec!(600), PayFrequency::Weekly)];

        let result = aggregate(&plan2(), &sources);

        // (600 - 547) * 0.09 = 4.77 a week
        assert_eq!(result.groups[0].period_deduction, dec!(4.77));
        assert_eq!(result.paye_collected, dec!(248.04));
        // 31200 - 28470 = 2730 * 0.09 = 245.70
        assert_eq!(result.true_liability, dec!(245.70));
        assert_eq!(result.overcollected, dec!(2.34));
        assert_eq!(result.underpayment, dec!(0));
    }

    #[test]
    fn empty_sources_owe_nothing() {
        let result = aggregate(&plan2(), &[]);

        assert_eq!(result.total_annual_income, dec!(0));
        assert_eq!(result.underpayment, dec!(0));
        assert!(result.jobs.is_empty());
    }

    #[test]
    fn pro_rata_share_handles_zero_whole() {
        assert_eq!(pro_rata_share(dec!(0), dec!(0), dec!(100)), dec!(0));
    }

    proptest! {
        #[test]
        fn prop_job_shares_sum_to_group_deduction(
            pays in proptest::collection::vec(0i64..1_000_000, 1..6),
        ) {
            let sources: Vec<IncomeSource> = pays
                .iter()
                .enumerate()
                .map(|(i, &p)| monthly(i as u32, Decimal::new(p, 2)).with_employer("Acme"))
                .collect();

            let result = aggregate(&plan2(), &sources);

            let shares: Decimal = result.jobs.iter().map(|j| j.annual_deduction).sum();
            let diff = (shares - result.groups[0].annual_deduction).abs();
            prop_assert!(diff < dec!(0.000000001), "diff {}", diff);
        }

        #[test]
        fn prop_underpayment_and_overcollection_are_exclusive(
            a in 0i64..6_000,
            b in 0i64..6_000,
        ) {
            let sources = vec![
                monthly(1, Decimal::from(a)).with_employer("A"),
                monthly(2, Decimal::from(b)).with_employer("B"),
            ];

            let result = aggregate(&plan2(), &sources);

            prop_assert!(result.underpayment.is_zero() || result.overcollected.is_zero());
            prop_assert_eq!(
                result.paye_collected + result.underpayment - result.overcollected,
                result.true_liability
            );
        }
    }
}
