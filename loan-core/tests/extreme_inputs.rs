//! Calculators given the largest values a `Decimal` can hold still return
//! numbers, with inputs capped at `MAX_AMOUNT`.

use loan_core::calculations::calculators::{
    InterestCalculator, InterestInput, MaintenanceCalculator, MaintenanceInput,
    PartYearCalculator, PartYearInput, PayeCalculator, PayeInput, RepaymentCalculator,
    RepaymentInput, SalarySacrificeCalculator, SalarySacrificeInput,
};
use loan_core::calculations::common::MAX_AMOUNT;
use loan_core::reference::builtin;
use loan_core::{IncomeSource, LivingSituation, PayFrequency, PlanId, Region};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn repayment_with_maximum_salary_and_balance() {
    let config = builtin::tax_year_2025();
    let input = RepaymentInput::new(PlanId::Plan2, Decimal::MAX, Decimal::MAX)
        .with_growth(Decimal::MAX)
        .with_postgraduate(Decimal::MAX);

    let result = RepaymentCalculator::new(&config).calculate(&input).unwrap();

    assert_eq!(result.salary, MAX_AMOUNT);
    assert_eq!(result.primary.projection.opening_balance, MAX_AMOUNT);
    assert!(result.primary.projection.payoff_month.is_some());
    assert!(result.postgraduate.is_some());
}

#[test]
fn part_year_with_maximum_balance_and_income() {
    let config = builtin::tax_year_2025();
    let input = PartYearInput::from_pattern(PlanId::Plan2, Decimal::MAX, Decimal::MAX, &[true; 12]);

    let result = PartYearCalculator::new(&config).calculate(&input).unwrap();

    assert_eq!(result.annual_income, MAX_AMOUNT * dec!(12));
    assert!(!result.eligible_for_refund);
}

#[test]
fn paye_with_maximum_weekly_pay() {
    let config = builtin::tax_year_2025();
    let input = PayeInput {
        plan: PlanId::Plan2,
        include_postgraduate: true,
        sources: vec![
            IncomeSource::new(1, "Job 1", dec!(9999999999999999999999999999), PayFrequency::Weekly),
            IncomeSource::new(2, "Job 2", Decimal::MAX, PayFrequency::Weekly).with_employer("Bar Ltd"),
            IncomeSource::new(3, "Job 3", Decimal::MAX, PayFrequency::Monthly).with_employer("Bar Ltd"),
        ],
    };

    let result = PayeCalculator::new(&config).calculate(&input).unwrap();

    let aggregation = &result.plans[0].aggregation;
    assert_eq!(
        aggregation.total_annual_income,
        MAX_AMOUNT * dec!(52) + MAX_AMOUNT * dec!(52) + MAX_AMOUNT * dec!(12)
    );
    // Two payrolls each allow a full threshold.
    assert!(result.requires_self_assessment);
}

#[test]
fn single_payslip_of_maximum_pay() {
    let config = builtin::tax_year_2025();

    let result = PayeCalculator::new(&config)
        .period_deduction(PlanId::Plan2, Decimal::MAX, PayFrequency::Weekly)
        .unwrap();

    assert_eq!(result.pay, MAX_AMOUNT);
}

#[test]
fn interest_sacrifice_and_maintenance_with_maximum_inputs() {
    let config = builtin::tax_year_2025();

    let interest = InterestCalculator::new(&config).calculate(&InterestInput {
        balance: Decimal::MAX,
        annual_income: Decimal::MAX,
    });
    let sacrifice = SalarySacrificeCalculator::new(&config)
        .calculate(&SalarySacrificeInput {
            plan: PlanId::Plan5,
            include_postgraduate: true,
            gross_salary: Decimal::MAX,
            sacrifice: Decimal::MAX,
        })
        .unwrap();
    let maintenance = MaintenanceCalculator::new(&config)
        .calculate(&MaintenanceInput {
            region: Region::England,
            living: LivingSituation::AwayLondon,
            household_income: Decimal::MAX,
        })
        .unwrap();

    assert_eq!(interest.balance, MAX_AMOUNT);
    assert_eq!(sacrifice.after.salary, Decimal::ZERO);
    assert!(!sacrifice.critical_warning);
    assert_eq!(maintenance.annual_amount, maintenance.min_amount);
}
