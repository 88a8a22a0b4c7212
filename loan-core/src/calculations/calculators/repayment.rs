//! Repayments at a salary and the balance over the life of the loan.
//!
//! The projection runs month by month from the first month of repayment to
//! the plan's write-off date, with salary rising once a year. Plan 2 interest
//! is re-derived from each year's salary. A Postgraduate loan held alongside
//! an undergraduate plan is repaid concurrently and projected on its own.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CalculatorError, require_plan};
use crate::calculations::brackets::income_linked_rate;
use crate::calculations::common::{coerce_amount, non_negative, round_half_up};
use crate::calculations::projection::{BalanceProjection, MonthInput};
use crate::calculations::threshold::{income_above_threshold, threshold_repayment};
use crate::models::{LoanPlan, PlanId, TaxYearConfig};

/// Longest projection run, in months (a 40-year term).
pub const MAX_PROJECTION_MONTHS: u32 = 480;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentInput {
    pub plan: PlanId,
    /// Annual gross salary in the first year.
    pub salary: Decimal,
    /// Outstanding balance at the start of repayment.
    pub balance: Decimal,
    /// Yearly salary increase, e.g. `0.03`. Clamped to `[-1, 1]`.
    pub salary_growth: Decimal,
    /// Balance of a Postgraduate loan repaid alongside `plan`.
    pub postgraduate_balance: Option<Decimal>,
}

impl RepaymentInput {
    pub fn new(
        plan: PlanId,
        salary: Decimal,
        balance: Decimal,
    ) -> Self {
        Self {
            plan,
            salary,
            balance,
            salary_growth: Decimal::ZERO,
            postgraduate_balance: None,
        }
    }

    pub fn with_growth(
        mut self,
        salary_growth: Decimal,
    ) -> Self {
        self.salary_growth = salary_growth;
        self
    }

    pub fn with_postgraduate(
        mut self,
        balance: Decimal,
    ) -> Self {
        self.postgraduate_balance = Some(balance);
        self
    }
}

/// Totals for one year of the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    /// One-based year of repayment.
    pub year: u32,
    pub salary: Decimal,
    pub repaid: Decimal,
    pub interest: Decimal,
    pub balance_end_of_year: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanProjection {
    pub opening_balance: Decimal,
    pub months_projected: u32,
    pub total_repaid: Decimal,
    pub total_interest: Decimal,
    /// Balance cancelled at the end of the term.
    pub written_off: Decimal,
    /// One-based month in which the loan is cleared, if it is.
    pub payoff_month: Option<u32>,
    pub years: Vec<YearSummary>,
}

impl LoanProjection {
    /// True when year-one interest outpaces year-one repayments.
    pub fn balance_grows_in_first_year(&self) -> bool {
        self.years
            .first()
            .is_some_and(|y| y.interest > y.repaid)
    }
}

/// Repayment figures for one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRepayment {
    pub plan: PlanId,
    pub income_above_threshold: Decimal,
    pub annual_repayment: Decimal,
    pub monthly_repayment: Decimal,
    pub weekly_repayment: Decimal,
    /// Interest rate in the first year.
    pub interest_rate: Decimal,
    pub projection: LoanProjection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentResult {
    pub salary: Decimal,
    pub primary: PlanRepayment,
    pub postgraduate: Option<PlanRepayment>,
    pub total_annual_repayment: Decimal,
    pub total_monthly_repayment: Decimal,
    /// Set when either loan grows during the first year despite repayments.
    pub critical_warning: bool,
}

/// Calculator for the repayment tool.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::calculators::{RepaymentCalculator, RepaymentInput};
/// use loan_core::models::PlanId;
/// use loan_core::reference::builtin;
///
/// let config = builtin::tax_year_2025();
/// let calculator = RepaymentCalculator::new(&config);
///
/// let result = calculator
///     .calculate(&RepaymentInput::new(PlanId::Plan2, dec!(48000), dec!(45000)))
///     .unwrap();
///
/// assert_eq!(result.primary.annual_repayment, dec!(1757.70));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RepaymentCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> RepaymentCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// Returns [`CalculatorError::PlanNotConfigured`] when the year lacks the
    /// requested plan, or the Postgraduate plan when a Postgraduate balance
    /// is given.
    pub fn calculate(
        &self,
        input: &RepaymentInput,
    ) -> Result<RepaymentResult, CalculatorError> {
        let salary = coerce_amount(input.salary);
        let growth = input.salary_growth.clamp(-Decimal::ONE, Decimal::ONE);
        let plan = require_plan(self.config, input.plan)?;
        let primary = self.plan_repayment(plan, salary, input.balance, growth);

        let postgraduate = match input.postgraduate_balance {
            Some(_) if plan.plan.is_postgraduate() => {
                warn!("ignoring second Postgraduate balance for a Postgraduate plan");
                None
            }
            Some(balance) => {
                let pg = require_plan(self.config, PlanId::Postgraduate)?;
                Some(self.plan_repayment(pg, salary, balance, growth))
            }
            None => None,
        };

        let total_annual_repayment = primary.annual_repayment
            + postgraduate.as_ref().map_or(Decimal::ZERO, |p| p.annual_repayment);
        let total_monthly_repayment = primary.monthly_repayment
            + postgraduate.as_ref().map_or(Decimal::ZERO, |p| p.monthly_repayment);
        let critical_warning = primary.projection.balance_grows_in_first_year()
            || postgraduate
                .as_ref()
                .is_some_and(|p| p.projection.balance_grows_in_first_year());

        debug!(
            plan = %input.plan,
            salary = %salary,
            annual = %round_half_up(total_annual_repayment),
            critical_warning,
            "calculated repayments"
        );

        Ok(RepaymentResult {
            salary,
            primary,
            postgraduate,
            total_annual_repayment,
            total_monthly_repayment,
            critical_warning,
        })
    }

    /// Interest rate for `plan` at an annual income.
    pub fn annual_rate(
        &self,
        plan: &LoanPlan,
        annual_income: Decimal,
    ) -> Decimal {
        if plan.plan == PlanId::Plan2 {
            income_linked_rate(&self.config.plan2_interest, annual_income)
        } else {
            plan.interest_rate
        }
    }

    /// Projects `balance` under `plan` to payoff or write-off.
    pub fn project(
        &self,
        plan: &LoanPlan,
        salary: Decimal,
        balance: Decimal,
        salary_growth: Decimal,
    ) -> LoanProjection {
        let months = plan.write_off_months().min(MAX_PROJECTION_MONTHS);
        let twelve = Decimal::from(12);
        let growth_factor = non_negative(Decimal::ONE + salary_growth);

        let mut annual = coerce_amount(salary);
        let mut salaries = Vec::with_capacity(months.div_ceil(12) as usize);
        let mut inputs = Vec::with_capacity(months as usize);
        for month in 0..months {
            if month % 12 == 0 {
                if month > 0 {
                    annual = annual
                        .checked_mul(growth_factor)
                        .map_or(annual, round_half_up);
                }
                salaries.push(annual);
            }
            let rate = self.annual_rate(plan, annual);
            inputs.push(MonthInput::employed(annual / twelve).with_rate(rate));
        }

        let result = BalanceProjection::for_plan(plan, balance).run(&inputs);
        let years = result
            .entries
            .chunks(12)
            .zip(&salaries)
            .enumerate()
            .map(|(idx, (chunk, &salary))| YearSummary {
                year: idx as u32 + 1,
                salary,
                repaid: chunk.iter().map(|e| e.repayment).sum(),
                interest: chunk.iter().map(|e| e.interest).sum(),
                balance_end_of_year: chunk
                    .last()
                    .map_or(Decimal::ZERO, |e| e.balance_end_of_month),
            })
            .collect();

        LoanProjection {
            opening_balance: result.opening_balance,
            months_projected: months,
            total_repaid: result.total_repaid,
            total_interest: result.total_interest,
            written_off: result.closing_balance,
            payoff_month: result.cleared_in_month.map(|m| m as u32 + 1),
            years,
        }
    }

    fn plan_repayment(
        &self,
        plan: &LoanPlan,
        salary: Decimal,
        balance: Decimal,
        salary_growth: Decimal,
    ) -> PlanRepayment {
        PlanRepayment {
            plan: plan.plan,
            income_above_threshold: income_above_threshold(salary, plan.annual_threshold),
            annual_repayment: threshold_repayment(
                salary,
                plan.annual_threshold,
                plan.repayment_rate,
            ),
            monthly_repayment: threshold_repayment(
                salary / Decimal::from(12),
                plan.monthly_threshold,
                plan.repayment_rate,
            ),
            weekly_repayment: threshold_repayment(
                salary / Decimal::from(52),
                plan.weekly_threshold,
                plan.repayment_rate,
            ),
            interest_rate: self.annual_rate(plan, salary),
            projection: self.project(plan, salary, balance, salary_growth),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::reference::builtin;

    // =========================================================================
    // Per-period repayments
    // =========================================================================

    #[test]
    fn plan2_repayments_at_48000() {
        let config = builtin::tax_year_2025();
        let calculator = RepaymentCalculator::new(&config);

        let result = calculator
            .calculate(&RepaymentInput::new(PlanId::Plan2, dec!(48000), dec!(45000)))
            .unwrap();

        assert_eq!(result.primary.income_above_threshold, dec!(19530));
        assert_eq!(result.primary.annual_repayment, dec!(1757.70));
        assert_eq!(result.primary.monthly_repayment, dec!(146.43));
        assert_eq!(round_half_up(result.primary.weekly_repayment), dec!(33.85));
    }

    #[test]
    fn postgraduate_loan_is_repaid_alongside_plan() {
        let config = builtin::tax_year_2025();
        let calculator = RepaymentCalculator::new(&config);
        let input =
            RepaymentInput::new(PlanId::Plan2, dec!(48000), dec!(45000)).with_postgraduate(dec!(12000));

        let result = calculator.calculate(&input).unwrap();

        let pg = result.postgraduate.unwrap();
        // (48000 - 21000) * 0.06
        assert_eq!(pg.annual_repayment, dec!(1620));
        assert_eq!(result.total_annual_repayment, dec!(3377.70));
    }

    #[test]
    fn postgraduate_plan_ignores_second_postgraduate_balance() {
        let config = builtin::tax_year_2025();
        let calculator = RepaymentCalculator::new(&config);
        let input = RepaymentInput::new(PlanId::Postgraduate, dec!(30000), dec!(10000))
            .with_postgraduate(dec!(5000));

        let result = calculator.calculate(&input).unwrap();

        assert!(result.postgraduate.is_none());
    }

    #[test]
    fn missing_plan_is_reported() {
        let mut config = builtin::tax_year_2025();
        config.plans.retain(|p| p.plan != PlanId::Plan4);
        let calculator = RepaymentCalculator::new(&config);

        let result = calculator.calculate(&RepaymentInput::new(PlanId::Plan4, dec!(30000), dec!(0)));

        assert_eq!(
            result,
            Err(CalculatorError::PlanNotConfigured {
                year: config.tax_year,
                plan: PlanId::Plan4,
            })
        );
    }

    // =========================================================================
    // Projection
    // =========================================================================

    #[test]
    fn salary_below_threshold_writes_off_everything() {
        let config = builtin::tax_year_2025();
        let calculator = RepaymentCalculator::new(&config);

        let result = calculator
            .calculate(&RepaymentInput::new(PlanId::Plan2, dec!(25000), dec!(60000)))
            .unwrap();

        let projection = &result.primary.projection;
        assert_eq!(projection.months_projected, 360);
        assert_eq!(projection.total_repaid, dec!(0));
        assert_eq!(projection.payoff_month, None);
        assert!(projection.written_off > dec!(60000));
        assert!(result.critical_warning);
    }

    #[test]
    fn high_salary_pays_off_small_balance() {
        let config = builtin::tax_year_2025();
        let calculator = RepaymentCalculator::new(&config);

        let result = calculator
            .calculate(&RepaymentInput::new(PlanId::Plan1, dec!(60000), dec!(5000)))
            .unwrap();

        let projection = &result.primary.projection;
        let payoff = projection.payoff_month.unwrap();
        assert!(payoff <= 24, "paid off in month {payoff}");
        assert_eq!(projection.written_off, dec!(0));
        let gap = (projection.total_repaid - dec!(5000) - projection.total_interest).abs();
        assert!(gap < dec!(0.0001), "gap {gap}");
        assert!(!result.critical_warning);
    }

    #[test]
    fn plan5_projects_forty_years() {
        let config = builtin::tax_year_2025();
        let calculator = RepaymentCalculator::new(&config);

        let result = calculator
            .calculate(&RepaymentInput::new(PlanId::Plan5, dec!(30000), dec!(40000)))
            .unwrap();

        assert_eq!(result.primary.projection.months_projected, MAX_PROJECTION_MONTHS);
        assert_eq!(result.primary.projection.years.len(), 40);
    }

    #[test]
    fn salary_grows_once_a_year() {
        let config = builtin::tax_year_2025();
        let calculator = RepaymentCalculator::new(&config);
        let input =
            RepaymentInput::new(PlanId::Plan1, dec!(30000), dec!(20000)).with_growth(dec!(0.05));

        let result = calculator.calculate(&input).unwrap();

        let years = &result.primary.projection.years;
        assert_eq!(years[0].salary, dec!(30000));
        assert_eq!(years[1].salary, dec!(31500.00));
        assert_eq!(years[2].salary, dec!(33075.00));
    }

    #[test]
    fn plan2_rate_follows_salary() {
        let config = builtin::tax_year_2025();
        let calculator = RepaymentCalculator::new(&config);

        let low = calculator
            .calculate(&RepaymentInput::new(PlanId::Plan2, dec!(20000), dec!(1000)))
            .unwrap();
        let high = calculator
            .calculate(&RepaymentInput::new(PlanId::Plan2, dec!(60000), dec!(1000)))
            .unwrap();

        assert_eq!(low.primary.interest_rate, dec!(0.032));
        assert_eq!(high.primary.interest_rate, dec!(0.062));
    }

    #[test]
    fn zero_balance_never_warns() {
        let config = builtin::tax_year_2025();
        let calculator = RepaymentCalculator::new(&config);

        let result = calculator
            .calculate(&RepaymentInput::new(PlanId::Plan2, dec!(20000), dec!(0)))
            .unwrap();

        assert!(!result.critical_warning);
        assert_eq!(result.primary.projection.payoff_month, None);
    }
}
