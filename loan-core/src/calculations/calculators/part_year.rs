//! A tax year with gaps in employment.
//!
//! Payroll deducts month by month against the monthly threshold, so someone
//! who earns well for part of the year and nothing for the rest can have
//! deductions taken even though their annual income is below the annual
//! threshold. Those deductions are refundable.
//!
//! The break metrics are illustrative: months on break stand in for the
//! delay to the write-off date, and the extra interest is what accrued while
//! nothing was being repaid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CalculatorError, require_plan};
use crate::calculations::brackets::income_linked_rate;
use crate::calculations::common::{coerce_amount, non_negative};
use crate::calculations::projection::{BalanceProjection, MonthInput, MonthlyBreakdown};
use crate::calculations::threshold::annual_repayment;
use crate::models::{PlanId, TaxYearConfig};

pub const MONTHS_IN_TAX_YEAR: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartYearInput {
    pub plan: PlanId,
    pub opening_balance: Decimal,
    /// Months from April. Missing months are unemployed, extra months are
    /// dropped.
    pub months: Vec<MonthInput>,
}

impl PartYearInput {
    /// Builds the year from a flag per month and a constant monthly pay.
    pub fn from_pattern(
        plan: PlanId,
        opening_balance: Decimal,
        monthly_income: Decimal,
        employed: &[bool],
    ) -> Self {
        let months = employed
            .iter()
            .map(|&working| {
                if working {
                    MonthInput::employed(monthly_income)
                } else {
                    MonthInput::unemployed()
                }
            })
            .collect();
        Self {
            plan,
            opening_balance,
            months,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledMonth {
    /// Calendar month, e.g. `"January 2026"`.
    pub label: String,
    #[serde(flatten)]
    pub breakdown: MonthlyBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartYearResult {
    pub plan: PlanId,
    pub months: Vec<LabelledMonth>,
    pub annual_income: Decimal,
    /// Deductions taken through payroll across the year.
    pub paye_deductions: Decimal,
    /// Liability on the year's income against the annual threshold.
    pub annual_liability: Decimal,
    pub eligible_for_refund: bool,
    pub refund_amount: Decimal,
    pub months_on_break: u32,
    pub additional_interest_from_break: Decimal,
    /// Months the write-off date would slip, approximated by months on break.
    pub write_off_impact_months: u32,
    pub total_interest: Decimal,
    pub closing_balance: Decimal,
}

/// Calculator for the part-year employment tool.
#[derive(Debug, Clone, Copy)]
pub struct PartYearCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> PartYearCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// Returns [`CalculatorError::PlanNotConfigured`] if the plan is missing.
    pub fn calculate(
        &self,
        input: &PartYearInput,
    ) -> Result<PartYearResult, CalculatorError> {
        let plan = require_plan(self.config, input.plan)?;

        if input.months.len() > MONTHS_IN_TAX_YEAR {
            warn!(
                months = input.months.len(),
                "dropping months beyond the end of the tax year"
            );
        }
        let mut months: Vec<MonthInput> = input
            .months
            .iter()
            .take(MONTHS_IN_TAX_YEAR)
            .copied()
            .collect();
        months.resize(MONTHS_IN_TAX_YEAR, MonthInput::unemployed());

        let annual_income: Decimal = months
            .iter()
            .filter(|m| m.employed)
            .map(|m| coerce_amount(m.income))
            .sum();

        let mut projection = BalanceProjection::for_plan(plan, input.opening_balance);
        if plan.plan == PlanId::Plan2 {
            projection = projection
                .with_annual_rate(income_linked_rate(&self.config.plan2_interest, annual_income));
        }
        let result = projection.run(&months);

        let paye_deductions: Decimal = result.entries.iter().map(|e| e.deduction).sum();
        let annual_liability = annual_repayment(plan, annual_income);
        let eligible_for_refund =
            annual_income <= plan.annual_threshold && paye_deductions > Decimal::ZERO;
        let refund_amount = if eligible_for_refund {
            non_negative(paye_deductions - annual_liability)
        } else {
            Decimal::ZERO
        };

        let months_on_break = months.iter().filter(|m| !m.employed).count() as u32;
        let additional_interest_from_break = result
            .entries
            .iter()
            .filter(|e| !e.employed)
            .map(|e| e.interest)
            .sum();

        debug!(
            plan = %input.plan,
            annual_income = %annual_income,
            paye_deductions = %paye_deductions,
            eligible_for_refund,
            months_on_break,
            "calculated part-year repayments"
        );

        let tax_year = self.config.tax_year;
        Ok(PartYearResult {
            plan: input.plan,
            annual_income,
            paye_deductions,
            annual_liability,
            eligible_for_refund,
            refund_amount,
            months_on_break,
            additional_interest_from_break,
            write_off_impact_months: months_on_break,
            total_interest: result.total_interest,
            closing_balance: result.closing_balance,
            months: result
                .entries
                .into_iter()
                .map(|breakdown| LabelledMonth {
                    label: tax_year.month_label(breakdown.month),
                    breakdown,
                })
                .collect(),
        })
    }
}
