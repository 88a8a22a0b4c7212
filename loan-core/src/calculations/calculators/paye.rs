//! Payroll deductions for one or more jobs.
//!
//! Deductions are non-cumulative: each pay period stands alone against the
//! per-period threshold for its frequency. With several jobs the annual
//! reconciliation shows what payroll collects against what is actually owed
//! on total income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CalculatorError, require_plan};
use crate::calculations::aggregation::{AggregationResult, aggregate};
use crate::calculations::common::coerce_amount;
use crate::calculations::threshold::{income_above_threshold, period_repayment};
use crate::models::{IncomeSource, PayFrequency, PlanId, TaxYearConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeInput {
    pub plan: PlanId,
    /// Also deduct for a Postgraduate loan.
    pub include_postgraduate: bool,
    pub sources: Vec<IncomeSource>,
}

/// Deduction from a single payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDeduction {
    pub plan: PlanId,
    pub frequency: PayFrequency,
    pub pay: Decimal,
    pub threshold: Decimal,
    pub income_above_threshold: Decimal,
    pub deduction: Decimal,
}

/// Reconciliation for one plan across every job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDeductions {
    pub plan: PlanId,
    pub aggregation: AggregationResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeResult {
    pub plans: Vec<PlanDeductions>,
    pub total_paye_collected: Decimal,
    pub total_underpayment: Decimal,
    /// Set when payroll collects less than is owed on total income.
    pub requires_self_assessment: bool,
}

/// Calculator for the PAYE tool.
#[derive(Debug, Clone, Copy)]
pub struct PayeCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> PayeCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Deduction on one payslip of `pay` at `frequency`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::PlanNotConfigured`] if `plan` is missing.
    pub fn period_deduction(
        &self,
        plan: PlanId,
        pay: Decimal,
        frequency: PayFrequency,
    ) -> Result<PeriodDeduction, CalculatorError> {
        let loan_plan = require_plan(self.config, plan)?;
        let pay = coerce_amount(pay);
        let threshold = frequency.threshold_for(loan_plan);
        Ok(PeriodDeduction {
            plan,
            frequency,
            pay,
            threshold,
            income_above_threshold: income_above_threshold(pay, threshold),
            deduction: period_repayment(loan_plan, pay, frequency),
        })
    }

    /// Reconciles every job against `input.plan`, and the Postgraduate plan
    /// when requested.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::PlanNotConfigured`] if a plan is missing.
    pub fn calculate(
        &self,
        input: &PayeInput,
    ) -> Result<PayeResult, CalculatorError> {
        let mut plan_ids = vec![input.plan];
        if input.include_postgraduate && !input.plan.is_postgraduate() {
            plan_ids.push(PlanId::Postgraduate);
        }

        let plans = plan_ids
            .into_iter()
            .map(|id| {
                let plan = require_plan(self.config, id)?;
                Ok(PlanDeductions {
                    plan: id,
                    aggregation: aggregate(plan, &input.sources),
                })
            })
            .collect::<Result<Vec<_>, CalculatorError>>()?;

        let total_paye_collected = plans.iter().map(|p| p.aggregation.paye_collected).sum();
        let total_underpayment: Decimal = plans.iter().map(|p| p.aggregation.underpayment).sum();
        let requires_self_assessment = total_underpayment > Decimal::ZERO;

        debug!(
            sources = input.sources.len(),
            total_underpayment = %total_underpayment,
            requires_self_assessment,
            "reconciled PAYE deductions"
        );

        Ok(PayeResult {
            plans,
            total_paye_collected,
            total_underpayment,
            requires_self_assessment,
        })
    }
}
