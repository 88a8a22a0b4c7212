//! Salary sacrifice: what giving up part of gross pay saves.
//!
//! Student loan, income tax and National Insurance are computed twice, on
//! the gross salary and on the salary after the sacrifice. Each saving is
//! the difference between the two runs, so a component already below its
//! threshold saves exactly nothing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CalculatorError, require_plan};
use crate::calculations::brackets::{BracketSlice, accumulate, breakdown};
use crate::calculations::common::{coerce_amount, non_negative};
use crate::calculations::threshold::annual_repayment;
use crate::models::{LoanPlan, PlanId, TaxYearConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySacrificeInput {
    pub plan: PlanId,
    pub include_postgraduate: bool,
    pub gross_salary: Decimal,
    /// Annual amount sacrificed.
    pub sacrifice: Decimal,
}

/// Annual deductions on one salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    pub salary: Decimal,
    pub student_loan: Decimal,
    pub postgraduate_loan: Decimal,
    pub income_tax: Decimal,
    /// Income tax charged in each band.
    pub income_tax_bands: Vec<BracketSlice>,
    pub national_insurance: Decimal,
    pub take_home: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySacrificeResult {
    pub plan: PlanId,
    pub before: Deductions,
    pub after: Deductions,
    pub student_loan_saving: Decimal,
    pub postgraduate_saving: Decimal,
    pub income_tax_saving: Decimal,
    pub national_insurance_saving: Decimal,
    pub total_saving: Decimal,
    /// Reduction in take-home pay.
    pub net_cost: Decimal,
    /// Set when the sacrifice exceeds the gross salary.
    pub critical_warning: bool,
}

/// Calculator for the salary sacrifice tool.
#[derive(Debug, Clone, Copy)]
pub struct SalarySacrificeCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> SalarySacrificeCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// Returns [`CalculatorError::PlanNotConfigured`] if a plan is missing.
    pub fn calculate(
        &self,
        input: &SalarySacrificeInput,
    ) -> Result<SalarySacrificeResult, CalculatorError> {
        let plan = require_plan(self.config, input.plan)?;
        let postgraduate = if input.include_postgraduate && !input.plan.is_postgraduate() {
            Some(require_plan(self.config, PlanId::Postgraduate)?)
        } else {
            None
        };

        let gross = coerce_amount(input.gross_salary);
        let sacrifice = coerce_amount(input.sacrifice);
        let critical_warning = sacrifice > gross;
        if critical_warning {
            warn!(gross = %gross, sacrifice = %sacrifice, "sacrifice exceeds gross salary");
        }

        let before = self.deductions(plan, postgraduate, gross);
        let after = self.deductions(plan, postgraduate, non_negative(gross - sacrifice));

        let student_loan_saving = before.student_loan - after.student_loan;
        let postgraduate_saving = before.postgraduate_loan - after.postgraduate_loan;
        let income_tax_saving = before.income_tax - after.income_tax;
        let national_insurance_saving = before.national_insurance - after.national_insurance;
        let total_saving =
            student_loan_saving + postgraduate_saving + income_tax_saving + national_insurance_saving;
        let net_cost = before.take_home - after.take_home;

        debug!(
            plan = %input.plan,
            gross = %gross,
            sacrifice = %sacrifice,
            total_saving = %total_saving,
            "calculated salary sacrifice"
        );

        Ok(SalarySacrificeResult {
            plan: input.plan,
            before,
            after,
            student_loan_saving,
            postgraduate_saving,
            income_tax_saving,
            national_insurance_saving,
            total_saving,
            net_cost,
            critical_warning,
        })
    }

    fn deductions(
        &self,
        plan: &LoanPlan,
        postgraduate: Option<&LoanPlan>,
        salary: Decimal,
    ) -> Deductions {
        let student_loan = annual_repayment(plan, salary);
        let postgraduate_loan =
            postgraduate.map_or(Decimal::ZERO, |pg| annual_repayment(pg, salary));
        let income_tax_bands = breakdown(&self.config.income_tax, salary);
        let income_tax = income_tax_bands.iter().map(|b| b.charge).sum();
        let national_insurance = accumulate(&self.config.national_insurance, salary);
        Deductions {
            salary,
            student_loan,
            postgraduate_loan,
            income_tax,
            income_tax_bands,
            national_insurance,
            take_home: salary - student_loan - postgraduate_loan - income_tax - national_insurance,
        }
    }
}
