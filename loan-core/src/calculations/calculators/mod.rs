//! One calculator per tool.
//!
//! Each calculator borrows a validated [`TaxYearConfig`](crate::models::TaxYearConfig),
//! takes an input struct and returns a result struct recomputed from scratch.
//! The only failure is a lookup against tables that lack the requested plan
//! or maintenance table.

pub mod interest;
pub mod maintenance;
pub mod part_year;
pub mod paye;
pub mod repayment;
pub mod salary_sacrifice;

use thiserror::Error;

use crate::models::{LivingSituation, LoanPlan, PlanId, Region, TaxYear, TaxYearConfig};

pub use interest::{InterestCalculator, InterestInput, InterestResult, PlanInterest};
pub use maintenance::{Instalment, MaintenanceCalculator, MaintenanceInput, MaintenanceResult};
pub use part_year::{LabelledMonth, PartYearCalculator, PartYearInput, PartYearResult};
pub use paye::{PayeCalculator, PayeInput, PayeResult, PeriodDeduction, PlanDeductions};
pub use repayment::{
    LoanProjection, MAX_PROJECTION_MONTHS, PlanRepayment, RepaymentCalculator, RepaymentInput,
    RepaymentResult, YearSummary,
};
pub use salary_sacrifice::{
    Deductions, SalarySacrificeCalculator, SalarySacrificeInput, SalarySacrificeResult,
};

/// Errors raised when a calculator cannot find the tables it needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("{plan} is not configured for tax year {year}")]
    PlanNotConfigured { year: TaxYear, plan: PlanId },

    #[error("no maintenance table for {region} ({living}) in tax year {year}")]
    MaintenanceTableMissing {
        year: TaxYear,
        region: Region,
        living: LivingSituation,
    },
}

pub(crate) fn require_plan(
    config: &TaxYearConfig,
    plan: PlanId,
) -> Result<&LoanPlan, CalculatorError> {
    config.plan(plan).ok_or(CalculatorError::PlanNotConfigured {
        year: config.tax_year,
        plan,
    })
}
