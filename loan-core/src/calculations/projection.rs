//! Month-by-month balance projection with interest and employment gaps.
//!
//! The projection walks a fixed sequence of months. Each month accrues
//! interest on the opening balance, then applies the PAYE deduction for the
//! month if the borrower was employed. The loop always visits every month it
//! is given; it does not stop when the balance reaches zero.
//!
//! A deduction larger than the outstanding balance clears the loan and the
//! excess is reported as an overpayment. The balance carried into the next
//! month is the floored balance, so a cleared loan accrues no further
//! interest.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{coerce_amount, non_negative};
use crate::calculations::threshold::threshold_repayment;
use crate::models::LoanPlan;

/// What happened in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthInput {
    pub employed: bool,
    /// Gross pay for the month. Ignored when not employed.
    pub income: Decimal,
    /// Annual interest rate for this month when it differs from the
    /// projection's default (Plan 2 rates follow income).
    pub annual_rate: Option<Decimal>,
}

impl MonthInput {
    pub fn employed(income: Decimal) -> Self {
        Self {
            employed: true,
            income,
            annual_rate: None,
        }
    }

    pub fn unemployed() -> Self {
        Self {
            employed: false,
            income: Decimal::ZERO,
            annual_rate: None,
        }
    }

    pub fn with_rate(
        mut self,
        annual_rate: Decimal,
    ) -> Self {
        self.annual_rate = Some(annual_rate);
        self
    }
}

/// One row of the monthly breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    /// Zero-based position in the input sequence.
    pub month: usize,
    pub employed: bool,
    pub income: Decimal,
    /// Deduction taken through payroll this month.
    pub deduction: Decimal,
    /// Part of the deduction applied to the loan.
    pub repayment: Decimal,
    /// Part of the deduction taken after the loan was cleared.
    pub overpayment: Decimal,
    pub interest: Decimal,
    pub balance_end_of_month: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub opening_balance: Decimal,
    pub entries: Vec<MonthlyBreakdown>,
    pub total_interest: Decimal,
    pub total_repaid: Decimal,
    pub total_overpaid: Decimal,
    pub closing_balance: Decimal,
    /// Index of the month in which the balance first reached zero.
    pub cleared_in_month: Option<usize>,
}

/// Balance projection for a single loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceProjection {
    pub opening_balance: Decimal,
    pub annual_rate: Decimal,
    pub monthly_threshold: Decimal,
    pub repayment_rate: Decimal,
}

impl BalanceProjection {
    /// Projection using `plan`'s monthly threshold, rate and interest rate.
    pub fn for_plan(
        plan: &LoanPlan,
        opening_balance: Decimal,
    ) -> Self {
        Self {
            opening_balance: coerce_amount(opening_balance),
            annual_rate: plan.interest_rate,
            monthly_threshold: plan.monthly_threshold,
            repayment_rate: plan.repayment_rate,
        }
    }

    pub fn with_annual_rate(
        mut self,
        annual_rate: Decimal,
    ) -> Self {
        self.annual_rate = non_negative(annual_rate);
        self
    }

    /// Runs the projection over `months` in order.
    pub fn run(
        &self,
        months: &[MonthInput],
    ) -> ProjectionResult {
        let twelve = Decimal::from(12);
        let mut balance = coerce_amount(self.opening_balance);
        let mut entries = Vec::with_capacity(months.len());
        let mut cleared_in_month = None;

        for (idx, month) in months.iter().enumerate() {
            let rate = month.annual_rate.unwrap_or(self.annual_rate);
            let interest = balance * rate / twelve;
            let income = if month.employed {
                coerce_amount(month.income)
            } else {
                Decimal::ZERO
            };
            let deduction = if month.employed {
                threshold_repayment(income, self.monthly_threshold, self.repayment_rate)
            } else {
                Decimal::ZERO
            };

            let owed = balance + interest;
            let repayment = deduction.min(owed);
            balance = non_negative(owed - repayment);
            if balance.is_zero() && cleared_in_month.is_none() && !owed.is_zero() {
                cleared_in_month = Some(idx);
            }

            entries.push(MonthlyBreakdown {
                month: idx,
                employed: month.employed,
                income,
                deduction,
                repayment,
                overpayment: deduction - repayment,
                interest,
                balance_end_of_month: balance,
            });
        }

        ProjectionResult {
            opening_balance: self.opening_balance,
            total_interest: entries.iter().map(|e| e.interest).sum(),
            total_repaid: entries.iter().map(|e| e.repayment).sum(),
            total_overpaid: entries.iter().map(|e| e.overpayment).sum(),
            closing_balance: balance,
            cleared_in_month,
            entries,
        }
    }
}
