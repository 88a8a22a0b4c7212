//! Interest rates and first-year interest for every plan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::brackets::income_linked_rate;
use crate::calculations::common::coerce_amount;
use crate::calculations::projection::{BalanceProjection, MonthInput};
use crate::models::{PlanId, TaxYearConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestInput {
    pub balance: Decimal,
    /// Annual income, which sets the Plan 2 rate.
    pub annual_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInterest {
    pub plan: PlanId,
    pub annual_rate: Decimal,
    /// Interest in the first month on the opening balance.
    pub monthly_interest: Decimal,
    /// Interest over twelve months with nothing repaid, compounded monthly.
    pub first_year_interest: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestResult {
    pub balance: Decimal,
    pub annual_income: Decimal,
    pub plan2_rate: Decimal,
    pub plans: Vec<PlanInterest>,
}

/// Calculator for the interest tool. Every plan in the year is covered.
#[derive(Debug, Clone, Copy)]
pub struct InterestCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> InterestCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn calculate(
        &self,
        input: &InterestInput,
    ) -> InterestResult {
        let balance = coerce_amount(input.balance);
        let annual_income = coerce_amount(input.annual_income);
        let plan2_rate = income_linked_rate(&self.config.plan2_interest, annual_income);
        let year = [MonthInput::unemployed(); 12];

        let plans = self
            .config
            .plans
            .iter()
            .map(|plan| {
                let annual_rate = if plan.plan == PlanId::Plan2 {
                    plan2_rate
                } else {
                    plan.interest_rate
                };
                let projection = BalanceProjection::for_plan(plan, balance)
                    .with_annual_rate(annual_rate)
                    .run(&year);
                PlanInterest {
                    plan: plan.plan,
                    annual_rate,
                    monthly_interest: projection
                        .entries
                        .first()
                        .map_or(Decimal::ZERO, |e| e.interest),
                    first_year_interest: projection.total_interest,
                }
            })
            .collect();

        debug!(
            balance = %balance,
            annual_income = %annual_income,
            plan2_rate = %plan2_rate,
            "calculated interest"
        );

        InterestResult {
            balance,
            annual_income,
            plan2_rate,
            plans,
        }
    }
}
