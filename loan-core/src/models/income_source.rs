use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LoanPlan;
use crate::calculations::common::coerce_amount;

/// How often an income source pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PayFrequency {
    Weekly,
    Fortnightly,
    FourWeekly,
    #[default]
    Monthly,
    Annual,
}

impl PayFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Weekly => 52,
            Self::Fortnightly => 26,
            Self::FourWeekly => 13,
            Self::Monthly => 12,
            Self::Annual => 1,
        }
    }

    /// The PAYE threshold a payroll applies to one pay period of this length.
    ///
    /// Weekly-based frequencies scale the weekly threshold; monthly and annual
    /// pay use the published monthly and annual figures.
    pub fn threshold_for(
        &self,
        plan: &LoanPlan,
    ) -> Decimal {
        match self {
            Self::Weekly => plan.weekly_threshold,
            Self::Fortnightly => plan.weekly_threshold * Decimal::TWO,
            Self::FourWeekly => plan.weekly_threshold * Decimal::from(4),
            Self::Monthly => plan.monthly_threshold,
            Self::Annual => plan.annual_threshold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Fortnightly => "fortnightly",
            Self::FourWeekly => "four_weekly",
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "weekly" | "week" => Some(Self::Weekly),
            "fortnightly" | "biweekly" => Some(Self::Fortnightly),
            "four_weekly" | "4_weekly" | "fourweekly" => Some(Self::FourWeekly),
            "monthly" | "month" => Some(Self::Monthly),
            "annual" | "annually" | "yearly" => Some(Self::Annual),
            _ => None,
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job or other income stream entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSource {
    pub id: u32,
    pub label: String,
    /// Gross pay per period of `frequency`.
    pub amount: Decimal,
    pub frequency: PayFrequency,
    /// Sources that share an employer are run through one payroll.
    pub employer: Option<String>,
}

impl IncomeSource {
    pub fn new(
        id: u32,
        label: impl Into<String>,
        amount: Decimal,
        frequency: PayFrequency,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            amount,
            frequency,
            employer: None,
        }
    }

    pub fn with_employer(
        mut self,
        employer: impl Into<String>,
    ) -> Self {
        self.employer = Some(employer.into());
        self
    }

    /// Pay per period with negative entries treated as zero.
    pub fn period_amount(&self) -> Decimal {
        coerce_amount(self.amount)
    }

    pub fn annual_amount(&self) -> Decimal {
        self.period_amount() * Decimal::from(self.frequency.periods_per_year())
    }
}
