use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Student loan repayment plans administered through PAYE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlanId {
    Plan1,
    Plan2,
    Plan4,
    Plan5,
    Postgraduate,
}

impl PlanId {
    pub fn all() -> &'static [PlanId] {
        &[
            Self::Plan1,
            Self::Plan2,
            Self::Plan4,
            Self::Plan5,
            Self::Postgraduate,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plan1 => "plan1",
            Self::Plan2 => "plan2",
            Self::Plan4 => "plan4",
            Self::Plan5 => "plan5",
            Self::Postgraduate => "postgrad",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Plan1 => "Plan 1",
            Self::Plan2 => "Plan 2",
            Self::Plan4 => "Plan 4",
            Self::Plan5 => "Plan 5",
            Self::Postgraduate => "Postgraduate Loan",
        }
    }

    /// Accepts the short code (`plan2`), the bare number (`2`) or `pgl`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace([' ', '_', '-'], "").as_str() {
            "plan1" | "1" => Some(Self::Plan1),
            "plan2" | "2" => Some(Self::Plan2),
            "plan4" | "4" => Some(Self::Plan4),
            "plan5" | "5" => Some(Self::Plan5),
            "postgrad" | "postgraduate" | "pgl" | "pg" => Some(Self::Postgraduate),
            _ => None,
        }
    }

    /// Postgraduate loans are repaid alongside an undergraduate plan rather
    /// than instead of one.
    pub fn is_postgraduate(&self) -> bool {
        matches!(self, Self::Postgraduate)
    }
}

impl fmt::Display for PlanId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Repayment terms for one plan in one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPlan {
    pub plan: PlanId,
    pub annual_threshold: Decimal,
    pub monthly_threshold: Decimal,
    pub weekly_threshold: Decimal,
    /// Share of income above the threshold that is repaid, e.g. `0.09`.
    pub repayment_rate: Decimal,
    pub write_off_years: u32,
    /// Annual interest rate charged on the balance, e.g. `0.043`.
    pub interest_rate: Decimal,
}

impl LoanPlan {
    pub fn name(&self) -> &'static str {
        self.plan.label()
    }

    /// Length of the repayment term in months.
    pub fn write_off_months(&self) -> u32 {
        self.write_off_years * 12
    }

    /// Validates the plan.
    ///
    /// Published per-period thresholds are rounded by HMRC, so the monthly
    /// and weekly figures only need to sit within £1 of the annual figure
    /// divided by 12 and 52.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the rate is outside `(0, 1]`, the interest
    /// rate is negative, the thresholds disagree, or the write-off period is
    /// outside 1 to 40 years.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repayment_rate <= Decimal::ZERO || self.repayment_rate > Decimal::ONE {
            return Err(ConfigError::InvalidRepaymentRate {
                plan: self.plan,
                rate: self.repayment_rate,
            });
        }
        if self.interest_rate < Decimal::ZERO {
            return Err(ConfigError::InvalidInterestRate {
                plan: self.plan,
                rate: self.interest_rate,
            });
        }

        let monthly_gap = (self.annual_threshold / Decimal::from(12) - self.monthly_threshold).abs();
        let weekly_gap = (self.annual_threshold / Decimal::from(52) - self.weekly_threshold).abs();
        if self.annual_threshold < Decimal::ZERO
            || monthly_gap > Decimal::ONE
            || weekly_gap > Decimal::ONE
        {
            return Err(ConfigError::InconsistentThresholds {
                plan: self.plan,
                annual: self.annual_threshold,
                monthly: self.monthly_threshold,
                weekly: self.weekly_threshold,
            });
        }

        if self.write_off_years == 0 || self.write_off_years > 40 {
            return Err(ConfigError::InvalidWriteOffYears {
                plan: self.plan,
                years: self.write_off_years,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn plan2() -> LoanPlan {
        LoanPlan {
            plan: PlanId::Plan2,
            annual_threshold: dec!(28470),
            monthly_threshold: dec!(2373),
            weekly_threshold: dec!(547),
            repayment_rate: dec!(0.09),
            write_off_years: 30,
            interest_rate: dec!(0.062),
        }
    }

    #[test]
    fn parse_accepts_codes_and_numbers() {
        assert_eq!(PlanId::parse("plan2"), Some(PlanId::Plan2));
        assert_eq!(PlanId::parse("Plan 4"), Some(PlanId::Plan4));
        assert_eq!(PlanId::parse("5"), Some(PlanId::Plan5));
        assert_eq!(PlanId::parse("PGL"), Some(PlanId::Postgraduate));
        assert_eq!(PlanId::parse("plan3"), None);
    }

    #[test]
    fn parse_round_trips_as_str() {
        for plan in PlanId::all() {
            assert_eq!(PlanId::parse(plan.as_str()), Some(*plan));
        }
    }

    #[test]
    fn validate_accepts_published_plan() {
        assert_eq!(plan2().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_rate() {
        let mut plan = plan2();
        plan.repayment_rate = dec!(0);

        assert_eq!(
            plan.validate(),
            Err(ConfigError::InvalidRepaymentRate {
                plan: PlanId::Plan2,
                rate: dec!(0),
            })
        );
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut plan = plan2();
        plan.repayment_rate = dec!(1.5);

        assert!(matches!(
            plan.validate(),
            Err(ConfigError::InvalidRepaymentRate { .. })
        ));
    }

    #[test]
    fn validate_rejects_monthly_threshold_out_of_line() {
        let mut plan = plan2();
        plan.monthly_threshold = dec!(2500);

        assert!(matches!(
            plan.validate(),
            Err(ConfigError::InconsistentThresholds { .. })
        ));
    }

    #[test]
    fn validate_rejects_write_off_beyond_forty_years() {
        let mut plan = plan2();
        plan.write_off_years = 41;

        assert_eq!(
            plan.validate(),
            Err(ConfigError::InvalidWriteOffYears {
                plan: PlanId::Plan2,
                years: 41,
            })
        );
    }

    #[test]
    fn write_off_months_is_years_times_twelve() {
        assert_eq!(plan2().write_off_months(), 360);
    }
}
