use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tax_bracket::validate_schedule;
use super::{
    BracketKind, ConfigError, LivingSituation, LoanPlan, MaintenanceTable, PlanId, Region,
    TaxBracket, TaxYear,
};

/// Income-linked interest for Plan 2: RPI at or below `lower_threshold`,
/// RPI plus `max_premium` at or above `upper_threshold`, linear in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan2InterestConfig {
    pub lower_threshold: Decimal,
    pub upper_threshold: Decimal,
    pub rpi: Decimal,
    pub max_premium: Decimal,
}

impl Plan2InterestConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upper_threshold <= self.lower_threshold {
            return Err(ConfigError::InvertedInterestThresholds {
                lower: self.lower_threshold,
                upper: self.upper_threshold,
            });
        }
        if self.rpi < Decimal::ZERO || self.max_premium < Decimal::ZERO {
            return Err(ConfigError::NegativeInterestRate {
                rpi: self.rpi,
                premium: self.max_premium,
            });
        }
        Ok(())
    }
}

/// Every reference table the calculators need for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: TaxYear,
    pub plans: Vec<LoanPlan>,
    pub income_tax: Vec<TaxBracket>,
    pub national_insurance: Vec<TaxBracket>,
    pub plan2_interest: Plan2InterestConfig,
    pub maintenance: Vec<MaintenanceTable>,
}

impl TaxYearConfig {
    pub fn plan(
        &self,
        id: PlanId,
    ) -> Option<&LoanPlan> {
        self.plans.iter().find(|p| p.plan == id)
    }

    pub fn maintenance_table(
        &self,
        region: Region,
        living: LivingSituation,
    ) -> Option<&MaintenanceTable> {
        self.maintenance
            .iter()
            .find(|t| t.region == region && t.living == living)
    }

    pub fn brackets(
        &self,
        kind: BracketKind,
    ) -> &[TaxBracket] {
        match kind {
            BracketKind::IncomeTax => &self.income_tax,
            BracketKind::NationalInsurance => &self.national_insurance,
        }
    }

    /// Validates every table in the year.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking plans, then both
    /// bracket schedules, then the Plan 2 interest ramp, then maintenance
    /// tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for plan in &self.plans {
            plan.validate()?;
            if !seen.insert(plan.plan) {
                return Err(ConfigError::DuplicatePlan(plan.plan));
            }
        }

        validate_schedule(BracketKind::IncomeTax, &self.income_tax)?;
        validate_schedule(BracketKind::NationalInsurance, &self.national_insurance)?;
        self.plan2_interest.validate()?;

        let mut seen = HashSet::new();
        for table in &self.maintenance {
            table.validate()?;
            if !seen.insert((table.region, table.living)) {
                return Err(ConfigError::DuplicateBands {
                    region: table.region,
                    living: table.living,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::reference::builtin;

    #[test]
    fn builtin_years_validate() {
        for config in builtin::all() {
            assert_eq!(config.validate(), Ok(()), "year {}", config.tax_year);
        }
    }

    #[test]
    fn duplicate_plan_is_rejected() {
        let mut config = builtin::tax_year_2025();
        let copy = config.plans[0].clone();
        config.plans.push(copy);

        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicatePlan(PlanId::Plan1))
        );
    }

    #[test]
    fn duplicate_maintenance_table_is_rejected() {
        let mut config = builtin::tax_year_2025();
        let copy = config.maintenance[0].clone();
        config.maintenance.push(copy);

        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateBands { .. })
        ));
    }

    #[test]
    fn lookups_find_tables() {
        let config = builtin::tax_year_2025();

        assert!(config.plan(PlanId::Postgraduate).is_some());
        assert!(config
            .maintenance_table(Region::Wales, LivingSituation::AwayLondon)
            .is_some());
        assert_eq!(config.brackets(BracketKind::IncomeTax).len(), 4);
    }
}
