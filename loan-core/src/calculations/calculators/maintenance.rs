//! Means-tested maintenance loan.
//!
//! The annual loan is read off the region's band table for the household
//! income and paid in three termly instalments. England front-loads the
//! later terms (25%, 33%, 42%); the other nations pay equal thirds.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CalculatorError;
use crate::calculations::common::coerce_amount;
use crate::calculations::interpolation::interpolate;
use crate::models::{LivingSituation, Region, TaxYearConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceInput {
    pub region: Region,
    pub living: LivingSituation,
    pub household_income: Decimal,
}

/// One termly payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instalment {
    /// One-based term number.
    pub term: u8,
    pub share: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceResult {
    pub region: Region,
    pub living: LivingSituation,
    pub household_income: Decimal,
    pub annual_amount: Decimal,
    pub max_amount: Decimal,
    pub min_amount: Decimal,
    /// Reduction from the maximum loan caused by household income.
    pub reduction: Decimal,
    pub instalments: Vec<Instalment>,
}

/// Share of the annual loan paid each term.
pub fn term_shares(region: Region) -> [Decimal; 3] {
    match region {
        Region::England => [dec!(0.25), dec!(0.33), dec!(0.42)],
        _ => {
            let third = Decimal::ONE / Decimal::from(3);
            [third, third, third]
        }
    }
}

/// Calculator for the maintenance loan tool.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::calculators::{MaintenanceCalculator, MaintenanceInput};
/// use loan_core::models::{LivingSituation, Region};
/// use loan_core::reference::builtin;
///
/// let config = builtin::tax_year_2025();
/// let result = MaintenanceCalculator::new(&config)
///     .calculate(&MaintenanceInput {
///         region: Region::England,
///         living: LivingSituation::AtHome,
///         household_income: dec!(40000),
///     })
///     .unwrap();
///
/// assert_eq!(result.annual_amount, dec!(6642));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> MaintenanceCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// Returns [`CalculatorError::MaintenanceTableMissing`] when the year has
    /// no table for the region and living situation.
    pub fn calculate(
        &self,
        input: &MaintenanceInput,
    ) -> Result<MaintenanceResult, CalculatorError> {
        let table = self
            .config
            .maintenance_table(input.region, input.living)
            .ok_or(CalculatorError::MaintenanceTableMissing {
                year: self.config.tax_year,
                region: input.region,
                living: input.living,
            })?;

        let household_income = coerce_amount(input.household_income);
        let annual_amount = interpolate(&table.bands, household_income);

        // The last term takes the remainder so the instalments sum exactly.
        let shares = term_shares(input.region);
        let mut paid = Decimal::ZERO;
        let instalments = shares
            .iter()
            .enumerate()
            .map(|(idx, &share)| {
                let amount = if idx + 1 == shares.len() {
                    annual_amount - paid
                } else {
                    annual_amount * share
                };
                paid += amount;
                Instalment {
                    term: idx as u8 + 1,
                    share,
                    amount,
                }
            })
            .collect();

        debug!(
            region = %input.region,
            living = %input.living,
            household_income = %household_income,
            annual_amount = %annual_amount,
            "calculated maintenance loan"
        );

        Ok(MaintenanceResult {
            region: input.region,
            living: input.living,
            household_income,
            annual_amount,
            max_amount: table.max_amount(),
            min_amount: table.min_amount(),
            reduction: table.max_amount() - annual_amount,
            instalments,
        })
    }
}
