use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use super::builtin;
use crate::models::{ConfigError, LoanPlan, PlanId, TaxYear, TaxYearConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("no reference tables for tax year {0}")]
    TaxYearNotFound(TaxYear),

    #[error("{plan} is not defined for tax year {year}")]
    PlanNotFound { year: TaxYear, plan: PlanId },

    #[error("invalid reference table: {0}")]
    InvalidTable(#[from] ConfigError),

    #[error("reference source error: {0}")]
    Source(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Read access to versioned reference tables.
pub trait ReferenceRepository: Send + Sync {
    fn get_tax_year_config(
        &self,
        year: TaxYear,
    ) -> Result<TaxYearConfig, RepositoryError>;

    /// Tax years with tables, oldest first.
    fn list_tax_years(&self) -> Result<Vec<TaxYear>, RepositoryError>;

    fn get_plan(
        &self,
        year: TaxYear,
        plan: PlanId,
    ) -> Result<LoanPlan, RepositoryError> {
        self.get_tax_year_config(year)?
            .plan(plan)
            .cloned()
            .ok_or(RepositoryError::PlanNotFound { year, plan })
    }

    fn latest_tax_year(&self) -> Result<TaxYear, RepositoryError> {
        self.list_tax_years()?
            .last()
            .copied()
            .ok_or_else(|| RepositoryError::Source("repository holds no tax years".to_string()))
    }
}

/// Repository over tables held in memory, keyed by tax year.
///
/// Tables are validated on the way in, so lookups never hand out a table
/// that violates its invariants.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    configs: BTreeMap<TaxYear, TaxYearConfig>,
}

impl InMemoryRepository {
    pub fn new(configs: Vec<TaxYearConfig>) -> Result<Self, ConfigError> {
        let mut repo = Self::default();
        for config in configs {
            repo.insert(config)?;
        }
        Ok(repo)
    }

    /// Repository over the tables shipped with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(builtin::all())
    }

    /// Adds or replaces the tables for one tax year.
    pub fn insert(
        &mut self,
        config: TaxYearConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        debug!(tax_year = %config.tax_year, plans = config.plans.len(), "loaded reference tables");
        self.configs.insert(config.tax_year, config);
        Ok(())
    }
}

impl ReferenceRepository for InMemoryRepository {
    fn get_tax_year_config(
        &self,
        year: TaxYear,
    ) -> Result<TaxYearConfig, RepositoryError> {
        self.configs
            .get(&year)
            .cloned()
            .ok_or(RepositoryError::TaxYearNotFound(year))
    }

    fn list_tax_years(&self) -> Result<Vec<TaxYear>, RepositoryError> {
        Ok(self.configs.keys().copied().collect())
    }
}
