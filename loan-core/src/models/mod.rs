mod config_error;
mod income_source;
mod loan_plan;
mod maintenance;
mod tax_bracket;
mod tax_year;
mod tax_year_config;

pub use config_error::ConfigError;
pub use income_source::{IncomeSource, PayFrequency};
pub use loan_plan::{LoanPlan, PlanId};
pub use maintenance::{IncomeBand, LivingSituation, MaintenanceTable, Region};
pub use tax_bracket::{BracketKind, TaxBracket};
pub use tax_year::{ParseTaxYearError, TaxYear};
pub use tax_year_config::{Plan2InterestConfig, TaxYearConfig};
