//! Student loan calculation modules.
//!
//! The building blocks ([`threshold`], [`aggregation`], [`projection`],
//! [`interpolation`], [`brackets`]) are pure functions over reference
//! tables. The [`calculators`] combine them into one result per tool.

pub mod aggregation;
pub mod brackets;
pub mod calculators;
pub mod common;
pub mod interpolation;
pub mod projection;
pub mod threshold;

pub use aggregation::{AggregationResult, EmployerGroup, JobDeduction, aggregate};
pub use brackets::{BracketSlice, accumulate, breakdown, income_linked_rate};
pub use calculators::CalculatorError;
pub use interpolation::interpolate;
pub use projection::{BalanceProjection, MonthInput, MonthlyBreakdown, ProjectionResult};
pub use threshold::{annual_repayment, period_repayment, threshold_repayment};
