//! Reference tables supplied as CSV files.

mod loader;
mod source;

pub use loader::{
    BRACKETS_FILE, BracketRecord, MAINTENANCE_FILE, MaintenanceRecord, PLAN2_INTEREST_FILE,
    PLANS_FILE, Plan2InterestRecord, PlanRecord, ReferenceLoader, ReferenceLoaderError,
    ReferenceRecords,
};
pub use source::{CsvSource, registry};
