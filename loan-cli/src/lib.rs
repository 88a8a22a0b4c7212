//! Command-line front end for the loan calculators.

pub mod app;
pub mod cli;
pub mod config;
pub mod csv_loader;
pub mod logging;
pub mod report;
pub mod utils;
