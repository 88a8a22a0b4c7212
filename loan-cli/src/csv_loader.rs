//! CSV loader for the jobs fed to the PAYE calculator.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name).
//!
//! | Column      | Required | Type    | Notes                                              |
//! |-------------|----------|---------|----------------------------------------------------|
//! | `amount`    | yes      | decimal | Gross pay per period; `£` and commas are accepted  |
//! | `frequency` | no       | string  | `weekly`, `fortnightly`, `four_weekly`, `monthly` (default), `annual` |
//! | `employer`  | no       | string  | Jobs with the same employer share one payroll      |
//! | `label`     | no       | string  | Defaults to `Job N`                                |
//!
//! Amounts are coerced the same way as command-line amounts: an empty or
//! unreadable amount is zero.
//!
//! ### Example
//!
//! ```csv
//! label,amount,frequency,employer
//! Bar,"£2,000",monthly,Bar Ltd
//! Shop,2000,monthly,Shop plc
//! ```
use std::path::Path;

use loan_core::calculations::common::parse_amount;
use loan_core::{IncomeSource, PayFrequency};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    amount: String,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    employer: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

/// Errors that can occur while loading jobs.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, counting data rows only.
    #[error("unrecognised pay frequency '{frequency}' on row {row}")]
    InvalidFrequency { frequency: String, row: usize },

    #[error("row {row} is beyond the supported number of jobs")]
    TooManyRows { row: usize },

    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<IncomeSource, CsvLoadError> {
    let frequency = match row.frequency.as_deref().map(str::trim) {
        None | Some("") => PayFrequency::default(),
        Some(f) => PayFrequency::parse(f).ok_or_else(|| CsvLoadError::InvalidFrequency {
            frequency: f.to_string(),
            row: row_number,
        })?,
    };

    let id =
        u32::try_from(row_number).map_err(|_| CsvLoadError::TooManyRows { row: row_number })?;
    let label = row
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| format!("Job {id}"));
    let source = IncomeSource::new(id, label, parse_amount(&row.amount), frequency);

    Ok(match row.employer {
        Some(employer) if !employer.trim().is_empty() => source.with_employer(employer),
        _ => source,
    })
}

/// Parses CSV text into income sources, in file order. Ids are the 1-based
/// row numbers.
pub fn load_from_str(input: &str) -> Result<Vec<IncomeSource>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

pub fn load_from_file(path: &Path) -> Result<Vec<IncomeSource>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CsvLoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    load_from_str(&contents)
}
