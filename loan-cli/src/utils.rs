use loan_core::calculations::common::{parse_amount, round_half_up};
use loan_core::{IncomeSource, PayFrequency};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when an employment pattern contains something other than
/// employed/unemployed markers.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid employment pattern '{input}': unexpected '{found}' (use 1/0, y/n or E/-)")]
pub struct ParsePatternError {
    input: String,
    found: char,
}

/// Error returned when a `--job` value cannot be turned into an income source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseJobError {
    #[error("unknown pay frequency '{0}' (expected weekly, fortnightly, four_weekly, monthly or annual)")]
    UnknownFrequency(String),

    #[error("job '{0}' has too many fields (expected AMOUNT[:FREQUENCY[:EMPLOYER]])")]
    TooManyFields(String),
}

/// Parses a rate given either as a fraction (`0.03`) or a percentage (`3%`).
///
/// Like every amount, an unparseable rate is zero.
pub fn parse_rate(s: &str) -> Decimal {
    let trimmed = s.trim();
    match trimmed.strip_suffix('%') {
        Some(percent) => parse_amount(percent) / Decimal::ONE_HUNDRED,
        None => parse_amount(trimmed),
    }
}

/// Parses a month-by-month employment pattern such as `111111000000`.
///
/// Spaces, commas and underscores are separators and are ignored.
pub fn parse_pattern(s: &str) -> Result<Vec<bool>, ParsePatternError> {
    s.chars()
        .filter(|c| !matches!(c, ' ' | ',' | '_'))
        .map(|c| match c.to_ascii_lowercase() {
            '1' | 'y' | 'e' => Ok(true),
            '0' | 'n' | '-' => Ok(false),
            found => Err(ParsePatternError {
                input: s.to_string(),
                found,
            }),
        })
        .collect()
}

/// Parses `AMOUNT[:FREQUENCY[:EMPLOYER]]` into an income source.
///
/// The frequency defaults to monthly. The amount is coerced like any other.
pub fn parse_job(
    id: u32,
    s: &str,
) -> Result<IncomeSource, ParseJobError> {
    let parts: Vec<&str> = s.splitn(4, ':').map(str::trim).collect();
    if parts.len() > 3 {
        return Err(ParseJobError::TooManyFields(s.to_string()));
    }

    let amount = parse_amount(parts[0]);
    let frequency = match parts.get(1) {
        Some(f) if !f.is_empty() => {
            PayFrequency::parse(f).ok_or_else(|| ParseJobError::UnknownFrequency(f.to_string()))?
        }
        _ => PayFrequency::default(),
    };

    let source = IncomeSource::new(id, format!("Job {id}"), amount, frequency);
    Ok(match parts.get(2) {
        Some(employer) if !employer.is_empty() => source.with_employer(*employer),
        _ => source,
    })
}

/// Formats an amount as pounds and pence, e.g. `£1,757.70`.
pub fn format_money(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, pence) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}£{grouped}.{pence}")
}

/// Formats a rate as a percentage with up to three decimal places, e.g. `6.2%`.
pub fn format_percent(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED).round_dp(3).normalize();
    format!("{percent}%")
}
