use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Which deduction a bracket schedule describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BracketKind {
    IncomeTax,
    NationalInsurance,
}

impl BracketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncomeTax => "income_tax",
            Self::NationalInsurance => "national_insurance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "income_tax" | "tax" => Some(Self::IncomeTax),
            "national_insurance" | "ni" => Some(Self::NationalInsurance),
            _ => None,
        }
    }
}

impl fmt::Display for BracketKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::IncomeTax => f.write_str("income tax"),
            Self::NationalInsurance => f.write_str("National Insurance"),
        }
    }
}

/// One marginal band of a progressive schedule.
///
/// Only income in `[min_income, max_income)` is charged at `rate`; the last
/// band of a schedule has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub kind: BracketKind,
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    /// Slice of `income` that falls inside this bracket.
    pub fn slice_of(
        &self,
        income: Decimal,
    ) -> Decimal {
        let top = match self.max_income {
            Some(max) => income.min(max),
            None => income,
        };
        (top - self.min_income).max(Decimal::ZERO)
    }
}

/// Checks that `brackets` cover `[0, ∞)` in order with no gaps or overlaps.
pub(crate) fn validate_schedule(
    kind: BracketKind,
    brackets: &[TaxBracket],
) -> Result<(), ConfigError> {
    if brackets.is_empty() {
        return Err(ConfigError::EmptyBrackets(kind));
    }

    let mut expected = Decimal::ZERO;
    for (idx, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(ConfigError::InvalidBracketRate {
                kind,
                rate: bracket.rate,
            });
        }
        if bracket.min_income != expected {
            return Err(ConfigError::BracketGap {
                kind,
                expected,
                found: bracket.min_income,
            });
        }
        let is_last = idx + 1 == brackets.len();
        match (bracket.max_income, is_last) {
            (Some(max), false) => {
                if max <= bracket.min_income {
                    return Err(ConfigError::EmptyBracket {
                        kind,
                        min: bracket.min_income,
                    });
                }
                expected = max;
            }
            (None, true) => {}
            _ => return Err(ConfigError::MissingUnboundedBracket(kind)),
        }
    }
    Ok(())
}
