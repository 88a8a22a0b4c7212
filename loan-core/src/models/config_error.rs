use rust_decimal::Decimal;
use thiserror::Error;

use super::{BracketKind, LivingSituation, PlanId, Region};

/// Errors raised when a reference table fails validation.
///
/// Calculations assume a validated [`TaxYearConfig`](super::TaxYearConfig);
/// every table is checked once when it enters a repository.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("repayment rate for {plan} must be in (0, 1], got {rate}")]
    InvalidRepaymentRate { plan: PlanId, rate: Decimal },

    #[error("interest rate for {plan} must be non-negative, got {rate}")]
    InvalidInterestRate { plan: PlanId, rate: Decimal },

    #[error(
        "thresholds for {plan} are inconsistent: annual {annual}, monthly {monthly}, weekly {weekly}"
    )]
    InconsistentThresholds {
        plan: PlanId,
        annual: Decimal,
        monthly: Decimal,
        weekly: Decimal,
    },

    #[error("write-off period for {plan} must be between 1 and 40 years, got {years}")]
    InvalidWriteOffYears { plan: PlanId, years: u32 },

    #[error("plan {0} is defined more than once")]
    DuplicatePlan(PlanId),

    #[error("no {0} brackets provided")]
    EmptyBrackets(BracketKind),

    #[error("{kind} brackets must be contiguous from 0: expected a bracket starting at {expected}, found {found}")]
    BracketGap {
        kind: BracketKind,
        expected: Decimal,
        found: Decimal,
    },

    #[error("{kind} bracket starting at {min} must end above its start")]
    EmptyBracket { kind: BracketKind, min: Decimal },

    #[error("{0} brackets must end with exactly one unbounded bracket")]
    MissingUnboundedBracket(BracketKind),

    #[error("{kind} bracket rate must be between 0 and 1, got {rate}")]
    InvalidBracketRate { kind: BracketKind, rate: Decimal },

    #[error("no maintenance bands for {region} / {living}")]
    EmptyBands {
        region: Region,
        living: LivingSituation,
    },

    #[error("maintenance bands for {region} / {living} are not strictly ascending at income {income}")]
    UnsortedBands {
        region: Region,
        living: LivingSituation,
        income: Decimal,
    },

    #[error("maintenance amount for {region} / {living} increases at income {income}")]
    IncreasingBands {
        region: Region,
        living: LivingSituation,
        income: Decimal,
    },

    #[error("maintenance table for {region} / {living} is defined more than once")]
    DuplicateBands {
        region: Region,
        living: LivingSituation,
    },

    #[error("plan 2 interest thresholds are inverted: lower {lower}, upper {upper}")]
    InvertedInterestThresholds { lower: Decimal, upper: Decimal },

    #[error("plan 2 interest rates must be non-negative: rpi {rpi}, premium {premium}")]
    NegativeInterestRate { rpi: Decimal, premium: Decimal },
}
