use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use loan_core::{
    BracketKind, ConfigError, IncomeBand, LivingSituation, LoanPlan, MaintenanceTable, PlanId,
    Plan2InterestConfig, Region, TaxBracket, TaxYear, TaxYearConfig,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

pub const PLANS_FILE: &str = "plans.csv";
pub const BRACKETS_FILE: &str = "brackets.csv";
pub const MAINTENANCE_FILE: &str = "maintenance.csv";
pub const PLAN2_INTEREST_FILE: &str = "plan2_interest.csv";

/// Errors that can occur when loading reference tables.
#[derive(Debug, Error)]
pub enum ReferenceLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("unknown loan plan '{0}'")]
    UnknownPlan(String),

    #[error("unknown bracket kind '{0}' (expected income_tax or national_insurance)")]
    UnknownBracketKind(String),

    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    #[error("unknown living situation '{0}'")]
    UnknownLivingSituation(String),

    #[error("no Plan 2 interest row for tax year {0}")]
    MissingPlan2Interest(TaxYear),

    #[error("more than one Plan 2 interest row for tax year {0}")]
    DuplicatePlan2Interest(TaxYear),

    #[error("invalid tables for tax year {year}: {source}")]
    InvalidTable {
        year: TaxYear,
        #[source]
        source: ConfigError,
    },
}

impl From<csv::Error> for ReferenceLoaderError {
    fn from(err: csv::Error) -> Self {
        ReferenceLoaderError::CsvParse(err.to_string())
    }
}

/// A row of `plans.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlanRecord {
    #[serde(deserialize_with = "deserialize_tax_year")]
    pub tax_year: TaxYear,
    pub plan: String,
    pub annual_threshold: Decimal,
    pub monthly_threshold: Decimal,
    pub weekly_threshold: Decimal,
    pub repayment_rate: Decimal,
    pub write_off_years: u32,
    pub interest_rate: Decimal,
}

/// A row of `brackets.csv`. An empty `max_income` is the top bracket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    #[serde(deserialize_with = "deserialize_tax_year")]
    pub tax_year: TaxYear,
    pub kind: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// A row of `maintenance.csv`: one breakpoint of one table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MaintenanceRecord {
    #[serde(deserialize_with = "deserialize_tax_year")]
    pub tax_year: TaxYear,
    pub region: String,
    pub living: String,
    pub income: Decimal,
    pub amount: Decimal,
}

/// A row of `plan2_interest.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Plan2InterestRecord {
    #[serde(deserialize_with = "deserialize_tax_year")]
    pub tax_year: TaxYear,
    pub lower_threshold: Decimal,
    pub upper_threshold: Decimal,
    pub rpi: Decimal,
    pub max_premium: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_tax_year<'de, D>(deserializer: D) -> Result<TaxYear, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<TaxYear>().map_err(serde::de::Error::custom)
}

/// All four tables as parsed rows, before grouping by year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceRecords {
    pub plans: Vec<PlanRecord>,
    pub brackets: Vec<BracketRecord>,
    pub maintenance: Vec<MaintenanceRecord>,
    pub plan2_interest: Vec<Plan2InterestRecord>,
}

/// Loader for reference tables kept as CSV files.
///
/// A data directory holds `plans.csv`, `brackets.csv`, `maintenance.csv` and
/// `plan2_interest.csv`. Every row carries its tax year (`2025/26` or
/// `2025`), so one set of files can describe several years. Headers are
/// matched by name and surrounding whitespace is ignored.
pub struct ReferenceLoader;

impl ReferenceLoader {
    pub fn parse_plans<R: Read>(reader: R) -> Result<Vec<PlanRecord>, ReferenceLoaderError> {
        Self::parse(reader)
    }

    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, ReferenceLoaderError> {
        Self::parse(reader)
    }

    pub fn parse_maintenance<R: Read>(
        reader: R
    ) -> Result<Vec<MaintenanceRecord>, ReferenceLoaderError> {
        Self::parse(reader)
    }

    pub fn parse_plan2_interest<R: Read>(
        reader: R
    ) -> Result<Vec<Plan2InterestRecord>, ReferenceLoaderError> {
        Self::parse(reader)
    }

    fn parse<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, ReferenceLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: T = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Reads every table from `dir`.
    pub fn read_dir(dir: &Path) -> Result<ReferenceRecords, ReferenceLoaderError> {
        Ok(ReferenceRecords {
            plans: Self::parse_plans(open(&dir.join(PLANS_FILE))?)?,
            brackets: Self::parse_brackets(open(&dir.join(BRACKETS_FILE))?)?,
            maintenance: Self::parse_maintenance(open(&dir.join(MAINTENANCE_FILE))?)?,
            plan2_interest: Self::parse_plan2_interest(open(&dir.join(PLAN2_INTEREST_FILE))?)?,
        })
    }

    /// Reads and assembles every table in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Vec<TaxYearConfig>, ReferenceLoaderError> {
        let records = Self::read_dir(dir)?;
        let configs = Self::assemble(&records)?;
        debug!(dir = %dir.display(), years = configs.len(), "loaded reference tables from CSV");
        Ok(configs)
    }

    /// Groups rows into one validated [`TaxYearConfig`] per tax year.
    ///
    /// The years are those named in `plans.csv`. Brackets and bands are
    /// sorted by income, so row order within a file does not matter. Rows
    /// for years with no plans are skipped with a warning.
    pub fn assemble(records: &ReferenceRecords) -> Result<Vec<TaxYearConfig>, ReferenceLoaderError> {
        let mut years: BTreeMap<TaxYear, TaxYearConfig> = BTreeMap::new();

        for record in &records.plans {
            let plan = PlanId::parse(&record.plan)
                .ok_or_else(|| ReferenceLoaderError::UnknownPlan(record.plan.clone()))?;
            years
                .entry(record.tax_year)
                .or_insert_with(|| empty_config(record.tax_year))
                .plans
                .push(LoanPlan {
                    plan,
                    annual_threshold: record.annual_threshold,
                    monthly_threshold: record.monthly_threshold,
                    weekly_threshold: record.weekly_threshold,
                    repayment_rate: record.repayment_rate,
                    write_off_years: record.write_off_years,
                    interest_rate: record.interest_rate,
                });
        }

        for record in &records.brackets {
            let kind = BracketKind::parse(&record.kind)
                .ok_or_else(|| ReferenceLoaderError::UnknownBracketKind(record.kind.clone()))?;
            let Some(config) = year_for(&mut years, record.tax_year, BRACKETS_FILE) else {
                continue;
            };
            let bracket = TaxBracket {
                kind,
                min_income: record.min_income,
                max_income: record.max_income,
                rate: record.rate,
            };
            match kind {
                BracketKind::IncomeTax => config.income_tax.push(bracket),
                BracketKind::NationalInsurance => config.national_insurance.push(bracket),
            }
        }

        for record in &records.maintenance {
            let region = Region::parse(&record.region)
                .ok_or_else(|| ReferenceLoaderError::UnknownRegion(record.region.clone()))?;
            let living = LivingSituation::parse(&record.living).ok_or_else(|| {
                ReferenceLoaderError::UnknownLivingSituation(record.living.clone())
            })?;
            let Some(config) = year_for(&mut years, record.tax_year, MAINTENANCE_FILE) else {
                continue;
            };
            let band = IncomeBand::new(record.income, record.amount);
            match config
                .maintenance
                .iter_mut()
                .find(|t| t.region == region && t.living == living)
            {
                Some(table) => table.bands.push(band),
                None => config.maintenance.push(MaintenanceTable {
                    region,
                    living,
                    bands: vec![band],
                }),
            }
        }

        let mut interest_seen = Vec::new();
        for record in &records.plan2_interest {
            let Some(config) = year_for(&mut years, record.tax_year, PLAN2_INTEREST_FILE) else {
                continue;
            };
            if interest_seen.contains(&record.tax_year) {
                return Err(ReferenceLoaderError::DuplicatePlan2Interest(record.tax_year));
            }
            interest_seen.push(record.tax_year);
            config.plan2_interest = Plan2InterestConfig {
                lower_threshold: record.lower_threshold,
                upper_threshold: record.upper_threshold,
                rpi: record.rpi,
                max_premium: record.max_premium,
            };
        }

        let mut configs = Vec::with_capacity(years.len());
        for (year, mut config) in years {
            if !interest_seen.contains(&year) {
                return Err(ReferenceLoaderError::MissingPlan2Interest(year));
            }
            config.income_tax.sort_by_key(|b| b.min_income);
            config.national_insurance.sort_by_key(|b| b.min_income);
            for table in &mut config.maintenance {
                table.bands.sort_by_key(|b| b.income);
            }
            config
                .validate()
                .map_err(|source| ReferenceLoaderError::InvalidTable { year, source })?;
            configs.push(config);
        }

        Ok(configs)
    }
}

fn open(path: &Path) -> Result<File, ReferenceLoaderError> {
    File::open(path).map_err(|e| ReferenceLoaderError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn empty_config(tax_year: TaxYear) -> TaxYearConfig {
    TaxYearConfig {
        tax_year,
        plans: Vec::new(),
        income_tax: Vec::new(),
        national_insurance: Vec::new(),
        plan2_interest: Plan2InterestConfig {
            lower_threshold: Decimal::ZERO,
            upper_threshold: Decimal::ZERO,
            rpi: Decimal::ZERO,
            max_premium: Decimal::ZERO,
        },
        maintenance: Vec::new(),
    }
}

fn year_for<'a>(
    years: &'a mut BTreeMap<TaxYear, TaxYearConfig>,
    year: TaxYear,
    file: &str,
) -> Option<&'a mut TaxYearConfig> {
    let config = years.get_mut(&year);
    if config.is_none() {
        warn!(tax_year = %year, file, "skipping row for a tax year with no plans");
    }
    config
}
