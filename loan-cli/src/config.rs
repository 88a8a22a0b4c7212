//! Settings file and command-line overrides.
//!
//! The optional TOML file holds defaults; any flag given on the command line
//! wins over the file.
//!
//! ```toml
//! tax_year = "2025/26"
//! format = "json"
//! log_level = "debug"
//! log_file = "loan-calc.log"
//!
//! [reference]
//! source = "csv"
//! location = "./reference"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use loan_core::TaxYear;
use loan_core::reference::SourceConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::report::OutputFormat;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("cannot read config file '{path}': {message}")]
    Io { path: PathBuf, message: String },

    #[error("invalid config file '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid tax year in config: {0}")]
    TaxYear(#[from] loan_core::ParseTaxYearError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceSection {
    pub source: Option<String>,
    pub location: Option<String>,
}

/// Contents of the TOML settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub tax_year: Option<String>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub reference: ReferenceSection,
}

impl FileConfig {
    pub fn from_toml(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigFileError> {
        toml::from_str(text).map_err(|source| ConfigFileError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigFileError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text, path)
    }
}

/// Values given on the command line, each overriding the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub tax_year: Option<String>,
    pub source: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `None` selects the latest year the reference source holds.
    pub tax_year: Option<TaxYear>,
    pub reference: SourceConfig,
    pub format: OutputFormat,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Merges the file with command-line overrides.
    ///
    /// Giving a data directory without naming a source selects the CSV
    /// source.
    pub fn resolve(
        file: FileConfig,
        overrides: Overrides,
    ) -> Result<Self, ConfigFileError> {
        let tax_year = overrides
            .tax_year
            .or(file.tax_year)
            .map(|y| y.parse::<TaxYear>())
            .transpose()?;

        let location = overrides
            .data_dir
            .map(|d| d.display().to_string())
            .or(file.reference.location);
        let source = overrides
            .source
            .or(file.reference.source)
            .unwrap_or_else(|| {
                if location.is_some() {
                    "csv".to_string()
                } else {
                    SourceConfig::default().source
                }
            });

        Ok(Self {
            tax_year,
            reference: SourceConfig {
                source: source.trim().to_ascii_lowercase(),
                location: location.unwrap_or_default(),
            },
            format: overrides.format.or(file.format).unwrap_or_default(),
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_file: overrides.log_file.or(file.log_file),
        })
    }
}
