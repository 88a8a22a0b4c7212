use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Funding body region, which decides the shape of the means test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    England,
    Scotland,
    Wales,
    NorthernIreland,
}

impl Region {
    pub fn all() -> &'static [Region] {
        &[
            Self::England,
            Self::Scotland,
            Self::Wales,
            Self::NorthernIreland,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::England => "england",
            Self::Scotland => "scotland",
            Self::Wales => "wales",
            Self::NorthernIreland => "northern_ireland",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "england" => Some(Self::England),
            "scotland" => Some(Self::Scotland),
            "wales" => Some(Self::Wales),
            "northern_ireland" | "ni" => Some(Self::NorthernIreland),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::England => f.write_str("England"),
            Self::Scotland => f.write_str("Scotland"),
            Self::Wales => f.write_str("Wales"),
            Self::NorthernIreland => f.write_str("Northern Ireland"),
        }
    }
}

/// Where the student lives during term time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LivingSituation {
    AtHome,
    AwayOther,
    AwayLondon,
}

impl LivingSituation {
    pub fn all() -> &'static [LivingSituation] {
        &[Self::AtHome, Self::AwayOther, Self::AwayLondon]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtHome => "at_home",
            Self::AwayOther => "away_other",
            Self::AwayLondon => "away_london",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "at_home" | "home" => Some(Self::AtHome),
            "away_other" | "away" => Some(Self::AwayOther),
            "away_london" | "london" => Some(Self::AwayLondon),
            _ => None,
        }
    }
}

impl fmt::Display for LivingSituation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::AtHome => f.write_str("living at home"),
            Self::AwayOther => f.write_str("away from home, outside London"),
            Self::AwayLondon => f.write_str("away from home, in London"),
        }
    }
}

/// A tabulated point on the means-testing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBand {
    pub income: Decimal,
    pub amount: Decimal,
}

impl IncomeBand {
    pub fn new(
        income: Decimal,
        amount: Decimal,
    ) -> Self {
        Self { income, amount }
    }
}

/// Maintenance loan breakpoints for one region and living situation.
///
/// The first band carries the maximum loan and the last band the minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceTable {
    pub region: Region,
    pub living: LivingSituation,
    pub bands: Vec<IncomeBand>,
}

impl MaintenanceTable {
    pub fn max_amount(&self) -> Decimal {
        self.bands.first().map_or(Decimal::ZERO, |b| b.amount)
    }

    pub fn min_amount(&self) -> Decimal {
        self.bands.last().map_or(Decimal::ZERO, |b| b.amount)
    }

    /// Validates that incomes strictly ascend and amounts never increase.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bands.is_empty() {
            return Err(ConfigError::EmptyBands {
                region: self.region,
                living: self.living,
            });
        }
        for pair in self.bands.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if hi.income <= lo.income {
                return Err(ConfigError::UnsortedBands {
                    region: self.region,
                    living: self.living,
                    income: hi.income,
                });
            }
            if hi.amount > lo.amount {
                return Err(ConfigError::IncreasingBands {
                    region: self.region,
                    living: self.living,
                    income: hi.income,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn table(bands: Vec<IncomeBand>) -> MaintenanceTable {
        MaintenanceTable {
            region: Region::England,
            living: LivingSituation::AtHome,
            bands,
        }
    }

    #[test]
    fn validate_accepts_decreasing_amounts() {
        let t = table(vec![
            IncomeBand::new(dec!(25000), dec!(8610)),
            IncomeBand::new(dec!(35000), dec!(7387)),
            IncomeBand::new(dec!(40000), dec!(6642)),
        ]);

        assert_eq!(t.validate(), Ok(()));
        assert_eq!(t.max_amount(), dec!(8610));
        assert_eq!(t.min_amount(), dec!(6642));
    }

    #[test]
    fn validate_rejects_unsorted_incomes() {
        let t = table(vec![
            IncomeBand::new(dec!(35000), dec!(7387)),
            IncomeBand::new(dec!(25000), dec!(6642)),
        ]);

        assert_eq!(
            t.validate(),
            Err(ConfigError::UnsortedBands {
                region: Region::England,
                living: LivingSituation::AtHome,
                income: dec!(25000),
            })
        );
    }

    #[test]
    fn validate_rejects_increasing_amounts() {
        let t = table(vec![
            IncomeBand::new(dec!(25000), dec!(6642)),
            IncomeBand::new(dec!(35000), dec!(7387)),
        ]);

        assert!(matches!(
            t.validate(),
            Err(ConfigError::IncreasingBands { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_table() {
        assert!(matches!(
            table(vec![]).validate(),
            Err(ConfigError::EmptyBands { .. })
        ));
    }

    #[test]
    fn region_and_living_parse_loosely() {
        assert_eq!(Region::parse("Northern Ireland"), Some(Region::NorthernIreland));
        assert_eq!(Region::parse("ni"), Some(Region::NorthernIreland));
        assert_eq!(LivingSituation::parse("away-london"), Some(LivingSituation::AwayLondon));
        assert_eq!(LivingSituation::parse("home"), Some(LivingSituation::AtHome));
        assert_eq!(Region::parse("atlantis"), None);
    }
}
