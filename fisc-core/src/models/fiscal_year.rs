use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FiscError;

/// Fiscal years with a published rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum FiscalYear {
    #[default]
    Y2025,
    Y2026,
}

impl FiscalYear {
    pub const ALL: [FiscalYear; 2] = [FiscalYear::Y2025, FiscalYear::Y2026];

    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Y2025 => 2025,
            Self::Y2026 => 2026,
        }
    }
}

impl TryFrom<i32> for FiscalYear {
    type Error = FiscError;

    fn try_from(year: i32) -> Result<Self, Self::Error> {
        match year {
            2025 => Ok(Self::Y2025),
            2026 => Ok(Self::Y2026),
            other => Err(FiscError::Configuration(format!(
                "unsupported fiscal year {other}; supported: 2025, 2026"
            ))),
        }
    }
}

impl From<FiscalYear> for i32 {
    fn from(year: FiscalYear) -> Self {
        year.as_i32()
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// Length of the period an amount covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Monthly,
    #[default]
    Annual,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" | "m" => Some(Self::Monthly),
            "annual" | "yearly" | "year" | "a" => Some(Self::Annual),
            _ => None,
        }
    }

    /// Number of these periods in a year.
    pub fn per_year(&self) -> Decimal {
        match self {
            Self::Monthly => Decimal::from(12),
            Self::Annual => Decimal::ONE,
        }
    }
}

/// Half of the fiscal year, used to pick the minimum wage when it changes
/// mid-year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WagePeriod {
    #[default]
    FirstHalf,
    SecondHalf,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn try_from_accepts_supported_years() {
        assert_eq!(FiscalYear::try_from(2025), Ok(FiscalYear::Y2025));
        assert_eq!(FiscalYear::try_from(2026), Ok(FiscalYear::Y2026));
    }

    #[test]
    fn try_from_rejects_unknown_year_without_fallback() {
        let result = FiscalYear::try_from(2024);

        assert!(matches!(result, Err(FiscError::Configuration(_))));
    }

    #[test]
    fn period_parse_accepts_aliases() {
        assert_eq!(Period::parse("Monthly"), Some(Period::Monthly));
        assert_eq!(Period::parse("year"), Some(Period::Annual));
        assert_eq!(Period::parse("weekly"), None);
    }

    #[test]
    fn per_year_counts_months() {
        assert_eq!(Period::Monthly.per_year(), Decimal::from(12));
        assert_eq!(Period::Annual.per_year(), Decimal::ONE);
    }
}
