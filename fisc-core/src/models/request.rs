use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Currency, FiscalYear, Period, Scenario, TaxpayerProfile, WagePeriod};

/// A single-scenario calculation as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub scenario: Scenario,
    pub gross_income: Decimal,
    pub currency: Currency,
    #[serde(default)]
    pub fiscal_year: FiscalYear,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub wage_period: WagePeriod,
    #[serde(default)]
    pub profile: TaxpayerProfile,
}

impl CalculationRequest {
    /// Creates an annual request for 2025 with a default profile.
    pub fn new(
        scenario: Scenario,
        gross_income: Decimal,
        currency: Currency,
    ) -> Self {
        Self {
            scenario,
            gross_income,
            currency,
            fiscal_year: FiscalYear::default(),
            period: Period::default(),
            wage_period: WagePeriod::default(),
            profile: TaxpayerProfile::default(),
        }
    }
}

/// The same income evaluated under several scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub gross_income: Decimal,
    pub currency: Currency,
    #[serde(default)]
    pub fiscal_year: FiscalYear,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub wage_period: WagePeriod,
    #[serde(default)]
    pub profile: TaxpayerProfile,
}

impl ComparisonRequest {
    pub fn new(
        gross_income: Decimal,
        currency: Currency,
    ) -> Self {
        Self {
            gross_income,
            currency,
            fiscal_year: FiscalYear::default(),
            period: Period::default(),
            wage_period: WagePeriod::default(),
            profile: TaxpayerProfile::default(),
        }
    }

    /// Builds the single-scenario request for one entry of the comparison.
    pub fn for_scenario(
        &self,
        scenario: Scenario,
    ) -> CalculationRequest {
        CalculationRequest {
            scenario,
            gross_income: self.gross_income,
            currency: self.currency,
            fiscal_year: self.fiscal_year,
            period: self.period,
            wage_period: self.wage_period,
            profile: self.profile.clone(),
        }
    }
}
