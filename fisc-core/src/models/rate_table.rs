//! Per-fiscal-year contribution and tax rates.
//!
//! A [`RateTable`] is built by merging the year-invariant base rates with the
//! overrides published for a given year. Tables are plain values: once
//! constructed they are never mutated.
//!
//! | Item                          | 2025             | 2026             |
//! |-------------------------------|------------------|------------------|
//! | Minimum wage (Jan-Jun)        | 4,050            | 4,050            |
//! | Minimum wage (Jul-Dec)        | 4,050            | 4,325            |
//! | PFA income tax                | 10%              | 16%              |
//! | PFA health ceiling            | 60 × min. wage   | 72 × min. wage   |
//! | Micro tax                     | 1% / 3% at 60k € | 1% flat          |
//! | Dividend tax                  | 10%              | 16%              |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_core::{FiscalYear, RateTable};
//!
//! let rates = RateTable::for_year(FiscalYear::Y2026);
//!
//! assert_eq!(rates.company.dividend_tax_rate, dec!(0.16));
//! assert_eq!(rates.sole_proprietor.health_ceiling(), dec!(72));
//! assert!(rates.validate().is_ok());
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{FiscalYear, WagePeriod};
use crate::FiscError;

/// Errors raised when a rate table violates its invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateTableError {
    /// A rate must be a fraction in [0, 1].
    #[error("{name} must be between 0 and 1, got {value}")]
    RateOutOfRange { name: &'static str, value: Decimal },

    /// An amount that scales other values must be strictly positive.
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: Decimal },

    /// A fixed amount must not be negative.
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: Decimal },

    /// Cap multiples must be listed in strictly increasing order.
    #[error("{name} must be strictly increasing")]
    CapsNotIncreasing { name: &'static str },

    /// A cap list needs at least one tier.
    #[error("{name} must not be empty")]
    EmptyCaps { name: &'static str },
}

/// Employment contract (CIM) rates. Amounts are monthly RON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentRates {
    /// Pension contribution (CAS).
    pub pension_rate: Decimal,
    /// Health contribution (CASS).
    pub health_rate: Decimal,
    pub income_tax_rate: Decimal,
    /// Employer-paid labor insurance contribution (CAM).
    pub employer_contribution_rate: Decimal,
    /// Share of the minimum wage granted as supplementary deduction under 26.
    pub youth_deduction_rate: Decimal,
    pub per_child_deduction: Decimal,
    /// Untaxed slice of a minimum-wage salary.
    pub tax_free_allowance: Decimal,
    /// Personal deductions stop once gross exceeds minimum wage by this much.
    pub deduction_threshold_offset: Decimal,
    pub deduction_step: Decimal,
    pub deduction_step_reduction: Decimal,
    /// Starting deduction percentage indexed by dependents (0 to 4+).
    pub base_deduction_percentages: [Decimal; 5],
}

/// Sole proprietor (PFA) rates. Caps are multiples of the minimum wage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoleProprietorRates {
    pub pension_rate: Decimal,
    pub pension_cap_low: Decimal,
    pub pension_cap_high: Decimal,
    pub health_rate: Decimal,
    /// Ordered health base tiers; the first is the floor, the last the ceiling.
    pub health_caps: Vec<Decimal>,
    pub income_tax_rate: Decimal,
}

impl SoleProprietorRates {
    pub fn health_floor(&self) -> Decimal {
        self.health_caps.first().copied().unwrap_or(Decimal::ZERO)
    }

    pub fn health_ceiling(&self) -> Decimal {
        self.health_caps.last().copied().unwrap_or(Decimal::ZERO)
    }
}

/// Company (SRL) rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRates {
    pub micro_tax_low: Decimal,
    pub micro_tax_high: Decimal,
    /// Annual revenue, in EUR, above which the high micro rate applies.
    pub revenue_threshold_eur: Decimal,
    pub profit_tax_rate: Decimal,
    pub dividend_tax_rate: Decimal,
    pub health_on_dividends_rate: Decimal,
    /// Health-on-dividends tiers as minimum-wage multiples; the last is the cap.
    pub health_dividend_tiers: Vec<Decimal>,
}

impl CompanyRates {
    pub fn health_dividend_cap(&self) -> Decimal {
        self.health_dividend_tiers
            .last()
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalConstants {
    pub minimum_wage: Decimal,
    pub minimum_wage_second_half: Decimal,
    /// Reference EUR/RON rate used until a live rate is known.
    pub eur_ron_rate: Decimal,
}

impl FiscalConstants {
    pub fn minimum_wage_for(
        &self,
        period: WagePeriod,
    ) -> Decimal {
        match period {
            WagePeriod::FirstHalf => self.minimum_wage,
            WagePeriod::SecondHalf => self.minimum_wage_second_half,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pub fiscal_year: FiscalYear,
    pub employment: EmploymentRates,
    pub sole_proprietor: SoleProprietorRates,
    pub company: CompanyRates,
    pub constants: FiscalConstants,
}

/// Values that differ between fiscal years.
struct YearOverrides {
    pfa_income_tax_rate: Decimal,
    pfa_health_ceiling: Decimal,
    micro_tax_high: Decimal,
    revenue_threshold_eur: Decimal,
    dividend_tax_rate: Decimal,
    minimum_wage: Decimal,
    minimum_wage_second_half: Decimal,
}

impl YearOverrides {
    fn for_year(year: FiscalYear) -> Self {
        match year {
            FiscalYear::Y2025 => Self {
                pfa_income_tax_rate: dec!(0.10),
                pfa_health_ceiling: dec!(60),
                micro_tax_high: dec!(0.03),
                revenue_threshold_eur: dec!(60000),
                dividend_tax_rate: dec!(0.10),
                minimum_wage: dec!(4050),
                minimum_wage_second_half: dec!(4050),
            },
            FiscalYear::Y2026 => Self {
                pfa_income_tax_rate: dec!(0.16),
                pfa_health_ceiling: dec!(72),
                micro_tax_high: dec!(0.01),
                revenue_threshold_eur: dec!(100000),
                dividend_tax_rate: dec!(0.16),
                minimum_wage: dec!(4050),
                minimum_wage_second_half: dec!(4325),
            },
        }
    }
}

impl RateTable {
    /// Builds the table for a supported fiscal year.
    pub fn for_year(year: FiscalYear) -> Self {
        let o = YearOverrides::for_year(year);

        Self {
            fiscal_year: year,
            employment: EmploymentRates {
                pension_rate: dec!(0.25),
                health_rate: dec!(0.10),
                income_tax_rate: dec!(0.10),
                employer_contribution_rate: dec!(0.0225),
                youth_deduction_rate: dec!(0.15),
                per_child_deduction: dec!(100),
                tax_free_allowance: dec!(300),
                deduction_threshold_offset: dec!(2000),
                deduction_step: dec!(50),
                deduction_step_reduction: dec!(0.005),
                base_deduction_percentages: [
                    dec!(0.20),
                    dec!(0.25),
                    dec!(0.30),
                    dec!(0.35),
                    dec!(0.45),
                ],
            },
            sole_proprietor: SoleProprietorRates {
                pension_rate: dec!(0.25),
                pension_cap_low: dec!(12),
                pension_cap_high: dec!(24),
                health_rate: dec!(0.10),
                health_caps: vec![dec!(6), dec!(12), dec!(24), o.pfa_health_ceiling],
                income_tax_rate: o.pfa_income_tax_rate,
            },
            company: CompanyRates {
                micro_tax_low: dec!(0.01),
                micro_tax_high: o.micro_tax_high,
                revenue_threshold_eur: o.revenue_threshold_eur,
                profit_tax_rate: dec!(0.16),
                dividend_tax_rate: o.dividend_tax_rate,
                health_on_dividends_rate: dec!(0.10),
                health_dividend_tiers: vec![dec!(6), dec!(12), dec!(24)],
            },
            constants: FiscalConstants {
                minimum_wage: o.minimum_wage,
                minimum_wage_second_half: o.minimum_wage_second_half,
                eur_ron_rate: dec!(5.0),
            },
        }
    }

    /// Looks up the table for a calendar year number.
    ///
    /// # Errors
    ///
    /// Returns [`FiscError::Configuration`] for years without a table.
    pub fn lookup(year: i32) -> Result<Self, FiscError> {
        FiscalYear::try_from(year).map(Self::for_year)
    }

    pub fn minimum_wage(
        &self,
        period: WagePeriod,
    ) -> Decimal {
        self.constants.minimum_wage_for(period)
    }

    /// Checks the table invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] for the first violated invariant:
    /// - any rate outside [0, 1]
    /// - cap multiples not strictly increasing, or an empty cap list
    /// - a non-positive minimum wage, exchange rate or deduction step
    /// - a negative fixed deduction or allowance
    pub fn validate(&self) -> Result<(), RateTableError> {
        let e = &self.employment;
        let p = &self.sole_proprietor;
        let c = &self.company;

        let rates = [
            ("cim.pension_rate", e.pension_rate),
            ("cim.health_rate", e.health_rate),
            ("cim.income_tax_rate", e.income_tax_rate),
            ("cim.employer_contribution_rate", e.employer_contribution_rate),
            ("cim.youth_deduction_rate", e.youth_deduction_rate),
            ("cim.deduction_step_reduction", e.deduction_step_reduction),
            ("pfa.pension_rate", p.pension_rate),
            ("pfa.health_rate", p.health_rate),
            ("pfa.income_tax_rate", p.income_tax_rate),
            ("srl.micro_tax_low", c.micro_tax_low),
            ("srl.micro_tax_high", c.micro_tax_high),
            ("srl.profit_tax_rate", c.profit_tax_rate),
            ("srl.dividend_tax_rate", c.dividend_tax_rate),
            ("srl.health_on_dividends_rate", c.health_on_dividends_rate),
        ];
        for (name, value) in rates {
            check_fraction(name, value)?;
        }
        for value in e.base_deduction_percentages {
            check_fraction("cim.base_deduction_percentages", value)?;
        }

        for (name, value) in [
            ("cim.per_child_deduction", e.per_child_deduction),
            ("cim.tax_free_allowance", e.tax_free_allowance),
            ("cim.deduction_threshold_offset", e.deduction_threshold_offset),
        ] {
            if value < Decimal::ZERO {
                return Err(RateTableError::Negative { name, value });
            }
        }

        for (name, value) in [
            ("cim.deduction_step", e.deduction_step),
            ("constants.minimum_wage", self.constants.minimum_wage),
            (
                "constants.minimum_wage_second_half",
                self.constants.minimum_wage_second_half,
            ),
            ("constants.eur_ron_rate", self.constants.eur_ron_rate),
            ("srl.revenue_threshold_eur", c.revenue_threshold_eur),
        ] {
            if value <= Decimal::ZERO {
                return Err(RateTableError::NotPositive { name, value });
            }
        }

        check_increasing("pfa.pension_caps", &[p.pension_cap_low, p.pension_cap_high])?;
        check_increasing("pfa.health_caps", &p.health_caps)?;
        check_increasing("srl.health_dividend_tiers", &c.health_dividend_tiers)?;

        Ok(())
    }
}

fn check_fraction(
    name: &'static str,
    value: Decimal,
) -> Result<(), RateTableError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RateTableError::RateOutOfRange { name, value });
    }
    Ok(())
}

fn check_increasing(
    name: &'static str,
    caps: &[Decimal],
) -> Result<(), RateTableError> {
    if caps.is_empty() {
        return Err(RateTableError::EmptyCaps { name });
    }
    if caps.iter().any(|cap| *cap <= Decimal::ZERO) {
        return Err(RateTableError::CapsNotIncreasing { name });
    }
    if caps.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(RateTableError::CapsNotIncreasing { name });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // for_year / lookup
    // =========================================================================

    #[test]
    fn tables_for_all_years_are_valid() {
        for year in FiscalYear::ALL {
            assert_eq!(RateTable::for_year(year).validate(), Ok(()), "{year}");
        }
    }

    #[test]
    fn years_differ_in_dividend_and_income_tax() {
        let y2025 = RateTable::for_year(FiscalYear::Y2025);
        let y2026 = RateTable::for_year(FiscalYear::Y2026);

        assert_eq!(y2025.company.dividend_tax_rate, dec!(0.10));
        assert_eq!(y2026.company.dividend_tax_rate, dec!(0.16));
        assert_eq!(y2025.sole_proprietor.income_tax_rate, dec!(0.10));
        assert_eq!(y2026.sole_proprietor.income_tax_rate, dec!(0.16));
    }

    #[test]
    fn base_rates_are_shared_between_years() {
        let y2025 = RateTable::for_year(FiscalYear::Y2025);
        let y2026 = RateTable::for_year(FiscalYear::Y2026);

        assert_eq!(y2025.employment, y2026.employment);
        assert_eq!(y2025.company.profit_tax_rate, y2026.company.profit_tax_rate);
    }

    #[test]
    fn health_ceiling_depends_on_year() {
        assert_eq!(
            RateTable::for_year(FiscalYear::Y2025)
                .sole_proprietor
                .health_ceiling(),
            dec!(60)
        );
        assert_eq!(
            RateTable::for_year(FiscalYear::Y2026)
                .sole_proprietor
                .health_ceiling(),
            dec!(72)
        );
    }

    #[test]
    fn minimum_wage_splits_2026_by_half_year() {
        let rates = RateTable::for_year(FiscalYear::Y2026);

        assert_eq!(rates.minimum_wage(WagePeriod::FirstHalf), dec!(4050));
        assert_eq!(rates.minimum_wage(WagePeriod::SecondHalf), dec!(4325));
    }

    #[test]
    fn lookup_rejects_unknown_year() {
        assert!(matches!(
            RateTable::lookup(2030),
            Err(FiscError::Configuration(_))
        ));
    }

    #[test]
    fn lookup_returns_table_for_known_year() {
        let rates = RateTable::lookup(2025).unwrap();

        assert_eq!(rates.fiscal_year, FiscalYear::Y2025);
    }

    // =========================================================================
    // validate
    // =========================================================================

    fn table() -> RateTable {
        RateTable::for_year(FiscalYear::Y2025)
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut rates = table();
        rates.employment.health_rate = dec!(1.10);

        assert_eq!(
            rates.validate(),
            Err(RateTableError::RateOutOfRange {
                name: "cim.health_rate",
                value: dec!(1.10),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_rate() {
        let mut rates = table();
        rates.company.dividend_tax_rate = dec!(-0.01);

        assert_eq!(
            rates.validate(),
            Err(RateTableError::RateOutOfRange {
                name: "srl.dividend_tax_rate",
                value: dec!(-0.01),
            })
        );
    }

    #[test]
    fn validate_rejects_zero_minimum_wage() {
        let mut rates = table();
        rates.constants.minimum_wage = Decimal::ZERO;

        assert_eq!(
            rates.validate(),
            Err(RateTableError::NotPositive {
                name: "constants.minimum_wage",
                value: Decimal::ZERO,
            })
        );
    }

    #[test]
    fn validate_rejects_negative_child_deduction() {
        let mut rates = table();
        rates.employment.per_child_deduction = dec!(-100);

        assert_eq!(
            rates.validate(),
            Err(RateTableError::Negative {
                name: "cim.per_child_deduction",
                value: dec!(-100),
            })
        );
    }

    #[test]
    fn validate_rejects_unordered_health_caps() {
        let mut rates = table();
        rates.sole_proprietor.health_caps = vec![dec!(6), dec!(24), dec!(12)];

        assert_eq!(
            rates.validate(),
            Err(RateTableError::CapsNotIncreasing {
                name: "pfa.health_caps"
            })
        );
    }

    #[test]
    fn validate_rejects_inverted_pension_caps() {
        let mut rates = table();
        rates.sole_proprietor.pension_cap_low = dec!(24);
        rates.sole_proprietor.pension_cap_high = dec!(12);

        assert_eq!(
            rates.validate(),
            Err(RateTableError::CapsNotIncreasing {
                name: "pfa.pension_caps"
            })
        );
    }

    #[test]
    fn validate_rejects_empty_dividend_tiers() {
        let mut rates = table();
        rates.company.health_dividend_tiers.clear();

        assert_eq!(
            rates.validate(),
            Err(RateTableError::EmptyCaps {
                name: "srl.health_dividend_tiers"
            })
        );
    }
}
