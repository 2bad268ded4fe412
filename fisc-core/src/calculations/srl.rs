//! Company (SRL) annual calculation for an owner who extracts profit as
//! dividends.
//!
//! Two regimes are modelled:
//!
//! | Regime | Corporate tax | Requirement |
//! |--------|---------------|-------------|
//! | Micro  | 1% of revenue, or the high rate above the EUR threshold | one employee, modelled as the owner on minimum wage |
//! | Profit | 16% of revenue − expenses − reinvested profit | none |
//!
//! Whatever remains after corporate tax (and, for micro, after the salary
//! cost) is distributed as dividends. Dividends pay dividend tax, and the
//! owner pays health contribution on a base pinned to the highest dividend
//! tier reached.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_core::calculations::{CompanyCalculator, CompanyInput};
//! use fisc_core::{FiscalYear, RateTable};
//!
//! let rates = RateTable::for_year(FiscalYear::Y2025);
//! let input = CompanyInput {
//!     revenue: dec!(200000),
//!     expenses: dec!(50000),
//!     reinvested_profit: dec!(20000),
//!     has_employee: false,
//!     minimum_wage: dec!(4050),
//!     eur_ron_rate: dec!(5),
//!     ..CompanyInput::default()
//! };
//!
//! let result = CompanyCalculator::new(&rates).calculate(&input).unwrap();
//!
//! assert_eq!(result.net, dec!(88560.00));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::cim::{EmploymentCalculator, EmploymentInput};
use crate::calculations::common::{max, pinned_tier_base, round_half_up};
use crate::models::{
    Breakdown, CalculationResult, CompanyRates, CompanyRegime, Currency, Period, RateTable,
    RateTableError, SrlBreakdown,
};

const MONTHS: Decimal = dec!(12);

/// Annual SRL input, in RON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInput {
    pub revenue: Decimal,
    pub expenses: Decimal,
    /// Profit kept in the company; only the profit regime deducts it.
    pub reinvested_profit: Decimal,
    /// Selects the micro regime, which requires an employee.
    pub has_employee: bool,
    /// Applies to the owner-employee's salary, not to dividends.
    pub handicapped: bool,
    pub minimum_wage: Decimal,
    /// EUR→RON rate used to convert the micro revenue threshold.
    pub eur_ron_rate: Decimal,
}

/// Company-level amounts computed by either regime before dividends.
struct CompanyLevel {
    regime: CompanyRegime,
    corporate_tax_rate: Decimal,
    corporate_tax: Decimal,
    reinvested_profit: Decimal,
    employee_gross_salary: Decimal,
    employer_contribution: Decimal,
    employee_taxes: Decimal,
    employee_net_salary: Decimal,
    distributable: Decimal,
}

/// Calculator for the annual SRL owner income.
#[derive(Debug, Clone)]
pub struct CompanyCalculator<'a> {
    rates: &'a RateTable,
}

impl<'a> CompanyCalculator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// # Errors
    ///
    /// Returns [`RateTableError`] if the rate table fails validation.
    pub fn calculate(
        &self,
        input: &CompanyInput,
    ) -> Result<CalculationResult, RateTableError> {
        self.rates.validate()?;
        let rates = &self.rates.company;

        let company = if input.has_employee {
            self.micro(rates, input)?
        } else {
            self.profit(rates, input)
        };

        let dividend_base = self.dividend_base(company.distributable);
        let dividend_tax = round_half_up(dividend_base * rates.dividend_tax_rate);
        let net_dividends = dividend_base - dividend_tax;

        let health_base = pinned_tier_base(
            dividend_base,
            input.minimum_wage,
            &rates.health_dividend_tiers,
        );
        let health = round_half_up(health_base * rates.health_on_dividends_rate);
        let health_cap = rates.health_dividend_cap() * input.minimum_wage;
        let health_capped = health_base > Decimal::ZERO && health_base == health_cap;

        let net = net_dividends - health + company.employee_net_salary;
        let total_taxes = company.corporate_tax
            + company.employer_contribution
            + company.employee_taxes
            + dividend_tax
            + health;

        debug!(
            regime = ?company.regime,
            corporate_tax = %company.corporate_tax,
            dividend_base = %dividend_base,
            dividend_tax = %dividend_tax,
            health = %health,
            net = %net,
            "company owner income calculated"
        );

        Ok(CalculationResult {
            gross: input.revenue,
            net,
            total_taxes,
            costs: input.expenses + company.reinvested_profit,
            currency: Currency::Ron,
            period: Period::Annual,
            breakdown: Breakdown::Srl(SrlBreakdown {
                regime: company.regime,
                revenue: input.revenue,
                expenses: input.expenses,
                reinvested_profit: company.reinvested_profit,
                corporate_tax_rate: company.corporate_tax_rate,
                corporate_tax: company.corporate_tax,
                employee_gross_salary: company.employee_gross_salary,
                employer_contribution: company.employer_contribution,
                employee_taxes: company.employee_taxes,
                employee_net_salary: company.employee_net_salary,
                dividend_base,
                dividend_tax,
                net_dividends,
                health_base,
                health,
                health_capped,
            }),
        })
    }

    /// Micro regime: revenue tax plus a minimum-wage owner-employee.
    fn micro(
        &self,
        rates: &CompanyRates,
        input: &CompanyInput,
    ) -> Result<CompanyLevel, RateTableError> {
        if input.reinvested_profit > Decimal::ZERO {
            debug!(
                reinvested_profit = %input.reinvested_profit,
                "reinvested profit is not deductible under the micro regime"
            );
        }

        let corporate_tax_rate = self.micro_tax_rate(rates, input);
        let corporate_tax = round_half_up(input.revenue * corporate_tax_rate);

        let employee_gross_salary = input.minimum_wage * MONTHS;
        let employer_contribution =
            round_half_up(employee_gross_salary * self.rates.employment.employer_contribution_rate);

        let monthly = EmploymentCalculator::new(self.rates).calculate(&EmploymentInput {
            gross: input.minimum_wage,
            minimum_wage: input.minimum_wage,
            handicapped: input.handicapped,
            ..EmploymentInput::default()
        })?;
        let employee_taxes = monthly.total_taxes * MONTHS;
        let employee_net_salary = monthly.net * MONTHS;

        Ok(CompanyLevel {
            regime: CompanyRegime::Micro,
            corporate_tax_rate,
            corporate_tax,
            reinvested_profit: Decimal::ZERO,
            employee_gross_salary,
            employer_contribution,
            employee_taxes,
            employee_net_salary,
            distributable: input.revenue
                - input.expenses
                - employee_gross_salary
                - employer_contribution
                - corporate_tax,
        })
    }

    /// High rate strictly above the threshold, converted at the current rate.
    fn micro_tax_rate(
        &self,
        rates: &CompanyRates,
        input: &CompanyInput,
    ) -> Decimal {
        let threshold = rates.revenue_threshold_eur * input.eur_ron_rate;
        if input.revenue > threshold {
            rates.micro_tax_high
        } else {
            rates.micro_tax_low
        }
    }

    /// Profit regime: reinvested profit reduces both the tax base and the
    /// distributable amount.
    fn profit(
        &self,
        rates: &CompanyRates,
        input: &CompanyInput,
    ) -> CompanyLevel {
        let taxable_profit = max(
            input.revenue - input.expenses - input.reinvested_profit,
            Decimal::ZERO,
        );
        let corporate_tax = round_half_up(taxable_profit * rates.profit_tax_rate);

        CompanyLevel {
            regime: CompanyRegime::Profit,
            corporate_tax_rate: rates.profit_tax_rate,
            corporate_tax,
            reinvested_profit: input.reinvested_profit,
            employee_gross_salary: Decimal::ZERO,
            employer_contribution: Decimal::ZERO,
            employee_taxes: Decimal::ZERO,
            employee_net_salary: Decimal::ZERO,
            distributable: input.revenue
                - input.expenses
                - corporate_tax
                - input.reinvested_profit,
        }
    }

    fn dividend_base(
        &self,
        distributable: Decimal,
    ) -> Decimal {
        if distributable < Decimal::ZERO {
            warn!(
                distributable = %distributable,
                "company costs exceed revenue; dividend base clamped to zero"
            );
        }
        max(distributable, Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;
    use crate::models::FiscalYear;

    fn micro_input() -> CompanyInput {
        CompanyInput {
            revenue: dec!(200000),
            expenses: Decimal::ZERO,
            reinvested_profit: Decimal::ZERO,
            has_employee: true,
            handicapped: false,
            minimum_wage: dec!(4050),
            eur_ron_rate: dec!(5),
        }
    }

    fn profit_input() -> CompanyInput {
        CompanyInput {
            expenses: dec!(50000),
            reinvested_profit: dec!(20000),
            has_employee: false,
            ..micro_input()
        }
    }

    fn run(
        year: FiscalYear,
        input: &CompanyInput,
    ) -> (CalculationResult, SrlBreakdown) {
        let rates = RateTable::for_year(year);
        let result = CompanyCalculator::new(&rates).calculate(input).unwrap();
        let breakdown = match &result.breakdown {
            Breakdown::Srl(b) => b.clone(),
            other => panic!("expected SRL breakdown, got {other:?}"),
        };
        (result, breakdown)
    }

    /// Initializes tracing subscriber for tests that verify log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // Micro regime
    // =========================================================================

    #[test]
    fn micro_regime_produces_known_result() {
        let (result, b) = run(FiscalYear::Y2025, &micro_input());

        assert_eq!(b.regime, CompanyRegime::Micro);
        assert_eq!(b.corporate_tax, dec!(2000.00));
        assert_eq!(b.employee_gross_salary, dec!(48600));
        assert_eq!(b.employer_contribution, dec!(1093.50));
        assert_eq!(b.dividend_base, dec!(148306.50));
        assert_eq!(b.dividend_tax, dec!(14830.65));
        assert_eq!(b.health, dec!(9720.00));
        assert_eq!(b.employee_net_salary, dec!(30888));
        assert_eq!(result.net, dec!(154643.85));
        assert_eq!(result.total_taxes, dec!(45356.15));
    }

    #[test]
    fn micro_high_rate_applies_strictly_above_threshold() {
        // 60000 EUR × 5 = 300000 RON
        let at_threshold = CompanyInput {
            revenue: dec!(300000),
            ..micro_input()
        };
        let above = CompanyInput {
            revenue: dec!(300000.01),
            ..micro_input()
        };

        let (_, at) = run(FiscalYear::Y2025, &at_threshold);
        let (_, over) = run(FiscalYear::Y2025, &above);

        assert_eq!(at.corporate_tax_rate, dec!(0.01));
        assert_eq!(over.corporate_tax_rate, dec!(0.03));
    }

    #[test]
    fn micro_threshold_follows_exchange_rate() {
        let input = CompanyInput {
            revenue: dec!(310000),
            eur_ron_rate: dec!(5.2),
            ..micro_input()
        };

        let (_, b) = run(FiscalYear::Y2025, &input);

        // 60000 × 5.2 = 312000
        assert_eq!(b.corporate_tax_rate, dec!(0.01));
    }

    #[test]
    fn micro_rate_is_flat_in_2026() {
        let input = CompanyInput {
            revenue: dec!(900000),
            ..micro_input()
        };

        let (_, b) = run(FiscalYear::Y2026, &input);

        assert_eq!(b.corporate_tax_rate, dec!(0.01));
    }

    #[test]
    fn micro_regime_ignores_reinvested_profit() {
        let input = CompanyInput {
            reinvested_profit: dec!(10000),
            ..micro_input()
        };

        let (result, b) = run(FiscalYear::Y2025, &input);

        assert_eq!(b.reinvested_profit, Decimal::ZERO);
        assert_eq!(result.costs, Decimal::ZERO);
        assert_eq!(result.net, dec!(154643.85));
    }

    #[test]
    fn handicapped_owner_keeps_salary_income_tax() {
        let input = CompanyInput {
            handicapped: true,
            ..micro_input()
        };

        let (_, b) = run(FiscalYear::Y2025, &input);

        // 163 monthly income tax × 12 stays with the owner
        assert_eq!(b.employee_net_salary, dec!(32844));
        assert_eq!(b.dividend_tax, dec!(14830.65));
    }

    // =========================================================================
    // Profit regime
    // =========================================================================

    #[test]
    fn profit_regime_produces_known_result() {
        let (result, b) = run(FiscalYear::Y2025, &profit_input());

        assert_eq!(b.regime, CompanyRegime::Profit);
        assert_eq!(b.corporate_tax, dec!(20800.00));
        assert_eq!(b.dividend_base, dec!(109200.00));
        assert_eq!(b.dividend_tax, dec!(10920.00));
        assert_eq!(b.health_base, dec!(97200));
        assert!(b.health_capped);
        assert_eq!(result.net, dec!(88560.00));
        assert_eq!(result.costs, dec!(70000));
    }

    #[test]
    fn profit_regime_conserves_amounts() {
        let (result, _) = run(FiscalYear::Y2025, &profit_input());

        assert_eq!(
            result.gross - result.costs - result.total_taxes,
            result.net
        );
    }

    #[test]
    fn dividend_tax_follows_fiscal_year() {
        let (_, b) = run(FiscalYear::Y2026, &profit_input());

        // 109200 × 16%
        assert_eq!(b.dividend_tax, dec!(17472.00));
    }

    // =========================================================================
    // Health on dividends
    // =========================================================================

    #[test]
    fn small_dividends_owe_no_health() {
        let input = CompanyInput {
            revenue: dec!(20000),
            expenses: Decimal::ZERO,
            reinvested_profit: Decimal::ZERO,
            ..profit_input()
        };

        let (_, b) = run(FiscalYear::Y2025, &input);

        // 16800 < 6 × 4050
        assert_eq!(b.health_base, Decimal::ZERO);
        assert_eq!(b.health, Decimal::ZERO);
        assert!(!b.health_capped);
    }

    #[test]
    fn health_base_pins_to_middle_tier() {
        let input = CompanyInput {
            revenue: dec!(70000),
            expenses: Decimal::ZERO,
            reinvested_profit: Decimal::ZERO,
            ..profit_input()
        };

        let (_, b) = run(FiscalYear::Y2025, &input);

        // 70000 - 11200 = 58800, between 12× and 24×
        assert_eq!(b.health_base, dec!(48600));
        assert_eq!(b.health, dec!(4860.00));
        assert!(!b.health_capped);
    }

    // =========================================================================
    // Clamping
    // =========================================================================

    #[test]
    fn losses_clamp_dividend_base() {
        let _guard = init_test_tracing();
        let input = CompanyInput {
            revenue: dec!(30000),
            ..micro_input()
        };

        let (result, b) = run(FiscalYear::Y2025, &input);

        assert_eq!(b.dividend_base, Decimal::ZERO);
        assert_eq!(b.net_dividends, Decimal::ZERO);
        assert_eq!(result.net, b.employee_net_salary);
    }

    #[test]
    fn invalid_rate_table_is_rejected() {
        let mut rates = RateTable::for_year(FiscalYear::Y2025);
        rates.company.health_dividend_tiers = vec![dec!(12), dec!(6)];

        let result = CompanyCalculator::new(&rates).calculate(&micro_input());

        assert_eq!(
            result,
            Err(RateTableError::CapsNotIncreasing {
                name: "srl.health_dividend_tiers"
            })
        );
    }
}
