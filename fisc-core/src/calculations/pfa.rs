//! Sole proprietor (PFA) annual contribution and income tax calculation.
//!
//! Contributions are owed on notional bases expressed as multiples of the
//! minimum wage rather than on actual income:
//!
//! - pension (CAS) is due on 12× or 24× minimum wage once net income reaches
//!   that tier, and not at all below 12×
//! - health (CASS) is due on actual net income, but never less than 6× and
//!   never more than the year's ceiling
//!
//! Income tax is then levied on what remains.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{max, pinned_tier_base, round_half_up};
use crate::models::{
    Breakdown, CalculationResult, Currency, PfaBreakdown, Period, RateTable, RateTableError,
    SoleProprietorRates,
};

/// Annual PFA input, in RON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoleProprietorInput {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub minimum_wage: Decimal,
    /// Pensioners owe no pension contribution.
    pub pensioner: bool,
    pub handicapped: bool,
}

/// Calculator for the annual sole proprietor liability.
#[derive(Debug, Clone)]
pub struct SoleProprietorCalculator<'a> {
    rates: &'a RateTable,
}

impl<'a> SoleProprietorCalculator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// # Errors
    ///
    /// Returns [`RateTableError`] if the rate table fails validation.
    pub fn calculate(
        &self,
        input: &SoleProprietorInput,
    ) -> Result<CalculationResult, RateTableError> {
        self.rates.validate()?;
        let rates = &self.rates.sole_proprietor;
        let minimum_wage = input.minimum_wage;

        let net_income = self.net_income(input.revenue, input.expenses);

        let pension_base = self.pension_base(rates, net_income, minimum_wage, input.pensioner);
        let pension = round_half_up(pension_base * rates.pension_rate);
        let pension_capped =
            pension_base > Decimal::ZERO && pension_base == rates.pension_cap_high * minimum_wage;

        let health_base = self.health_base(rates, net_income, minimum_wage);
        let health = round_half_up(health_base * rates.health_rate);
        let health_capped = net_income > rates.health_ceiling() * minimum_wage;

        let taxable_income = max(net_income - pension - health, Decimal::ZERO);
        let income_tax = if input.handicapped {
            Decimal::ZERO
        } else {
            round_half_up(taxable_income * rates.income_tax_rate)
        };

        let total_taxes = pension + health + income_tax;
        let net = net_income - total_taxes;

        debug!(
            net_income = %net_income,
            pension = %pension,
            health = %health,
            income_tax = %income_tax,
            net = %net,
            "sole proprietor liability calculated"
        );

        Ok(CalculationResult {
            gross: input.revenue,
            net,
            total_taxes,
            // Only the expenses that actually reduced income.
            costs: input.revenue - net_income,
            currency: Currency::Ron,
            period: Period::Annual,
            breakdown: Breakdown::Pfa(PfaBreakdown {
                revenue: input.revenue,
                expenses: input.expenses,
                net_income,
                pension_base,
                pension,
                pension_capped,
                health_base,
                health,
                health_capped,
                taxable_income,
                income_tax,
                income_tax_exempt: input.handicapped,
            }),
        })
    }

    fn net_income(
        &self,
        revenue: Decimal,
        expenses: Decimal,
    ) -> Decimal {
        if expenses > revenue {
            warn!(
                revenue = %revenue,
                expenses = %expenses,
                "expenses exceed revenue; net income clamped to zero"
            );
        }
        max(revenue - expenses, Decimal::ZERO)
    }

    /// Pension base pinned to the highest tier reached.
    fn pension_base(
        &self,
        rates: &SoleProprietorRates,
        net_income: Decimal,
        minimum_wage: Decimal,
        pensioner: bool,
    ) -> Decimal {
        if pensioner {
            return Decimal::ZERO;
        }
        pinned_tier_base(
            net_income,
            minimum_wage,
            &[rates.pension_cap_low, rates.pension_cap_high],
        )
    }

    /// Net income clamped between the floor and ceiling tiers.
    fn health_base(
        &self,
        rates: &SoleProprietorRates,
        net_income: Decimal,
        minimum_wage: Decimal,
    ) -> Decimal {
        if net_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let floor = rates.health_floor() * minimum_wage;
        let ceiling = rates.health_ceiling() * minimum_wage;
        net_income.clamp(floor, ceiling)
    }
}
