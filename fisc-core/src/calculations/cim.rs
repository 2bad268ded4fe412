//! Employment contract (CIM) payroll calculation.
//!
//! Works on one month of gross salary. The employee pays pension (CAS) and
//! health (CASS) contributions plus income tax; the employer pays the labor
//! insurance contribution (CAM) on top of gross.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Tax-free allowance: 300 when gross ≤ minimum wage, else 0 |
//! | 2    | Contribution base = gross − allowance; CAS 25%, CASS 10% (whole units) |
//! | 3    | Personal deduction: base deduction by dependents plus supplementary |
//! | 4    | Taxable base = gross − allowance − CAS − CASS − deduction, minimum 0 |
//! | 5    | Income tax 10% of taxable base (0 when exempt) |
//! | 6    | Net = gross − CAS − CASS − income tax |
//! | 7    | CAM 2.25% of gross; complete cost = gross + CAM |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_core::calculations::{EmploymentCalculator, EmploymentInput};
//! use fisc_core::{FiscalYear, RateTable};
//!
//! let rates = RateTable::for_year(FiscalYear::Y2025);
//! let input = EmploymentInput {
//!     gross: dec!(4050),
//!     minimum_wage: dec!(4050),
//!     ..EmploymentInput::default()
//! };
//!
//! let result = EmploymentCalculator::new(&rates).calculate(&input).unwrap();
//!
//! assert_eq!(result.net, dec!(2574));
//! assert_eq!(result.total_taxes, dec!(1476));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{max, round_to_unit};
use crate::models::{
    Breakdown, CalculationResult, CimBreakdown, Currency, EmploymentRates, Period, RateTable,
    RateTableError,
};

/// Monthly payroll input, in RON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentInput {
    pub gross: Decimal,
    /// Minimum wage in force for the month.
    pub minimum_wage: Decimal,
    /// Dependents count; values above 4 are treated as 4.
    pub dependents: u8,
    pub under_26: bool,
    pub children_in_school: u32,
    /// Exempts the salary from income tax.
    pub handicapped: bool,
}

/// Calculator for the monthly employment payroll.
#[derive(Debug, Clone)]
pub struct EmploymentCalculator<'a> {
    rates: &'a RateTable,
}

impl<'a> EmploymentCalculator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// Runs the payroll steps for one month.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] if the rate table fails validation.
    pub fn calculate(
        &self,
        input: &EmploymentInput,
    ) -> Result<CalculationResult, RateTableError> {
        self.rates.validate()?;
        let rates = &self.rates.employment;
        let gross = input.gross;
        let minimum_wage = input.minimum_wage;

        // Steps 1-2: allowance and contributions
        let tax_free_allowance = self.tax_free_allowance(rates, gross, minimum_wage);
        let contribution_base = max(gross - tax_free_allowance, Decimal::ZERO);
        let pension = round_to_unit(contribution_base * rates.pension_rate);
        let health = round_to_unit(contribution_base * rates.health_rate);

        // Step 3: personal deduction
        let base_deduction = self.base_deduction(rates, gross, minimum_wage, input.dependents);
        let supplementary_deduction = self.supplementary_deduction(rates, input);
        let personal_deduction = base_deduction + supplementary_deduction;

        // Steps 4-5: income tax
        let taxable_base = self.taxable_base(
            gross,
            tax_free_allowance,
            pension,
            health,
            personal_deduction,
        );
        let income_tax = if input.handicapped {
            Decimal::ZERO
        } else {
            round_to_unit(taxable_base * rates.income_tax_rate)
        };

        // Step 6: net
        let total_taxes = pension + health + income_tax;
        let net = gross - total_taxes;

        // Step 7: employer cost
        let employer_contribution = round_to_unit(gross * rates.employer_contribution_rate);
        let complete_cost = gross + employer_contribution;

        debug!(
            gross = %gross,
            pension = %pension,
            health = %health,
            income_tax = %income_tax,
            net = %net,
            "employment payroll calculated"
        );

        Ok(CalculationResult {
            gross,
            net,
            total_taxes,
            costs: Decimal::ZERO,
            currency: Currency::Ron,
            period: Period::Monthly,
            breakdown: Breakdown::Cim(CimBreakdown {
                tax_free_allowance,
                contribution_base,
                pension,
                health,
                base_deduction,
                supplementary_deduction,
                personal_deduction,
                taxable_base,
                income_tax,
                income_tax_exempt: input.handicapped,
                employer_contribution,
                complete_cost,
            }),
        })
    }

    /// Step 1: the allowance only applies to minimum-wage salaries.
    fn tax_free_allowance(
        &self,
        rates: &EmploymentRates,
        gross: Decimal,
        minimum_wage: Decimal,
    ) -> Decimal {
        if gross <= minimum_wage {
            rates.tax_free_allowance
        } else {
            Decimal::ZERO
        }
    }

    /// Whether gross is low enough to earn personal deductions at all.
    fn eligible_for_deduction(
        &self,
        rates: &EmploymentRates,
        gross: Decimal,
        minimum_wage: Decimal,
    ) -> bool {
        gross <= minimum_wage + rates.deduction_threshold_offset
    }

    /// Step 3a: the base deduction shrinks by one step reduction for every
    /// full step that gross exceeds the minimum wage.
    fn base_deduction(
        &self,
        rates: &EmploymentRates,
        gross: Decimal,
        minimum_wage: Decimal,
        dependents: u8,
    ) -> Decimal {
        if !self.eligible_for_deduction(rates, gross, minimum_wage) {
            return Decimal::ZERO;
        }

        let index = usize::from(dependents.min(4));
        let start = rates.base_deduction_percentages[index];
        let above_minimum = max(gross - minimum_wage, Decimal::ZERO);
        let steps = (above_minimum / rates.deduction_step).floor();
        let percentage = start - steps * rates.deduction_step_reduction;

        if percentage <= Decimal::ZERO {
            warn!(
                gross = %gross,
                dependents,
                "base deduction percentage exhausted before threshold"
            );
            return Decimal::ZERO;
        }

        round_to_unit(minimum_wage * percentage)
    }

    /// Step 3b: youth deduction plus the per-child amount.
    fn supplementary_deduction(
        &self,
        rates: &EmploymentRates,
        input: &EmploymentInput,
    ) -> Decimal {
        let youth = if input.under_26
            && self.eligible_for_deduction(rates, input.gross, input.minimum_wage)
        {
            round_to_unit(input.minimum_wage * rates.youth_deduction_rate)
        } else {
            Decimal::ZERO
        };
        let children = Decimal::from(input.children_in_school) * rates.per_child_deduction;

        youth + children
    }

    /// Step 4.
    fn taxable_base(
        &self,
        gross: Decimal,
        tax_free_allowance: Decimal,
        pension: Decimal,
        health: Decimal,
        personal_deduction: Decimal,
    ) -> Decimal {
        max(
            gross - tax_free_allowance - pension - health - personal_deduction,
            Decimal::ZERO,
        )
    }
}
