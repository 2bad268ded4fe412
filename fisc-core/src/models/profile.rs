use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Personal and business circumstances that change how an income is taxed.
///
/// Options that do not apply to a scenario are ignored by it, so the same
/// profile can drive a whole comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxpayerProfile {
    /// Dependents counted for the CIM personal deduction (0 to 4).
    pub dependents: u8,
    pub under_26: bool,
    pub children_in_school: u32,
    /// Pensioners are exempt from the PFA pension contribution.
    pub pensioner: bool,
    /// Waives income tax on salary and PFA income.
    pub handicapped: bool,
    /// Selects the SRL micro regime (one employee) over the profit-tax regime.
    pub has_employee: bool,
    /// Deductible expenses, in the request currency and period.
    pub expenses: Decimal,
    /// Profit kept in the company (SRL profit regime), in the request currency and period.
    pub reinvested_profit: Decimal,
}

impl Default for TaxpayerProfile {
    fn default() -> Self {
        Self {
            dependents: 0,
            under_26: false,
            children_in_school: 0,
            pensioner: false,
            handicapped: false,
            has_employee: true,
            expenses: Decimal::ZERO,
            reinvested_profit: Decimal::ZERO,
        }
    }
}
