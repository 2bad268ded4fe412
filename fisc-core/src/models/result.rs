use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Currency, Period, Scenario, ScenarioKey};
use crate::calculations::common::round_half_up;
use crate::currency::convert;

/// Outcome of one engine run.
///
/// `gross - costs - total_taxes == net` holds within one currency unit
/// (line items are rounded individually). `costs` is zero unless expenses or
/// reinvested profit were supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub gross: Decimal,
    pub net: Decimal,
    pub total_taxes: Decimal,
    /// Deductible expenses and reinvested profit: money that never reaches
    /// the owner but is not a tax.
    pub costs: Decimal,
    pub currency: Currency,
    pub period: Period,
    pub breakdown: Breakdown,
}

impl CalculationResult {
    pub fn scenario(&self) -> Scenario {
        self.breakdown.scenario()
    }

    pub fn key(&self) -> ScenarioKey {
        match &self.breakdown {
            Breakdown::Cim(_) => ScenarioKey::Cim,
            Breakdown::Pfa(_) => ScenarioKey::Pfa,
            Breakdown::Srl(b) => match b.regime {
                CompanyRegime::Micro => ScenarioKey::SrlMicro,
                CompanyRegime::Profit => ScenarioKey::SrlProfit,
            },
        }
    }

    /// Share of gross paid as taxes and contributions, as a fraction.
    pub fn effective_tax_rate(&self) -> Decimal {
        if self.gross.is_zero() {
            return Decimal::ZERO;
        }
        (self.total_taxes / self.gross).round_dp(4)
    }

    /// Applies `f` to every money field, leaving rates and flags untouched.
    pub fn map_amounts(
        &self,
        f: impl Fn(Decimal) -> Decimal,
    ) -> Self {
        Self {
            gross: f(self.gross),
            net: f(self.net),
            total_taxes: f(self.total_taxes),
            costs: f(self.costs),
            currency: self.currency,
            period: self.period,
            breakdown: self.breakdown.map_amounts(&f),
        }
    }

    /// Re-expresses the result in another currency.
    pub fn converted(
        &self,
        to: Currency,
        rate: Decimal,
    ) -> Self {
        let from = self.currency;
        if from == to {
            return self.clone();
        }
        let mut result = self.map_amounts(|amount| convert(amount, from, to, rate));
        result.currency = to;
        result
    }

    /// Re-expresses the result over another period, e.g. annual to monthly.
    pub fn for_period(
        &self,
        period: Period,
    ) -> Self {
        if period == self.period {
            return self.clone();
        }
        let from = self.period.per_year();
        let to = period.per_year();
        let mut result = self.map_amounts(|amount| round_half_up(amount * from / to));
        result.period = period;
        result
    }
}

/// Scenario-specific line items. The variant is the scenario tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scenario")]
pub enum Breakdown {
    #[serde(rename = "CIM")]
    Cim(CimBreakdown),
    #[serde(rename = "PFA")]
    Pfa(PfaBreakdown),
    #[serde(rename = "SRL")]
    Srl(SrlBreakdown),
}

impl Breakdown {
    pub fn scenario(&self) -> Scenario {
        match self {
            Self::Cim(_) => Scenario::Cim,
            Self::Pfa(_) => Scenario::Pfa,
            Self::Srl(_) => Scenario::Srl,
        }
    }

    fn map_amounts(
        &self,
        f: &impl Fn(Decimal) -> Decimal,
    ) -> Self {
        match self {
            Self::Cim(b) => Self::Cim(CimBreakdown {
                tax_free_allowance: f(b.tax_free_allowance),
                contribution_base: f(b.contribution_base),
                pension: f(b.pension),
                health: f(b.health),
                base_deduction: f(b.base_deduction),
                supplementary_deduction: f(b.supplementary_deduction),
                personal_deduction: f(b.personal_deduction),
                taxable_base: f(b.taxable_base),
                income_tax: f(b.income_tax),
                income_tax_exempt: b.income_tax_exempt,
                employer_contribution: f(b.employer_contribution),
                complete_cost: f(b.complete_cost),
            }),
            Self::Pfa(b) => Self::Pfa(PfaBreakdown {
                revenue: f(b.revenue),
                expenses: f(b.expenses),
                net_income: f(b.net_income),
                pension_base: f(b.pension_base),
                pension: f(b.pension),
                pension_capped: b.pension_capped,
                health_base: f(b.health_base),
                health: f(b.health),
                health_capped: b.health_capped,
                taxable_income: f(b.taxable_income),
                income_tax: f(b.income_tax),
                income_tax_exempt: b.income_tax_exempt,
            }),
            Self::Srl(b) => Self::Srl(SrlBreakdown {
                regime: b.regime,
                revenue: f(b.revenue),
                expenses: f(b.expenses),
                reinvested_profit: f(b.reinvested_profit),
                corporate_tax_rate: b.corporate_tax_rate,
                corporate_tax: f(b.corporate_tax),
                employee_gross_salary: f(b.employee_gross_salary),
                employer_contribution: f(b.employer_contribution),
                employee_taxes: f(b.employee_taxes),
                employee_net_salary: f(b.employee_net_salary),
                dividend_base: f(b.dividend_base),
                dividend_tax: f(b.dividend_tax),
                net_dividends: f(b.net_dividends),
                health_base: f(b.health_base),
                health: f(b.health),
                health_capped: b.health_capped,
            }),
        }
    }
}

/// Employment contract line items (monthly unless scaled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CimBreakdown {
    pub tax_free_allowance: Decimal,
    pub contribution_base: Decimal,
    /// CAS.
    pub pension: Decimal,
    /// CASS.
    pub health: Decimal,
    pub base_deduction: Decimal,
    pub supplementary_deduction: Decimal,
    pub personal_deduction: Decimal,
    pub taxable_base: Decimal,
    pub income_tax: Decimal,
    pub income_tax_exempt: bool,
    /// CAM, paid by the employer on top of gross.
    pub employer_contribution: Decimal,
    /// Gross plus CAM.
    pub complete_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PfaBreakdown {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub net_income: Decimal,
    pub pension_base: Decimal,
    pub pension: Decimal,
    /// Pension base pinned at the upper tier.
    pub pension_capped: bool,
    pub health_base: Decimal,
    pub health: Decimal,
    /// Net income above the health ceiling.
    pub health_capped: bool,
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub income_tax_exempt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyRegime {
    /// Revenue tax, requires at least one employee.
    Micro,
    /// Corporate profit tax.
    Profit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrlBreakdown {
    pub regime: CompanyRegime,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub reinvested_profit: Decimal,
    pub corporate_tax_rate: Decimal,
    pub corporate_tax: Decimal,
    /// Micro regime only: the mandatory minimum-wage employee (the owner).
    pub employee_gross_salary: Decimal,
    pub employer_contribution: Decimal,
    pub employee_taxes: Decimal,
    pub employee_net_salary: Decimal,
    pub dividend_base: Decimal,
    pub dividend_tax: Decimal,
    pub net_dividends: Decimal,
    pub health_base: Decimal,
    pub health: Decimal,
    /// Health base pinned at the highest dividend tier.
    pub health_capped: bool,
}

/// What the optimizer ranks on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Gross-to-net: the highest take-home wins.
    #[default]
    MaximizeNet,
    /// Net-to-gross: the lowest gross cost wins.
    MinimizeGross,
}

/// Ranked results for the same income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Results in the order they were compared.
    pub results: Vec<CalculationResult>,
    pub optimal: ScenarioKey,
    /// Gap between the best and worst entry; never negative.
    pub savings: Decimal,
    pub objective: Objective,
}

impl ComparisonResult {
    pub fn get(
        &self,
        key: ScenarioKey,
    ) -> Option<&CalculationResult> {
        self.results.iter().find(|r| r.key() == key)
    }

    pub fn optimal_result(&self) -> Option<&CalculationResult> {
        self.get(self.optimal)
    }
}
