//! Text and JSON rendering of command results.
//!
//! Text renderers collect one `String` per line and join them, so output never
//! ends with a newline; `main` adds it when printing.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fisc_core::calendar::MonthSummary;
use fisc_core::format::{comparison_summary, format_currency, format_percent};
use fisc_core::{
    Breakdown, CalculationResult, ComparisonResult, Currency, RateTable, WagePeriod,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Pretty-printed JSON for any report.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("cannot serialize output")
}

fn amount_line(
    label: &str,
    amount: Decimal,
    currency: Currency,
) -> String {
    format!("  {label:<26}{:>20}", format_currency(amount, currency))
}

fn flagged_line(
    label: &str,
    amount: Decimal,
    currency: Currency,
    note: Option<&str>,
) -> String {
    let line = amount_line(label, amount, currency);
    match note {
        Some(note) => format!("{line}  ({note})"),
        None => line,
    }
}

fn rate_line(
    label: &str,
    rate: Decimal,
) -> String {
    format!("  {label:<26}{:>20}", format_percent(rate))
}

/// Line-item breakdown of a single result.
pub fn render_result(result: &CalculationResult) -> String {
    let c = result.currency;
    let mut lines = vec![
        format!(
            "{} ({}, {})",
            result.key().label(),
            result.period.as_str(),
            c.as_str()
        ),
        amount_line("Gross", result.gross, c),
    ];

    match &result.breakdown {
        Breakdown::Cim(b) => {
            lines.push(amount_line("Pension (CAS)", b.pension, c));
            lines.push(amount_line("Health (CASS)", b.health, c));
            if !b.tax_free_allowance.is_zero() {
                lines.push(amount_line("Tax-free allowance", b.tax_free_allowance, c));
            }
            lines.push(amount_line("Personal deduction", b.personal_deduction, c));
            lines.push(amount_line("Taxable base", b.taxable_base, c));
            lines.push(flagged_line(
                "Income tax",
                b.income_tax,
                c,
                b.income_tax_exempt.then_some("exempt"),
            ));
            lines.push(amount_line("Employer contribution", b.employer_contribution, c));
            lines.push(amount_line("Complete salary cost", b.complete_cost, c));
        }
        Breakdown::Pfa(b) => {
            lines.push(amount_line("Expenses", b.expenses, c));
            lines.push(amount_line("Net income", b.net_income, c));
            lines.push(flagged_line(
                "Pension (CAS)",
                b.pension,
                c,
                b.pension_capped.then_some("capped"),
            ));
            lines.push(flagged_line(
                "Health (CASS)",
                b.health,
                c,
                b.health_capped.then_some("capped"),
            ));
            lines.push(amount_line("Taxable income", b.taxable_income, c));
            lines.push(flagged_line(
                "Income tax",
                b.income_tax,
                c,
                b.income_tax_exempt.then_some("exempt"),
            ));
        }
        Breakdown::Srl(b) => {
            lines.push(amount_line("Expenses", b.expenses, c));
            if !b.reinvested_profit.is_zero() {
                lines.push(amount_line("Reinvested profit", b.reinvested_profit, c));
            }
            let rate = format_percent(b.corporate_tax_rate);
            lines.push(flagged_line("Company tax", b.corporate_tax, c, Some(&rate)));
            if !b.employee_gross_salary.is_zero() {
                lines.push(amount_line("Owner salary (gross)", b.employee_gross_salary, c));
                lines.push(amount_line("Employer contribution", b.employer_contribution, c));
                lines.push(amount_line("Salary taxes", b.employee_taxes, c));
                lines.push(amount_line("Owner salary (net)", b.employee_net_salary, c));
            }
            lines.push(amount_line("Dividends", b.dividend_base, c));
            lines.push(amount_line("Dividend tax", b.dividend_tax, c));
            lines.push(flagged_line(
                "Health (CASS)",
                b.health,
                c,
                b.health_capped.then_some("capped"),
            ));
        }
    }

    let rate = format_percent(result.effective_tax_rate());
    lines.push(flagged_line("Total taxes", result.total_taxes, c, Some(&rate)));
    lines.push(amount_line("Net", result.net, c));
    lines.join("\n")
}

pub fn render_comparison(comparison: &ComparisonResult) -> String {
    comparison_summary(comparison)
}

/// One line per batch row, numbered from 1.
pub fn render_batch(results: &[CalculationResult]) -> String {
    let mut lines: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            format!(
                "{:>4}  {:<26} {:<8} gross {:>16}  net {:>16}  ({})",
                idx + 1,
                result.key().label(),
                result.period.as_str(),
                format_currency(result.gross, result.currency),
                format_currency(result.net, result.currency),
                format_percent(result.effective_tax_rate()),
            )
        })
        .collect();
    lines.push(format!("{} request(s)", results.len()));
    lines.join("\n")
}

#[derive(Debug, Serialize)]
pub struct CalendarReport {
    pub year: i32,
    pub holidays: Vec<NaiveDate>,
    pub months: Vec<MonthSummary>,
}

impl CalendarReport {
    pub fn new(
        year: i32,
        holidays: &BTreeSet<NaiveDate>,
        months: Vec<MonthSummary>,
    ) -> Self {
        Self {
            year,
            holidays: holidays.iter().copied().collect(),
            months,
        }
    }
}

pub fn render_calendar(report: &CalendarReport) -> String {
    let mut lines = vec![format!("Public holidays {}:", report.year)];
    lines.extend(
        report
            .holidays
            .iter()
            .map(|day| format!("  {}", day.format("%a %d %b"))),
    );
    lines.extend(report.months.iter().map(|month| {
        format!(
            "{}-{:02}: {} working days of {}",
            report.year, month.month, month.working_days, month.days
        )
    }));
    let total: u32 = report.months.iter().map(|m| m.working_days).sum();
    lines.push(format!("Total: {total} working days"));
    lines.join("\n")
}

#[derive(Debug, Serialize)]
pub struct RatesReport<'a> {
    pub rates: &'a RateTable,
    pub minimum_wage: Decimal,
    pub exchange_rate: Decimal,
}

impl<'a> RatesReport<'a> {
    pub fn new(
        rates: &'a RateTable,
        wage_period: WagePeriod,
        exchange_rate: Decimal,
    ) -> Self {
        Self {
            rates,
            minimum_wage: rates.minimum_wage(wage_period),
            exchange_rate,
        }
    }
}

pub fn render_rates(report: &RatesReport<'_>) -> String {
    let r = report.rates;
    let e = &r.employment;
    let p = &r.sole_proprietor;
    let s = &r.company;
    [
        format!("Fiscal year {}", r.fiscal_year),
        amount_line("Minimum wage", report.minimum_wage, Currency::Ron),
        format!("  {:<26}{:>20}", "EUR/RON", report.exchange_rate),
        "CIM".to_string(),
        rate_line("Pension (CAS)", e.pension_rate),
        rate_line("Health (CASS)", e.health_rate),
        rate_line("Income tax", e.income_tax_rate),
        rate_line("Employer contribution", e.employer_contribution_rate),
        "PFA".to_string(),
        rate_line("Pension (CAS)", p.pension_rate),
        rate_line("Health (CASS)", p.health_rate),
        rate_line("Income tax", p.income_tax_rate),
        "SRL".to_string(),
        rate_line("Micro tax (low)", s.micro_tax_low),
        rate_line("Micro tax (high)", s.micro_tax_high),
        rate_line("Profit tax", s.profit_tax_rate),
        rate_line("Dividend tax", s.dividend_tax_rate),
        rate_line("Health on dividends", s.health_on_dividends_rate),
        amount_line("Micro threshold", s.revenue_threshold_eur, Currency::Eur),
    ]
    .join("\n")
}
