//! Display helpers for amounts and rates, in Romanian (ro-RO) style.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_core::Currency;
//! use fisc_core::format::{format_currency, format_percent};
//!
//! assert_eq!(format_currency(dec!(1234567.5), Currency::Ron), "1.234.567,5 RON");
//! assert_eq!(format_currency(dec!(2500), Currency::Eur), "2.500 €");
//! assert_eq!(format_percent(dec!(0.1)), "10.0%");
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::models::{ComparisonResult, Currency, Objective};

/// Formats `amount` with `.` grouping, `,` decimals and up to two fraction
/// digits, followed by the currency symbol.
pub fn format_currency(
    amount: Decimal,
    currency: Currency,
) -> String {
    format!("{} {}", format_number(amount), currency.symbol())
}

/// Formats a number the way [`format_currency`] does, without a symbol.
pub fn format_number(amount: Decimal) -> String {
    let rounded = round_half_up(amount).normalize();
    let text = rounded.abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

/// Formats a fraction as a percentage with one decimal.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.1}%", (value * Decimal::ONE_HUNDRED).round_dp(1))
}

/// Multi-line text comparing every scenario and naming the optimal one.
pub fn comparison_summary(comparison: &ComparisonResult) -> String {
    let mut lines: Vec<String> = comparison
        .results
        .iter()
        .map(|result| {
            let marker = if result.key() == comparison.optimal {
                " *"
            } else {
                ""
            };
            format!(
                "{:<26} gross {:>16}  net {:>16}  taxes {:>16}  ({}){}",
                result.key().label(),
                format_currency(result.gross, result.currency),
                format_currency(result.net, result.currency),
                format_currency(result.total_taxes, result.currency),
                format_percent(result.effective_tax_rate()),
                marker,
            )
        })
        .collect();

    if let Some(best) = comparison.optimal_result() {
        let gain = match comparison.objective {
            Objective::MaximizeNet => "more net income",
            Objective::MinimizeGross => "less gross income needed",
        };
        lines.push(format!(
            "Optimal: {} ({} {} than the worst option)",
            comparison.optimal.label(),
            format_currency(comparison.savings, best.currency),
            gain,
        ));
    }

    lines.join("\n")
}
