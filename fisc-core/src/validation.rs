//! Input checks applied before any engine runs.
//!
//! Every failure is a [`FiscError::Validation`] naming the offending field.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::FiscError;
use crate::models::{CalculationRequest, ComparisonRequest, Currency, TaxpayerProfile};

/// Largest amount accepted for any money input.
pub const MAX_AMOUNT: Decimal = dec!(10000000);

/// Largest dependents count with its own deduction percentage.
pub const MAX_DEPENDENTS: u8 = 4;

/// Trims whitespace and removes commas (thousands separator).
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Checks that `value` is within `[0, MAX_AMOUNT]`.
///
/// # Errors
///
/// Returns [`FiscError::Validation`] for negative or oversized amounts.
pub fn validate_amount(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, FiscError> {
    if value < Decimal::ZERO {
        return Err(FiscError::validation(field, "must not be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(FiscError::validation(
            field,
            format!("must not exceed {MAX_AMOUNT}"),
        ));
    }
    Ok(value)
}

/// Parses and validates a required amount.
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisc_core::validation::parse_amount;
///
/// assert_eq!(parse_amount("gross_income", " 12,500.50 ").unwrap(), dec!(12500.50));
/// assert!(parse_amount("gross_income", "abc").is_err());
/// ```
///
/// # Errors
///
/// Returns [`FiscError::Validation`] for empty, non-numeric or out-of-range
/// input.
pub fn parse_amount(
    field: &'static str,
    s: &str,
) -> Result<Decimal, FiscError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Err(FiscError::validation(field, "is required"));
    }
    let value = normalized.parse::<Decimal>().map_err(|e| {
        warn!(field, input = %s, "invalid amount: {}", e);
        FiscError::validation(field, format!("'{}' is not a number", s.trim()))
    })?;
    validate_amount(field, value)
}

/// Parses an optional amount; empty input is zero.
///
/// # Errors
///
/// Returns [`FiscError::Validation`] for non-numeric or out-of-range input.
pub fn parse_optional_amount(
    field: &'static str,
    s: &str,
) -> Result<Decimal, FiscError> {
    if normalize_amount_input(s).is_empty() {
        return Ok(Decimal::ZERO);
    }
    parse_amount(field, s)
}

/// # Errors
///
/// Returns [`FiscError::Validation`] unless `s` is `RON` or `EUR` in any case.
pub fn parse_currency(s: &str) -> Result<Currency, FiscError> {
    Currency::parse(s).ok_or_else(|| {
        FiscError::validation(
            "currency",
            format!("'{}' is not one of RON, EUR", s.trim()),
        )
    })
}

/// # Errors
///
/// Returns [`FiscError::Validation`] for too many dependents or invalid
/// expenses or reinvested profit.
pub fn validate_profile(profile: &TaxpayerProfile) -> Result<(), FiscError> {
    if profile.dependents > MAX_DEPENDENTS {
        return Err(FiscError::validation(
            "dependents",
            format!("must be between 0 and {MAX_DEPENDENTS}"),
        ));
    }
    validate_amount("expenses", profile.expenses)?;
    validate_amount("reinvested_profit", profile.reinvested_profit)?;
    Ok(())
}

/// Validates everything a calculation request carries.
///
/// # Errors
///
/// Returns the first [`FiscError::Validation`] found.
pub fn validate_request(request: &CalculationRequest) -> Result<(), FiscError> {
    validate_amount("gross_income", request.gross_income)?;
    validate_profile(&request.profile)
}

/// # Errors
///
/// Returns the first [`FiscError::Validation`] found.
pub fn validate_comparison(request: &ComparisonRequest) -> Result<(), FiscError> {
    validate_amount("gross_income", request.gross_income)?;
    validate_profile(&request.profile)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::Scenario;

    // =========================================================================
    // validate_amount
    // =========================================================================

    #[test]
    fn validate_amount_accepts_bounds() {
        assert_eq!(validate_amount("gross_income", Decimal::ZERO), Ok(Decimal::ZERO));
        assert_eq!(validate_amount("gross_income", MAX_AMOUNT), Ok(MAX_AMOUNT));
    }

    #[test]
    fn validate_amount_rejects_negative() {
        assert_eq!(
            validate_amount("gross_income", dec!(-0.01)),
            Err(FiscError::validation("gross_income", "must not be negative"))
        );
    }

    #[test]
    fn validate_amount_rejects_above_limit() {
        let err = validate_amount("expenses", dec!(10000000.01)).unwrap_err();

        assert_eq!(err.to_string(), "invalid expenses: must not exceed 10000000");
    }

    // =========================================================================
    // parse_amount
    // =========================================================================

    #[test]
    fn parse_amount_accepts_comma_thousands_separator() {
        assert_eq!(parse_amount("gross_income", "1,234.56"), Ok(dec!(1234.56)));
        assert_eq!(parse_amount("gross_income", "1,234,567.89"), Ok(dec!(1234567.89)));
    }

    #[test]
    fn parse_amount_trims_whitespace() {
        assert_eq!(parse_amount("gross_income", "  123.45  "), Ok(dec!(123.45)));
    }

    #[test]
    fn parse_amount_rejects_empty() {
        assert_eq!(
            parse_amount("gross_income", "   "),
            Err(FiscError::validation("gross_income", "is required"))
        );
    }

    #[test]
    fn parse_amount_rejects_non_numeric() {
        for input in ["abc", "NaN", "inf", "12..5"] {
            assert!(
                matches!(
                    parse_amount("gross_income", input),
                    Err(FiscError::Validation { field: "gross_income", .. })
                ),
                "{input}"
            );
        }
    }

    #[test]
    fn parse_amount_rejects_negative() {
        assert!(parse_amount("gross_income", "-100").is_err());
    }

    #[test]
    fn parse_optional_amount_treats_empty_as_zero() {
        assert_eq!(parse_optional_amount("expenses", ""), Ok(Decimal::ZERO));
        assert_eq!(parse_optional_amount("expenses", "2,500"), Ok(dec!(2500)));
    }

    // =========================================================================
    // parse_currency
    // =========================================================================

    #[test]
    fn parse_currency_is_case_insensitive() {
        assert_eq!(parse_currency("eur"), Ok(Currency::Eur));
        assert_eq!(parse_currency(" Ron "), Ok(Currency::Ron));
    }

    #[test]
    fn parse_currency_rejects_unknown_code() {
        assert_eq!(
            parse_currency("USD").unwrap_err().to_string(),
            "invalid currency: 'USD' is not one of RON, EUR"
        );
    }

    // =========================================================================
    // validate_profile / validate_request
    // =========================================================================

    #[test]
    fn validate_profile_rejects_five_dependents() {
        let profile = TaxpayerProfile {
            dependents: 5,
            ..TaxpayerProfile::default()
        };

        assert!(matches!(
            validate_profile(&profile),
            Err(FiscError::Validation { field: "dependents", .. })
        ));
    }

    #[test]
    fn validate_profile_rejects_negative_expenses() {
        let profile = TaxpayerProfile {
            expenses: dec!(-1),
            ..TaxpayerProfile::default()
        };

        assert!(matches!(
            validate_profile(&profile),
            Err(FiscError::Validation { field: "expenses", .. })
        ));
    }

    #[test]
    fn validate_request_checks_gross_first() {
        let mut request = CalculationRequest::new(Scenario::Cim, dec!(-5), Currency::Ron);
        request.profile.dependents = 9;

        assert!(matches!(
            validate_request(&request),
            Err(FiscError::Validation { field: "gross_income", .. })
        ));
    }

    #[test]
    fn validate_comparison_accepts_defaults() {
        let request = ComparisonRequest::new(dec!(100000), Currency::Eur);

        assert_eq!(validate_comparison(&request), Ok(()));
    }
}
