use thiserror::Error;

use crate::models::{RateTableError, Scenario};

/// Errors surfaced by the public API of this crate.
///
/// Validation and configuration errors are raised before any engine runs.
/// [`FiscError::Calculation`] wraps a failure that happened inside an engine
/// and keeps the engine error as its source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FiscError {
    /// Input failed a schema constraint at the validation boundary.
    #[error("invalid {field}: {constraint}")]
    Validation {
        field: &'static str,
        constraint: String,
    },

    /// An unknown fiscal year or scenario identifier was requested.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An engine rejected its rate table or could not finish the computation.
    #[error("{scenario} calculation failed")]
    Calculation {
        scenario: Scenario,
        #[source]
        source: RateTableError,
    },
}

impl FiscError {
    pub(crate) fn validation(
        field: &'static str,
        constraint: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field,
            constraint: constraint.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn validation_error_names_field_and_constraint() {
        let err = FiscError::validation("gross_income", "must not be negative");

        assert_eq!(err.to_string(), "invalid gross_income: must not be negative");
    }

    #[test]
    fn calculation_error_keeps_engine_error_as_source() {
        let err = FiscError::Calculation {
            scenario: Scenario::Pfa,
            source: RateTableError::RateOutOfRange {
                name: "pfa.health_rate",
                value: dec!(1.5),
            },
        };

        assert_eq!(err.to_string(), "PFA calculation failed");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("pfa.health_rate must be between 0 and 1, got 1.5")
        );
    }
}
