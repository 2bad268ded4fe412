//! CSV loader for batches of calculation requests.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive and must match exactly. Whitespace around values
//! is ignored.
//!
//! | Column               | Required | Type    | Notes                                     |
//! |----------------------|----------|---------|-------------------------------------------|
//! | `scenario`           | yes      | string  | One of: `CIM`, `PFA`, `SRL`               |
//! | `gross_income`       | yes      | decimal | e.g. `40000.00`                           |
//! | `currency`           | yes      | string  | `RON` or `EUR`                            |
//! | `fiscal_year`        | no       | integer | `2025` (default) or `2026`                |
//! | `period`             | no       | string  | `annual` (default) or `monthly`           |
//! | `dependents`         | no       | integer | 0 to 4                                    |
//! | `under_26`           | no       | flag    |                                           |
//! | `children_in_school` | no       | integer |                                           |
//! | `pensioner`          | no       | flag    |                                           |
//! | `handicapped`        | no       | flag    |                                           |
//! | `has_employee`       | no       | flag    | Defaults to `true`                        |
//! | `expenses`           | no       | decimal | Leave cell empty for zero                 |
//! | `reinvested_profit`  | no       | decimal | Leave cell empty for zero                 |
//!
//! Flags accept `true`/`false`, `yes`/`no`, `y`/`n` and `1`/`0` in any case.
//! An empty flag cell keeps the default.
//!
//! ### Minimal example
//!
//! ```csv
//! scenario,gross_income,currency
//! PFA,40000.00,RON
//! ```
//!
//! ### Full example
//!
//! ```csv
//! scenario,gross_income,currency,fiscal_year,period,dependents,under_26,children_in_school,pensioner,handicapped,has_employee,expenses,reinvested_profit
//! CIM,4050,RON,2025,monthly,1,yes,2,,,,,
//! SRL,200000,RON,2026,annual,,,,,,no,50000,10000
//! ```
use std::io::Read;
use std::path::Path;

use fisc_core::validation::validate_request;
use fisc_core::{
    CalculationRequest, Currency, FiscError, FiscalYear, Period, Scenario, TaxpayerProfile,
    WagePeriod,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    scenario: String,
    gross_income: Decimal,
    currency: String,
    fiscal_year: Option<i32>,
    period: Option<String>,
    dependents: Option<u8>,
    under_26: Option<String>,
    children_in_school: Option<u32>,
    pensioner: Option<String>,
    handicapped: Option<String>,
    has_employee: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    expenses: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    reinvested_profit: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read CSV file: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based (header = row 0) in this and every variant below.
    #[error("unrecognised scenario '{value}' on row {row}")]
    InvalidScenario { value: String, row: usize },

    #[error("unrecognised currency '{value}' on row {row}")]
    InvalidCurrency { value: String, row: usize },

    #[error("unsupported fiscal year {value} on row {row}")]
    InvalidYear { value: i32, row: usize },

    #[error("unrecognised period '{value}' on row {row}")]
    InvalidPeriod { value: String, row: usize },

    #[error("invalid {column} flag '{value}' on row {row}")]
    InvalidFlag {
        column: &'static str,
        value: String,
        row: usize,
    },

    /// The row parsed but failed request validation.
    #[error("row {row}: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: FiscError,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_flag(
    column: &'static str,
    cell: Option<String>,
    default: bool,
    row: usize,
) -> Result<bool, CsvLoadError> {
    let Some(value) = cell else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(CsvLoadError::InvalidFlag { column, value, row }),
    }
}

/// Convert a single CSV row into a validated CalculationRequest.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<CalculationRequest, CsvLoadError> {
    let scenario =
        Scenario::parse(&row.scenario).map_err(|_| CsvLoadError::InvalidScenario {
            value: row.scenario.clone(),
            row: row_number,
        })?;
    let currency = Currency::parse(&row.currency).ok_or_else(|| CsvLoadError::InvalidCurrency {
        value: row.currency.clone(),
        row: row_number,
    })?;
    let fiscal_year = match row.fiscal_year {
        Some(year) => FiscalYear::try_from(year).map_err(|_| CsvLoadError::InvalidYear {
            value: year,
            row: row_number,
        })?,
        None => FiscalYear::default(),
    };
    let period = match row.period.as_deref().map(str::trim) {
        None | Some("") => Period::default(),
        Some(value) => Period::parse(value).ok_or_else(|| CsvLoadError::InvalidPeriod {
            value: value.to_string(),
            row: row_number,
        })?,
    };

    let defaults = TaxpayerProfile::default();
    let profile = TaxpayerProfile {
        dependents: row.dependents.unwrap_or(defaults.dependents),
        under_26: parse_flag("under_26", row.under_26, defaults.under_26, row_number)?,
        children_in_school: row.children_in_school.unwrap_or(defaults.children_in_school),
        pensioner: parse_flag("pensioner", row.pensioner, defaults.pensioner, row_number)?,
        handicapped: parse_flag("handicapped", row.handicapped, defaults.handicapped, row_number)?,
        has_employee: parse_flag(
            "has_employee",
            row.has_employee,
            defaults.has_employee,
            row_number,
        )?,
        expenses: row.expenses.unwrap_or(defaults.expenses),
        reinvested_profit: row.reinvested_profit.unwrap_or(defaults.reinvested_profit),
    };

    let request = CalculationRequest {
        scenario,
        gross_income: row.gross_income,
        currency,
        fiscal_year,
        period,
        wage_period: WagePeriod::default(),
        profile,
    };
    validate_request(&request).map_err(|source| CsvLoadError::Invalid {
        row: row_number,
        source,
    })?;
    Ok(request)
}

/// Parse CSV from any reader and return the requests in file order.
///
/// # Errors
///
/// Returns the first [CsvLoadError] encountered; later rows are not read.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<CalculationRequest>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    let requests = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = requests.len(), "batch loaded");
    Ok(requests)
}

/// Parse CSV text (the full file contents as a &str).
///
/// # Errors
///
/// * [CsvLoadError::Parse] if the CSV is structurally invalid or a required
///   field cannot be deserialised.
/// * A row-level variant naming the 1-based row for unknown codes, flags or
///   values that fail validation.
pub fn load_from_str(input: &str) -> Result<Vec<CalculationRequest>, CsvLoadError> {
    load_from_reader(input.as_bytes())
}

/// Read a file from disk and delegate to [load_from_str].
///
/// # Errors
///
/// Returns [CsvLoadError::Io] when the file cannot be read, or another
/// [CsvLoadError] when the contents are invalid.
pub fn load_from_file(path: &Path) -> Result<Vec<CalculationRequest>, CsvLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
