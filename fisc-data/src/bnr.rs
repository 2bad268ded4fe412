//! Parser for the BNR (National Bank of Romania) daily reference-rate feed.
//!
//! The feed is the XML document published at `nbrfxrates.xml`. Only two
//! pieces are needed, so they are matched with regular expressions instead
//! of a full XML parse:
//!
//! ```xml
//! <PublishingDate>2025-10-17</PublishingDate>
//! <Cube date="2025-10-17">
//!   <Rate currency="EUR">5.0868</Rate>
//!   <Rate currency="HUF" multiplier="100">1.2948</Rate>
//! </Cube>
//! ```
//!
//! Rates are RON per unit of the foreign currency. When a `multiplier` is
//! present the published value covers that many units and is divided back.
//! Fetching the document is left to the caller; on any error the caller
//! keeps its last good rate.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_data::parse_bnr_feed;
//!
//! let rate = parse_bnr_feed(r#"<Cube date="2025-10-17"><Rate currency="EUR">5.0868</Rate></Cube>"#).unwrap();
//! assert_eq!(rate.rate, dec!(5.0868));
//! ```

use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const CUBE_DATE: &str = r#"<Cube\s+date="([0-9-]+)"\s*>"#;
const PUBLISHING_DATE: &str = r"<PublishingDate>\s*([0-9-]+)\s*</PublishingDate>";

/// One reference rate taken from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BnrRate {
    pub currency: String,
    /// RON per one unit of `currency`.
    pub rate: Decimal,
    /// Date the rate applies to, when the feed states one.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Error)]
pub enum BnrFeedError {
    #[error("cannot read BNR feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid feed pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("no {currency} rate in BNR feed")]
    MissingRate { currency: String },

    #[error("{currency} rate '{value}' is not a number")]
    InvalidRate { currency: String, value: String },

    #[error("{currency} rate {rate} is not positive")]
    NonPositiveRate { currency: String, rate: Decimal },

    #[error("invalid feed date '{value}'")]
    InvalidDate { value: String },
}

fn rate_pattern(currency: &str) -> Result<Regex, BnrFeedError> {
    let pattern = format!(
        r#"<Rate\s+currency="{}"(?:\s+multiplier="([0-9]+)")?\s*>\s*([^<]*?)\s*</Rate>"#,
        regex::escape(currency)
    );
    Ok(Regex::new(&pattern)?)
}

fn find_date(xml: &str) -> Result<Option<NaiveDate>, BnrFeedError> {
    for pattern in [CUBE_DATE, PUBLISHING_DATE] {
        let Some(captures) = Regex::new(pattern)?.captures(xml) else {
            continue;
        };
        let value = &captures[1];
        return NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| BnrFeedError::InvalidDate {
                value: value.to_string(),
            });
    }
    Ok(None)
}

/// Extracts the rate for `currency` (e.g. `"USD"`) from the feed.
///
/// # Errors
///
/// Returns a [`BnrFeedError`] when the rate is absent, unparseable or not
/// positive, or when a date is present but malformed.
pub fn parse_bnr_rate(
    xml: &str,
    currency: &str,
) -> Result<BnrRate, BnrFeedError> {
    let captures = rate_pattern(currency)?
        .captures(xml)
        .ok_or_else(|| BnrFeedError::MissingRate {
            currency: currency.to_string(),
        })?;

    let value = &captures[2];
    let published = value
        .parse::<Decimal>()
        .map_err(|_| BnrFeedError::InvalidRate {
            currency: currency.to_string(),
            value: value.to_string(),
        })?;
    let multiplier = match captures.get(1) {
        Some(m) => m
            .as_str()
            .parse::<Decimal>()
            .map_err(|_| BnrFeedError::InvalidRate {
                currency: currency.to_string(),
                value: m.as_str().to_string(),
            })?,
        None => Decimal::ONE,
    };
    if published <= Decimal::ZERO || multiplier.is_zero() {
        return Err(BnrFeedError::NonPositiveRate {
            currency: currency.to_string(),
            rate: published,
        });
    }

    let rate = BnrRate {
        currency: currency.to_string(),
        rate: published / multiplier,
        date: find_date(xml)?,
    };
    debug!(currency, rate = %rate.rate, date = ?rate.date, "BNR rate parsed");
    Ok(rate)
}

/// Extracts the EUR→RON reference rate.
///
/// # Errors
///
/// See [`parse_bnr_rate`].
pub fn parse_bnr_feed(xml: &str) -> Result<BnrRate, BnrFeedError> {
    parse_bnr_rate(xml, "EUR")
}

/// Reads a saved feed document and extracts the EUR rate.
///
/// # Errors
///
/// Returns [`BnrFeedError::Io`] when the file cannot be read, or any error
/// from [`parse_bnr_feed`].
pub fn load_bnr_file(path: &Path) -> Result<BnrRate, BnrFeedError> {
    let xml = std::fs::read_to_string(path)?;
    parse_bnr_feed(&xml)
}
