//! Romanian public holidays and working days.
//!
//! Movable holidays follow Orthodox Easter, computed with the Meeus Julian
//! algorithm and shifted by the 13-day Julian/Gregorian offset, which is only
//! correct between 1900 and 2099.
//!
//! ```
//! use chrono::NaiveDate;
//! use fisc_core::calendar::{orthodox_easter, working_days};
//!
//! assert_eq!(orthodox_easter(2025).unwrap(), NaiveDate::from_ymd_opt(2025, 4, 20).unwrap());
//! assert_eq!(working_days(2025, 1).unwrap(), 20);
//! ```

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::FiscError;

/// Years for which the Julian-to-Gregorian offset is 13 days.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=2099;

/// Fixed-date holidays as (month, day).
const FIXED_HOLIDAYS: [(u32, u32); 10] = [
    (1, 1),
    (1, 2),
    (1, 24),
    (5, 1),
    (6, 1),
    (8, 15),
    (11, 30),
    (12, 1),
    (12, 25),
    (12, 26),
];

/// Movable holidays as day offsets from Orthodox Easter Sunday: Good Friday,
/// Easter Sunday and Monday, Pentecost Sunday and Monday.
const EASTER_OFFSETS: [i64; 5] = [-2, 0, 1, 49, 50];

/// Working-day totals for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: u32,
    pub days: u32,
    pub working_days: u32,
}

fn check_year(year: i32) -> Result<(), FiscError> {
    if SUPPORTED_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(FiscError::Configuration(format!(
            "holiday calendar supports years {} to {}, got {year}",
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )))
    }
}

fn date(
    year: i32,
    month: u32,
    day: u32,
) -> Result<NaiveDate, FiscError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| FiscError::Configuration(format!("invalid date {year}-{month}-{day}")))
}

/// Orthodox Easter Sunday, as a Gregorian date.
///
/// # Errors
///
/// Returns [`FiscError::Configuration`] outside [`SUPPORTED_YEARS`].
pub fn orthodox_easter(year: i32) -> Result<NaiveDate, FiscError> {
    check_year(year)?;

    let a = year % 4;
    let b = year % 7;
    let c = year % 19;
    let d = (19 * c + 15) % 30;
    let e = (2 * a + 4 * b - d + 34) % 7;
    let month = (d + e + 114) / 31;
    let day = (d + e + 114) % 31 + 1;

    let julian = date(year, month.unsigned_abs(), day.unsigned_abs())?;
    julian
        .checked_add_days(Days::new(13))
        .ok_or_else(|| FiscError::Configuration(format!("easter out of range for {year}")))
}

/// All public holidays of `year`, sorted.
///
/// # Errors
///
/// Returns [`FiscError::Configuration`] outside [`SUPPORTED_YEARS`].
pub fn public_holidays(year: i32) -> Result<BTreeSet<NaiveDate>, FiscError> {
    let easter = orthodox_easter(year)?;

    let mut holidays = BTreeSet::new();
    for (month, day) in FIXED_HOLIDAYS {
        holidays.insert(date(year, month, day)?);
    }
    for offset in EASTER_OFFSETS {
        let holiday = if offset < 0 {
            easter.checked_sub_days(Days::new(offset.unsigned_abs()))
        } else {
            easter.checked_add_days(Days::new(offset.unsigned_abs()))
        };
        if let Some(holiday) = holiday {
            holidays.insert(holiday);
        }
    }
    Ok(holidays)
}

fn days_in_month(
    year: i32,
    month: u32,
) -> Result<u32, FiscError> {
    let first = date(year, month, 1)?;
    let next = if month == 12 {
        date(year + 1, 1, 1)?
    } else {
        date(year, month + 1, 1)?
    };
    Ok(next.signed_duration_since(first).num_days().unsigned_abs() as u32)
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

fn count_working_days(
    year: i32,
    month: u32,
    holidays: &BTreeSet<NaiveDate>,
) -> Result<MonthSummary, FiscError> {
    let days = days_in_month(year, month)?;
    let first = date(year, month, 1)?;
    let working_days = first
        .iter_days()
        .take(days as usize)
        .filter(|day| !is_weekend(*day) && !holidays.contains(day))
        .count() as u32;

    Ok(MonthSummary {
        month,
        days,
        working_days,
    })
}

/// Weekdays in the month that are not public holidays.
///
/// # Errors
///
/// Returns [`FiscError::Configuration`] for an unsupported year or a month
/// outside 1 to 12.
pub fn working_days(
    year: i32,
    month: u32,
) -> Result<u32, FiscError> {
    let holidays = public_holidays(year)?;
    count_working_days(year, month, &holidays).map(|summary| summary.working_days)
}

/// Per-month day and working-day counts for the whole year.
///
/// # Errors
///
/// Returns [`FiscError::Configuration`] for an unsupported year.
pub fn year_summary(year: i32) -> Result<Vec<MonthSummary>, FiscError> {
    let holidays = public_holidays(year)?;
    (1..=12)
        .map(|month| count_working_days(year, month, &holidays))
        .collect()
}
