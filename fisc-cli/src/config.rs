//! Runtime options: the optional `fisc.toml` file merged with command-line
//! flags. Flags always win.
//!
//! ```toml
//! fiscal_year = 2026
//! currency = "EUR"
//! period = "monthly"
//! second_half = true
//! exchange_rate = 5.0868
//! bnr_feed = "nbrfxrates.xml"
//! log_file = "fisc.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use fisc_core::validation::parse_currency;
use fisc_core::{Currency, FiscError, FiscalYear, Period, WagePeriod};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::cli::GlobalArgs;

pub const DEFAULT_CONFIG_FILE: &str = "fisc.toml";

/// Contents of the config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FiscConfig {
    pub fiscal_year: Option<i32>,
    pub currency: Option<String>,
    pub period: Option<String>,
    pub second_half: bool,
    pub exchange_rate: Option<Decimal>,
    pub bnr_feed: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl FiscConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        let config =
            Self::from_toml(&text).with_context(|| format!("in '{}'", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Loads `explicit` if given (it must exist), otherwise
    /// [`DEFAULT_CONFIG_FILE`] if present, otherwise defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Options in effect for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Calendar year as given; checked against the rate tables on use.
    pub year: i32,
    pub currency: Currency,
    pub period: Period,
    pub wage_period: WagePeriod,
    pub exchange_rate: Option<Decimal>,
    pub bnr_feed: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            year: FiscalYear::default().as_i32(),
            currency: Currency::default(),
            period: Period::default(),
            wage_period: WagePeriod::default(),
            exchange_rate: None,
            bnr_feed: None,
            log_file: None,
            json: false,
        }
    }
}

impl Settings {
    /// Merges `args` over `config`.
    ///
    /// # Errors
    ///
    /// Fails on an unknown currency or period code.
    pub fn resolve(
        args: &GlobalArgs,
        config: FiscConfig,
    ) -> Result<Self> {
        let defaults = Self::default();

        let currency = match args.currency.as_deref().or(config.currency.as_deref()) {
            Some(code) => parse_currency(code)?,
            None => defaults.currency,
        };
        let period = match args.period.as_deref().or(config.period.as_deref()) {
            Some(value) => Period::parse(value)
                .ok_or_else(|| anyhow!("unknown period '{value}'; expected annual or monthly"))?,
            None => defaults.period,
        };
        let wage_period = if args.second_half || config.second_half {
            WagePeriod::SecondHalf
        } else {
            WagePeriod::FirstHalf
        };

        Ok(Self {
            year: args.year.or(config.fiscal_year).unwrap_or(defaults.year),
            currency,
            period,
            wage_period,
            exchange_rate: args.rate.or(config.exchange_rate),
            bnr_feed: args.bnr_feed.clone().or(config.bnr_feed),
            log_file: args.log_file.clone().or(config.log_file),
            json: args.json,
        })
    }

    /// # Errors
    ///
    /// Returns [`FiscError::Configuration`] for a year without a rate table.
    pub fn fiscal_year(&self) -> Result<FiscalYear, FiscError> {
        FiscalYear::try_from(self.year)
    }
}
