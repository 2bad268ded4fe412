//! Subcommand dispatch. Every command returns its rendered output so the
//! binary only has to print it.

use anyhow::{Context, Result, bail};
use fisc_core::calendar::{public_holidays, year_summary};
use fisc_core::validation::parse_amount;
use fisc_core::{
    CalculationRequest, ComparisonRequest, FiscalService, Objective, RateTable, Scenario,
};
use fisc_data::{load_bnr_file, load_from_file};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{AmountArgs, Command};
use crate::config::Settings;
use crate::output::{
    CalendarReport, RatesReport, render_batch, render_calendar, render_comparison,
    render_rates, render_result, to_json,
};

/// Builds the service and applies the exchange rate: the BNR feed first,
/// then an explicit rate, which wins. Unusable values keep the previous rate.
pub fn build_service(settings: &Settings) -> FiscalService {
    let service = FiscalService::with_default_rate();

    if let Some(path) = &settings.bnr_feed {
        match load_bnr_file(path) {
            Ok(feed) => {
                service.update_exchange_rate(feed.rate);
                info!(rate = %feed.rate, date = ?feed.date, "exchange rate taken from BNR feed");
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "BNR feed unusable; keeping previous rate");
            }
        }
    }
    if let Some(rate) = settings.exchange_rate {
        if !service.update_exchange_rate(rate) {
            warn!(%rate, "configured exchange rate is not positive; ignored");
        }
    }

    service
}

fn render<T: Serialize>(
    settings: &Settings,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<String> {
    if settings.json {
        to_json(value)
    } else {
        Ok(text(value))
    }
}

fn calculation_request(
    scenario: Scenario,
    args: &AmountArgs,
    settings: &Settings,
) -> Result<CalculationRequest> {
    Ok(CalculationRequest {
        scenario,
        gross_income: parse_amount("gross_income", &args.amount)?,
        currency: settings.currency,
        fiscal_year: settings.fiscal_year()?,
        period: settings.period,
        wage_period: settings.wage_period,
        profile: args.profile.to_profile()?,
    })
}

fn comparison_request(
    args: &AmountArgs,
    settings: &Settings,
) -> Result<ComparisonRequest> {
    Ok(ComparisonRequest {
        gross_income: parse_amount("gross_income", &args.amount)?,
        currency: settings.currency,
        fiscal_year: settings.fiscal_year()?,
        period: settings.period,
        wage_period: settings.wage_period,
        profile: args.profile.to_profile()?,
    })
}

fn single(
    scenario: Scenario,
    args: &AmountArgs,
    settings: &Settings,
    service: &FiscalService,
) -> Result<String> {
    let request = calculation_request(scenario, args, settings)?;
    let result = if args.target_net {
        service.gross_for_net(&request)
    } else {
        service.calculate(&request)
    }?;
    render(settings, &result, render_result)
}

/// Runs `command` and returns what it prints.
///
/// # Errors
///
/// Returns validation, configuration and I/O failures with context.
pub fn execute(
    command: &Command,
    settings: &Settings,
    service: &FiscalService,
) -> Result<String> {
    match command {
        Command::Cim(args) => single(Scenario::Cim, args, settings, service),
        Command::Pfa(args) => single(Scenario::Pfa, args, settings, service),
        Command::Srl(args) => single(Scenario::Srl, args, settings, service),
        Command::Compare(args) => {
            let request = comparison_request(args, settings)?;
            let comparison = if args.target_net {
                service.compare_for_net(&request)
            } else {
                service.compare_all(&request, Objective::MaximizeNet)
            }
            .context("comparison failed")?;
            render(settings, &comparison, render_comparison)
        }
        Command::Freelance(args) => {
            if args.target_net {
                bail!("--target-net is not available for freelance; use compare");
            }
            let request = comparison_request(args, settings)?;
            let comparison = service
                .compare_freelance(&request, Objective::MaximizeNet)
                .context("comparison failed")?;
            render(settings, &comparison, render_comparison)
        }
        Command::Batch { file } => {
            let requests = load_from_file(file)
                .with_context(|| format!("cannot load batch '{}'", file.display()))?;
            let results = requests
                .into_iter()
                .enumerate()
                .map(|(idx, mut request)| {
                    request.wage_period = settings.wage_period;
                    service
                        .calculate(&request)
                        .with_context(|| format!("row {} failed", idx + 1))
                })
                .collect::<Result<Vec<_>>>()?;
            info!(rows = results.len(), file = %file.display(), "batch calculated");
            render(settings, &results, |results| render_batch(results))
        }
        Command::Calendar { month } => {
            let holidays = public_holidays(settings.year)?;
            let mut months = year_summary(settings.year)?;
            if let Some(month) = month {
                if !(1..=12).contains(month) {
                    bail!("month must be between 1 and 12, got {month}");
                }
                months.retain(|summary| summary.month == *month);
            }
            let report = CalendarReport::new(settings.year, &holidays, months);
            render(settings, &report, render_calendar)
        }
        Command::Rates => {
            let table = RateTable::for_year(settings.fiscal_year()?);
            let report = RatesReport::new(&table, settings.wage_period, service.exchange_rate());
            render(settings, &report, render_rates)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn explicit_rate_is_applied() {
        let settings = Settings {
            exchange_rate: Some(dec!(4.97)),
            ..Settings::default()
        };

        assert_eq!(build_service(&settings).exchange_rate(), dec!(4.97));
    }

    #[test]
    fn non_positive_rate_keeps_the_fallback() {
        let settings = Settings {
            exchange_rate: Some(dec!(-1)),
            ..Settings::default()
        };

        assert_eq!(build_service(&settings).exchange_rate(), dec!(5.0));
    }

    #[test]
    fn missing_feed_keeps_the_fallback() {
        let settings = Settings {
            bnr_feed: Some("does-not-exist.xml".into()),
            ..Settings::default()
        };

        assert_eq!(build_service(&settings).exchange_rate(), dec!(5.0));
    }
}
