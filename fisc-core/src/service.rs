//! Entry point tying validation, currency conversion and the engines
//! together.
//!
//! A [`FiscalService`] is built once at startup around a shared
//! [`ExchangeRate`] and can be cloned or shared across threads. Every
//! calculation reads the current rate, converts the request to RON, runs the
//! engine in its native period and converts the result back into the
//! caller's currency and period.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_core::{CalculationRequest, Currency, FiscalService, Period, Scenario};
//!
//! let service = FiscalService::with_default_rate();
//! let mut request = CalculationRequest::new(Scenario::Cim, dec!(4050), Currency::Ron);
//! request.period = Period::Monthly;
//!
//! let result = service.calculate(&request).unwrap();
//!
//! assert_eq!(result.net, dec!(2574));
//! ```

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::FiscError;
use crate::calculations::common::round_half_up;
use crate::calculations::{
    CompanyCalculator, CompanyInput, EmploymentCalculator, EmploymentInput,
    SoleProprietorCalculator, SoleProprietorInput, optimizer,
};
use crate::currency::{ExchangeRate, convert};
use crate::format;
use crate::models::{
    Breakdown, CalculationRequest, CalculationResult, ComparisonRequest, ComparisonResult,
    Currency, FiscalYear, Objective, Period, RateTable, RateTableError, Scenario,
};
use crate::validation::{validate_comparison, validate_request};

const MONTHS: Decimal = dec!(12);

/// Every scenario, in comparison order.
const ALL_SCENARIOS: [Scenario; 3] = [Scenario::Cim, Scenario::Pfa, Scenario::Srl];

/// Shared facade over the tax engines.
#[derive(Debug, Clone)]
pub struct FiscalService {
    exchange_rate: Arc<ExchangeRate>,
}

impl Default for FiscalService {
    fn default() -> Self {
        Self::with_default_rate()
    }
}

impl FiscalService {
    pub fn new(exchange_rate: Arc<ExchangeRate>) -> Self {
        Self { exchange_rate }
    }

    /// Builds a service whose rate starts at the rate table's fallback.
    pub fn with_default_rate() -> Self {
        let fallback = RateTable::for_year(FiscalYear::default())
            .constants
            .eur_ron_rate;
        Self::new(Arc::new(ExchangeRate::new(fallback)))
    }

    pub fn rate_table(
        &self,
        year: FiscalYear,
    ) -> RateTable {
        RateTable::for_year(year)
    }

    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate.get()
    }

    /// The shared rate, for callers that refresh it from elsewhere.
    pub fn exchange_rate_handle(&self) -> Arc<ExchangeRate> {
        Arc::clone(&self.exchange_rate)
    }

    /// Applies a new EUR→RON rate; non-positive values are ignored.
    pub fn update_exchange_rate(
        &self,
        rate: Decimal,
    ) -> bool {
        let applied = self.exchange_rate.update(rate);
        if applied {
            info!(%rate, "exchange rate updated");
        }
        applied
    }

    pub fn convert_currency(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
    ) -> Decimal {
        convert(amount, from, to, self.exchange_rate())
    }

    pub fn format_currency(
        &self,
        amount: Decimal,
        currency: Currency,
    ) -> String {
        format::format_currency(amount, currency)
    }

    pub fn format_percent(
        &self,
        value: Decimal,
    ) -> String {
        format::format_percent(value)
    }

    /// Runs one scenario.
    ///
    /// The result is expressed in the request's currency and period.
    ///
    /// # Errors
    ///
    /// - [`FiscError::Validation`] for out-of-range input
    /// - [`FiscError::Calculation`] if the engine rejects its rate table
    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, FiscError> {
        validate_request(request)?;
        let result = self.run(request)?;
        info!(
            scenario = %result.key().label(),
            gross = %result.gross,
            net = %result.net,
            currency = %result.currency,
            "calculation complete"
        );
        Ok(result)
    }

    /// CIM vs PFA vs SRL for the same gross income.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any scenario.
    pub fn compare_all(
        &self,
        request: &ComparisonRequest,
        objective: Objective,
    ) -> Result<ComparisonResult, FiscError> {
        validate_comparison(request)?;
        let results = ALL_SCENARIOS
            .iter()
            .map(|scenario| self.calculate(&request.for_scenario(*scenario)))
            .collect::<Result<Vec<_>, _>>()?;
        self.rank(results, objective)
    }

    /// PFA vs SRL micro vs SRL profit, the options open to a freelancer.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any scenario.
    pub fn compare_freelance(
        &self,
        request: &ComparisonRequest,
        objective: Objective,
    ) -> Result<ComparisonResult, FiscError> {
        validate_comparison(request)?;
        let results = freelance_requests(request)
            .iter()
            .map(|r| self.calculate(r))
            .collect::<Result<Vec<_>, _>>()?;
        self.rank(results, objective)
    }

    /// Treats `request.gross_income` as a target net and finds the gross
    /// that produces it.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the scenario.
    pub fn gross_for_net(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, FiscError> {
        validate_request(request)?;
        let result = optimizer::gross_for_net(request.gross_income, |gross| {
            self.run(&CalculationRequest {
                gross_income: gross,
                ..request.clone()
            })
        })?;
        info!(
            scenario = %result.key().label(),
            target_net = %request.gross_income,
            gross = %result.gross,
            currency = %result.currency,
            "gross found for target net"
        );
        Ok(result)
    }

    /// Finds, for every scenario, the gross needed to reach
    /// `request.gross_income` net, and ranks them by lowest gross.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any scenario.
    pub fn compare_for_net(
        &self,
        request: &ComparisonRequest,
    ) -> Result<ComparisonResult, FiscError> {
        validate_comparison(request)?;
        let results = ALL_SCENARIOS
            .iter()
            .map(|scenario| self.gross_for_net(&request.for_scenario(*scenario)))
            .collect::<Result<Vec<_>, _>>()?;
        self.rank(results, Objective::MinimizeGross)
    }

    fn rank(
        &self,
        results: Vec<CalculationResult>,
        objective: Objective,
    ) -> Result<ComparisonResult, FiscError> {
        let comparison = optimizer::rank(results, objective)
            .ok_or_else(|| FiscError::Configuration("no scenarios to compare".to_string()))?;
        info!(
            optimal = %comparison.optimal.label(),
            savings = %comparison.savings,
            "comparison complete"
        );
        Ok(comparison)
    }

    /// Converts to RON, dispatches to the engine and converts back.
    /// Input must already be validated.
    fn run(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, FiscError> {
        let rate = self.exchange_rate();
        let rates = RateTable::for_year(request.fiscal_year);
        let to_ron = |amount| convert(amount, request.currency, Currency::Ron, rate);
        let amounts = RonAmounts {
            gross: to_ron(request.gross_income),
            expenses: to_ron(request.profile.expenses),
            reinvested_profit: to_ron(request.profile.reinvested_profit),
        };

        debug!(
            scenario = %request.scenario,
            gross_ron = %amounts.gross,
            period = %request.period.as_str(),
            year = %request.fiscal_year,
            "dispatching calculation"
        );

        let result = match request.scenario {
            Scenario::Cim => self.employment(request, &rates, &amounts),
            Scenario::Pfa => self.sole_proprietor(request, &rates, &amounts),
            Scenario::Srl => self.company(request, &rates, &amounts, rate),
        }
        .map_err(|source| FiscError::Calculation {
            scenario: request.scenario,
            source,
        })?;

        Ok(result.converted(request.currency, rate))
    }

    /// CIM runs monthly: annual gross is split into twelve salaries and the
    /// monthly result scaled back up.
    fn employment(
        &self,
        request: &CalculationRequest,
        rates: &RateTable,
        amounts: &RonAmounts,
    ) -> Result<CalculationResult, RateTableError> {
        let monthly_gross = match request.period {
            Period::Monthly => amounts.gross,
            Period::Annual => round_half_up(amounts.gross / MONTHS),
        };
        let profile = &request.profile;
        let monthly = EmploymentCalculator::new(rates).calculate(&EmploymentInput {
            gross: monthly_gross,
            minimum_wage: rates.minimum_wage(request.wage_period),
            dependents: profile.dependents,
            under_26: profile.under_26,
            children_in_school: profile.children_in_school,
            handicapped: profile.handicapped,
        })?;
        let mut result = monthly.for_period(request.period);
        if monthly_gross != amounts.gross {
            // Twelve cent-rounded salaries need not add up to the annual gross.
            result.gross = amounts.gross;
            result.net = result.gross - result.costs - result.total_taxes;
            if let Breakdown::Cim(b) = &mut result.breakdown {
                b.complete_cost = result.gross + b.employer_contribution;
            }
        }
        Ok(result)
    }

    /// PFA runs annually: monthly amounts are annualized first.
    fn sole_proprietor(
        &self,
        request: &CalculationRequest,
        rates: &RateTable,
        amounts: &RonAmounts,
    ) -> Result<CalculationResult, RateTableError> {
        let annual = amounts.annualized(request.period);
        let result = SoleProprietorCalculator::new(rates).calculate(&SoleProprietorInput {
            revenue: annual.gross,
            expenses: annual.expenses,
            minimum_wage: rates.minimum_wage(request.wage_period),
            pensioner: request.profile.pensioner,
            handicapped: request.profile.handicapped,
        })?;
        Ok(result.for_period(request.period))
    }

    /// SRL runs annually: monthly amounts are annualized first.
    fn company(
        &self,
        request: &CalculationRequest,
        rates: &RateTable,
        amounts: &RonAmounts,
        eur_ron_rate: Decimal,
    ) -> Result<CalculationResult, RateTableError> {
        let annual = amounts.annualized(request.period);
        let result = CompanyCalculator::new(rates).calculate(&CompanyInput {
            revenue: annual.gross,
            expenses: annual.expenses,
            reinvested_profit: annual.reinvested_profit,
            has_employee: request.profile.has_employee,
            handicapped: request.profile.handicapped,
            minimum_wage: rates.minimum_wage(request.wage_period),
            eur_ron_rate,
        })?;
        Ok(result.for_period(request.period))
    }
}

/// Request amounts converted to RON, still in the request period.
struct RonAmounts {
    gross: Decimal,
    expenses: Decimal,
    reinvested_profit: Decimal,
}

impl RonAmounts {
    fn annualized(
        &self,
        period: Period,
    ) -> Self {
        let factor = match period {
            Period::Monthly => MONTHS,
            Period::Annual => Decimal::ONE,
        };
        Self {
            gross: self.gross * factor,
            expenses: self.expenses * factor,
            reinvested_profit: self.reinvested_profit * factor,
        }
    }
}

/// PFA, then SRL with an employee (micro), then SRL without (profit).
fn freelance_requests(request: &ComparisonRequest) -> [CalculationRequest; 3] {
    let pfa = request.for_scenario(Scenario::Pfa);
    let mut micro = request.for_scenario(Scenario::Srl);
    micro.profile.has_employee = true;
    let mut profit = request.for_scenario(Scenario::Srl);
    profit.profile.has_employee = false;
    [pfa, micro, profit]
}
