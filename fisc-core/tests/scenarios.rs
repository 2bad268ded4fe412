//! Worked examples checked end to end through [`FiscalService`].

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fisc_core::{
    Breakdown, CalculationRequest, ComparisonRequest, CompanyRegime, Currency, ExchangeRate,
    FiscalService, FiscalYear, Objective, Period, Scenario, ScenarioKey,
};

fn service() -> FiscalService {
    FiscalService::new(Arc::new(ExchangeRate::new(dec!(5.0))))
}

#[test]
fn cim_at_minimum_wage() {
    let mut request = CalculationRequest::new(Scenario::Cim, dec!(4050), Currency::Ron);
    request.period = Period::Monthly;

    let result = service().calculate(&request).unwrap();

    let Breakdown::Cim(b) = &result.breakdown else {
        panic!("expected CIM breakdown, got {:?}", result.breakdown);
    };
    assert_eq!(b.tax_free_allowance, dec!(300));
    assert_eq!(b.contribution_base, dec!(3750));
    assert_eq!(b.pension, dec!(938));
    assert_eq!(b.health, dec!(375));
    assert!(b.income_tax >= Decimal::ZERO);
    assert_eq!(result.net, dec!(4050) - dec!(938) - dec!(375) - b.income_tax);
}

#[test]
fn pfa_below_pension_threshold() {
    let request = CalculationRequest::new(Scenario::Pfa, dec!(40000), Currency::Ron);

    let result = service().calculate(&request).unwrap();

    let Breakdown::Pfa(b) = &result.breakdown else {
        panic!("expected PFA breakdown, got {:?}", result.breakdown);
    };
    assert_eq!(b.pension, Decimal::ZERO);
    assert_eq!(b.health_base, dec!(40000));
    assert_eq!(b.health, dec!(4000));
}

#[test]
fn srl_profit_regime() {
    let mut request = CalculationRequest::new(Scenario::Srl, dec!(200000), Currency::Ron);
    request.profile.has_employee = false;
    request.profile.expenses = dec!(50000);
    request.profile.reinvested_profit = dec!(20000);

    let result = service().calculate(&request).unwrap();

    let Breakdown::Srl(b) = &result.breakdown else {
        panic!("expected SRL breakdown, got {:?}", result.breakdown);
    };
    assert_eq!(b.regime, CompanyRegime::Profit);
    assert_eq!(b.corporate_tax, dec!(20800));
}

#[test]
fn srl_micro_regime_with_owner_salary() {
    let request = CalculationRequest::new(Scenario::Srl, dec!(200000), Currency::Ron);

    let result = service().calculate(&request).unwrap();

    assert_eq!(result.key(), ScenarioKey::SrlMicro);
    assert_eq!(result.net, dec!(154643.85));
    assert_eq!(result.total_taxes, dec!(45356.15));
}

#[test]
fn negative_exchange_rate_update_is_ignored() {
    let service = service();
    let before = service.exchange_rate();

    assert!(!service.update_exchange_rate(dec!(-5)));

    assert_eq!(service.exchange_rate(), before);
}

#[test]
fn fresher_exchange_rate_changes_eur_results() {
    let service = service();
    let request = CalculationRequest::new(Scenario::Pfa, dec!(8000), Currency::Eur);
    let at_five = service.calculate(&request).unwrap();

    service.update_exchange_rate(dec!(4));
    let at_four = service.calculate(&request).unwrap();

    // 32000 RON of revenue instead of 40000: same 81% kept in EUR terms.
    assert_eq!(at_five.net, dec!(6480));
    assert_eq!(at_four.net, dec!(6480));
    let Breakdown::Pfa(b) = &at_four.breakdown else {
        panic!("expected PFA breakdown");
    };
    assert_eq!(b.health, dec!(800));
}

#[test]
fn comparison_for_a_2026_freelancer() {
    let mut request = ComparisonRequest::new(dec!(30000), Currency::Eur);
    request.fiscal_year = FiscalYear::Y2026;

    let comparison = service()
        .compare_freelance(&request, Objective::MaximizeNet)
        .unwrap();

    assert_eq!(comparison.results.len(), 3);
    let best = comparison.optimal_result().unwrap();
    let worst = comparison
        .results
        .iter()
        .map(|r| r.net)
        .min()
        .unwrap();
    assert_eq!(comparison.savings, best.net - worst);
    assert!(comparison.results.iter().all(|r| r.currency == Currency::Eur));
}
