//! Ranking of scenario results and the inverse (net to gross) search.
//!
//! Results are ranked with a stable sort, so when two scenarios tie the one
//! listed first wins.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_core::calculations::optimizer::rank;
//! use fisc_core::{Objective, ScenarioKey};
//! # use fisc_core::calculations::{SoleProprietorCalculator, SoleProprietorInput};
//! # use fisc_core::{FiscalYear, RateTable};
//! # let rates = RateTable::for_year(FiscalYear::Y2025);
//! # let pfa = |revenue| SoleProprietorCalculator::new(&rates)
//! #     .calculate(&SoleProprietorInput { revenue, minimum_wage: dec!(4050), ..Default::default() })
//! #     .unwrap();
//! let results = vec![pfa(dec!(30000)), pfa(dec!(40000))];
//!
//! let comparison = rank(results, Objective::MaximizeNet).unwrap();
//!
//! assert_eq!(comparison.optimal, ScenarioKey::Pfa);
//! assert_eq!(comparison.savings, dec!(8100.00));
//! ```

use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::models::{CalculationResult, ComparisonResult, Objective};

/// Ceiling for the net-to-gross search, matching the input validation limit.
const SEARCH_LIMIT: Decimal = dec!(10000000);
const MAX_ITERATIONS: usize = 64;

/// Ranks `results` by `objective`.
///
/// The returned comparison keeps `results` in their input order; only the
/// optimal key and the savings depend on the ranking. Returns `None` for an
/// empty list.
pub fn rank(
    results: Vec<CalculationResult>,
    objective: Objective,
) -> Option<ComparisonResult> {
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| compare(&results[a], &results[b], objective));

    let best = &results[*order.first()?];
    let worst = &results[*order.last()?];
    let savings = round_half_up((metric(best, objective) - metric(worst, objective)).abs());
    let optimal = best.key();

    debug!(
        optimal = %optimal.label(),
        savings = %savings,
        ?objective,
        "scenarios ranked"
    );

    Some(ComparisonResult {
        results,
        optimal,
        savings,
        objective,
    })
}

fn metric(
    result: &CalculationResult,
    objective: Objective,
) -> Decimal {
    match objective {
        Objective::MaximizeNet => result.net,
        Objective::MinimizeGross => result.gross,
    }
}

/// Orders better results first.
fn compare(
    a: &CalculationResult,
    b: &CalculationResult,
    objective: Objective,
) -> Ordering {
    match objective {
        Objective::MaximizeNet => b.net.cmp(&a.net),
        Objective::MinimizeGross => a.gross.cmp(&b.gross),
    }
}

/// Searches for a gross, to the cent, whose result nets at least
/// `target_net`, by bisection over `calculate`.
///
/// Net is not strictly monotonic in gross (allowances and contribution tiers
/// switch off at thresholds), so the answer is a gross that reaches the
/// target, not necessarily the smallest one. When even the search limit
/// cannot reach the target, the result at the limit is returned.
///
/// # Errors
///
/// Propagates the first error returned by `calculate`.
pub fn gross_for_net<E>(
    target_net: Decimal,
    calculate: impl Fn(Decimal) -> Result<CalculationResult, E>,
) -> Result<CalculationResult, E> {
    if target_net <= Decimal::ZERO {
        return calculate(Decimal::ZERO);
    }

    let mut low = Decimal::ZERO;
    let mut high = to_cent_above(target_net * Decimal::TWO).min(SEARCH_LIMIT);
    let mut best = calculate(high)?;
    while best.net < target_net {
        if high >= SEARCH_LIMIT {
            warn!(target_net = %target_net, "target net unreachable below the search limit");
            return Ok(best);
        }
        low = high;
        high = (high * Decimal::TWO).min(SEARCH_LIMIT);
        best = calculate(high)?;
    }

    // low and high stay on whole cents; high always reaches the target.
    let cent = dec!(0.01);
    for _ in 0..MAX_ITERATIONS {
        if high - low <= cent {
            break;
        }
        let mid = ((low + high) / Decimal::TWO).round_dp_with_strategy(2, RoundingStrategy::ToZero);
        let result = calculate(mid)?;
        if result.net >= target_net {
            high = mid;
            best = result;
        } else {
            low = mid;
        }
    }

    debug!(target_net = %target_net, gross = %high, "gross found for target net");
    Ok(best)
}

fn to_cent_above(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::AwayFromZero)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::{SoleProprietorCalculator, SoleProprietorInput};
    use crate::models::{
        Breakdown, CimBreakdown, Currency, FiscalYear, Period, RateTable, RateTableError,
        ScenarioKey,
    };

    fn cim_result(
        gross: Decimal,
        net: Decimal,
    ) -> CalculationResult {
        CalculationResult {
            gross,
            net,
            total_taxes: gross - net,
            costs: Decimal::ZERO,
            currency: Currency::Ron,
            period: Period::Monthly,
            breakdown: Breakdown::Cim(CimBreakdown {
                tax_free_allowance: Decimal::ZERO,
                contribution_base: gross,
                pension: Decimal::ZERO,
                health: Decimal::ZERO,
                base_deduction: Decimal::ZERO,
                supplementary_deduction: Decimal::ZERO,
                personal_deduction: Decimal::ZERO,
                taxable_base: Decimal::ZERO,
                income_tax: Decimal::ZERO,
                income_tax_exempt: false,
                employer_contribution: Decimal::ZERO,
                complete_cost: gross,
            }),
        }
    }

    fn pfa_result(revenue: Decimal) -> CalculationResult {
        let rates = RateTable::for_year(FiscalYear::Y2025);
        SoleProprietorCalculator::new(&rates)
            .calculate(&SoleProprietorInput {
                revenue,
                minimum_wage: dec!(4050),
                ..SoleProprietorInput::default()
            })
            .unwrap()
    }

    // =========================================================================
    // rank
    // =========================================================================

    #[test]
    fn highest_net_wins() {
        let results = vec![
            cim_result(dec!(200), dec!(100)),
            pfa_result(dec!(40000)),
            cim_result(dec!(200), dec!(120)),
        ];

        let comparison = rank(results, Objective::MaximizeNet).unwrap();

        assert_eq!(comparison.optimal, ScenarioKey::Pfa);
        assert_eq!(comparison.savings, dec!(32300.00));
    }

    #[test]
    fn nets_of_100_150_120_pick_150_with_savings_50() {
        let mut middle = pfa_result(dec!(40000));
        middle.net = dec!(150);
        let results = vec![
            cim_result(dec!(200), dec!(100)),
            middle,
            cim_result(dec!(200), dec!(120)),
        ];

        let comparison = rank(results, Objective::MaximizeNet).unwrap();

        assert_eq!(comparison.optimal, ScenarioKey::Pfa);
        assert_eq!(comparison.savings, dec!(50));
        assert_eq!(comparison.optimal_result().map(|r| r.net), Some(dec!(150)));
    }

    #[test]
    fn results_keep_input_order() {
        let results = vec![cim_result(dec!(200), dec!(100)), pfa_result(dec!(40000))];

        let comparison = rank(results, Objective::MaximizeNet).unwrap();

        assert_eq!(comparison.results[0].key(), ScenarioKey::Cim);
        assert_eq!(comparison.results[1].key(), ScenarioKey::Pfa);
    }

    #[test]
    fn ties_keep_the_earlier_scenario() {
        let mut pfa = pfa_result(dec!(40000));
        pfa.net = dec!(100);
        let results = vec![cim_result(dec!(200), dec!(100)), pfa];

        let comparison = rank(results, Objective::MaximizeNet).unwrap();

        assert_eq!(comparison.optimal, ScenarioKey::Cim);
        assert_eq!(comparison.savings, Decimal::ZERO);
    }

    #[test]
    fn minimize_gross_picks_lowest_gross() {
        let mut pfa = pfa_result(dec!(40000));
        pfa.gross = dec!(150);
        let results = vec![cim_result(dec!(200), dec!(100)), pfa];

        let comparison = rank(results, Objective::MinimizeGross).unwrap();

        assert_eq!(comparison.optimal, ScenarioKey::Pfa);
        assert_eq!(comparison.savings, dec!(50));
        assert_eq!(comparison.objective, Objective::MinimizeGross);
    }

    #[test]
    fn single_result_is_optimal_with_no_savings() {
        let comparison = rank(vec![pfa_result(dec!(1000))], Objective::MaximizeNet).unwrap();

        assert_eq!(comparison.optimal, ScenarioKey::Pfa);
        assert_eq!(comparison.savings, Decimal::ZERO);
    }

    #[test]
    fn empty_list_has_no_ranking() {
        assert_eq!(rank(Vec::new(), Objective::MaximizeNet), None);
    }

    // =========================================================================
    // gross_for_net
    // =========================================================================

    fn sixty_percent(gross: Decimal) -> Result<CalculationResult, RateTableError> {
        Ok(cim_result(gross, round_half_up(gross * dec!(0.6))))
    }

    #[test]
    fn gross_for_net_inverts_monotonic_calculation() {
        let result = gross_for_net(dec!(600), sixty_percent).unwrap();

        assert!((result.gross - dec!(1000)).abs() <= dec!(0.01), "{}", result.gross);
        assert!(result.net >= dec!(600));
    }

    #[test]
    fn gross_for_net_grows_the_upper_bound() {
        // 10% net needs ten times the target, beyond the first guess.
        let result = gross_for_net(dec!(100), |gross| {
            Ok::<_, RateTableError>(cim_result(gross, round_half_up(gross * dec!(0.1))))
        })
        .unwrap();

        // 999.95 already nets 100.00 once 99.995 rounds up.
        assert_eq!(result.gross, dec!(999.95));
        assert_eq!(result.net, dec!(100.00));
    }

    #[test]
    fn gross_for_net_stops_at_search_limit() {
        let result = gross_for_net(dec!(100), |gross| {
            Ok::<_, RateTableError>(cim_result(gross, Decimal::ZERO))
        })
        .unwrap();

        assert_eq!(result.gross, SEARCH_LIMIT);
    }

    #[test]
    fn gross_for_net_of_zero_is_zero() {
        let result = gross_for_net(Decimal::ZERO, sixty_percent).unwrap();

        assert_eq!(result.gross, Decimal::ZERO);
    }

    #[test]
    fn gross_for_net_propagates_errors() {
        let err = RateTableError::EmptyCaps { name: "pfa.health_caps" };

        let result = gross_for_net(dec!(1000), |_| Err::<CalculationResult, _>(err.clone()));

        assert_eq!(result, Err(err));
    }
}
