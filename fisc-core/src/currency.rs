//! RON/EUR conversion and the shared exchange rate.
//!
//! The rate is a single EUR→RON multiplier. It starts at the fallback
//! constant from the rate table and is overwritten whenever a fresher rate is
//! known. Non-positive updates are ignored so that a failed fetch can never
//! replace a good rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisc_core::{Currency, ExchangeRate, convert};
//!
//! let rate = ExchangeRate::new(dec!(5.0));
//! rate.update(dec!(-5));
//! assert_eq!(rate.get(), dec!(5.0));
//!
//! assert_eq!(convert(dec!(100), Currency::Eur, Currency::Ron, rate.get()), dec!(500.00));
//! ```

use std::sync::{PoisonError, RwLock};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::models::Currency;

/// Converts `amount` between currencies using an EUR→RON `rate`.
///
/// Returns `amount` unchanged when the currencies match. The result is
/// rounded to two decimal places. A non-positive `rate` cannot be used for
/// division, so the amount is returned unconverted and a warning is logged.
pub fn convert(
    amount: Decimal,
    from: Currency,
    to: Currency,
    rate: Decimal,
) -> Decimal {
    if from == to {
        return amount;
    }
    if rate <= Decimal::ZERO {
        warn!(%rate, %amount, "non-positive exchange rate; amount left unconverted");
        return amount;
    }
    match (from, to) {
        (Currency::Eur, Currency::Ron) => round_half_up(amount * rate),
        (Currency::Ron, Currency::Eur) => round_half_up(amount / rate),
        _ => amount,
    }
}

/// Latest known EUR→RON rate, shared by every calculation in the process.
#[derive(Debug)]
pub struct ExchangeRate {
    value: RwLock<Decimal>,
}

impl ExchangeRate {
    /// Creates a rate holder. A non-positive `initial` value is kept as is;
    /// callers seed it from [`crate::FiscalConstants::eur_ron_rate`].
    pub fn new(initial: Decimal) -> Self {
        Self {
            value: RwLock::new(initial),
        }
    }

    pub fn get(&self) -> Decimal {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the rate when `rate` is positive.
    ///
    /// Returns `true` if the rate was applied. Non-positive values are
    /// silently dropped and leave the previous rate in place.
    pub fn update(
        &self,
        rate: Decimal,
    ) -> bool {
        if rate <= Decimal::ZERO {
            debug!(%rate, "ignoring non-positive exchange rate update");
            return false;
        }
        let mut value = self.value.write().unwrap_or_else(PoisonError::into_inner);
        let previous = *value;
        debug!(%previous, %rate, "exchange rate updated");
        *value = rate;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // convert
    // =========================================================================

    #[test]
    fn convert_is_identity_for_same_currency() {
        assert_eq!(
            convert(dec!(123.456), Currency::Ron, Currency::Ron, dec!(5)),
            dec!(123.456)
        );
    }

    #[test]
    fn convert_multiplies_eur_to_ron() {
        assert_eq!(
            convert(dec!(1000), Currency::Eur, Currency::Ron, dec!(4.9765)),
            dec!(4976.50)
        );
    }

    #[test]
    fn convert_divides_ron_to_eur_and_rounds() {
        // 1000 / 4.9765 = 200.944438...
        assert_eq!(
            convert(dec!(1000), Currency::Ron, Currency::Eur, dec!(4.9765)),
            dec!(200.94)
        );
    }

    #[test]
    fn convert_leaves_amount_unchanged_for_zero_rate() {
        assert_eq!(
            convert(dec!(1000), Currency::Ron, Currency::Eur, Decimal::ZERO),
            dec!(1000)
        );
    }

    // =========================================================================
    // ExchangeRate
    // =========================================================================

    #[test]
    fn update_accepts_positive_rate() {
        let rate = ExchangeRate::new(dec!(5.0));

        assert!(rate.update(dec!(4.9765)));
        assert_eq!(rate.get(), dec!(4.9765));
    }

    #[test]
    fn update_ignores_negative_rate() {
        let rate = ExchangeRate::new(dec!(5.0));

        assert!(!rate.update(dec!(-5)));
        assert_eq!(rate.get(), dec!(5.0));
    }

    #[test]
    fn update_ignores_zero_rate() {
        let rate = ExchangeRate::new(dec!(4.97));

        assert!(!rate.update(Decimal::ZERO));
        assert_eq!(rate.get(), dec!(4.97));
    }

    #[test]
    fn updates_are_visible_across_threads() {
        let rate = Arc::new(ExchangeRate::new(dec!(5.0)));

        let writer = Arc::clone(&rate);
        thread::spawn(move || writer.update(dec!(5.1)))
            .join()
            .unwrap();

        assert_eq!(rate.get(), dec!(5.1));
    }
}
