//! Romanian income tax engine.
//!
//! Computes net take-home pay for an employment contract (CIM), a sole
//! proprietorship (PFA) and a limited-liability company (SRL, micro or
//! profit regime), and ranks the scenarios against each other.
//!
//! Most callers only need [`FiscalService`], which validates input, converts
//! currencies and dispatches to the engines in [`calculations`].

pub mod calculations;
pub mod calendar;
pub mod currency;
pub mod error;
pub mod format;
pub mod models;
pub mod service;
pub mod validation;

pub use currency::{ExchangeRate, convert};
pub use error::FiscError;
pub use models::*;
pub use service::FiscalService;
