//! Tax engines, one per legal structure, plus the scenario optimizer.
//!
//! Engines work in RON on pre-validated input. CIM works on monthly amounts,
//! PFA and SRL on annual amounts; [`crate::FiscalService`] converts periods
//! and currencies around them.

pub mod cim;
pub mod common;
pub mod optimizer;
pub mod pfa;
pub mod srl;

pub use cim::{EmploymentCalculator, EmploymentInput};
pub use optimizer::rank;
pub use pfa::{SoleProprietorCalculator, SoleProprietorInput};
pub use srl::{CompanyCalculator, CompanyInput};
