mod currency;
mod fiscal_year;
mod profile;
mod rate_table;
mod request;
mod result;
mod scenario;

pub use currency::Currency;
pub use fiscal_year::{FiscalYear, Period, WagePeriod};
pub use profile::TaxpayerProfile;
pub use rate_table::{
    CompanyRates, EmploymentRates, FiscalConstants, RateTable, RateTableError,
    SoleProprietorRates,
};
pub use request::{CalculationRequest, ComparisonRequest};
pub use result::{
    Breakdown, CalculationResult, CimBreakdown, ComparisonResult, CompanyRegime, Objective,
    PfaBreakdown, SrlBreakdown,
};
pub use scenario::{Scenario, ScenarioKey};
