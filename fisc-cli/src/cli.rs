use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fisc_core::validation::parse_optional_amount;
use fisc_core::{FiscError, TaxpayerProfile};
use rust_decimal::Decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Romanian income tax calculator.
///
/// Computes net income for an employment contract (CIM), a sole
/// proprietorship (PFA) and a limited-liability company (SRL), and compares
/// them for the same gross income.
#[derive(Debug, Parser)]
#[command(name = "fisc", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted before or after any subcommand. Unset values fall back to
/// the config file, then to built-in defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Fiscal year (2025 or 2026; `calendar` accepts 1900 to 2099).
    #[arg(long, global = true)]
    pub year: Option<i32>,

    /// Currency of the amounts given and shown: RON or EUR.
    #[arg(long, global = true)]
    pub currency: Option<String>,

    /// Period the amounts cover: annual or monthly.
    #[arg(long, global = true)]
    pub period: Option<String>,

    /// Use the minimum wage in force in the second half of the year.
    #[arg(long, global = true)]
    pub second_half: bool,

    /// EUR→RON exchange rate. Wins over `--bnr-feed`.
    #[arg(long, global = true)]
    pub rate: Option<Decimal>,

    /// Saved BNR `nbrfxrates.xml` document to read the EUR rate from.
    #[arg(long, global = true)]
    pub bnr_feed: Option<PathBuf>,

    /// TOML config file. Defaults to `fisc.toml` in the working directory
    /// when that file exists.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Append log records to this file as well as stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Employment contract: salary to take-home pay.
    Cim(AmountArgs),
    /// Sole proprietorship on the real-income system.
    Pfa(AmountArgs),
    /// Limited-liability company, micro or profit regime.
    Srl(AmountArgs),
    /// CIM vs PFA vs SRL for the same income.
    Compare(AmountArgs),
    /// PFA vs SRL micro vs SRL profit for the same revenue.
    Freelance(AmountArgs),
    /// Calculate every request in a CSV file.
    Batch {
        /// CSV file with one calculation request per row.
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Public holidays and working days.
    Calendar {
        /// Only this month (1 to 12).
        #[arg(long)]
        month: Option<u32>,
    },
    /// Rate table of the fiscal year and the exchange rate in use.
    Rates,
}

#[derive(Debug, Clone, Args)]
pub struct AmountArgs {
    /// Gross income, or the net to reach with `--target-net`. Commas are
    /// read as thousands separators.
    #[arg(allow_negative_numbers = true)]
    pub amount: String,

    /// Treat AMOUNT as the desired net and search for the gross.
    #[arg(long)]
    pub target_net: bool,

    #[command(flatten)]
    pub profile: ProfileArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProfileArgs {
    /// Dependents for the CIM personal deduction (0 to 4).
    #[arg(long, default_value_t = 0)]
    pub dependents: u8,

    #[arg(long)]
    pub under_26: bool,

    /// Children enrolled in school.
    #[arg(long, default_value_t = 0)]
    pub children: u32,

    /// Exempt from the PFA pension contribution.
    #[arg(long)]
    pub pensioner: bool,

    /// Exempt from income tax on salary and PFA income.
    #[arg(long)]
    pub handicapped: bool,

    /// SRL without an employee, taxed under the profit regime.
    #[arg(long)]
    pub no_employee: bool,

    /// Deductible expenses.
    #[arg(long)]
    pub expenses: Option<String>,

    /// Profit kept in the company.
    #[arg(long)]
    pub reinvested: Option<String>,
}

impl ProfileArgs {
    /// # Errors
    ///
    /// Returns [`FiscError::Validation`] for unparseable or negative amounts.
    pub fn to_profile(&self) -> Result<TaxpayerProfile, FiscError> {
        Ok(TaxpayerProfile {
            dependents: self.dependents,
            under_26: self.under_26,
            children_in_school: self.children,
            pensioner: self.pensioner,
            handicapped: self.handicapped,
            has_employee: !self.no_employee,
            expenses: parse_optional_amount("expenses", self.expenses.as_deref().unwrap_or(""))?,
            reinvested_profit: parse_optional_amount(
                "reinvested_profit",
                self.reinvested.as_deref().unwrap_or(""),
            )?,
        })
    }
}
