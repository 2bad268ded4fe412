//! Input ingestion for the `fisc` calculator: CSV batches of calculation
//! requests and the BNR daily exchange-rate feed.

pub mod bnr;
pub mod loader;

pub use bnr::{BnrFeedError, BnrRate, load_bnr_file, parse_bnr_feed, parse_bnr_rate};
pub use loader::{CsvLoadError, load_from_file, load_from_reader, load_from_str};
