//! Readers for the two pipeline inputs.

pub mod account_lookup;
pub mod bank_export;

pub use account_lookup::{LookupReport, load_account_lookup, parse_account_lookup_csv};
pub use bank_export::{parse_bank_export, parse_bank_export_file, parse_bank_export_with};
#[cfg(feature = "xlsx")]
pub use account_lookup::parse_account_lookup_xlsx;
