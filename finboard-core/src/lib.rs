//! finboard-core: shared types for the transaction pipeline

pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod transaction;

pub use diagnostics::{Diagnostic, DiagnosticKind, IngestAudit};
pub use error::{FinboardError, Result};
pub use filter::FilterSelection;
pub use lookup::{AccountLookup, Insert};
pub use transaction::{RowOrigin, TransactionRecord, month_name, parse_month};
