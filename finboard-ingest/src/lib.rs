//! finboard-ingest: bank export ingestion, malformed-row recovery, and schema normalization.

pub mod normalize;
pub mod parsers;
pub mod types;

pub use normalize::{Cell, FieldKind, NormalizedRow, SCHEMA, normalize_row, normalize_rows};
pub use parsers::{LookupReport, load_account_lookup, parse_bank_export, parse_bank_export_file};
pub use types::{COLUMN_COUNT, Column, IngestReport, RawRow};
