//! Schema-driven coercion of raw export fields.
//!
//! [`SCHEMA`] is the single declaration of every column's type. It is applied
//! once, right after ingestion, so nothing downstream parses strings again.
//! Coercion never fails: blanks and unparsable values become null.

use chrono::{NaiveDate, NaiveDateTime};
use finboard_core::RowOrigin;
use tracing::debug;

use crate::types::{COLUMN_COUNT, Column, RawRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Text,
    Float,
}

pub const SCHEMA: [(Column, FieldKind); COLUMN_COUNT] = [
    (Column::Date, FieldKind::Date),
    (Column::BankRtn, FieldKind::Text),
    (Column::AccountNumber, FieldKind::Text),
    (Column::TransactionType, FieldKind::Text),
    (Column::Description, FieldKind::Text),
    (Column::Debit, FieldKind::Float),
    (Column::Credit, FieldKind::Float),
    (Column::CheckNumber, FieldKind::Text),
    (Column::RunningBalance, FieldKind::Float),
];

/// Date layouts tried in order
const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];

/// A typed, possibly-null field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Date(NaiveDate),
    Text(String),
    Float(f64),
}

/// One export row after every field conforms to [`SCHEMA`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub line: u64,
    pub origin: RowOrigin,
    cells: [Cell; COLUMN_COUNT],
}

impl NormalizedRow {
    pub fn cell(&self, column: Column) -> &Cell {
        &self.cells[column.index()]
    }

    pub fn date(&self, column: Column) -> Option<NaiveDate> {
        match self.cell(column) {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn text(&self, column: Column) -> Option<&str> {
        match self.cell(column) {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn float(&self, column: Column) -> Option<f64> {
        match self.cell(column) {
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Coerce one raw row according to [`SCHEMA`].
pub fn normalize_row(raw: &RawRow) -> NormalizedRow {
    let cells = SCHEMA.map(|(column, kind)| coerce(raw.get(column), kind));
    NormalizedRow {
        line: raw.line,
        origin: raw.origin,
        cells,
    }
}

pub fn normalize_rows(rows: &[RawRow]) -> Vec<NormalizedRow> {
    let out: Vec<NormalizedRow> = rows.iter().map(normalize_row).collect();
    debug!(rows = out.len(), "normalized rows");
    out
}

fn coerce(raw: &str, kind: FieldKind) -> Cell {
    let value = raw.trim();
    if value.is_empty() {
        return Cell::Null;
    }
    let cell = match kind {
        FieldKind::Text => Some(Cell::Text(value.to_string())),
        FieldKind::Float => parse_amount(value).map(Cell::Float),
        FieldKind::Date => parse_date(value).map(Cell::Date),
    };
    cell.unwrap_or(Cell::Null)
}

/// Parse a money value such as `$1,234.56` or `-$12.00`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ','))
        .collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}
