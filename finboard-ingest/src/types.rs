use finboard_core::{Diagnostic, IngestAudit, RowOrigin};
use serde::{Deserialize, Serialize};

pub const COLUMN_COUNT: usize = 9;

/// The nine logical columns of a bank transaction export, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Date,
    BankRtn,
    AccountNumber,
    TransactionType,
    Description,
    Debit,
    Credit,
    CheckNumber,
    RunningBalance,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Date,
        Column::BankRtn,
        Column::AccountNumber,
        Column::TransactionType,
        Column::Description,
        Column::Debit,
        Column::Credit,
        Column::CheckNumber,
        Column::RunningBalance,
    ];

    /// Header text as it appears in the export
    pub fn header(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::BankRtn => "Bank RTN",
            Column::AccountNumber => "Account Number",
            Column::TransactionType => "Transaction Type",
            Column::Description => "Description",
            Column::Debit => "Debit",
            Column::Credit => "Credit",
            Column::CheckNumber => "Check Number",
            Column::RunningBalance => "Account Running Balance",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Untyped fields of one export row, mapped onto [`Column`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line in the source file
    pub line: u64,
    pub origin: RowOrigin,
    pub fields: [String; COLUMN_COUNT],
}

impl RawRow {
    pub fn get(&self, column: Column) -> &str {
        &self.fields[column.index()]
    }
}

/// Everything the ingestor produced from one export.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Well-formed rows in source order, then recovered rows
    pub rows: Vec<RawRow>,
    pub diagnostics: Vec<Diagnostic>,
    pub audit: IngestAudit,
}

