//! Non-fatal findings collected while a pipeline run proceeds.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A data row whose width cannot be mapped back onto the schema.
    MalformedRow,
    /// The account lookup lists one account number under two names.
    DuplicateAccount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based line (or sheet row) in the source the finding refers to
    pub line: u64,
    pub message: String,
}

impl Diagnostic {
    pub fn malformed_row(line: u64, field_count: usize, expected: usize, raw: &str) -> Self {
        Self {
            kind: DiagnosticKind::MalformedRow,
            line,
            message: format!(
                "expected {expected} fields, found {field_count}; row left out: {raw}"
            ),
        }
    }

    pub fn duplicate_account(line: u64, account_number: &str, kept: &str, ignored: &str) -> Self {
        Self {
            kind: DiagnosticKind::DuplicateAccount,
            line,
            message: format!(
                "account {account_number} already maps to '{kept}'; ignoring '{ignored}'"
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::MalformedRow => "MalformedRow",
            DiagnosticKind::DuplicateAccount => "DuplicateAccount",
        };
        write!(f, "[{kind}] line {}: {}", self.line, self.message)
    }
}

/// How the ingested rows came to be, for auditing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestAudit {
    pub original: usize,
    pub recovered: usize,
    pub unrecoverable: usize,
}

impl IngestAudit {
    /// Rows that made it into the dataset
    pub fn emitted(&self) -> usize {
        self.original + self.recovered
    }
}
