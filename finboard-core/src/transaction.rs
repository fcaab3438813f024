//! Transaction record types flowing through the pipeline

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// Whether a row was read as-is or rebuilt from a shifted source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowOrigin {
    #[serde(rename = "original")]
    Original,
    #[serde(rename = "recovered")]
    Recovered,
}

/// One bank ledger entry after enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Posting date, if the source value parsed
    pub date: Option<NaiveDate>,
    /// Join key into the account lookup
    pub account_number: String,
    /// Raw bank code until categorized, then a label such as "Income"
    pub transaction_type: Option<String>,
    pub description: Option<String>,
    /// Signed amount: credit minus debit
    pub amount: f64,
    pub check_number: Option<String>,
    /// Bank-reported balance right after this transaction
    pub running_balance: Option<f64>,
    /// Resolved through the account lookup
    pub account_name: Option<String>,
    pub year: Option<i32>,
    /// Calendar month 1..=12
    pub month: Option<u32>,
    /// Counted in the PnL pivot
    pub pnl_flag: bool,
    /// 1-based line in the transaction export
    pub line: u64,
    pub origin: RowOrigin,
}

impl TransactionRecord {
    /// Full month name ("January"), the label the month filter uses
    pub fn month_name(&self) -> Option<&'static str> {
        self.month.and_then(month_name)
    }

    /// First day of the record's month, the chronological grouping key
    pub fn month_start(&self) -> Option<NaiveDate> {
        self.date.and_then(|d| d.with_day(1))
    }

    pub fn is_account(&self, name: &str) -> bool {
        self.account_name.as_deref() == Some(name)
    }

    pub fn has_type(&self, label: &str) -> bool {
        self.transaction_type.as_deref() == Some(label)
    }
}

/// Full English month name for 1..=12
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Inverse of [`month_name`], case-insensitive; also accepts 3-letter
/// abbreviations and plain numbers.
pub fn parse_month(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    s.parse::<Month>().ok().map(|m| m.number_from_month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: Option<NaiveDate>) -> TransactionRecord {
        TransactionRecord {
            date,
            account_number: "12345".to_string(),
            transaction_type: Some("Expense".to_string()),
            description: Some("Dunkin".to_string()),
            amount: -4.5,
            check_number: None,
            running_balance: Some(100.0),
            account_name: Some("Checking".to_string()),
            year: date.map(|d| d.year()),
            month: date.map(|d| d.month()),
            pnl_flag: true,
            line: 2,
            origin: RowOrigin::Original,
        }
    }

    #[test]
    fn test_month_helpers() {
        let r = record(NaiveDate::from_ymd_opt(2025, 3, 17));
        assert_eq!(r.month_name(), Some("March"));
        assert_eq!(r.month_start(), NaiveDate::from_ymd_opt(2025, 3, 1));
        assert!(r.is_account("Checking"));
        assert!(r.has_type("Expense"));
    }

    #[test]
    fn test_undated_record_has_no_month() {
        let r = record(None);
        assert_eq!(r.month_name(), None);
        assert_eq!(r.month_start(), None);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("January"), Some(1));
        assert_eq!(parse_month("dec"), Some(12));
        assert_eq!(parse_month("7"), Some(7));
        assert_eq!(parse_month("13"), None);
        assert_eq!(parse_month("Smarch"), None);
        assert_eq!(month_name(0), None);
    }
}
