//! Filter selection supplied by the presentation layer.
//!
//! A selection is a plain value: every recomputation receives one, and
//! "reset" means building [`FilterSelection::defaults`] again. `None` members
//! select records whose field is null (e.g. an unparsable date has no year).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::transaction::TransactionRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub years: BTreeSet<Option<i32>>,
    pub months: BTreeSet<Option<u32>>,
    pub types: BTreeSet<Option<String>>,
}

impl FilterSelection {
    /// Every distinct year, month and transaction type present in `records`.
    pub fn defaults(records: &[TransactionRecord]) -> Self {
        Self {
            years: records.iter().map(|r| r.year).collect(),
            months: records.iter().map(|r| r.month).collect(),
            types: records.iter().map(|r| r.transaction_type.clone()).collect(),
        }
    }

    pub fn with_years(self, years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            years: years.into_iter().map(Some).collect(),
            ..self
        }
    }

    pub fn with_months(self, months: impl IntoIterator<Item = u32>) -> Self {
        Self {
            months: months.into_iter().map(Some).collect(),
            ..self
        }
    }

    pub fn with_types<S: Into<String>>(self, types: impl IntoIterator<Item = S>) -> Self {
        Self {
            types: types.into_iter().map(|t| Some(t.into())).collect(),
            ..self
        }
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.years.contains(&record.year)
            && self.months.contains(&record.month)
            && self.types.contains(&record.transaction_type)
    }

    pub fn apply<'a>(&self, records: &'a [TransactionRecord]) -> Vec<&'a TransactionRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::RowOrigin;
    use chrono::{Datelike, NaiveDate};

    fn rec(date: Option<(i32, u32, u32)>, ty: Option<&str>) -> TransactionRecord {
        let date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        TransactionRecord {
            date,
            account_number: "1".to_string(),
            transaction_type: ty.map(str::to_string),
            description: None,
            amount: 1.0,
            check_number: None,
            running_balance: None,
            account_name: None,
            year: date.map(|d| d.year()),
            month: date.map(|d| d.month()),
            pnl_flag: true,
            line: 2,
            origin: RowOrigin::Original,
        }
    }

    #[test]
    fn test_defaults_select_everything() {
        let records = vec![
            rec(Some((2024, 12, 3)), Some("Income")),
            rec(Some((2025, 1, 9)), Some("Expense")),
            rec(None, None),
        ];
        let filter = FilterSelection::defaults(&records);
        assert_eq!(filter.apply(&records).len(), 3);
        assert!(filter.years.contains(&None));
        assert!(filter.types.contains(&None));
    }

    #[test]
    fn test_narrowing_is_a_new_value() {
        let records = vec![
            rec(Some((2024, 12, 3)), Some("Income")),
            rec(Some((2025, 1, 9)), Some("Expense")),
            rec(Some((2025, 2, 9)), Some("Income")),
        ];
        let defaults = FilterSelection::defaults(&records);
        let narrowed = defaults.clone().with_years([2025]).with_types(["Income"]);
        let hits = narrowed.apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].month, Some(2));

        // reset is just the defaults again
        assert_eq!(FilterSelection::defaults(&records), defaults);
    }

    #[test]
    fn test_month_filter() {
        let records = vec![
            rec(Some((2025, 1, 9)), Some("Expense")),
            rec(Some((2025, 2, 9)), Some("Expense")),
        ];
        let filter = FilterSelection::defaults(&records).with_months([2]);
        assert_eq!(filter.apply(&records).len(), 1);
    }
}
