//! Hierarchical PnL pivot: Account → Type → Description by month.
//!
//! Only PnL-flagged rows take part. Each line holds one cell per month
//! present (ascending) and a trailing `Total`. Cells are dense: a month with
//! no rows for a line is 0.0. Null grouping keys form their own group and
//! sort ahead of named ones. An undated row has no month column but still
//! counts toward its line's `Total`, which keeps the grand total equal to the
//! sum of every flagged amount in the selection.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use chrono::NaiveDate;
use finboard_core::{Result, TransactionRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotLine {
    pub description: Option<String>,
    pub cells: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeGroup {
    pub transaction_type: Option<String>,
    pub subtotal: Vec<f64>,
    pub lines: Vec<PivotLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountGroup {
    pub account_name: Option<String>,
    pub subtotal: Vec<f64>,
    pub types: Vec<TypeGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlPivot {
    /// First day of each month column
    pub months: Vec<NaiveDate>,
    pub accounts: Vec<AccountGroup>,
    pub grand_total: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotLevel {
    Detail,
    TypeSubtotal,
    AccountSubtotal,
    GrandTotal,
}

impl PivotLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PivotLevel::Detail => "detail",
            PivotLevel::TypeSubtotal => "type_subtotal",
            PivotLevel::AccountSubtotal => "account_subtotal",
            PivotLevel::GrandTotal => "grand_total",
        }
    }
}

/// One flattened pivot row for bulk export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotExportRow {
    pub level: PivotLevel,
    pub account_name: Option<String>,
    pub transaction_type: Option<String>,
    pub description: Option<String>,
    pub cells: Vec<f64>,
}

type Lines = BTreeMap<Option<String>, Vec<f64>>;
type Types = BTreeMap<Option<String>, Lines>;

fn add_into(acc: &mut [f64], cells: &[f64]) {
    for (a, c) in acc.iter_mut().zip(cells) {
        *a += c;
    }
}

impl PnlPivot {
    pub fn build(records: &[&TransactionRecord]) -> Self {
        let flagged: Vec<&TransactionRecord> = records.iter().copied().filter(|r| r.pnl_flag).collect();

        let months: Vec<NaiveDate> = flagged
            .iter()
            .filter_map(|r| r.month_start())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let width = months.len() + 1;

        let mut tree: BTreeMap<Option<String>, Types> = BTreeMap::new();
        for record in &flagged {
            let cells = tree
                .entry(record.account_name.clone())
                .or_default()
                .entry(record.transaction_type.clone())
                .or_default()
                .entry(record.description.clone())
                .or_insert_with(|| vec![0.0; width]);
            if let Some(col) = record
                .month_start()
                .and_then(|m| months.binary_search(&m).ok())
            {
                cells[col] += record.amount;
            }
            cells[width - 1] += record.amount;
        }

        let mut grand_total = vec![0.0; width];
        let accounts = tree
            .into_iter()
            .map(|(account_name, types)| {
                let mut account_subtotal = vec![0.0; width];
                let types = types
                    .into_iter()
                    .map(|(transaction_type, lines)| {
                        let mut subtotal = vec![0.0; width];
                        let lines = lines
                            .into_iter()
                            .map(|(description, cells)| {
                                add_into(&mut subtotal, &cells);
                                PivotLine { description, cells }
                            })
                            .collect();
                        add_into(&mut account_subtotal, &subtotal);
                        TypeGroup {
                            transaction_type,
                            subtotal,
                            lines,
                        }
                    })
                    .collect();
                add_into(&mut grand_total, &account_subtotal);
                AccountGroup {
                    account_name,
                    subtotal: account_subtotal,
                    types,
                }
            })
            .collect();

        Self {
            months,
            accounts,
            grand_total,
        }
    }

    /// Month columns as "Jan-2025", then "Total"
    pub fn column_labels(&self) -> Vec<String> {
        self.months
            .iter()
            .map(|m| m.format("%b-%Y").to_string())
            .chain(std::iter::once("Total".to_string()))
            .collect()
    }

    pub fn grand_total_value(&self) -> f64 {
        self.grand_total.last().copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Detail lines followed by their subtotals, grand total last.
    pub fn export_rows(&self) -> Vec<PivotExportRow> {
        let mut rows = Vec::new();
        for account in &self.accounts {
            for ty in &account.types {
                for line in &ty.lines {
                    rows.push(PivotExportRow {
                        level: PivotLevel::Detail,
                        account_name: account.account_name.clone(),
                        transaction_type: ty.transaction_type.clone(),
                        description: line.description.clone(),
                        cells: line.cells.clone(),
                    });
                }
                rows.push(PivotExportRow {
                    level: PivotLevel::TypeSubtotal,
                    account_name: account.account_name.clone(),
                    transaction_type: ty.transaction_type.clone(),
                    description: None,
                    cells: ty.subtotal.clone(),
                });
            }
            rows.push(PivotExportRow {
                level: PivotLevel::AccountSubtotal,
                account_name: account.account_name.clone(),
                transaction_type: None,
                description: None,
                cells: account.subtotal.clone(),
            });
        }
        rows.push(PivotExportRow {
            level: PivotLevel::GrandTotal,
            account_name: None,
            transaction_type: None,
            description: None,
            cells: self.grand_total.clone(),
        });
        rows
    }

    /// Write the flattened pivot as CSV with a `Level` column up front.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec![
            "Level".to_string(),
            "Account Name".to_string(),
            "Transaction Type".to_string(),
            "Description".to_string(),
        ];
        header.extend(self.column_labels());
        wtr.write_record(&header).map_err(std::io::Error::from)?;

        for row in self.export_rows() {
            let mut record = vec![
                row.level.as_str().to_string(),
                row.account_name.unwrap_or_default(),
                row.transaction_type.unwrap_or_default(),
                row.description.unwrap_or_default(),
            ];
            record.extend(row.cells.iter().map(|c| format!("{c:.2}")));
            wtr.write_record(&record).map_err(std::io::Error::from)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use finboard_core::RowOrigin;

    fn rec(
        account: Option<&str>,
        ty: Option<&str>,
        desc: Option<&str>,
        date: Option<(i32, u32, u32)>,
        amount: f64,
        pnl_flag: bool,
    ) -> TransactionRecord {
        let date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        TransactionRecord {
            date,
            account_number: "1".to_string(),
            transaction_type: ty.map(str::to_string),
            description: desc.map(str::to_string),
            amount,
            check_number: None,
            running_balance: None,
            account_name: account.map(str::to_string),
            year: date.map(|d| d.year()),
            month: date.map(|d| d.month()),
            pnl_flag,
            line: 2,
            origin: RowOrigin::Original,
        }
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            rec(Some("Checking"), Some("Income"), Some("SJU Payroll"), Some((2025, 1, 15)), 2000.0, true),
            rec(Some("Checking"), Some("Income"), Some("SJU Payroll"), Some((2025, 2, 15)), 2000.0, true),
            rec(Some("Checking"), Some("Expense"), Some("Dunkin"), Some((2025, 1, 3)), -4.5, true),
            rec(Some("Checking"), Some("Expense"), Some("Dunkin"), Some((2025, 1, 9)), -5.5, true),
            rec(Some("Credit Card"), Some("Expense"), Some("Amazon"), Some((2025, 2, 2)), -60.0, true),
            rec(Some("Credit Card"), Some("CC Payment"), Some("PAYMENT"), Some((2025, 2, 20)), 60.0, false),
            rec(None, None, Some("MYSTERY"), Some((2025, 2, 1)), -1.0, true),
        ]
    }

    #[test]
    fn test_columns_and_groups() {
        let records = sample();
        let refs: Vec<&TransactionRecord> = records.iter().collect();
        let pivot = PnlPivot::build(&refs);

        assert_eq!(pivot.column_labels(), vec!["Jan-2025", "Feb-2025", "Total"]);
        let names: Vec<Option<&str>> = pivot.accounts.iter().map(|a| a.account_name.as_deref()).collect();
        assert_eq!(names, vec![None, Some("Checking"), Some("Credit Card")]);

        let checking = &pivot.accounts[1];
        assert_eq!(checking.subtotal, vec![1990.0, 2000.0, 3990.0]);
        let expense = &checking.types[0];
        assert_eq!(expense.transaction_type.as_deref(), Some("Expense"));
        assert_eq!(expense.lines[0].cells, vec![-10.0, 0.0, -10.0]);

        // CC payment is not flagged, so only the Amazon expense remains
        let card = &pivot.accounts[2];
        assert_eq!(card.types.len(), 1);
        assert_eq!(card.subtotal, vec![0.0, -60.0, -60.0]);
    }

    #[test]
    fn test_grand_total_matches_flagged_sum() {
        let records = sample();
        let refs: Vec<&TransactionRecord> = records.iter().collect();
        let pivot = PnlPivot::build(&refs);
        let expected: f64 = records.iter().filter(|r| r.pnl_flag).map(|r| r.amount).sum();
        assert!((pivot.grand_total_value() - expected).abs() < 1e-9);
        assert_eq!(pivot.grand_total, vec![1990.0, 1939.0, 3929.0]);
    }

    #[test]
    fn test_undated_rows_count_in_total_only() {
        let records = vec![
            rec(Some("Checking"), Some("Expense"), Some("CASH"), None, -20.0, true),
            rec(Some("Checking"), Some("Expense"), Some("CASH"), Some((2025, 3, 1)), -5.0, true),
        ];
        let refs: Vec<&TransactionRecord> = records.iter().collect();
        let pivot = PnlPivot::build(&refs);
        assert_eq!(pivot.months.len(), 1);
        assert_eq!(pivot.grand_total, vec![-5.0, -25.0]);
    }

    #[test]
    fn test_export_rows_levels() {
        let records = sample();
        let refs: Vec<&TransactionRecord> = records.iter().collect();
        let rows = PnlPivot::build(&refs).export_rows();

        let last = rows.last().unwrap();
        assert_eq!(last.level, PivotLevel::GrandTotal);
        let count = |level| rows.iter().filter(|r| r.level == level).count();
        assert_eq!(count(PivotLevel::AccountSubtotal), 3);
        assert_eq!(count(PivotLevel::TypeSubtotal), 4);
        assert_eq!(count(PivotLevel::Detail), 4);
    }

    #[test]
    fn test_empty_pivot() {
        let pivot = PnlPivot::build(&[]);
        assert!(pivot.is_empty());
        assert_eq!(pivot.column_labels(), vec!["Total"]);
        assert_eq!(pivot.grand_total_value(), 0.0);
    }

    #[test]
    fn test_write_csv() {
        let records = sample();
        let refs: Vec<&TransactionRecord> = records.iter().collect();
        let mut buf = Vec::new();
        PnlPivot::build(&refs).write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Level,Account Name,Transaction Type,Description,Jan-2025,Feb-2025,Total")
        );
        assert!(text.contains("detail,Checking,Income,SJU Payroll,2000.00,2000.00,4000.00"));
        assert_eq!(text.lines().last(), Some("grand_total,,,,1990.00,1939.00,3929.00"));
    }
}
