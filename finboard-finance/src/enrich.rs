//! Join normalized rows to the account lookup and collapse debit/credit.

use chrono::Datelike;
use finboard_core::{AccountLookup, TransactionRecord};
use finboard_ingest::{Column, NormalizedRow};
use tracing::debug;

/// Left outer join on account number. Every row comes out, matched or not.
///
/// The bank routing number and the raw debit/credit columns stop here; only
/// `amount = credit - debit` (nulls counted as zero) travels further.
pub fn enrich(rows: &[NormalizedRow], lookup: &AccountLookup) -> Vec<TransactionRecord> {
    let records: Vec<TransactionRecord> = rows.iter().map(|row| enrich_row(row, lookup)).collect();

    let unmatched = records.iter().filter(|r| r.account_name.is_none()).count();
    debug!(rows = records.len(), unmatched, "enriched rows");
    records
}

fn enrich_row(row: &NormalizedRow, lookup: &AccountLookup) -> TransactionRecord {
    let account_number = row
        .text(Column::AccountNumber)
        .map(AccountLookup::normalize_key)
        .unwrap_or_default();
    let account_name = lookup.get(&account_number).map(str::to_string);

    let debit = row.float(Column::Debit).unwrap_or(0.0);
    let credit = row.float(Column::Credit).unwrap_or(0.0);

    let date = row.date(Column::Date);

    TransactionRecord {
        date,
        account_number,
        transaction_type: row.text(Column::TransactionType).map(str::to_string),
        description: row.text(Column::Description).map(str::to_string),
        amount: credit - debit,
        check_number: row.text(Column::CheckNumber).map(str::to_string),
        running_balance: row.float(Column::RunningBalance),
        account_name,
        year: date.map(|d| d.year()),
        month: date.map(|d| d.month()),
        pnl_flag: true,
        line: row.line,
        origin: row.origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finboard_core::RowOrigin;
    use finboard_ingest::{RawRow, normalize_row};

    fn row(account: &str, debit: &str, credit: &str) -> NormalizedRow {
        normalize_row(&RawRow {
            line: 2,
            origin: RowOrigin::Original,
            fields: [
                "03/14/2025", "021000021", account, "DEBIT", "SHOP", debit, credit, "", "$900.00",
            ]
            .map(str::to_string),
        })
    }

    fn lookup() -> AccountLookup {
        [("111", "Checking"), ("555", "Credit Card")].into_iter().collect()
    }

    #[test]
    fn test_amount_is_credit_minus_debit() {
        let records = enrich(
            &[row("111", "12.50", ""), row("111", "", "100"), row("111", "", ""), row("111", "5", "7")],
            &lookup(),
        );
        let amounts: Vec<f64> = records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![-12.5, 100.0, 0.0, 2.0]);
    }

    #[test]
    fn test_unmatched_account_is_kept_with_null_name() {
        let records = enrich(&[row("111", "1", ""), row("999", "1", "")], &lookup());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].account_name.as_deref(), Some("Checking"));
        assert_eq!(records[1].account_name, None);
        assert_eq!(records[1].account_number, "999");
    }

    #[test]
    fn test_account_number_normalized_before_join() {
        let records = enrich(&[row("111.0", "1", "")], &lookup());
        assert_eq!(records[0].account_name.as_deref(), Some("Checking"));
    }

    #[test]
    fn test_derived_fields() {
        let records = enrich(&[row("555", "20", "")], &lookup());
        let r = &records[0];
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(r.year, Some(2025));
        assert_eq!(r.month, Some(3));
        assert_eq!(r.running_balance, Some(900.0));
        assert!(r.pnl_flag);
    }

    #[test]
    fn test_total_amount_is_preserved() {
        let rows = vec![row("111", "$1,000.00", ""), row("555", "", "250.25"), row("999", "0.75", "")];
        let expected: f64 = rows
            .iter()
            .map(|r| r.float(Column::Credit).unwrap_or(0.0) - r.float(Column::Debit).unwrap_or(0.0))
            .sum();
        let total: f64 = enrich(&rows, &lookup()).iter().map(|r| r.amount).sum();
        assert!((total - expected).abs() < 1e-9);
    }
}
