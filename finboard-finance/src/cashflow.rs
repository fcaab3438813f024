//! Monthly net cash flow.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use finboard_core::TransactionRecord;
use serde::Serialize;

use crate::kpis::{is_income, is_spending};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyNet {
    /// First day of the month
    pub month: NaiveDate,
    pub net: f64,
}

impl MonthlyNet {
    /// "Jan 2025"
    pub fn label(&self) -> String {
        self.month.format("%b %Y").to_string()
    }
}

/// Income plus expense amounts per calendar month, oldest first.
///
/// Every month with at least one dated row is present, even when none of its
/// rows are income or expense (net 0.0). Months with no rows are absent.
pub fn monthly_net(records: &[&TransactionRecord]) -> Vec<MonthlyNet> {
    let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        let Some(month) = record.month_start() else {
            continue;
        };
        let net = by_month.entry(month).or_insert(0.0);
        if is_income(record) || is_spending(record) {
            *net += record.amount;
        }
    }
    by_month
        .into_iter()
        .map(|(month, net)| MonthlyNet { month, net })
        .collect()
}
