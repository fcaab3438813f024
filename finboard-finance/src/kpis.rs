//! Headline figures: income, spending, net and per-account ending balances.

use chrono::NaiveDate;
use finboard_core::TransactionRecord;
use serde::Serialize;

/// Types counted as income
pub const INCOME_TYPES: [&str; 2] = ["Interest", "Income"];
/// Types counted as spending
pub const SPENDING_TYPES: [&str; 1] = ["Expense"];

pub fn is_income(record: &TransactionRecord) -> bool {
    INCOME_TYPES.iter().any(|t| record.has_type(t))
}

pub fn is_spending(record: &TransactionRecord) -> bool {
    SPENDING_TYPES.iter().any(|t| record.has_type(t))
}

pub fn default_balance_accounts() -> Vec<String> {
    ["Checking", "Savings", "CD"].map(str::to_string).to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub account: String,
    /// `None` when the account has no rows, or no balance on its last date
    pub ending_balance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub income: f64,
    /// Sum of expense amounts, so normally negative
    pub spending: f64,
    pub net: f64,
    pub balances: Vec<AccountBalance>,
    /// Sum of the ending balances, only when every one of them is known
    pub total_balance: Option<f64>,
}

pub fn compute_kpis(records: &[&TransactionRecord], balance_accounts: &[String]) -> Kpis {
    let sum_of = |pred: fn(&TransactionRecord) -> bool| -> f64 {
        records.iter().filter(|r| pred(r)).map(|r| r.amount).sum()
    };
    let income = sum_of(is_income);
    let spending = sum_of(is_spending);

    let balances: Vec<AccountBalance> = balance_accounts
        .iter()
        .map(|account| AccountBalance {
            account: account.clone(),
            ending_balance: ending_balance(records, account),
        })
        .collect();
    let total_balance = balances
        .iter()
        .map(|b| b.ending_balance)
        .sum::<Option<f64>>();

    Kpis {
        income,
        spending,
        net: income + spending,
        balances,
        total_balance,
    }
}

/// Mean running balance over the account's rows on its latest date.
///
/// Several rows can share the last date and the export gives no intraday
/// order, so they are averaged. Null balances are skipped.
pub fn ending_balance(records: &[&TransactionRecord], account: &str) -> Option<f64> {
    let last: NaiveDate = records
        .iter()
        .filter(|r| r.is_account(account))
        .filter_map(|r| r.date)
        .max()?;

    let balances: Vec<f64> = records
        .iter()
        .filter(|r| r.is_account(account) && r.date == Some(last))
        .filter_map(|r| r.running_balance)
        .collect();
    if balances.is_empty() {
        return None;
    }
    Some(balances.iter().sum::<f64>() / balances.len() as f64)
}
