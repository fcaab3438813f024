//! Filtered views over a [`Dataset`](crate::pipeline::Dataset).
//!
//! Every call recomputes from the full record set; nothing is cached between
//! filter selections.

use finboard_core::{FilterSelection, TransactionRecord};
use serde::Serialize;

use crate::cashflow::{MonthlyNet, monthly_net};
use crate::kpis::{Kpis, compute_kpis};
use crate::pivot::PnlPivot;

/// Everything the presentation layer shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filter: FilterSelection,
    /// Newest first; undated rows last
    pub transactions: Vec<TransactionRecord>,
    pub kpis: Kpis,
    pub monthly: Vec<MonthlyNet>,
    pub pivot: PnlPivot,
}

pub fn query(records: &[TransactionRecord], filter: &FilterSelection, balance_accounts: &[String]) -> DashboardView {
    let selected = filter.apply(records);

    let mut transactions: Vec<TransactionRecord> = selected.iter().map(|r| (*r).clone()).collect();
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(a.line.cmp(&b.line)));

    DashboardView {
        filter: filter.clone(),
        transactions,
        kpis: compute_kpis(&selected, balance_accounts),
        monthly: monthly_net(&selected),
        pivot: PnlPivot::build(&selected),
    }
}
