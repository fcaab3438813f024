//! finboard-finance: enrichment, category rules, PnL flag, and the dashboard aggregates

pub mod cashflow;
pub mod category_rules;
pub mod enrich;
pub mod kpis;
pub mod pipeline;
pub mod pivot;
pub mod pnl_flag;
pub mod query;

pub use cashflow::{MonthlyNet, monthly_net};
pub use category_rules::{Categorized, CategoryRules, Categorizer, Rule};
pub use enrich::enrich;
pub use kpis::{AccountBalance, Kpis, compute_kpis, default_balance_accounts, ending_balance};
pub use pipeline::{Dataset, Pipeline, PipelineConfig};
pub use pivot::{AccountGroup, PivotExportRow, PivotLevel, PivotLine, PnlPivot, TypeGroup};
pub use pnl_flag::PnlRules;
pub use query::{DashboardView, query};
