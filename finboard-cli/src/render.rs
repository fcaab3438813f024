//! Plain-text and JSON rendering of dashboard views.

use anyhow::{Context, Result};
use finboard_core::{Diagnostic, IngestAudit, TransactionRecord};
use finboard_finance::{DashboardView, PnlPivot};
use serde::Serialize;

/// Dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    // -0.004 rounds to 0.00, which should not print as negative
    let sign = if val < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{dec_part}")
}

/// Missing balances render as "n/a"
pub fn money_opt(val: Option<f64>) -> String {
    val.map(money).unwrap_or_else(|| "n/a".to_string())
}

fn or_dash(val: Option<&str>) -> &str {
    val.unwrap_or("-")
}

#[derive(Serialize)]
struct ReportJson<'a> {
    audit: &'a IngestAudit,
    diagnostics: &'a [Diagnostic],
    #[serde(flatten)]
    view: &'a DashboardView,
}

pub fn report_json(audit: &IngestAudit, diagnostics: &[Diagnostic], view: &DashboardView) -> Result<String> {
    serde_json::to_string_pretty(&ReportJson {
        audit,
        diagnostics,
        view,
    })
    .context("serialize report")
}

pub fn transactions_json(view: &DashboardView) -> Result<String> {
    serde_json::to_string_pretty(&view.transactions).context("serialize transactions")
}

pub fn report_text(audit: &IngestAudit, diagnostics: &[Diagnostic], view: &DashboardView) -> String {
    let mut out = String::new();
    let k = &view.kpis;

    out.push_str(&format!(
        "Rows: {} ({} original, {} recovered, {} unrecoverable)\n",
        audit.emitted(),
        audit.original,
        audit.recovered,
        audit.unrecoverable
    ));
    if !diagnostics.is_empty() {
        out.push_str("\nDiagnostics:\n");
        for d in diagnostics {
            out.push_str(&format!("  {d}\n"));
        }
    }

    out.push_str(&format!("\n## KPIs ({} transactions selected)\n\n", view.transactions.len()));
    let kpi = |label: &str, value: String| format!("  {label:<16} {value:>14}\n");
    out.push_str(&kpi("Income", money(k.income)));
    out.push_str(&kpi("Spending", money(k.spending)));
    out.push_str(&kpi("Net", money(k.net)));
    for b in &k.balances {
        out.push_str(&kpi(&b.account, money_opt(b.ending_balance)));
    }
    out.push_str(&kpi("Total balance", money_opt(k.total_balance)));

    out.push_str("\n## Monthly net cash flow\n\n");
    if view.monthly.is_empty() {
        out.push_str("  (no dated transactions)\n");
    }
    for m in &view.monthly {
        out.push_str(&format!("  {:<10} {:>14}\n", m.label(), money(m.net)));
    }

    out.push_str("\n## PnL\n\n");
    out.push_str(&pivot_text(&view.pivot));
    out
}

pub fn pivot_text(pivot: &PnlPivot) -> String {
    if pivot.is_empty() {
        return "  (no PnL transactions)\n".to_string();
    }

    let row = |label: &str, cells: Vec<String>| {
        let mut line = format!("  {label:<40}");
        for c in cells {
            line.push_str(&format!(" {c:>13}"));
        }
        line.push('\n');
        line
    };
    let amounts = |cells: &[f64]| cells.iter().copied().map(money).collect::<Vec<_>>();

    let mut out = row("", pivot.column_labels());
    for account in &pivot.accounts {
        let account_name = or_dash(account.account_name.as_deref());
        for ty in &account.types {
            let type_name = or_dash(ty.transaction_type.as_deref());
            for line in &ty.lines {
                let label = format!("{account_name} / {type_name} / {}", or_dash(line.description.as_deref()));
                out.push_str(&row(&label, amounts(&line.cells)));
            }
            out.push_str(&row(&format!("{account_name} / {type_name} subtotal"), amounts(&ty.subtotal)));
        }
        out.push_str(&row(&format!("{account_name} subtotal"), amounts(&account.subtotal)));
    }
    out.push_str(&row("Grand total", amounts(&pivot.grand_total)));
    out
}

pub fn transactions_text(records: &[TransactionRecord]) -> String {
    let mut out = format!(
        "{:<10}  {:<12}  {:<12}  {:<36}  {:>12}  {:>12}\n",
        "Date", "Account", "Type", "Description", "Amount", "Balance"
    );
    for r in records {
        let date = r
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<10}  {:<12}  {:<12}  {:<36}  {:>12}  {:>12}\n",
            date,
            or_dash(r.account_name.as_deref()),
            or_dash(r.transaction_type.as_deref()),
            or_dash(r.description.as_deref()),
            money(r.amount),
            money_opt(r.running_balance)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use finboard_core::{FilterSelection, RowOrigin};
    use finboard_finance::{default_balance_accounts, query};

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(42.10), "$42.10");
        assert_eq!(money(-0.001), "$0.00");
        assert_eq!(money(999.999), "$1,000.00");
    }

    #[test]
    fn test_money_opt() {
        assert_eq!(money_opt(None), "n/a");
        assert_eq!(money_opt(Some(12.0)), "$12.00");
    }

    fn records() -> Vec<TransactionRecord> {
        let rec = |line: u64, date: Option<NaiveDate>, ty: &str, desc: &str, amount: f64| TransactionRecord {
            date,
            account_number: "111".to_string(),
            transaction_type: Some(ty.to_string()),
            description: Some(desc.to_string()),
            amount,
            check_number: None,
            running_balance: Some(1000.0),
            account_name: Some("Checking".to_string()),
            year: date.map(|d| d.year()),
            month: date.map(|d| d.month()),
            pnl_flag: true,
            line,
            origin: RowOrigin::Original,
        };
        vec![
            rec(2, NaiveDate::from_ymd_opt(2025, 1, 2), "Income", "SJU Payroll", 2000.0),
            rec(3, NaiveDate::from_ymd_opt(2025, 1, 3), "Expense", "Dunkin", -4.5),
            rec(4, None, "Expense", "MISC", -1.0),
        ]
    }

    #[test]
    fn test_report_text_sections() {
        let records = records();
        let view = query(&records, &FilterSelection::defaults(&records), &default_balance_accounts());
        let audit = IngestAudit {
            original: 3,
            recovered: 0,
            unrecoverable: 1,
        };
        let diagnostics = vec![Diagnostic::malformed_row(9, 11, 9, "a,b")];
        let text = report_text(&audit, &diagnostics, &view);

        assert!(text.contains("Rows: 3 (3 original, 0 recovered, 1 unrecoverable)"));
        assert!(text.contains("[MalformedRow] line 9"));
        assert!(text.contains("$2,000.00"));
        assert!(text.contains("Jan 2025"));
        assert!(text.contains("Jan-2025"));
        assert!(text.contains("Checking / Expense / Dunkin"));
        assert!(text.contains("Grand total"));
        // Savings and CD have no rows
        assert!(text.contains("n/a"));
    }

    #[test]
    fn test_report_json_has_audit_and_view() {
        let records = records();
        let view = query(&records, &FilterSelection::defaults(&records), &default_balance_accounts());
        let json = report_json(&IngestAudit::default(), &[], &view).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["audit"]["original"], 0);
        assert_eq!(value["kpis"]["income"], 2000.0);
        assert!(value["pivot"]["months"].is_array());
        assert!(value["kpis"]["total_balance"].is_null());
    }

    #[test]
    fn test_pivot_text_layout() {
        let records = records();
        let view = query(&records, &FilterSelection::defaults(&records), &default_balance_accounts());
        let text = pivot_text(&view.pivot);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], format!("  {:<40} {:>13} {:>13}", "", "Jan-2025", "Total"));
        // the undated MISC row only reaches the Total column
        assert_eq!(
            *lines.last().unwrap(),
            format!("  {:<40} {:>13} {:>13}", "Grand total", "$1,995.50", "$1,994.50")
        );
        assert!(text.ends_with('\n'));

        let none: Vec<TransactionRecord> = Vec::new();
        let empty = query(&none, &FilterSelection::defaults(&none), &default_balance_accounts());
        assert_eq!(pivot_text(&empty.pivot), "  (no PnL transactions)\n");
    }

    #[test]
    fn test_transactions_text_marks_missing_values() {
        let records = records();
        let text = transactions_text(&records);
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().last().unwrap().starts_with("-  "));
    }
}
