//! Stage wiring: export + lookup in, categorized and flagged dataset out.

use std::io::Read;
use std::path::Path;

use finboard_core::{AccountLookup, Diagnostic, IngestAudit, Result, TransactionRecord};
use finboard_ingest::{IngestReport, load_account_lookup, normalize_rows, parse_bank_export, parse_bank_export_file};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::category_rules::{CategoryRules, Categorizer};
use crate::enrich::enrich;
use crate::kpis::default_balance_accounts;
use crate::pnl_flag::PnlRules;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub categorize: CategoryRules,
    #[serde(default)]
    pub pnl: PnlRules,
    /// Accounts whose ending balance is reported
    #[serde(default = "default_balance_accounts")]
    pub balance_accounts: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            categorize: CategoryRules::default(),
            pnl: PnlRules::default(),
            balance_accounts: default_balance_accounts(),
        }
    }
}

/// Output of one full run, before any filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub records: Vec<TransactionRecord>,
    pub audit: IngestAudit,
    /// Lookup findings first, then export findings
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    categorizer: Categorizer,
    pnl: PnlRules,
    balance_accounts: Vec<String>,
}

impl Pipeline {
    /// Fails only if a rule pattern does not compile.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            categorizer: Categorizer::new(&config.categorize)?,
            pnl: config.pnl.clone(),
            balance_accounts: config.balance_accounts.clone(),
        })
    }

    pub fn balance_accounts(&self) -> &[String] {
        &self.balance_accounts
    }

    pub fn run<R: Read>(&self, export: R, lookup: &AccountLookup) -> Result<Dataset> {
        Ok(self.process(parse_bank_export(export)?, lookup))
    }

    /// Read both inputs from disk. Either read failing aborts the run.
    pub fn run_files(&self, export_path: &Path, lookup_path: &Path) -> Result<Dataset> {
        let lookup = load_account_lookup(lookup_path)?;
        let report = parse_bank_export_file(export_path)?;

        let mut dataset = self.process(report, &lookup.lookup);
        let mut diagnostics = lookup.diagnostics;
        diagnostics.append(&mut dataset.diagnostics);
        dataset.diagnostics = diagnostics;
        Ok(dataset)
    }

    fn process(&self, report: IngestReport, lookup: &AccountLookup) -> Dataset {
        if lookup.is_empty() {
            warn!("account lookup is empty, every row will be unmatched");
        }
        let normalized = normalize_rows(&report.rows);
        let records = enrich(&normalized, lookup);
        let records = self.categorizer.apply(records);
        let records = self.pnl.apply(records);

        info!(
            rows = records.len(),
            original = report.audit.original,
            recovered = report.audit.recovered,
            unrecoverable = report.audit.unrecoverable,
            accounts = lookup.len(),
            "pipeline complete"
        );

        Dataset {
            records,
            audit: report.audit,
            diagnostics: report.diagnostics,
        }
    }
}
