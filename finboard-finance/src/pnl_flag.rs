//! Profit-and-loss inclusion flag.
//!
//! Everything counts toward PnL except credit card paydowns and transfers
//! between the user's own accounts. The flag only gates the PnL pivot.

use finboard_core::TransactionRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category_rules::default_credit_card_account;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlRules {
    #[serde(default = "default_credit_card_account")]
    pub credit_card_account: String,
    /// Descriptions (compared case-insensitively) of known self-transfers
    #[serde(default = "default_internal_transfers")]
    pub internal_transfer_descriptions: Vec<String>,
}

fn default_internal_transfers() -> Vec<String> {
    vec!["ONLINE XFER TRANSFER TO CC X2491".to_string()]
}

impl Default for PnlRules {
    fn default() -> Self {
        Self {
            credit_card_account: default_credit_card_account(),
            internal_transfer_descriptions: default_internal_transfers(),
        }
    }
}

impl PnlRules {
    /// Positive amount on the credit card account: a bill payment
    pub fn is_liability_paydown(&self, record: &TransactionRecord) -> bool {
        record.is_account(&self.credit_card_account) && record.amount > 0.0
    }

    pub fn is_internal_transfer(&self, record: &TransactionRecord) -> bool {
        let is_transfer = record
            .transaction_type
            .as_deref()
            .is_some_and(|t| t.to_uppercase() == "TRANSFER");
        is_transfer
            && record.description.as_deref().is_some_and(|d| {
                let d = d.to_uppercase();
                self.internal_transfer_descriptions
                    .iter()
                    .any(|known| known.to_uppercase() == d)
            })
    }

    pub fn include_in_pnl(&self, record: &TransactionRecord) -> bool {
        !(self.is_liability_paydown(record) || self.is_internal_transfer(record))
    }

    pub fn apply(&self, records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        let out: Vec<TransactionRecord> = records
            .into_iter()
            .map(|record| TransactionRecord {
                pnl_flag: self.include_in_pnl(&record),
                ..record
            })
            .collect();

        let excluded = out.iter().filter(|r| !r.pnl_flag).count();
        debug!(rows = out.len(), excluded, "flagged rows for PnL");
        out
    }
}
