//! Deterministic category rules for descriptions and transaction types.
//!
//! Each table is an ordered list scanned top to bottom; the first pattern
//! that matches replaces the whole field with its label. Patterns are
//! case-sensitive regexes, so a plain word means "contains this word".
//! Every default label either matches no pattern or maps back to itself,
//! so categorizing twice gives the same result as categorizing once.

use finboard_core::{FinboardError, Result, TransactionRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One (pattern, label) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub pattern: String,
    pub label: String,
}

impl Rule {
    pub fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
        }
    }
}

/// Rule tables as they appear in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    /// Account whose uncategorized rows are split into Expense / CC Payment
    pub credit_card_account: String,
    pub description_rules: Vec<Rule>,
    pub type_rules: Vec<Rule>,
}

pub(crate) fn default_credit_card_account() -> String {
    "Credit Card".to_string()
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            credit_card_account: default_credit_card_account(),
            description_rules: vec![
                Rule::new("AMAZON", "Amazon"),
                Rule::new("SJU", "SJU Payroll"),
                Rule::new("LEVELUP", "LevelUP Payroll"),
                Rule::new("DUNKIN", "Dunkin"),
                Rule::new("PLANET FITNESS", "Planet Fitness"),
            ],
            // CREDIT must stay ahead of anything else it could collide with
            type_rules: vec![
                Rule::new("CREDIT", "Income"),
                Rule::new("DEBIT", "Expense"),
                Rule::new("DEP", "Deposit"),
                Rule::new("DIRECTDEBIT", "Expense"),
                Rule::new("INT", "Interest"),
                Rule::new("XFER", "Transfer"),
            ],
        }
    }
}

/// Categorized values for one record
#[derive(Debug, Clone, PartialEq)]
pub struct Categorized {
    pub description: Option<String>,
    pub transaction_type: Option<String>,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Regex,
    label: String,
}

fn compile(rules: &[Rule]) -> Result<Vec<CompiledRule>> {
    rules
        .iter()
        .map(|rule| {
            let pattern = Regex::new(&rule.pattern).map_err(|e| {
                FinboardError::invalid_input(format!("invalid rule pattern '{}': {e}", rule.pattern))
            })?;
            Ok(CompiledRule {
                pattern,
                label: rule.label.clone(),
            })
        })
        .collect()
}

fn first_match<'a>(rules: &'a [CompiledRule], value: &str) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.pattern.is_match(value))
        .map(|rule| rule.label.as_str())
}

/// Compiled form of [`CategoryRules`].
#[derive(Debug, Clone)]
pub struct Categorizer {
    description_rules: Vec<CompiledRule>,
    type_rules: Vec<CompiledRule>,
    credit_card_account: String,
}

impl Categorizer {
    pub fn new(rules: &CategoryRules) -> Result<Self> {
        Ok(Self {
            description_rules: compile(&rules.description_rules)?,
            type_rules: compile(&rules.type_rules)?,
            credit_card_account: rules.credit_card_account.clone(),
        })
    }

    /// Categorize one set of field values.
    ///
    /// Priority: rule tables, then the WITHDRAWAL override, then the credit
    /// card fallbacks for rows that still have no type.
    pub fn categorize(
        &self,
        description: Option<&str>,
        transaction_type: Option<&str>,
        account_name: Option<&str>,
        amount: f64,
    ) -> Categorized {
        let description = description.map(|d| {
            first_match(&self.description_rules, d)
                .unwrap_or(d)
                .to_string()
        });
        let mut transaction_type = transaction_type.map(|t| {
            first_match(&self.type_rules, t)
                .unwrap_or(t)
                .to_string()
        });

        if description
            .as_deref()
            .is_some_and(|d| d.to_uppercase().contains("WITHDRAWAL"))
        {
            transaction_type = Some("Withdrawal".to_string());
        }

        let is_credit_card = account_name == Some(self.credit_card_account.as_str());
        if transaction_type.is_none() && is_credit_card && amount < 0.0 {
            transaction_type = Some("Expense".to_string());
        }
        if transaction_type.is_none() && is_credit_card && amount > 0.0 {
            transaction_type = Some("CC Payment".to_string());
        }

        Categorized {
            description,
            transaction_type,
        }
    }

    pub fn categorize_record(&self, record: &TransactionRecord) -> Categorized {
        self.categorize(
            record.description.as_deref(),
            record.transaction_type.as_deref(),
            record.account_name.as_deref(),
            record.amount,
        )
    }

    /// Apply categorization to every record, producing the next stage's input.
    pub fn apply(&self, records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        let out: Vec<TransactionRecord> = records
            .into_iter()
            .map(|record| {
                let categorized = self.categorize_record(&record);
                TransactionRecord {
                    description: categorized.description,
                    transaction_type: categorized.transaction_type,
                    ..record
                }
            })
            .collect();

        let untyped = out.iter().filter(|r| r.transaction_type.is_none()).count();
        debug!(rows = out.len(), untyped, "categorized rows");
        out
    }
}
