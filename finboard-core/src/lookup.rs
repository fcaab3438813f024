//! Account number → account name mapping used by the enricher.

use serde::Serialize;
use std::collections::BTreeMap;

/// Result of adding one lookup row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert {
    Added,
    /// Same number, same name: nothing changes
    Repeated,
    /// Same number, different name: the first name is kept
    Conflict { kept: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountLookup {
    names: BTreeMap<String, String>,
}

impl AccountLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical form of an account number on either side of the join.
    ///
    /// Spreadsheet exports store account numbers as floats, so a trailing
    /// `.0` is dropped along with surrounding whitespace.
    pub fn normalize_key(raw: &str) -> String {
        let s = raw.trim();
        match s.strip_suffix(".0") {
            Some(int) if !int.is_empty() && int.chars().all(|c| c.is_ascii_digit()) => {
                int.to_string()
            }
            _ => s.to_string(),
        }
    }

    /// First name wins for a given account number.
    pub fn insert(&mut self, account_number: &str, account_name: &str) -> Insert {
        let key = Self::normalize_key(account_number);
        let name = account_name.trim();
        match self.names.get(&key) {
            Some(existing) if existing == name => Insert::Repeated,
            Some(existing) => Insert::Conflict {
                kept: existing.clone(),
            },
            None => {
                self.names.insert(key, name.to_string());
                Insert::Added
            }
        }
    }

    pub fn get(&self, account_number: &str) -> Option<&str> {
        self.names
            .get(&Self::normalize_key(account_number))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for AccountLookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut lookup = AccountLookup::new();
        for (number, name) in iter {
            lookup.insert(number.as_ref(), name.as_ref());
        }
        lookup
    }
}
