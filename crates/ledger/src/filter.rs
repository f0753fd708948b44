use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Transaction, TransactionKind};

/// Predicate over ledger entries used by history queries and reports.
///
/// Every unset field matches everything. `from` is inclusive, `until` is
/// exclusive; category matching ignores ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub reference: Option<String>,
}

impl HistoryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn since(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(from) = self.from {
            if tx.occurred_at() < from {
                return false;
            }
        }
        if let Some(until) = self.until {
            if tx.occurred_at() >= until {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if tx.kind() != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !tx.category().eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(reference) = &self.reference {
            if tx.reference() != Some(reference.as_str()) {
                return false;
            }
        }
        true
    }
}
