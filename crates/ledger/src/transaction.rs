use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_core::{DomainError, DomainResult, Entity, TransactionId};

/// Direction of a ledger entry (determines its sign in the balance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
    InitialCapital,
}

impl TransactionKind {
    /// Income and initial capital add to the balance; expenses subtract.
    pub fn is_inflow(self) -> bool {
        matches!(self, TransactionKind::Income | TransactionKind::InitialCapital)
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
            TransactionKind::InitialCapital => "INITIAL_CAPITAL",
        })
    }
}

/// How money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    MobileMoney,
    Cheque,
    Card,
}

/// A transaction before the log assigns it an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub category: String,
    /// Positive amount in smallest currency unit.
    pub amount: i64,
    pub description: String,
    pub method: PaymentMethod,
    /// External reference (document id, record id, cheque number, ...).
    pub reference: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        category: impl Into<String>,
        amount: i64,
        method: PaymentMethod,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            amount,
            description: String::new(),
            method,
            reference: None,
            occurred_at,
        }
    }

    pub fn income(
        category: impl Into<String>,
        amount: i64,
        method: PaymentMethod,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(TransactionKind::Income, category, amount, method, occurred_at)
    }

    pub fn expense(
        category: impl Into<String>,
        amount: i64,
        method: PaymentMethod,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(TransactionKind::Expense, category, amount, method, occurred_at)
    }

    pub fn initial_capital(amount: i64, method: PaymentMethod, occurred_at: DateTime<Utc>) -> Self {
        Self::new(
            TransactionKind::InitialCapital,
            "Initial Capital",
            amount,
            method,
            occurred_at,
        )
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Checks everything `TransactionLog::append` checks, without a log.
    pub fn validate(&self) -> DomainResult<()> {
        if self.amount <= 0 {
            return Err(DomainError::validation("transaction amount must be positive"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("transaction category cannot be empty"));
        }
        Ok(())
    }
}

/// An appended, immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    kind: TransactionKind,
    category: String,
    amount: i64,
    description: String,
    method: PaymentMethod,
    reference: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn from_draft(id: TransactionId, draft: TransactionDraft) -> Self {
        Self {
            id,
            kind: draft.kind,
            category: draft.category,
            amount: draft.amount,
            description: draft.description,
            method: draft.method,
            reference: draft.reference,
            occurred_at: draft.occurred_at,
        }
    }

    pub fn id_typed(&self) -> TransactionId {
        self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Contribution of this entry to the aggregate balance.
    pub fn signed_amount(&self) -> i128 {
        if self.kind.is_inflow() {
            self.amount as i128
        } else {
            -(self.amount as i128)
        }
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
