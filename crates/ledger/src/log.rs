use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use tradeledger_core::{DomainError, DomainResult, TransactionId};

use crate::{HistoryFilter, Transaction, TransactionDraft, TransactionKind};

/// Sums over a (filtered) slice of the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub income: i128,
    pub expense: i128,
    pub initial_capital: i128,
    pub count: usize,
}

impl LedgerTotals {
    /// `income + initial_capital - expense`.
    pub fn net(&self) -> i128 {
        self.income + self.initial_capital - self.expense
    }

    fn add(&mut self, tx: &Transaction) {
        let amount = tx.amount() as i128;
        match tx.kind() {
            TransactionKind::Income => self.income += amount,
            TransactionKind::Expense => self.expense += amount,
            TransactionKind::InitialCapital => self.initial_capital += amount,
        }
        self.count += 1;
    }
}

/// Per-category total for one transaction kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub kind: TransactionKind,
    pub category: String,
    pub total: i128,
    pub count: usize,
}

/// Append-only store of ledger transactions.
///
/// The balance is kept incrementally (O(1) reads) and is always equal to the
/// full fold computed by [`TransactionLog::recompute_balance`].
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
    index: HashMap<TransactionId, usize>,
    balance: i128,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a draft under a fresh id. Returns the stored entry and the new balance.
    pub fn append(&mut self, draft: TransactionDraft) -> DomainResult<(Transaction, i128)> {
        self.append_as(TransactionId::new(), draft)
    }

    /// Append a draft under an id chosen by the caller (the engine reserves
    /// ids while deciding so linked records can reference them).
    pub fn append_as(
        &mut self,
        id: TransactionId,
        draft: TransactionDraft,
    ) -> DomainResult<(Transaction, i128)> {
        self.check_append(id, &draft)?;

        let tx = Transaction::from_draft(id, draft);
        self.balance += tx.signed_amount();
        self.index.insert(id, self.entries.len());
        self.entries.push(tx.clone());

        Ok((tx, self.balance))
    }

    /// Everything `append_as` checks, without mutating.
    pub fn check_append(&self, id: TransactionId, draft: &TransactionDraft) -> DomainResult<()> {
        draft.validate()?;
        if self.index.contains_key(&id) {
            return Err(DomainError::invariant(format!(
                "transaction {id} already exists"
            )));
        }
        Ok(())
    }

    /// Current aggregate balance: inflows minus expenses.
    pub fn balance(&self) -> i128 {
        self.balance
    }

    /// Balance recomputed by folding over every entry.
    pub fn recompute_balance(&self) -> i128 {
        self.entries.iter().map(Transaction::signed_amount).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.index.get(&id).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    /// Lazily yields the entries matching `filter`, oldest first.
    ///
    /// The iterator is `Clone`, so a consumer can restart it from the top.
    pub fn history(&self, filter: HistoryFilter) -> impl Iterator<Item = &Transaction> + Clone + '_ {
        self.entries.iter().filter(move |tx| filter.matches(tx))
    }

    pub fn totals(&self, filter: &HistoryFilter) -> LedgerTotals {
        let mut totals = LedgerTotals::default();
        for tx in self.entries.iter().filter(|tx| filter.matches(tx)) {
            totals.add(tx);
        }
        totals
    }

    /// Totals grouped by (kind, category), ordered by kind then category.
    pub fn by_category(&self, filter: &HistoryFilter) -> Vec<CategoryTotal> {
        let mut grouped: BTreeMap<(TransactionKind, String), (i128, usize)> = BTreeMap::new();
        for tx in self.entries.iter().filter(|tx| filter.matches(tx)) {
            let slot = grouped
                .entry((tx.kind(), tx.category().to_string()))
                .or_insert((0, 0));
            slot.0 += tx.amount() as i128;
            slot.1 += 1;
        }
        grouped
            .into_iter()
            .map(|((kind, category), (total, count))| CategoryTotal {
                kind,
                category,
                total,
                count,
            })
            .collect()
    }
}
