//! Ledger module: the append-only transaction log and its derived balance.
//!
//! Pure domain logic only: no IO, no locking, no persistence concerns.

pub mod filter;
pub mod log;
pub mod transaction;

pub use filter::HistoryFilter;
pub use log::{CategoryTotal, LedgerTotals, TransactionLog};
pub use transaction::{PaymentMethod, Transaction, TransactionDraft, TransactionKind};
