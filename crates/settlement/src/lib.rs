//! Settlement documents (export shipments, local sale orders) and their
//! lifecycle state machines.
//!
//! Deterministic domain logic only (no IO, no locking, no storage). The
//! engine pairs each accepted payment with exactly one ledger transaction.

pub mod document;
pub mod lifecycle;

pub use document::{
    CreateDocument, DocumentCommand, DocumentCreated, DocumentEvent, DocumentId, LifecycleStatusChanged,
    LineItem, PaymentRecorded, RecordPayment, SettlementDocument, StockAllocation, UpdateLifecycleStatus,
};
pub use lifecycle::{DocumentKind, ExportStatus, LifecycleStatus, PaymentStatus, SaleOrderStatus};
