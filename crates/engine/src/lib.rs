//! Ledger & settlement engine.
//!
//! Owns the transaction log and every settlement document, stock lot, payroll
//! record and requisition behind a single lock, and exposes only command
//! methods and read-only snapshots. Each successful command is announced on
//! an [`EventBus`](tradeledger_events::EventBus) as a [`CommitEnvelope`].

mod commit;
pub mod config;
mod engine;
pub mod error;
pub mod script;
pub mod snapshot;
mod state;

pub use commit::{CommitEnvelope, CommitPayload, RecordedEvent};
pub use config::EngineConfig;
pub use engine::{NewDocument, NewRequisition, RequisitionDecision, SettlementEngine};
pub use error::{EngineError, EngineResult};
pub use script::{ScriptActor, ScriptEntry, ScriptRunner, ScriptStep};
pub use snapshot::{
    CostReceipt, DecisionReceipt, DocumentSnapshot, LedgerSnapshot, LotSnapshot, PaymentReceipt,
    PayrollReceipt, RequisitionSnapshot,
};
