//! Fund requisitions (approval workflow).
//!
//! A requisition is submitted as PENDING and decided exactly once. Approval
//! is what turns it into a ledger expense; the engine commits the two together.

pub mod requisition;

pub use requisition::{
    Decide, Decision, Requisition, RequisitionCommand, RequisitionDecided, RequisitionEvent,
    RequisitionId, RequisitionStatus, RequisitionSubmitted, Submit,
};
