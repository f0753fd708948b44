//! Payroll domain module.
//!
//! Staff registry and payroll records. Each payment produces one record and
//! one `Payroll` expense in the ledger; the pairing is committed by the engine.

pub mod book;
pub mod record;
pub mod staff;

pub use book::PayrollBook;
pub use record::{PAYROLL_CATEGORY, PayStaff, PayrollRecord, PayrollRecordId};
pub use staff::{RegisterStaff, StaffId, StaffMember};
