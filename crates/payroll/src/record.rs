use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_core::{AggregateId, DomainError, DomainResult, Entity, TransactionId};
use tradeledger_ledger::{PaymentMethod, TransactionDraft};

use crate::staff::{StaffId, StaffMember};

/// Ledger category for salary payments.
pub const PAYROLL_CATEGORY: &str = "Payroll";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayrollRecordId(pub AggregateId);

impl PayrollRecordId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PayrollRecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Input for a salary payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayStaff {
    pub staff_id: StaffId,
    /// Amount in smallest currency unit.
    pub amount: i64,
    /// Pay period label, e.g. `2024-05`.
    pub period: String,
    pub method: PaymentMethod,
    pub occurred_at: DateTime<Utc>,
}

/// One salary payment, linked to its ledger expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    id: PayrollRecordId,
    staff_id: StaffId,
    amount: i64,
    period: String,
    method: PaymentMethod,
    transaction_id: TransactionId,
    paid_at: DateTime<Utc>,
}

impl PayrollRecord {
    /// Validate a payment to `staff` and build the record plus its expense draft.
    pub fn prepare(
        id: PayrollRecordId,
        staff: &StaffMember,
        input: PayStaff,
    ) -> DomainResult<(Self, TransactionDraft)> {
        if input.amount <= 0 {
            return Err(DomainError::validation("payroll amount must be positive"));
        }
        if input.period.trim().is_empty() {
            return Err(DomainError::validation("pay period cannot be empty"));
        }
        if staff.id_typed() != input.staff_id {
            return Err(DomainError::invariant("staff_id mismatch"));
        }
        if !staff.is_active() {
            return Err(DomainError::invariant(format!(
                "staff member {} is inactive",
                staff.id_typed()
            )));
        }

        let period = input.period.trim().to_string();
        let draft = TransactionDraft::expense(
            PAYROLL_CATEGORY,
            input.amount,
            input.method,
            input.occurred_at,
        )
        .with_description(format!("{} salary {period}", staff.name()))
        .with_reference(id.to_string());

        let record = Self {
            id,
            staff_id: input.staff_id,
            amount: input.amount,
            period,
            method: input.method,
            transaction_id: TransactionId::new(),
            paid_at: input.occurred_at,
        };
        Ok((record, draft))
    }

    pub fn id_typed(&self) -> PayrollRecordId {
        self.id
    }

    pub fn staff_id(&self) -> StaffId {
        self.staff_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn paid_at(&self) -> DateTime<Utc> {
        self.paid_at
    }
}

impl Entity for PayrollRecord {
    type Id = PayrollRecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
