use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_core::{AggregateId, DomainError, DomainResult, Entity, TransactionId};
use tradeledger_ledger::{PaymentMethod, TransactionDraft};

use crate::cost::CostInfo;
use crate::lot::LotId;

/// Identifier of an acquisition or production record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub AggregateId);

impl RecordId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Where a stock lot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    /// Stock bought in from a supplier.
    Acquisition,
    /// Harvest / processing output with its production cost.
    Production,
}

impl RecordKind {
    /// Ledger category for the expense booked against a record of this kind.
    pub fn expense_category(self) -> &'static str {
        match self {
            RecordKind::Acquisition => "Inventory Purchase",
            RecordKind::Production => "Production Cost",
        }
    }
}

/// Input for recording an acquisition or production run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCostRecord {
    pub kind: RecordKind,
    pub product: String,
    pub unit: String,
    pub quantity: i64,
    #[serde(default)]
    pub cost: CostInfo,
    /// Supplier for acquisitions, farm/plot for production.
    #[serde(default)]
    pub counterparty: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// A committed acquisition or production record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRecord {
    id: RecordId,
    kind: RecordKind,
    product: String,
    unit: String,
    quantity: i64,
    cost: CostInfo,
    resolved_cost: Option<i64>,
    counterparty: Option<String>,
    lot_id: LotId,
    transaction_id: Option<TransactionId>,
    recorded_at: DateTime<Utc>,
}

impl CostRecord {
    /// Validate `input` and build the record that will be committed.
    ///
    /// A transaction id is reserved only when there is a positive cost to book.
    pub fn prepare(id: RecordId, lot_id: LotId, input: NewCostRecord) -> DomainResult<Self> {
        if input.product.trim().is_empty() {
            return Err(DomainError::validation("product cannot be empty"));
        }
        if input.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }
        if input.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let resolved_cost = input.cost.resolve(input.quantity)?;

        Ok(Self {
            id,
            kind: input.kind,
            product: input.product.trim().to_string(),
            unit: input.unit.trim().to_string(),
            quantity: input.quantity,
            cost: input.cost,
            resolved_cost,
            counterparty: input.counterparty,
            lot_id,
            transaction_id: resolved_cost.map(|_| TransactionId::new()),
            recorded_at: input.occurred_at,
        })
    }

    /// The expense to append alongside this record, if it carries a cost.
    pub fn expense_draft(&self, method: PaymentMethod) -> Option<(TransactionId, TransactionDraft)> {
        let amount = self.resolved_cost?;
        let id = self.transaction_id?;
        let draft = TransactionDraft::expense(
            self.kind.expense_category(),
            amount,
            method,
            self.recorded_at,
        )
        .with_description(format!("{} {} {}", self.quantity, self.unit, self.product))
        .with_reference(self.id.to_string());
        Some((id, draft))
    }

    pub fn id_typed(&self) -> RecordId {
        self.id
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn cost(&self) -> CostInfo {
        self.cost
    }

    pub fn resolved_cost(&self) -> Option<i64> {
        self.resolved_cost
    }

    pub fn counterparty(&self) -> Option<&str> {
        self.counterparty.as_deref()
    }

    pub fn lot_id(&self) -> LotId {
        self.lot_id
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

impl Entity for CostRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tradeledger_ledger::TransactionKind;

    fn input(kind: RecordKind, cost: CostInfo) -> NewCostRecord {
        NewCostRecord {
            kind,
            product: "Cherry coffee".to_string(),
            unit: "kg".to_string(),
            quantity: 500,
            cost,
            counterparty: Some("Nyeri cooperative".to_string()),
            occurred_at: Utc.with_ymd_and_hms(2024, 2, 2, 9, 0, 0).unwrap(),
        }
    }

    fn ids() -> (RecordId, LotId) {
        (RecordId::new(AggregateId::new()), LotId::new(AggregateId::new()))
    }

    #[test]
    fn costed_acquisition_yields_one_expense() {
        let (id, lot) = ids();
        let record = CostRecord::prepare(id, lot, input(RecordKind::Acquisition, CostInfo::unit(2))).unwrap();

        let (tx_id, draft) = record.expense_draft(PaymentMethod::Cash).unwrap();
        assert_eq!(Some(tx_id), record.transaction_id());
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.amount, 1_000);
        assert_eq!(draft.category, "Inventory Purchase");
        assert_eq!(draft.reference.as_deref(), Some(id.to_string().as_str()));
    }

    #[test]
    fn production_uses_production_category() {
        let (id, lot) = ids();
        let record = CostRecord::prepare(id, lot, input(RecordKind::Production, CostInfo::total(4_200))).unwrap();
        let (_, draft) = record.expense_draft(PaymentMethod::MobileMoney).unwrap();
        assert_eq!(draft.category, "Production Cost");
        assert_eq!(draft.amount, 4_200);
    }

    #[test]
    fn record_without_cost_has_no_transaction() {
        let (id, lot) = ids();
        let record = CostRecord::prepare(id, lot, input(RecordKind::Production, CostInfo::none())).unwrap();
        assert_eq!(record.transaction_id(), None);
        assert!(record.expense_draft(PaymentMethod::Cash).is_none());
    }

    #[test]
    fn invalid_input_is_rejected() {
        let (id, lot) = ids();

        let mut bad = input(RecordKind::Acquisition, CostInfo::none());
        bad.quantity = 0;
        assert!(matches!(CostRecord::prepare(id, lot, bad), Err(DomainError::Validation(_))));

        let mut bad = input(RecordKind::Acquisition, CostInfo::none());
        bad.unit = " ".to_string();
        assert!(matches!(CostRecord::prepare(id, lot, bad), Err(DomainError::Validation(_))));

        let bad = input(RecordKind::Acquisition, CostInfo::unit(-3));
        assert!(matches!(CostRecord::prepare(id, lot, bad), Err(DomainError::Validation(_))));
    }
}
