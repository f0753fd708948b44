//! Read-only views handed to report exporters and UI hosts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_auth::ActorId;
use tradeledger_core::{AggregateRoot, CurrencyCode, format_amount};
use tradeledger_inventory::{CostRecord, LotId, RecordId, StockLot};
use tradeledger_ledger::{CategoryTotal, LedgerTotals, Transaction};
use tradeledger_payroll::PayrollRecord;
use tradeledger_requisitions::{Requisition, RequisitionId, RequisitionStatus};
use tradeledger_settlement::{
    DocumentId, DocumentKind, LifecycleStatus, LineItem, PaymentStatus, SettlementDocument,
    StockAllocation,
};

/// Format a balance, which may exceed the `i64` range the formatter takes.
pub(crate) fn format_balance(balance: i128, currency: &CurrencyCode) -> String {
    match i64::try_from(balance) {
        Ok(amount) => format_amount(amount, currency),
        Err(_) => format!("{} {balance}", currency.as_str()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub counterparty: String,
    pub destination: Option<String>,
    pub shipping_reference: Option<String>,
    pub lines: Vec<LineItem>,
    pub allocation: Option<StockAllocation>,
    pub total_value: i64,
    pub amount_paid: i64,
    pub outstanding: i64,
    pub payment_status: PaymentStatus,
    pub lifecycle: LifecycleStatus,
    pub formatted_total: String,
    pub formatted_outstanding: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: u64,
}

impl DocumentSnapshot {
    pub(crate) fn capture(doc: &SettlementDocument, currency: &CurrencyCode) -> Self {
        Self {
            id: doc.id_typed(),
            kind: doc.kind(),
            counterparty: doc.counterparty().to_string(),
            destination: doc.destination().map(str::to_string),
            shipping_reference: doc.shipping_reference().map(str::to_string),
            lines: doc.lines().to_vec(),
            allocation: doc.allocation(),
            total_value: doc.total_value(),
            amount_paid: doc.amount_paid(),
            outstanding: doc.outstanding(),
            payment_status: doc.payment_status(),
            lifecycle: doc.lifecycle(),
            formatted_total: format_amount(doc.total_value(), currency),
            formatted_outstanding: format_amount(doc.outstanding(), currency),
            created_at: doc.created_at(),
            updated_at: doc.updated_at(),
            version: doc.version(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSnapshot {
    pub id: LotId,
    pub product: String,
    pub unit: String,
    pub initial_quantity: i64,
    pub available: i64,
    pub source: Option<RecordId>,
}

impl LotSnapshot {
    pub(crate) fn capture(lot: &StockLot) -> Self {
        Self {
            id: lot.id_typed(),
            product: lot.product().to_string(),
            unit: lot.unit().to_string(),
            initial_quantity: lot.initial_quantity(),
            available: lot.available(),
            source: lot.source(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionSnapshot {
    pub id: RequisitionId,
    pub amount: i64,
    pub reason: String,
    pub category: String,
    pub status: RequisitionStatus,
    pub requested_by: Option<ActorId>,
    pub decided_by: Option<ActorId>,
    pub decision_note: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl RequisitionSnapshot {
    pub(crate) fn capture(req: &Requisition) -> Self {
        Self {
            id: req.id_typed(),
            amount: req.amount(),
            reason: req.reason().to_string(),
            category: req.category().to_string(),
            status: req.status(),
            requested_by: req.requested_by(),
            decided_by: req.decided_by(),
            decision_note: req.decision_note().map(str::to_string),
            submitted_at: req.submitted_at(),
            decided_at: req.decided_at(),
        }
    }
}

/// Account-level view: balance, totals and per-category breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub account_name: String,
    pub currency: CurrencyCode,
    pub balance: i128,
    pub formatted_balance: String,
    pub totals: LedgerTotals,
    pub by_category: Vec<CategoryTotal>,
    pub transaction_count: usize,
    pub commit_sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub document: DocumentSnapshot,
    pub transaction: Transaction,
    pub balance: i128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostReceipt {
    pub record: CostRecord,
    pub lot: LotSnapshot,
    pub transaction: Option<Transaction>,
    pub balance: i128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollReceipt {
    pub record: PayrollRecord,
    pub transaction: Transaction,
    pub balance: i128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReceipt {
    pub requisition: RequisitionSnapshot,
    pub transaction: Option<Transaction>,
    pub balance: i128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_formatting_handles_values_beyond_i64() {
        let usd = CurrencyCode::default();
        assert_eq!(format_balance(1_800_000, &usd), "$18,000.00");
        let huge = i64::MAX as i128 + 1;
        assert_eq!(format_balance(huge, &usd), format!("USD {huge}"));
    }
}
