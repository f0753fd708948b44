//! Replay of JSON command scripts (used by the `tradeledger` binary).
//!
//! A script is a JSON array of steps. Steps name the things they create with
//! a `label` and refer to earlier things by that label:
//!
//! ```json
//! [
//!   { "op": "record_stock", "label": "beans", "kind": "ACQUISITION", "product": "Arabica",
//!     "unit": "kg", "quantity": 500, "cost": { "unit_cost": 2 }, "method": "CASH" },
//!   { "op": "create_document", "label": "hamburg", "kind": "EXPORT", "counterparty": "Hamburg Roasters",
//!     "lines": [{ "description": "Arabica", "quantity": 60, "unit_price": 300 }],
//!     "allocation": { "lot": "beans", "quantity": 60 } },
//!   { "op": "record_payment", "document": "hamburg", "amount": 9000, "method": "BANK_TRANSFER" }
//! ]
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradeledger_auth::{Actor, ActorId};
use tradeledger_core::DomainError;
use tradeledger_events::EventBus;
use tradeledger_inventory::{CostInfo, LotId, NewCostRecord, RecordKind};
use tradeledger_ledger::{PaymentMethod, TransactionDraft, TransactionKind};
use tradeledger_payroll::{PayStaff, RegisterStaff, StaffId};
use tradeledger_requisitions::{Decision, RequisitionId};
use tradeledger_settlement::{
    DocumentId, DocumentKind, LifecycleStatus, LineItem, RecordPayment, StockAllocation,
    UpdateLifecycleStatus,
};

use crate::commit::CommitEnvelope;
use crate::engine::{NewDocument, NewRequisition, RequisitionDecision, SettlementEngine};
use crate::error::{EngineError, EngineResult};

/// Which built-in actor runs a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptActor {
    #[default]
    Admin,
    Staff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptAllocation {
    /// Label of the `record_stock` step that opened the lot.
    pub lot: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    CreateDocument {
        label: String,
        kind: DocumentKind,
        counterparty: String,
        #[serde(default)]
        destination: Option<String>,
        #[serde(default)]
        shipping_reference: Option<String>,
        lines: Vec<LineItem>,
        #[serde(default)]
        allocation: Option<ScriptAllocation>,
    },
    RecordPayment {
        document: String,
        amount: i64,
        method: PaymentMethod,
    },
    UpdateStatus {
        document: String,
        status: LifecycleStatus,
    },
    RecordStock {
        label: String,
        kind: RecordKind,
        product: String,
        unit: String,
        quantity: i64,
        #[serde(default)]
        cost: CostInfo,
        #[serde(default)]
        counterparty: Option<String>,
        method: PaymentMethod,
    },
    RegisterStaff {
        label: String,
        name: String,
        #[serde(default)]
        role_title: String,
    },
    PayStaff {
        staff: String,
        amount: i64,
        period: String,
        method: PaymentMethod,
    },
    SubmitRequisition {
        label: String,
        amount: i64,
        reason: String,
        category: String,
    },
    DecideRequisition {
        requisition: String,
        decision: Decision,
        #[serde(default)]
        note: Option<String>,
        method: PaymentMethod,
    },
    RecordTransaction {
        kind: TransactionKind,
        category: String,
        amount: i64,
        method: PaymentMethod,
        #[serde(default)]
        description: String,
        #[serde(default)]
        reference: Option<String>,
    },
}

impl ScriptStep {
    pub fn op(&self) -> &'static str {
        match self {
            ScriptStep::CreateDocument { .. } => "create_document",
            ScriptStep::RecordPayment { .. } => "record_payment",
            ScriptStep::UpdateStatus { .. } => "update_status",
            ScriptStep::RecordStock { .. } => "record_stock",
            ScriptStep::RegisterStaff { .. } => "register_staff",
            ScriptStep::PayStaff { .. } => "pay_staff",
            ScriptStep::SubmitRequisition { .. } => "submit_requisition",
            ScriptStep::DecideRequisition { .. } => "decide_requisition",
            ScriptStep::RecordTransaction { .. } => "record_transaction",
        }
    }
}

/// One script step plus who runs it and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    #[serde(default)]
    pub actor: ScriptActor,
    /// Defaults to the time the step is replayed.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub step: ScriptStep,
}

#[derive(Debug, Error)]
#[error("step {index} ({op}) failed: {source}")]
pub struct ScriptError {
    pub index: usize,
    pub op: &'static str,
    #[source]
    pub source: EngineError,
}

/// Replays script entries against an engine, resolving labels as it goes.
pub struct ScriptRunner<'a, B> {
    engine: &'a SettlementEngine<B>,
    admin: Actor,
    staff: Actor,
    documents: HashMap<String, DocumentId>,
    lots: HashMap<String, LotId>,
    staff_members: HashMap<String, StaffId>,
    requisitions: HashMap<String, RequisitionId>,
}

impl<'a, B> ScriptRunner<'a, B>
where
    B: EventBus<CommitEnvelope>,
{
    pub fn new(engine: &'a SettlementEngine<B>) -> Self {
        Self {
            engine,
            admin: Actor::admin(ActorId::new()),
            staff: Actor::staff(ActorId::new()),
            documents: HashMap::new(),
            lots: HashMap::new(),
            staff_members: HashMap::new(),
            requisitions: HashMap::new(),
        }
    }

    /// Run every entry in order, stopping at the first failure.
    pub fn run_all(&mut self, entries: Vec<ScriptEntry>) -> Result<usize, ScriptError> {
        let count = entries.len();
        for (index, entry) in entries.into_iter().enumerate() {
            let op = entry.step.op();
            self.run(entry)
                .map_err(|source| ScriptError { index, op, source })?;
            tracing::debug!(index, op, "script step applied");
        }
        Ok(count)
    }

    pub fn run(&mut self, entry: ScriptEntry) -> EngineResult<()> {
        let at = entry.at.unwrap_or_else(Utc::now);
        let actor = match entry.actor {
            ScriptActor::Admin => self.admin.clone(),
            ScriptActor::Staff => self.staff.clone(),
        };

        match entry.step {
            ScriptStep::CreateDocument {
                label,
                kind,
                counterparty,
                destination,
                shipping_reference,
                lines,
                allocation,
            } => {
                let allocation = match allocation {
                    Some(a) => Some(StockAllocation {
                        lot_id: resolve(&self.lots, &a.lot, "stock lot")?,
                        quantity: a.quantity,
                    }),
                    None => None,
                };
                let doc = self.engine.create_document(
                    &actor,
                    NewDocument {
                        kind,
                        counterparty,
                        destination,
                        shipping_reference,
                        lines,
                        allocation,
                        occurred_at: at,
                    },
                )?;
                self.documents.insert(label, doc.id);
            }
            ScriptStep::RecordPayment {
                document,
                amount,
                method,
            } => {
                let document_id = resolve(&self.documents, &document, "document")?;
                self.engine.record_payment(
                    &actor,
                    RecordPayment {
                        document_id,
                        amount,
                        method,
                        occurred_at: at,
                    },
                )?;
            }
            ScriptStep::UpdateStatus { document, status } => {
                let document_id = resolve(&self.documents, &document, "document")?;
                self.engine.update_lifecycle_status(
                    &actor,
                    UpdateLifecycleStatus {
                        document_id,
                        new_status: status,
                        occurred_at: at,
                    },
                )?;
            }
            ScriptStep::RecordStock {
                label,
                kind,
                product,
                unit,
                quantity,
                cost,
                counterparty,
                method,
            } => {
                let receipt = self.engine.record_with_cost(
                    &actor,
                    NewCostRecord {
                        kind,
                        product,
                        unit,
                        quantity,
                        cost,
                        counterparty,
                        occurred_at: at,
                    },
                    method,
                )?;
                self.lots.insert(label, receipt.lot.id);
            }
            ScriptStep::RegisterStaff {
                label,
                name,
                role_title,
            } => {
                let member = self.engine.register_staff(
                    &actor,
                    RegisterStaff {
                        name,
                        role_title,
                        occurred_at: at,
                    },
                )?;
                self.staff_members.insert(label, member.id_typed());
            }
            ScriptStep::PayStaff {
                staff,
                amount,
                period,
                method,
            } => {
                let staff_id = resolve(&self.staff_members, &staff, "staff member")?;
                self.engine.pay_staff(
                    &actor,
                    PayStaff {
                        staff_id,
                        amount,
                        period,
                        method,
                        occurred_at: at,
                    },
                )?;
            }
            ScriptStep::SubmitRequisition {
                label,
                amount,
                reason,
                category,
            } => {
                let requisition = self.engine.submit_requisition(
                    &actor,
                    NewRequisition {
                        amount,
                        reason,
                        category,
                        occurred_at: at,
                    },
                )?;
                self.requisitions.insert(label, requisition.id);
            }
            ScriptStep::DecideRequisition {
                requisition,
                decision,
                note,
                method,
            } => {
                let requisition_id = resolve(&self.requisitions, &requisition, "requisition")?;
                self.engine.decide_requisition(
                    &actor,
                    RequisitionDecision {
                        requisition_id,
                        decision,
                        note,
                        method,
                        occurred_at: at,
                    },
                )?;
            }
            ScriptStep::RecordTransaction {
                kind,
                category,
                amount,
                method,
                description,
                reference,
            } => {
                let mut draft =
                    TransactionDraft::new(kind, category, amount, method, at).with_description(description);
                draft.reference = reference;
                self.engine.record_manual(&actor, draft)?;
            }
        }

        Ok(())
    }
}

fn resolve<T: Copy>(labels: &HashMap<String, T>, label: &str, what: &str) -> EngineResult<T> {
    labels
        .get(label)
        .copied()
        .ok_or_else(|| DomainError::not_found(format!("{what} labelled '{label}'")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use tradeledger_settlement::PaymentStatus;

    const SCRIPT: &str = r#"[
        { "op": "record_stock", "label": "beans", "kind": "ACQUISITION", "product": "Arabica",
          "unit": "kg", "quantity": 500, "cost": { "unit_cost": 2 }, "method": "CASH" },
        { "op": "create_document", "label": "hamburg", "kind": "EXPORT",
          "counterparty": "Hamburg Roasters",
          "lines": [{ "description": "Arabica", "quantity": 60, "unit_price": 300 }],
          "allocation": { "lot": "beans", "quantity": 60 } },
        { "op": "record_payment", "document": "hamburg", "amount": 18000, "method": "BANK_TRANSFER" },
        { "op": "submit_requisition", "actor": "staff", "label": "fuel", "amount": 300,
          "reason": "Truck fuel", "category": "Transport" },
        { "op": "decide_requisition", "requisition": "fuel", "decision": "APPROVED", "method": "CASH" }
    ]"#;

    #[test]
    fn replays_a_full_script() {
        let engine = SettlementEngine::new(EngineConfig::default()).unwrap();
        let entries: Vec<ScriptEntry> = serde_json::from_str(SCRIPT).unwrap();

        let applied = ScriptRunner::new(&engine).run_all(entries).unwrap();
        assert_eq!(applied, 5);

        // -1000 stock, +18000 payment, -300 requisition
        assert_eq!(engine.balance().unwrap(), 16_700);
        let docs = engine.documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].payment_status, PaymentStatus::Paid);
        assert_eq!(engine.lots().unwrap()[0].available, 440);
    }

    #[test]
    fn unknown_label_reports_the_failing_step() {
        let engine = SettlementEngine::new(EngineConfig::default()).unwrap();
        let entries: Vec<ScriptEntry> = serde_json::from_str(
            r#"[{ "op": "record_payment", "document": "nope", "amount": 5, "method": "CASH" }]"#,
        )
        .unwrap();

        let err = ScriptRunner::new(&engine).run_all(entries).unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.op, "record_payment");
        assert!(matches!(err.source, EngineError::Domain(DomainError::NotFound(_))));
    }
}
