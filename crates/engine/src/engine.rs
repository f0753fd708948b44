//! The settlement engine service.
//!
//! One owned state behind one lock. Every command method:
//!
//! ```text
//! authorize → lock (write) → decide against current state → commit → unlock → publish
//! ```
//!
//! Decide never mutates; commit appends the (optional) ledger transaction and
//! swaps in the new aggregate state. Reads take the read lock and clone out.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_auth::{Actor, Permission, Role, authorize};
use tradeledger_core::{Aggregate, AggregateId, CurrencyCode, DomainError, TransactionId};
use tradeledger_events::{EventBus, InMemoryEventBus, Subscription};
use tradeledger_inventory::{
    Allocate, CostRecord, LotCommand, LotId, NewCostRecord, OpenLot, RecordId, StockLot,
};
use tradeledger_ledger::{
    CategoryTotal, HistoryFilter, LedgerTotals, PaymentMethod, Transaction, TransactionDraft,
};
use tradeledger_payroll::{PayStaff, PayrollRecord, RegisterStaff, StaffId, StaffMember};
use tradeledger_requisitions::{
    Decide, Decision, Requisition, RequisitionCommand, RequisitionId, Submit,
};
use tradeledger_settlement::{
    CreateDocument, DocumentCommand, DocumentId, DocumentKind, LineItem, RecordPayment,
    SettlementDocument, StockAllocation, UpdateLifecycleStatus,
};

use crate::commit::{CommitEnvelope, Committed, PendingCommit};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::snapshot::{
    CostReceipt, DecisionReceipt, DocumentSnapshot, LedgerSnapshot, LotSnapshot, PaymentReceipt,
    PayrollReceipt, RequisitionSnapshot, format_balance,
};
use crate::state::EngineState;

/// Input for a new settlement document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub kind: DocumentKind,
    pub counterparty: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub shipping_reference: Option<String>,
    pub lines: Vec<LineItem>,
    /// Stock drawn from a lot when the document is created.
    #[serde(default)]
    pub allocation: Option<StockAllocation>,
    pub occurred_at: DateTime<Utc>,
}

/// Input for a new fund requisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequisition {
    pub amount: i64,
    pub reason: String,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
}

/// Input for deciding a pending requisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionDecision {
    pub requisition_id: RequisitionId,
    pub decision: Decision,
    #[serde(default)]
    pub note: Option<String>,
    /// How the approved funds are disbursed.
    pub method: PaymentMethod,
    pub occurred_at: DateTime<Utc>,
}

/// Ledger & settlement engine for one account.
///
/// `B` is where commit notifications go; hosts that mirror to a remote store
/// subscribe to it. The engine never waits on, or rolls back for, a subscriber.
pub struct SettlementEngine<B = InMemoryEventBus<CommitEnvelope>> {
    config: EngineConfig,
    state: RwLock<EngineState>,
    bus: B,
}

impl SettlementEngine {
    /// Engine with an in-process notification bus.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::with_bus(config, InMemoryEventBus::new())
    }
}

impl<B> SettlementEngine<B>
where
    B: EventBus<CommitEnvelope>,
{
    /// Engine publishing commit notifications on `bus`.
    ///
    /// Opening capital from `config` is recorded before anyone can subscribe.
    pub fn with_bus(config: EngineConfig, bus: B) -> EngineResult<Self> {
        config.validate()?;

        let mut state = EngineState::new(config.currency.clone());
        if let Some(amount) = config.opening_capital {
            let draft = TransactionDraft::initial_capital(amount, PaymentMethod::BankTransfer, Utc::now())
                .with_description(format!("Opening capital for {}", config.account_name));
            let (tx, balance) = state.ledger.append(draft)?;
            tracing::info!(transaction_id = %tx.id_typed(), amount, balance = %balance, "opening capital recorded");
        }

        Ok(Self {
            config,
            state: RwLock::new(state),
            bus,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.config.currency
    }

    /// Subscribe to commit notifications published from now on.
    pub fn subscribe(&self) -> Subscription<CommitEnvelope> {
        self.bus.subscribe()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, EngineState>> {
        self.state.read().map_err(|_| EngineError::Poisoned)
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, EngineState>> {
        self.state.write().map_err(|_| EngineError::Poisoned)
    }

    fn require(&self, actor: &Actor, permission: &Permission) -> EngineResult<()> {
        authorize(actor, permission).map_err(|err| {
            tracing::warn!(actor_id = %actor.id, permission = %permission.as_str(), "command denied");
            EngineError::Domain(DomainError::from(err))
        })
    }

    /// Decide and commit under the write lock, then publish outside it.
    fn run<T, M>(
        &self,
        decide: impl FnOnce(&EngineState) -> EngineResult<PendingCommit<T, M>>,
    ) -> EngineResult<Committed<T>>
    where
        M: FnOnce(&mut EngineState),
    {
        let committed = {
            let mut state = self.write()?;
            let pending = decide(&state)?;
            state.commit(pending)?
        };
        self.publish(committed.envelope.clone());
        Ok(committed)
    }

    fn publish(&self, envelope: CommitEnvelope) {
        let sequence = envelope.commit_sequence();
        match self.bus.publish(envelope) {
            Ok(()) => tracing::debug!(commit_seq = sequence, "commit published"),
            Err(err) => tracing::warn!(commit_seq = sequence, error = ?err, "commit notification failed"),
        }
    }

    // ---------------------------------------------------------------------
    // Settlement documents
    // ---------------------------------------------------------------------

    /// Create a settlement document, drawing down a stock lot if the
    /// document carries an allocation. The lot and the document change together.
    #[tracing::instrument(skip(self, actor, input), fields(kind = %input.kind))]
    pub fn create_document(&self, actor: &Actor, input: NewDocument) -> EngineResult<DocumentSnapshot> {
        self.require(actor, &Permission::DOCUMENTS_CREATE)?;
        let role = if actor.is_admin() { Role::ADMIN } else { Role::STAFF };
        let document_id = DocumentId::new(AggregateId::new());

        let committed = self.run(|state| {
            let mut document = SettlementDocument::empty(document_id);
            let events = document.handle(&DocumentCommand::Create(CreateDocument {
                document_id,
                kind: input.kind,
                counterparty: input.counterparty.clone(),
                destination: input.destination.clone(),
                shipping_reference: input.shipping_reference.clone(),
                lines: input.lines.clone(),
                allocation: input.allocation,
                actor_role: role,
                occurred_at: input.occurred_at,
            }))?;

            let next_lot = match input.allocation {
                Some(allocation) => {
                    let mut lot = state
                        .lots
                        .get(&allocation.lot_id)
                        .cloned()
                        .ok_or_else(|| DomainError::not_found(format!("stock lot {}", allocation.lot_id)))?;
                    let lot_events = lot.handle(&LotCommand::Allocate(Allocate {
                        lot_id: allocation.lot_id,
                        quantity: allocation.quantity,
                        occurred_at: input.occurred_at,
                    }))?;
                    for event in &lot_events {
                        lot.apply(event);
                    }
                    Some((lot, lot_events))
                }
                None => None,
            };

            for event in &events {
                document.apply(event);
            }
            let snapshot = DocumentSnapshot::capture(&document, &state.currency);

            let lot_events = next_lot.as_ref().map(|(_, e)| e.clone()).unwrap_or_default();
            PendingCommit::new(
                "create_document",
                "settlement.document",
                document_id.0,
                snapshot,
                move |state: &mut EngineState| {
                    if let Some((lot, _)) = next_lot {
                        state.lots.insert(lot.id_typed(), lot);
                    }
                    state.documents.insert(document_id, document);
                },
            )
            .with_events(&events)?
            .with_events(&lot_events)
        })?;

        tracing::info!(
            document_id = %document_id,
            total_value = committed.output.total_value,
            lifecycle = %committed.output.lifecycle,
            commit_seq = committed.envelope.commit_sequence(),
            "document created"
        );
        Ok(committed.output)
    }

    /// Record a payment against a document: one INCOME transaction plus the
    /// document's new paid amount, committed together.
    #[tracing::instrument(skip(self, actor, cmd), fields(document_id = %cmd.document_id, amount = cmd.amount))]
    pub fn record_payment(&self, actor: &Actor, cmd: RecordPayment) -> EngineResult<PaymentReceipt> {
        self.require(actor, &Permission::PAYMENTS_RECORD)?;
        let document_id = cmd.document_id;

        let committed = self.run(|state| {
            let mut document = state
                .documents
                .get(&document_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("document {document_id}")))?;
            let events = document.handle(&DocumentCommand::RecordPayment(cmd.clone()))?;

            let draft = TransactionDraft::income(
                document.kind().income_category(),
                cmd.amount,
                cmd.method,
                cmd.occurred_at,
            )
            .with_description(format!("Payment from {}", document.counterparty()))
            .with_reference(document_id.to_string());
            let transaction_id = TransactionId::new();
            state.ledger.check_append(transaction_id, &draft)?;

            for event in &events {
                document.apply(event);
            }
            let snapshot = DocumentSnapshot::capture(&document, &state.currency);

            Ok(PendingCommit::new(
                "record_payment",
                "settlement.document",
                document_id.0,
                snapshot,
                move |state: &mut EngineState| {
                    state.documents.insert(document_id, document);
                },
            )
            .with_events(&events)?
            .with_transaction(transaction_id, draft))
        })?;

        let Committed { output, transaction, balance, envelope } = committed;
        let transaction = transaction.ok_or_else(|| DomainError::invariant("payment committed without a transaction"))?;
        tracing::info!(
            payment_status = ?output.payment_status,
            amount_paid = output.amount_paid,
            balance = %balance,
            commit_seq = envelope.commit_sequence(),
            "payment recorded"
        );
        Ok(PaymentReceipt {
            document: output,
            transaction,
            balance,
        })
    }

    /// Move a document along its lifecycle table. Approving a staff-raised
    /// sale order needs `sales.approve`; every other move needs `documents.update`.
    #[tracing::instrument(skip(self, actor, cmd), fields(document_id = %cmd.document_id, to = %cmd.new_status))]
    pub fn update_lifecycle_status(
        &self,
        actor: &Actor,
        cmd: UpdateLifecycleStatus,
    ) -> EngineResult<DocumentSnapshot> {
        self.require(actor, &Permission::DOCUMENTS_UPDATE)?;
        let document_id = cmd.document_id;

        let committed = self.run(|state| {
            let mut document = state
                .documents
                .get(&document_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("document {document_id}")))?;
            if document.lifecycle().is_approval(cmd.new_status) {
                self.require(actor, &Permission::SALES_APPROVE)?;
            }

            let events = document.handle(&DocumentCommand::UpdateLifecycleStatus(cmd.clone()))?;
            for event in &events {
                document.apply(event);
            }
            let snapshot = DocumentSnapshot::capture(&document, &state.currency);

            PendingCommit::new(
                "update_lifecycle_status",
                "settlement.document",
                document_id.0,
                snapshot,
                move |state: &mut EngineState| {
                    state.documents.insert(document_id, document);
                },
            )
            .with_events(&events)
        })?;

        tracing::info!(
            lifecycle = %committed.output.lifecycle,
            commit_seq = committed.envelope.commit_sequence(),
            "lifecycle status updated"
        );
        Ok(committed.output)
    }

    // ---------------------------------------------------------------------
    // Acquisitions and production
    // ---------------------------------------------------------------------

    /// Record an acquisition or production run. Opens a stock lot for the
    /// quantity and, when the record carries a positive cost, books exactly
    /// one EXPENSE linked to it.
    #[tracing::instrument(skip(self, actor, input), fields(kind = ?input.kind, quantity = input.quantity))]
    pub fn record_with_cost(
        &self,
        actor: &Actor,
        input: NewCostRecord,
        method: PaymentMethod,
    ) -> EngineResult<CostReceipt> {
        self.require(actor, &Permission::INVENTORY_RECORD)?;
        let record_id = RecordId::new(AggregateId::new());
        let lot_id = LotId::new(AggregateId::new());

        let committed = self.run(|state| {
            let occurred_at = input.occurred_at;
            let record = CostRecord::prepare(record_id, lot_id, input)?;

            let mut lot = StockLot::empty(lot_id);
            let lot_events = lot.handle(&LotCommand::Open(OpenLot {
                lot_id,
                product: record.product().to_string(),
                unit: record.unit().to_string(),
                quantity: record.quantity(),
                source: Some(record_id),
                occurred_at,
            }))?;
            for event in &lot_events {
                lot.apply(event);
            }

            let expense = record.expense_draft(method);
            if let Some((id, draft)) = &expense {
                state.ledger.check_append(*id, draft)?;
            }

            let output = (record.clone(), LotSnapshot::capture(&lot));
            let pending = PendingCommit::new(
                "record_with_cost",
                "inventory.record",
                record_id.0,
                output,
                move |state: &mut EngineState| {
                    state.lots.insert(lot_id, lot);
                    state.cost_records.push(record);
                },
            )
            .with_events(&lot_events)?;

            Ok(match expense {
                Some((id, draft)) => pending.with_transaction(id, draft),
                None => pending,
            })
        })?;

        let Committed { output: (record, lot), transaction, balance, envelope } = committed;
        tracing::info!(
            record_id = %record_id,
            cost = ?record.resolved_cost(),
            balance = %balance,
            commit_seq = envelope.commit_sequence(),
            "cost record committed"
        );
        Ok(CostReceipt {
            record,
            lot,
            transaction,
            balance,
        })
    }

    // ---------------------------------------------------------------------
    // Payroll
    // ---------------------------------------------------------------------

    #[tracing::instrument(skip(self, actor, input))]
    pub fn register_staff(&self, actor: &Actor, input: RegisterStaff) -> EngineResult<StaffMember> {
        self.require(actor, &Permission::STAFF_MANAGE)?;
        let staff_id = StaffId::new(AggregateId::new());

        let committed = self.run(|state| {
            state.payroll.check_new_staff(staff_id)?;
            let member = StaffMember::register(staff_id, input)?;
            let stored = member.clone();
            Ok(PendingCommit::new(
                "register_staff",
                "payroll.staff",
                staff_id.0,
                member,
                move |state: &mut EngineState| {
                    state.payroll.commit_staff(stored);
                },
            ))
        })?;

        tracing::info!(staff_id = %staff_id, "staff member registered");
        Ok(committed.output)
    }

    /// Activate or deactivate a staff member. Inactive staff cannot be paid.
    #[tracing::instrument(skip(self, actor))]
    pub fn set_staff_active(&self, actor: &Actor, staff_id: StaffId, active: bool) -> EngineResult<StaffMember> {
        self.require(actor, &Permission::STAFF_MANAGE)?;

        let committed = self.run(|state| {
            let member = state.payroll.prepare_activation(staff_id, active)?;
            let stored = member.clone();
            Ok(PendingCommit::new(
                "set_staff_active",
                "payroll.staff",
                staff_id.0,
                member,
                move |state: &mut EngineState| {
                    state.payroll.commit_staff(stored);
                },
            ))
        })?;

        Ok(committed.output)
    }

    /// Pay a staff member: one payroll record plus one `Payroll` EXPENSE.
    #[tracing::instrument(skip(self, actor, input), fields(staff_id = %input.staff_id, amount = input.amount))]
    pub fn pay_staff(&self, actor: &Actor, input: PayStaff) -> EngineResult<PayrollReceipt> {
        self.require(actor, &Permission::PAYROLL_PAY)?;

        let committed = self.run(|state| {
            let (record, draft) = state.payroll.prepare_payment(input)?;
            let transaction_id = record.transaction_id();
            state.ledger.check_append(transaction_id, &draft)?;

            let stored = record.clone();
            Ok(PendingCommit::new(
                "pay_staff",
                "payroll.record",
                record.id_typed().0,
                record,
                move |state: &mut EngineState| {
                    state.payroll.commit_payment(stored);
                },
            )
            .with_transaction(transaction_id, draft))
        })?;

        let Committed { output: record, transaction, balance, envelope } = committed;
        let transaction = transaction.ok_or_else(|| DomainError::invariant("payroll committed without a transaction"))?;
        tracing::info!(
            period = %record.period(),
            balance = %balance,
            commit_seq = envelope.commit_sequence(),
            "staff paid"
        );
        Ok(PayrollReceipt {
            record,
            transaction,
            balance,
        })
    }

    // ---------------------------------------------------------------------
    // Requisitions
    // ---------------------------------------------------------------------

    #[tracing::instrument(skip(self, actor, input), fields(amount = input.amount))]
    pub fn submit_requisition(&self, actor: &Actor, input: NewRequisition) -> EngineResult<RequisitionSnapshot> {
        self.require(actor, &Permission::REQUISITIONS_SUBMIT)?;
        let requisition_id = RequisitionId::new(AggregateId::new());

        let committed = self.run(|_state| {
            let mut requisition = Requisition::empty(requisition_id);
            let events = requisition.handle(&RequisitionCommand::Submit(Submit {
                requisition_id,
                requested_by: actor.id,
                amount: input.amount,
                reason: input.reason.clone(),
                category: input.category.clone(),
                occurred_at: input.occurred_at,
            }))?;
            for event in &events {
                requisition.apply(event);
            }
            let snapshot = RequisitionSnapshot::capture(&requisition);

            PendingCommit::new(
                "submit_requisition",
                "requisitions.requisition",
                requisition_id.0,
                snapshot,
                move |state: &mut EngineState| {
                    state.requisitions.insert(requisition_id, requisition);
                },
            )
            .with_events(&events)
        })?;

        tracing::info!(requisition_id = %requisition_id, "requisition submitted");
        Ok(committed.output)
    }

    /// Decide a pending requisition. Approval books one EXPENSE for the
    /// requisition's amount and category; rejection books nothing.
    #[tracing::instrument(skip(self, actor, input), fields(requisition_id = %input.requisition_id, decision = ?input.decision))]
    pub fn decide_requisition(&self, actor: &Actor, input: RequisitionDecision) -> EngineResult<DecisionReceipt> {
        self.require(actor, &Permission::REQUISITIONS_DECIDE)?;
        let requisition_id = input.requisition_id;

        let committed = self.run(|state| {
            let mut requisition = state
                .requisitions
                .get(&requisition_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("requisition {requisition_id}")))?;
            let events = requisition.handle(&RequisitionCommand::Decide(Decide {
                requisition_id,
                decision: input.decision,
                decided_by: actor.id,
                note: input.note.clone(),
                occurred_at: input.occurred_at,
            }))?;

            let expense = match input.decision {
                Decision::Approved => {
                    let draft = requisition.approval_expense(input.method, input.occurred_at);
                    let id = TransactionId::new();
                    state.ledger.check_append(id, &draft)?;
                    Some((id, draft))
                }
                Decision::Rejected => None,
            };

            for event in &events {
                requisition.apply(event);
            }
            let snapshot = RequisitionSnapshot::capture(&requisition);

            let pending = PendingCommit::new(
                "decide_requisition",
                "requisitions.requisition",
                requisition_id.0,
                snapshot,
                move |state: &mut EngineState| {
                    state.requisitions.insert(requisition_id, requisition);
                },
            )
            .with_events(&events)?;

            Ok(match expense {
                Some((id, draft)) => pending.with_transaction(id, draft),
                None => pending,
            })
        })?;

        let Committed { output, transaction, balance, envelope } = committed;
        tracing::info!(
            status = %output.status,
            balance = %balance,
            commit_seq = envelope.commit_sequence(),
            "requisition decided"
        );
        Ok(DecisionReceipt {
            requisition: output,
            transaction,
            balance,
        })
    }

    // ---------------------------------------------------------------------
    // Direct ledger entries
    // ---------------------------------------------------------------------

    /// Record a capital injection as one INITIAL_CAPITAL transaction.
    pub fn record_initial_capital(
        &self,
        actor: &Actor,
        amount: i64,
        method: PaymentMethod,
        occurred_at: DateTime<Utc>,
    ) -> EngineResult<(Transaction, i128)> {
        self.record_manual(actor, TransactionDraft::initial_capital(amount, method, occurred_at))
    }

    /// Append a transaction that is not tied to any document.
    #[tracing::instrument(skip(self, actor, draft), fields(kind = %draft.kind, amount = draft.amount))]
    pub fn record_manual(&self, actor: &Actor, draft: TransactionDraft) -> EngineResult<(Transaction, i128)> {
        self.require(actor, &Permission::LEDGER_RECORD)?;
        let transaction_id = TransactionId::new();

        let committed = self.run(|state| {
            state.ledger.check_append(transaction_id, &draft)?;
            Ok(PendingCommit::new(
                "record_manual",
                "ledger.transaction",
                AggregateId::from_uuid(*transaction_id.as_uuid()),
                (),
                |_: &mut EngineState| {},
            )
            .with_transaction(transaction_id, draft))
        })?;

        let transaction = committed
            .transaction
            .ok_or_else(|| DomainError::invariant("manual entry committed without a transaction"))?;
        tracing::info!(
            transaction_id = %transaction_id,
            balance = %committed.balance,
            commit_seq = committed.envelope.commit_sequence(),
            "manual transaction recorded"
        );
        Ok((transaction, committed.balance))
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Aggregate balance: inflows minus expenses.
    pub fn balance(&self) -> EngineResult<i128> {
        Ok(self.read()?.ledger.balance())
    }

    /// Transactions matching `filter`, oldest first.
    pub fn history(&self, filter: HistoryFilter) -> EngineResult<Vec<Transaction>> {
        Ok(self.read()?.ledger.history(filter).cloned().collect())
    }

    pub fn transaction_count(&self) -> EngineResult<usize> {
        Ok(self.read()?.ledger.len())
    }

    pub fn totals(&self, filter: &HistoryFilter) -> EngineResult<LedgerTotals> {
        Ok(self.read()?.ledger.totals(filter))
    }

    pub fn by_category(&self, filter: &HistoryFilter) -> EngineResult<Vec<CategoryTotal>> {
        Ok(self.read()?.ledger.by_category(filter))
    }

    pub fn ledger_snapshot(&self) -> EngineResult<LedgerSnapshot> {
        let state = self.read()?;
        let all = HistoryFilter::all();
        let balance = state.ledger.balance();
        Ok(LedgerSnapshot {
            account_name: self.config.account_name.clone(),
            currency: state.currency.clone(),
            balance,
            formatted_balance: format_balance(balance, &state.currency),
            totals: state.ledger.totals(&all),
            by_category: state.ledger.by_category(&all),
            transaction_count: state.ledger.len(),
            commit_sequence: state.commit_sequence,
        })
    }

    pub fn document(&self, document_id: DocumentId) -> EngineResult<DocumentSnapshot> {
        let state = self.read()?;
        let document = state
            .documents
            .get(&document_id)
            .ok_or_else(|| DomainError::not_found(format!("document {document_id}")))?;
        Ok(DocumentSnapshot::capture(document, &state.currency))
    }

    pub fn documents(&self) -> EngineResult<Vec<DocumentSnapshot>> {
        let state = self.read()?;
        Ok(state
            .documents
            .values()
            .map(|doc| DocumentSnapshot::capture(doc, &state.currency))
            .collect())
    }

    pub fn lot(&self, lot_id: LotId) -> EngineResult<LotSnapshot> {
        let state = self.read()?;
        state
            .lots
            .get(&lot_id)
            .map(LotSnapshot::capture)
            .ok_or_else(|| DomainError::not_found(format!("stock lot {lot_id}")).into())
    }

    pub fn lots(&self) -> EngineResult<Vec<LotSnapshot>> {
        Ok(self.read()?.lots.values().map(LotSnapshot::capture).collect())
    }

    pub fn cost_records(&self) -> EngineResult<Vec<CostRecord>> {
        Ok(self.read()?.cost_records.clone())
    }

    pub fn staff(&self) -> EngineResult<Vec<StaffMember>> {
        Ok(self.read()?.payroll.staff_members().cloned().collect())
    }

    pub fn payroll_history(&self, staff_id: StaffId) -> EngineResult<Vec<PayrollRecord>> {
        Ok(self.read()?.payroll.history_for(staff_id).cloned().collect())
    }

    pub fn payroll_total(&self, period: &str) -> EngineResult<i128> {
        Ok(self.read()?.payroll.total_for_period(period))
    }

    pub fn requisition(&self, requisition_id: RequisitionId) -> EngineResult<RequisitionSnapshot> {
        let state = self.read()?;
        state
            .requisitions
            .get(&requisition_id)
            .map(RequisitionSnapshot::capture)
            .ok_or_else(|| DomainError::not_found(format!("requisition {requisition_id}")).into())
    }

    pub fn requisitions(&self) -> EngineResult<Vec<RequisitionSnapshot>> {
        Ok(self
            .read()?
            .requisitions
            .values()
            .map(RequisitionSnapshot::capture)
            .collect())
    }
}

impl<B> core::fmt::Debug for SettlementEngine<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SettlementEngine")
            .field("account_name", &self.config.account_name)
            .field("currency", &self.config.currency)
            .finish_non_exhaustive()
    }
}
