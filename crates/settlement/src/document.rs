use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_auth::Role;
use tradeledger_core::{Aggregate, AggregateId, AggregateRoot, DomainError, ValueObject};
use tradeledger_events::Event;
use tradeledger_inventory::LotId;
use tradeledger_ledger::PaymentMethod;

use crate::lifecycle::{DocumentKind, LifecycleStatus, PaymentStatus};

/// Settlement document identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub AggregateId);

impl DocumentId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Line item: what is sold, how much, at what unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: i64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: i64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: i64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }
}

impl ValueObject for LineItem {}

/// Quantity drawn from a stock lot when the document was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAllocation {
    pub lot_id: LotId,
    pub quantity: i64,
}

/// Aggregate root: SettlementDocument.
///
/// Invariant: `0 <= amount_paid <= total_value` after every applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementDocument {
    id: DocumentId,
    kind: DocumentKind,
    counterparty: String,
    destination: Option<String>,
    shipping_reference: Option<String>,
    lines: Vec<LineItem>,
    allocation: Option<StockAllocation>,
    total_value: i64,
    amount_paid: i64,
    payment_status: PaymentStatus,
    lifecycle: LifecycleStatus,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl SettlementDocument {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: DocumentId) -> Self {
        Self {
            id,
            kind: DocumentKind::Export,
            counterparty: String::new(),
            destination: None,
            shipping_reference: None,
            lines: Vec::new(),
            allocation: None,
            total_value: 0,
            amount_paid: 0,
            payment_status: PaymentStatus::Unpaid,
            lifecycle: DocumentKind::Export.initial_status(false),
            created_at: None,
            updated_at: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> DocumentId {
        self.id
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn counterparty(&self) -> &str {
        &self.counterparty
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn shipping_reference(&self) -> Option<&str> {
        self.shipping_reference.as_deref()
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn allocation(&self) -> Option<StockAllocation> {
        self.allocation
    }

    pub fn total_value(&self) -> i64 {
        self.total_value
    }

    pub fn amount_paid(&self) -> i64 {
        self.amount_paid
    }

    pub fn outstanding(&self) -> i64 {
        self.total_value - self.amount_paid
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn lifecycle(&self) -> LifecycleStatus {
        self.lifecycle
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for SettlementDocument {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateDocument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDocument {
    pub document_id: DocumentId,
    pub kind: DocumentKind,
    pub counterparty: String,
    pub destination: Option<String>,
    pub shipping_reference: Option<String>,
    pub lines: Vec<LineItem>,
    pub allocation: Option<StockAllocation>,
    /// Role of the creating actor; decides the initial lifecycle status.
    pub actor_role: Role,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordPayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayment {
    pub document_id: DocumentId,
    /// Payment amount in smallest currency unit.
    pub amount: i64,
    pub method: PaymentMethod,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateLifecycleStatus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLifecycleStatus {
    pub document_id: DocumentId,
    pub new_status: LifecycleStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentCommand {
    Create(CreateDocument),
    RecordPayment(RecordPayment),
    UpdateLifecycleStatus(UpdateLifecycleStatus),
}

/// Event: DocumentCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCreated {
    pub document_id: DocumentId,
    pub kind: DocumentKind,
    pub counterparty: String,
    pub destination: Option<String>,
    pub shipping_reference: Option<String>,
    pub lines: Vec<LineItem>,
    pub allocation: Option<StockAllocation>,
    pub total_value: i64,
    pub lifecycle: LifecycleStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecorded {
    pub document_id: DocumentId,
    pub amount: i64,
    pub method: PaymentMethod,
    pub new_amount_paid: i64,
    pub payment_status: PaymentStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LifecycleStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleStatusChanged {
    pub document_id: DocumentId,
    pub from: LifecycleStatus,
    pub to: LifecycleStatus,
    /// True when the change was triggered by a completed payment.
    pub automatic: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentEvent {
    DocumentCreated(DocumentCreated),
    PaymentRecorded(PaymentRecorded),
    LifecycleStatusChanged(LifecycleStatusChanged),
}

impl Event for DocumentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::DocumentCreated(_) => "settlement.document.created",
            DocumentEvent::PaymentRecorded(_) => "settlement.document.payment_recorded",
            DocumentEvent::LifecycleStatusChanged(_) => "settlement.document.lifecycle_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DocumentEvent::DocumentCreated(e) => e.occurred_at,
            DocumentEvent::PaymentRecorded(e) => e.occurred_at,
            DocumentEvent::LifecycleStatusChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for SettlementDocument {
    type Command = DocumentCommand;
    type Event = DocumentEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DocumentEvent::DocumentCreated(e) => {
                self.id = e.document_id;
                self.kind = e.kind;
                self.counterparty = e.counterparty.clone();
                self.destination = e.destination.clone();
                self.shipping_reference = e.shipping_reference.clone();
                self.lines = e.lines.clone();
                self.allocation = e.allocation;
                self.total_value = e.total_value;
                self.amount_paid = 0;
                self.payment_status = PaymentStatus::Unpaid;
                self.lifecycle = e.lifecycle;
                self.created_at = Some(e.occurred_at);
                self.created = true;
            }
            DocumentEvent::PaymentRecorded(e) => {
                self.amount_paid = e.new_amount_paid;
                self.payment_status = PaymentStatus::derive(self.amount_paid, self.total_value);
            }
            DocumentEvent::LifecycleStatusChanged(e) => {
                self.lifecycle = e.to;
            }
        }

        self.updated_at = Some(event.occurred_at());
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DocumentCommand::Create(cmd) => self.handle_create(cmd),
            DocumentCommand::RecordPayment(cmd) => self.handle_record_payment(cmd),
            DocumentCommand::UpdateLifecycleStatus(cmd) => self.handle_update_status(cmd),
        }
    }
}

impl SettlementDocument {
    fn ensure_exists(&self, document_id: DocumentId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("document {document_id}")));
        }
        if self.id != document_id {
            return Err(DomainError::invariant("document_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateDocument) -> Result<Vec<DocumentEvent>, DomainError> {
        if self.created {
            return Err(DomainError::state_conflict("document already exists"));
        }
        if cmd.counterparty.trim().is_empty() {
            return Err(DomainError::validation("counterparty name cannot be empty"));
        }
        if cmd.lines.is_empty() {
            return Err(DomainError::validation("document must have at least one line item"));
        }
        if let Some(allocation) = cmd.allocation {
            if allocation.quantity <= 0 {
                return Err(DomainError::validation("allocated quantity must be positive"));
            }
        }

        let mut total: i64 = 0;
        for line in &cmd.lines {
            if line.quantity <= 0 {
                return Err(DomainError::validation("line item quantity must be positive"));
            }
            if line.unit_price <= 0 {
                return Err(DomainError::validation("line item unit_price must be positive"));
            }
            let line_total = line
                .quantity
                .checked_mul(line.unit_price)
                .ok_or_else(|| DomainError::invariant("line item amount overflow"))?;
            total = total
                .checked_add(line_total)
                .ok_or_else(|| DomainError::invariant("document total overflow"))?;
        }

        Ok(vec![DocumentEvent::DocumentCreated(DocumentCreated {
            document_id: cmd.document_id,
            kind: cmd.kind,
            counterparty: cmd.counterparty.trim().to_string(),
            destination: cmd.destination.clone(),
            shipping_reference: cmd.shipping_reference.clone(),
            lines: cmd.lines.clone(),
            allocation: cmd.allocation,
            total_value: total,
            lifecycle: cmd.kind.initial_status(cmd.actor_role.is_admin()),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_payment(&self, cmd: &RecordPayment) -> Result<Vec<DocumentEvent>, DomainError> {
        if cmd.amount <= 0 {
            return Err(DomainError::validation("payment amount must be positive"));
        }
        self.ensure_exists(cmd.document_id)?;

        if self.lifecycle.rejects_payments() {
            return Err(DomainError::invariant(format!(
                "document is {} and no longer accepts payments",
                self.lifecycle
            )));
        }

        let new_amount_paid = self
            .amount_paid
            .checked_add(cmd.amount)
            .ok_or_else(|| DomainError::invariant("amount paid overflow"))?;
        if new_amount_paid > self.total_value {
            return Err(DomainError::invariant(format!(
                "overpayment: {} paid + {} exceeds total {}",
                self.amount_paid, cmd.amount, self.total_value
            )));
        }

        let payment_status = PaymentStatus::derive(new_amount_paid, self.total_value);
        let mut events = vec![DocumentEvent::PaymentRecorded(PaymentRecorded {
            document_id: cmd.document_id,
            amount: cmd.amount,
            method: cmd.method,
            new_amount_paid,
            payment_status,
            occurred_at: cmd.occurred_at,
        })];

        if payment_status == PaymentStatus::Paid {
            if let Some(settled) = self.lifecycle.settled_on_full_payment() {
                events.push(DocumentEvent::LifecycleStatusChanged(LifecycleStatusChanged {
                    document_id: cmd.document_id,
                    from: self.lifecycle,
                    to: settled,
                    automatic: true,
                    occurred_at: cmd.occurred_at,
                }));
            }
        }

        Ok(events)
    }

    fn handle_update_status(
        &self,
        cmd: &UpdateLifecycleStatus,
    ) -> Result<Vec<DocumentEvent>, DomainError> {
        self.ensure_exists(cmd.document_id)?;

        if !self.lifecycle.can_transition_to(cmd.new_status) {
            return Err(DomainError::invalid_transition(self.lifecycle, cmd.new_status));
        }
        if cmd.new_status.requires_full_payment() && self.payment_status != PaymentStatus::Paid {
            return Err(DomainError::invariant(format!(
                "cannot move to {} with {} of {} paid",
                cmd.new_status, self.amount_paid, self.total_value
            )));
        }

        Ok(vec![DocumentEvent::LifecycleStatusChanged(LifecycleStatusChanged {
            document_id: cmd.document_id,
            from: self.lifecycle,
            to: cmd.new_status,
            automatic: false,
            occurred_at: cmd.occurred_at,
        })])
    }
}
