use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_auth::ActorId;
use tradeledger_core::{Aggregate, AggregateId, AggregateRoot, DomainError};
use tradeledger_events::Event;
use tradeledger_ledger::{PaymentMethod, TransactionDraft};

/// Requisition identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequisitionId(pub AggregateId);

impl RequisitionId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for RequisitionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Requisition status. APPROVED and REJECTED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequisitionStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequisitionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequisitionStatus::Pending)
    }
}

impl core::fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            RequisitionStatus::Pending => "PENDING",
            RequisitionStatus::Approved => "APPROVED",
            RequisitionStatus::Rejected => "REJECTED",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    fn status(self) -> RequisitionStatus {
        match self {
            Decision::Approved => RequisitionStatus::Approved,
            Decision::Rejected => RequisitionStatus::Rejected,
        }
    }
}

/// Aggregate root: Requisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requisition {
    id: RequisitionId,
    requested_by: Option<ActorId>,
    amount: i64,
    reason: String,
    category: String,
    status: RequisitionStatus,
    decided_by: Option<ActorId>,
    decision_note: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
    decided_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Requisition {
    /// Create an empty, not-yet-submitted aggregate instance.
    pub fn empty(id: RequisitionId) -> Self {
        Self {
            id,
            requested_by: None,
            amount: 0,
            reason: String::new(),
            category: String::new(),
            status: RequisitionStatus::Pending,
            decided_by: None,
            decision_note: None,
            submitted_at: None,
            decided_at: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> RequisitionId {
        self.id
    }

    pub fn requested_by(&self) -> Option<ActorId> {
        self.requested_by
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn status(&self) -> RequisitionStatus {
        self.status
    }

    pub fn decided_by(&self) -> Option<ActorId> {
        self.decided_by
    }

    pub fn decision_note(&self) -> Option<&str> {
        self.decision_note.as_deref()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// The expense that an approval of this requisition books.
    pub fn approval_expense(&self, method: PaymentMethod, occurred_at: DateTime<Utc>) -> TransactionDraft {
        TransactionDraft::expense(self.category.clone(), self.amount, method, occurred_at)
            .with_description(self.reason.clone())
            .with_reference(self.id.to_string())
    }
}

impl AggregateRoot for Requisition {
    type Id = RequisitionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: Submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submit {
    pub requisition_id: RequisitionId,
    pub requested_by: ActorId,
    pub amount: i64,
    pub reason: String,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Decide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decide {
    pub requisition_id: RequisitionId,
    pub decision: Decision,
    pub decided_by: ActorId,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequisitionCommand {
    Submit(Submit),
    Decide(Decide),
}

/// Event: RequisitionSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionSubmitted {
    pub requisition_id: RequisitionId,
    pub requested_by: ActorId,
    pub amount: i64,
    pub reason: String,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RequisitionDecided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionDecided {
    pub requisition_id: RequisitionId,
    pub decision: Decision,
    pub decided_by: ActorId,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequisitionEvent {
    RequisitionSubmitted(RequisitionSubmitted),
    RequisitionDecided(RequisitionDecided),
}

impl Event for RequisitionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RequisitionEvent::RequisitionSubmitted(_) => "requisitions.requisition.submitted",
            RequisitionEvent::RequisitionDecided(_) => "requisitions.requisition.decided",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RequisitionEvent::RequisitionSubmitted(e) => e.occurred_at,
            RequisitionEvent::RequisitionDecided(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Requisition {
    type Command = RequisitionCommand;
    type Event = RequisitionEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            RequisitionEvent::RequisitionSubmitted(e) => {
                self.id = e.requisition_id;
                self.requested_by = Some(e.requested_by);
                self.amount = e.amount;
                self.reason = e.reason.clone();
                self.category = e.category.clone();
                self.status = RequisitionStatus::Pending;
                self.submitted_at = Some(e.occurred_at);
                self.created = true;
            }
            RequisitionEvent::RequisitionDecided(e) => {
                self.status = e.decision.status();
                self.decided_by = Some(e.decided_by);
                self.decision_note = e.note.clone();
                self.decided_at = Some(e.occurred_at);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            RequisitionCommand::Submit(cmd) => self.handle_submit(cmd),
            RequisitionCommand::Decide(cmd) => self.handle_decide(cmd),
        }
    }
}

impl Requisition {
    fn handle_submit(&self, cmd: &Submit) -> Result<Vec<RequisitionEvent>, DomainError> {
        if self.created {
            return Err(DomainError::state_conflict("requisition already exists"));
        }
        if cmd.amount <= 0 {
            return Err(DomainError::validation("requisition amount must be positive"));
        }
        if cmd.reason.trim().is_empty() {
            return Err(DomainError::validation("requisition reason cannot be empty"));
        }
        if cmd.category.trim().is_empty() {
            return Err(DomainError::validation("requisition category cannot be empty"));
        }

        Ok(vec![RequisitionEvent::RequisitionSubmitted(RequisitionSubmitted {
            requisition_id: cmd.requisition_id,
            requested_by: cmd.requested_by,
            amount: cmd.amount,
            reason: cmd.reason.trim().to_string(),
            category: cmd.category.trim().to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_decide(&self, cmd: &Decide) -> Result<Vec<RequisitionEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("requisition {}", cmd.requisition_id)));
        }
        if self.id != cmd.requisition_id {
            return Err(DomainError::invariant("requisition_id mismatch"));
        }
        if self.status != RequisitionStatus::Pending {
            return Err(DomainError::state_conflict(format!(
                "requisition already {}",
                self.status
            )));
        }

        Ok(vec![RequisitionEvent::RequisitionDecided(RequisitionDecided {
            requisition_id: cmd.requisition_id,
            decision: cmd.decision,
            decided_by: cmd.decided_by,
            note: cmd.note.clone().filter(|n| !n.trim().is_empty()),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use tradeledger_events::execute;
    use tradeledger_ledger::TransactionKind;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 10, 10, 0, 0).unwrap()
    }

    fn submitted(amount: i64) -> Requisition {
        let id = RequisitionId::new(AggregateId::new());
        let mut req = Requisition::empty(id);
        execute(
            &mut req,
            &RequisitionCommand::Submit(Submit {
                requisition_id: id,
                requested_by: ActorId::new(),
                amount,
                reason: "Fuel for delivery truck".to_string(),
                category: "Transport".to_string(),
                occurred_at: test_time(),
            }),
        )
        .unwrap();
        req
    }

    fn decide(req: &Requisition, decision: Decision) -> RequisitionCommand {
        RequisitionCommand::Decide(Decide {
            requisition_id: req.id_typed(),
            decision,
            decided_by: ActorId::new(),
            note: Some("ok".to_string()),
            occurred_at: test_time(),
        })
    }

    #[test]
    fn submit_starts_pending() {
        let req = submitted(300);
        assert_eq!(req.status(), RequisitionStatus::Pending);
        assert_eq!(req.amount(), 300);
        assert_eq!(req.version(), 1);
    }

    #[test]
    fn approve_is_terminal_and_records_decider() {
        let mut req = submitted(300);
        let cmd = decide(&req, Decision::Approved);
        execute(&mut req, &cmd).unwrap();

        assert_eq!(req.status(), RequisitionStatus::Approved);
        assert!(req.status().is_terminal());
        assert!(req.decided_by().is_some());
        assert_eq!(req.decision_note(), Some("ok"));

        let cmd = decide(&req, Decision::Rejected);

        let err = execute(&mut req, &cmd).unwrap_err();
        assert!(matches!(err, DomainError::StateConflict(_)));
        assert_eq!(req.status(), RequisitionStatus::Approved);
    }

    #[test]
    fn rejected_cannot_be_approved_later() {
        let mut req = submitted(300);
        let cmd = decide(&req, Decision::Rejected);
        execute(&mut req, &cmd).unwrap();
        assert!(matches!(
            req.handle(&decide(&req, Decision::Approved)),
            Err(DomainError::StateConflict(_))
        ));
    }

    #[test]
    fn approval_expense_uses_requisition_category() {
        let req = submitted(300);
        let draft = req.approval_expense(PaymentMethod::Cash, test_time());
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.amount, 300);
        assert_eq!(draft.category, "Transport");
        assert_eq!(draft.reference.as_deref(), Some(req.id_typed().to_string().as_str()));
    }

    #[test]
    fn submit_validates_input() {
        let id = RequisitionId::new(AggregateId::new());
        let req = Requisition::empty(id);
        let cmd = |amount: i64, reason: &str| {
            RequisitionCommand::Submit(Submit {
                requisition_id: id,
                requested_by: ActorId::new(),
                amount,
                reason: reason.to_string(),
                category: "Office".to_string(),
                occurred_at: test_time(),
            })
        };
        assert!(matches!(req.handle(&cmd(0, "paper")), Err(DomainError::Validation(_))));
        assert!(matches!(req.handle(&cmd(10, " ")), Err(DomainError::Validation(_))));
    }

    #[test]
    fn deciding_unknown_requisition_is_not_found() {
        let req = Requisition::empty(RequisitionId::new(AggregateId::new()));
        assert!(matches!(
            req.handle(&decide(&req, Decision::Approved)),
            Err(DomainError::NotFound(_))
        ));
    }

    proptest! {
        /// Property: only the first decision ever lands.
        #[test]
        fn only_first_decision_applies(decisions in prop::collection::vec(any::<bool>(), 1..10)) {
            let mut req = submitted(50);
            let first = if decisions[0] { Decision::Approved } else { Decision::Rejected };
            for approve in decisions {
                let d = if approve { Decision::Approved } else { Decision::Rejected };
                let cmd = decide(&req, d);
                let _ = execute(&mut req, &cmd);
            }
            prop_assert_eq!(req.status(), first.status());
            prop_assert_eq!(req.version(), 2);
        }
    }
}
