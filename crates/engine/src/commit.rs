//! The atomic commit primitive and the notification it produces.
//!
//! Every command is decided against unmodified state into a [`PendingCommit`]
//! (next aggregate state, encoded events, at most one transaction draft).
//! [`EngineState::commit`] then appends the transaction first, the only
//! fallible step, and only after that swaps in the new aggregate state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use tradeledger_core::{AggregateId, TransactionId};
use tradeledger_events::{Event, EventEnvelope};
use tradeledger_ledger::{Transaction, TransactionDraft};

use crate::error::EngineResult;
use crate::state::EngineState;

/// Notification published after every successful command.
pub type CommitEnvelope = EventEnvelope<CommitPayload>;

/// One domain event, as carried in a commit notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub event_type: String,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
    pub data: JsonValue,
}

impl RecordedEvent {
    pub fn encode<E: Event + Serialize>(event: &E) -> EngineResult<Self> {
        Ok(Self {
            event_type: event.event_type().to_string(),
            version: event.version(),
            occurred_at: event.occurred_at(),
            data: serde_json::to_value(event)?,
        })
    }
}

/// What a mirror needs to replicate one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitPayload {
    pub operation: String,
    pub events: Vec<RecordedEvent>,
    pub transaction: Option<Transaction>,
    pub balance: i128,
}

/// A fully validated command waiting to be applied.
pub(crate) struct PendingCommit<T, M> {
    operation: &'static str,
    aggregate_type: &'static str,
    aggregate_id: AggregateId,
    events: Vec<RecordedEvent>,
    transaction: Option<(TransactionId, TransactionDraft)>,
    output: T,
    apply: M,
}

impl<T, M> PendingCommit<T, M>
where
    M: FnOnce(&mut EngineState),
{
    pub(crate) fn new(
        operation: &'static str,
        aggregate_type: &'static str,
        aggregate_id: AggregateId,
        output: T,
        apply: M,
    ) -> Self {
        Self {
            operation,
            aggregate_type,
            aggregate_id,
            events: Vec::new(),
            transaction: None,
            output,
            apply,
        }
    }

    pub(crate) fn with_events<E: Event + Serialize>(mut self, events: &[E]) -> EngineResult<Self> {
        for event in events {
            self.events.push(RecordedEvent::encode(event)?);
        }
        Ok(self)
    }

    pub(crate) fn with_transaction(mut self, id: TransactionId, draft: TransactionDraft) -> Self {
        self.transaction = Some((id, draft));
        self
    }
}

/// Result of a successful commit.
#[derive(Debug)]
pub(crate) struct Committed<T> {
    pub output: T,
    pub transaction: Option<Transaction>,
    pub balance: i128,
    pub envelope: CommitEnvelope,
}

impl EngineState {
    /// Apply `pending` as one unit: all of it or none of it.
    pub(crate) fn commit<T, M>(&mut self, pending: PendingCommit<T, M>) -> EngineResult<Committed<T>>
    where
        M: FnOnce(&mut EngineState),
    {
        let PendingCommit {
            operation,
            aggregate_type,
            aggregate_id,
            events,
            transaction,
            output,
            apply,
        } = pending;

        let transaction = match transaction {
            Some((id, draft)) => Some(self.ledger.append_as(id, draft)?.0),
            None => None,
        };
        apply(self);

        self.commit_sequence += 1;
        let balance = self.ledger.balance();
        let envelope = EventEnvelope::new(
            Uuid::now_v7(),
            self.commit_sequence,
            aggregate_id,
            aggregate_type,
            Utc::now(),
            CommitPayload {
                operation: operation.to_string(),
                events,
                transaction: transaction.clone(),
                balance,
            },
        );

        Ok(Committed {
            output,
            transaction,
            balance,
            envelope,
        })
    }
}
