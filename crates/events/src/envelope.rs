use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tradeledger_core::AggregateId;

/// Envelope for one committed command, as seen by commit subscribers.
///
/// Notes:
/// - `commit_sequence` is monotonically increasing across the whole engine,
///   so a mirror can detect gaps and duplicates.
/// - `payload` is whatever the publisher attaches (the engine uses a JSON
///   description of the domain events and the appended transaction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    commit_sequence: u64,

    aggregate_id: AggregateId,
    aggregate_type: String,

    committed_at: DateTime<Utc>,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        commit_sequence: u64,
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        committed_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            commit_sequence,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            committed_at,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn commit_sequence(&self) -> u64 {
        self.commit_sequence
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
