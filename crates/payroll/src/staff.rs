use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_core::{AggregateId, DomainError, DomainResult, Entity};

/// Staff member identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(pub AggregateId);

impl StaffId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for StaffId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Input for registering a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterStaff {
    pub name: String,
    pub role_title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    id: StaffId,
    name: String,
    role_title: String,
    active: bool,
    registered_at: DateTime<Utc>,
}

impl StaffMember {
    pub fn register(id: StaffId, input: RegisterStaff) -> DomainResult<Self> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("staff name cannot be empty"));
        }
        Ok(Self {
            id,
            name: input.name.trim().to_string(),
            role_title: input.role_title.trim().to_string(),
            active: true,
            registered_at: input.occurred_at,
        })
    }

    pub fn id_typed(&self) -> StaffId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role_title(&self) -> &str {
        &self.role_title
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Entity for StaffMember {
    type Id = StaffId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
