//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every command returns one of these synchronously. Any error means the
/// command was rejected before it touched state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (non-positive amount, missing field, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant would be violated (e.g. overpayment).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A stock allocation asked for more than the lot holds.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    /// A lifecycle status change outside the document kind's transition table.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The target is in a state that no longer accepts the command
    /// (e.g. deciding an already-decided requisition).
    #[error("state conflict: {0}")]
    StateConflict(String),

    /// Unknown document/staff/lot/requisition id.
    #[error("not found: {0}")]
    NotFound(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The acting principal lacks the permission the command requires.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn insufficient_stock(requested: i64, available: i64) -> Self {
        Self::InsufficientStock {
            requested,
            available,
        }
    }

    pub fn invalid_transition(from: impl core::fmt::Display, to: impl core::fmt::Display) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn state_conflict(msg: impl Into<String>) -> Self {
        Self::StateConflict(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Overpayment, insufficient stock and invalid transitions all belong to
    /// the invariant-violation family.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::InvariantViolation(_) | Self::InsufficientStock { .. } | Self::InvalidTransition { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_family_covers_stock_and_transitions() {
        assert!(DomainError::invariant("overpayment").is_invariant_violation());
        assert!(DomainError::insufficient_stock(600, 500).is_invariant_violation());
        assert!(DomainError::invalid_transition("pending", "paid").is_invariant_violation());
        assert!(!DomainError::validation("amount").is_invariant_violation());
        assert!(!DomainError::state_conflict("decided").is_invariant_violation());
    }

    #[test]
    fn messages_carry_detail() {
        let err = DomainError::insufficient_stock(600, 500);
        assert_eq!(err.to_string(), "insufficient stock: requested 600, available 500");

        let err = DomainError::invalid_transition("in_transit", "pending");
        assert_eq!(err.to_string(), "invalid transition from in_transit to pending");
    }
}
