use thiserror::Error;

use tradeledger_core::DomainError;

/// Errors surfaced by the engine service.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A business rule rejected the command; nothing was changed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A thread panicked while holding the state lock.
    #[error("engine state lock poisoned")]
    Poisoned,

    /// A domain event could not be encoded for the commit notification.
    #[error("failed to encode commit payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl EngineError {
    /// The underlying domain error, if this is one.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
