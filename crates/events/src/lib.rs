//! Domain events and commit notifications.
//!
//! Aggregates emit typed [`Event`]s. After the engine commits a command it
//! wraps what happened in an [`EventEnvelope`] and publishes it on an
//! [`EventBus`] so that out-of-process mirrors can replicate asynchronously.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
