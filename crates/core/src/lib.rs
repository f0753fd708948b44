//! `tradeledger-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error taxonomy shared by every command, the aggregate
//! decide/apply contract and the currency formatter used by report consumers.

pub mod aggregate;
pub mod currency;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use currency::{format_amount, CurrencyCode};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, TransactionId};
pub use value_object::ValueObject;
