//! `tradeledger-auth`: actor identity and permission checks.
//!
//! Sessions and login live in the host application. The engine only receives
//! an [`Actor`] (id, roles, permissions) and asks [`authorize`] whether a
//! command may proceed.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, AuthzError};
pub use permissions::Permission;
pub use principal::{Actor, ActorId};
pub use roles::Role;
