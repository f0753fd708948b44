use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role identifier used for RBAC.
///
/// Roles stay opaque strings so the host can introduce new ones; the two the
/// engine knows about are [`Role::ADMIN`] and [`Role::STAFF`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const STAFF: Role = Role(Cow::Borrowed("staff"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str().eq_ignore_ascii_case("admin")
    }

    /// Permissions granted by default to holders of this role.
    pub fn default_permissions(&self) -> Vec<Permission> {
        if self.is_admin() {
            return vec![Permission::ALL];
        }
        if self.as_str().eq_ignore_ascii_case("staff") {
            return vec![
                Permission::DOCUMENTS_CREATE,
                Permission::DOCUMENTS_UPDATE,
                Permission::PAYMENTS_RECORD,
                Permission::INVENTORY_RECORD,
                Permission::REQUISITIONS_SUBMIT,
            ];
        }
        Vec::new()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
