use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. "payroll.pay"). The wildcard `"*"`
/// grants everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const ALL: Permission = Permission(Cow::Borrowed("*"));
    pub const DOCUMENTS_CREATE: Permission = Permission(Cow::Borrowed("documents.create"));
    pub const DOCUMENTS_UPDATE: Permission = Permission(Cow::Borrowed("documents.update"));
    pub const PAYMENTS_RECORD: Permission = Permission(Cow::Borrowed("payments.record"));
    pub const SALES_APPROVE: Permission = Permission(Cow::Borrowed("sales.approve"));
    pub const INVENTORY_RECORD: Permission = Permission(Cow::Borrowed("inventory.record"));
    pub const PAYROLL_PAY: Permission = Permission(Cow::Borrowed("payroll.pay"));
    pub const STAFF_MANAGE: Permission = Permission(Cow::Borrowed("staff.manage"));
    pub const REQUISITIONS_SUBMIT: Permission = Permission(Cow::Borrowed("requisitions.submit"));
    pub const REQUISITIONS_DECIDE: Permission = Permission(Cow::Borrowed("requisitions.decide"));
    pub const LEDGER_RECORD: Permission = Permission(Cow::Borrowed("ledger.record"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
