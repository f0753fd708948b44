//! Per-kind lifecycle state machines and the derived payment status.
//!
//! Transition tables:
//!
//! ```text
//! export:     PENDING → IN_TRANSIT → DELIVERED → PAID
//! local sale: PENDING_APPROVAL → ORDERED → RECEIVED
//!             PENDING_APPROVAL → CANCELLED
//!             ORDERED          → CANCELLED
//! ```

use serde::{Deserialize, Serialize};

/// Which kind of settlement document this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// Export shipment to a foreign buyer.
    Export,
    /// Domestic sale order.
    LocalSale,
}

impl DocumentKind {
    /// Ledger category used for payments received against this kind.
    pub fn income_category(self) -> &'static str {
        match self {
            DocumentKind::Export => "Export Sales",
            DocumentKind::LocalSale => "Local Sales",
        }
    }

    /// Status a new document starts in. Staff-raised sale orders wait for
    /// approval; everything else starts in its first working state.
    pub fn initial_status(self, created_by_admin: bool) -> LifecycleStatus {
        match self {
            DocumentKind::Export => LifecycleStatus::Export(ExportStatus::Pending),
            DocumentKind::LocalSale if created_by_admin => {
                LifecycleStatus::LocalSale(SaleOrderStatus::Ordered)
            }
            DocumentKind::LocalSale => LifecycleStatus::LocalSale(SaleOrderStatus::PendingApproval),
        }
    }
}

impl core::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            DocumentKind::Export => "export",
            DocumentKind::LocalSale => "local_sale",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportStatus {
    Pending,
    InTransit,
    Delivered,
    Paid,
}

impl ExportStatus {
    fn next(self) -> &'static [ExportStatus] {
        match self {
            ExportStatus::Pending => &[ExportStatus::InTransit],
            ExportStatus::InTransit => &[ExportStatus::Delivered],
            ExportStatus::Delivered => &[ExportStatus::Paid],
            ExportStatus::Paid => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ExportStatus::Pending => "PENDING",
            ExportStatus::InTransit => "IN_TRANSIT",
            ExportStatus::Delivered => "DELIVERED",
            ExportStatus::Paid => "PAID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleOrderStatus {
    PendingApproval,
    Ordered,
    Received,
    Cancelled,
}

impl SaleOrderStatus {
    fn next(self) -> &'static [SaleOrderStatus] {
        match self {
            SaleOrderStatus::PendingApproval => &[SaleOrderStatus::Ordered, SaleOrderStatus::Cancelled],
            SaleOrderStatus::Ordered => &[SaleOrderStatus::Received, SaleOrderStatus::Cancelled],
            SaleOrderStatus::Received | SaleOrderStatus::Cancelled => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SaleOrderStatus::PendingApproval => "PENDING_APPROVAL",
            SaleOrderStatus::Ordered => "ORDERED",
            SaleOrderStatus::Received => "RECEIVED",
            SaleOrderStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Lifecycle status, tagged by document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStatus {
    Export(ExportStatus),
    LocalSale(SaleOrderStatus),
}

impl LifecycleStatus {
    pub fn kind(&self) -> DocumentKind {
        match self {
            LifecycleStatus::Export(_) => DocumentKind::Export,
            LifecycleStatus::LocalSale(_) => DocumentKind::LocalSale,
        }
    }

    /// Whether `next` is an edge of this kind's transition table.
    ///
    /// Statuses of a different kind and self-transitions are never allowed.
    pub fn can_transition_to(&self, next: LifecycleStatus) -> bool {
        match (self, next) {
            (LifecycleStatus::Export(from), LifecycleStatus::Export(to)) => from.next().contains(&to),
            (LifecycleStatus::LocalSale(from), LifecycleStatus::LocalSale(to)) => {
                from.next().contains(&to)
            }
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            LifecycleStatus::Export(s) => s.next().is_empty(),
            LifecycleStatus::LocalSale(s) => s.next().is_empty(),
        }
    }

    /// Moving a sale order out of `PENDING_APPROVAL` into `ORDERED` is an
    /// approval and needs a privileged actor.
    pub fn is_approval(&self, next: LifecycleStatus) -> bool {
        matches!(
            (self, next),
            (
                LifecycleStatus::LocalSale(SaleOrderStatus::PendingApproval),
                LifecycleStatus::LocalSale(SaleOrderStatus::Ordered)
            )
        )
    }

    /// Status the document moves to automatically once fully paid, if any.
    ///
    /// Only a delivered export settles on payment; an export still on the
    /// water keeps its logistics status.
    pub fn settled_on_full_payment(&self) -> Option<LifecycleStatus> {
        match self {
            LifecycleStatus::Export(ExportStatus::Delivered) => {
                Some(LifecycleStatus::Export(ExportStatus::Paid))
            }
            _ => None,
        }
    }

    /// Settled states: a document may only enter one once fully paid.
    pub fn requires_full_payment(&self) -> bool {
        matches!(self, LifecycleStatus::Export(ExportStatus::Paid))
    }

    /// Documents in these states no longer accept payments.
    pub fn rejects_payments(&self) -> bool {
        matches!(self, LifecycleStatus::LocalSale(SaleOrderStatus::Cancelled))
    }
}

impl core::fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LifecycleStatus::Export(s) => write!(f, "export:{}", s.as_str()),
            LifecycleStatus::LocalSale(s) => write!(f, "local_sale:{}", s.as_str()),
        }
    }
}

/// Payment status, derived purely from amount paid vs. total value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn derive(amount_paid: i64, total_value: i64) -> Self {
        if amount_paid == total_value {
            PaymentStatus::Paid
        } else if amount_paid > 0 && amount_paid < total_value {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_table_is_linear() {
        let pending = LifecycleStatus::Export(ExportStatus::Pending);
        assert!(pending.can_transition_to(LifecycleStatus::Export(ExportStatus::InTransit)));
        assert!(!pending.can_transition_to(LifecycleStatus::Export(ExportStatus::Delivered)));
        assert!(!pending.can_transition_to(LifecycleStatus::Export(ExportStatus::Paid)));
        assert!(!pending.can_transition_to(pending));

        let delivered = LifecycleStatus::Export(ExportStatus::Delivered);
        assert!(delivered.can_transition_to(LifecycleStatus::Export(ExportStatus::Paid)));
        assert!(!delivered.can_transition_to(LifecycleStatus::Export(ExportStatus::InTransit)));
        assert!(LifecycleStatus::Export(ExportStatus::Paid).is_terminal());
    }

    #[test]
    fn sale_order_table_branches() {
        let ordered = LifecycleStatus::LocalSale(SaleOrderStatus::Ordered);
        assert!(ordered.can_transition_to(LifecycleStatus::LocalSale(SaleOrderStatus::Received)));
        assert!(ordered.can_transition_to(LifecycleStatus::LocalSale(SaleOrderStatus::Cancelled)));
        assert!(!ordered.can_transition_to(LifecycleStatus::LocalSale(SaleOrderStatus::PendingApproval)));

        let received = LifecycleStatus::LocalSale(SaleOrderStatus::Received);
        assert!(received.is_terminal());
        assert!(!received.can_transition_to(LifecycleStatus::LocalSale(SaleOrderStatus::Cancelled)));
    }

    #[test]
    fn only_paid_export_requires_full_payment() {
        assert!(LifecycleStatus::Export(ExportStatus::Paid).requires_full_payment());
        assert!(!LifecycleStatus::Export(ExportStatus::Delivered).requires_full_payment());
        assert!(!LifecycleStatus::LocalSale(SaleOrderStatus::Received).requires_full_payment());
    }

    #[test]
    fn cross_kind_transitions_are_rejected() {
        let pending = LifecycleStatus::Export(ExportStatus::Pending);
        assert!(!pending.can_transition_to(LifecycleStatus::LocalSale(SaleOrderStatus::Ordered)));
    }

    #[test]
    fn initial_status_depends_on_role_for_sale_orders() {
        assert_eq!(
            DocumentKind::LocalSale.initial_status(false),
            LifecycleStatus::LocalSale(SaleOrderStatus::PendingApproval)
        );
        assert_eq!(
            DocumentKind::LocalSale.initial_status(true),
            LifecycleStatus::LocalSale(SaleOrderStatus::Ordered)
        );
        assert_eq!(
            DocumentKind::Export.initial_status(false),
            LifecycleStatus::Export(ExportStatus::Pending)
        );
    }

    #[test]
    fn payment_status_derivation() {
        assert_eq!(PaymentStatus::derive(0, 18_000), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::derive(9_000, 18_000), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::derive(18_000, 18_000), PaymentStatus::Paid);
    }

    #[test]
    fn lifecycle_status_display_includes_kind() {
        let status = LifecycleStatus::Export(ExportStatus::InTransit);
        assert_eq!(status.to_string(), "export:IN_TRANSIT");
    }
}
