use std::collections::BTreeMap;

use tradeledger_core::{AggregateId, DomainError, DomainResult};
use tradeledger_ledger::TransactionDraft;

use crate::record::{PayStaff, PayrollRecord, PayrollRecordId};
use crate::staff::{StaffId, StaffMember};

/// Staff registry plus every payroll record, oldest first.
///
/// Mutation is split into a fallible `prepare_*` step that reads only and an
/// infallible `commit_*` step, so a caller can pair it with a ledger append.
#[derive(Debug, Clone, Default)]
pub struct PayrollBook {
    staff: BTreeMap<StaffId, StaffMember>,
    records: Vec<PayrollRecord>,
}

impl PayrollBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with `StateConflict` when `staff_id` is already registered.
    pub fn check_new_staff(&self, staff_id: StaffId) -> DomainResult<()> {
        if self.staff.contains_key(&staff_id) {
            return Err(DomainError::state_conflict(format!(
                "staff member {staff_id} already exists"
            )));
        }
        Ok(())
    }

    /// The member as it would be after toggling `active`; the book is untouched.
    pub fn prepare_activation(&self, staff_id: StaffId, active: bool) -> DomainResult<StaffMember> {
        let mut member = self
            .staff
            .get(&staff_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("staff member {staff_id}")))?;
        member.set_active(active);
        Ok(member)
    }

    /// Store a member checked by `check_new_staff` or built by `prepare_activation`.
    pub fn commit_staff(&mut self, member: StaffMember) {
        self.staff.insert(member.id_typed(), member);
    }

    pub fn insert_staff(&mut self, member: StaffMember) -> DomainResult<()> {
        self.check_new_staff(member.id_typed())?;
        self.commit_staff(member);
        Ok(())
    }

    pub fn set_active(&mut self, staff_id: StaffId, active: bool) -> DomainResult<()> {
        let member = self.prepare_activation(staff_id, active)?;
        self.commit_staff(member);
        Ok(())
    }

    pub fn staff(&self, staff_id: StaffId) -> Option<&StaffMember> {
        self.staff.get(&staff_id)
    }

    pub fn staff_members(&self) -> impl Iterator<Item = &StaffMember> + '_ {
        self.staff.values()
    }

    pub fn prepare_payment(&self, input: PayStaff) -> DomainResult<(PayrollRecord, TransactionDraft)> {
        let staff = self
            .staff
            .get(&input.staff_id)
            .ok_or_else(|| DomainError::not_found(format!("staff member {}", input.staff_id)))?;
        PayrollRecord::prepare(PayrollRecordId::new(AggregateId::new()), staff, input)
    }

    pub fn commit_payment(&mut self, record: PayrollRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PayrollRecord] {
        &self.records
    }

    pub fn history_for(&self, staff_id: StaffId) -> impl Iterator<Item = &PayrollRecord> + Clone + '_ {
        self.records.iter().filter(move |r| r.staff_id() == staff_id)
    }

    pub fn total_for_period(&self, period: &str) -> i128 {
        self.records
            .iter()
            .filter(|r| r.period() == period.trim())
            .map(|r| r.amount() as i128)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PAYROLL_CATEGORY;
    use crate::staff::RegisterStaff;
    use chrono::{DateTime, TimeZone, Utc};
    use tradeledger_ledger::{PaymentMethod, TransactionKind};

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 31, 17, 0, 0).unwrap()
    }

    fn book_with_staff() -> (PayrollBook, StaffId) {
        let mut book = PayrollBook::new();
        let id = StaffId::new(AggregateId::new());
        let member = StaffMember::register(
            id,
            RegisterStaff {
                name: "Amina Otieno".to_string(),
                role_title: "Warehouse lead".to_string(),
                occurred_at: test_time(),
            },
        )
        .unwrap();
        book.insert_staff(member).unwrap();
        (book, id)
    }

    fn pay(staff_id: StaffId, amount: i64, period: &str) -> PayStaff {
        PayStaff {
            staff_id,
            amount,
            period: period.to_string(),
            method: PaymentMethod::MobileMoney,
            occurred_at: test_time(),
        }
    }

    #[test]
    fn payment_yields_record_and_payroll_expense() {
        let (mut book, staff_id) = book_with_staff();

        let (record, draft) = book.prepare_payment(pay(staff_id, 45_000, "2024-05")).unwrap();
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.category, PAYROLL_CATEGORY);
        assert_eq!(draft.amount, 45_000);
        assert_eq!(draft.reference.as_deref(), Some(record.id_typed().to_string().as_str()));

        book.commit_payment(record);
        assert_eq!(book.history_for(staff_id).count(), 1);
        assert_eq!(book.total_for_period("2024-05"), 45_000);
        assert_eq!(book.total_for_period("2024-06"), 0);
    }

    #[test]
    fn invalid_payments_are_rejected() {
        let (book, staff_id) = book_with_staff();

        assert!(matches!(
            book.prepare_payment(pay(staff_id, 0, "2024-05")),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            book.prepare_payment(pay(staff_id, 100, "  ")),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            book.prepare_payment(pay(StaffId::new(AggregateId::new()), 100, "2024-05")),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn inactive_staff_cannot_be_paid() {
        let (mut book, staff_id) = book_with_staff();
        book.set_active(staff_id, false).unwrap();

        assert!(matches!(
            book.prepare_payment(pay(staff_id, 100, "2024-05")),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn duplicate_staff_is_a_conflict() {
        let (mut book, staff_id) = book_with_staff();
        let again = book.staff(staff_id).cloned().unwrap();
        assert!(matches!(book.insert_staff(again), Err(DomainError::StateConflict(_))));
    }

    #[test]
    fn activation_is_prepared_without_touching_the_book() {
        let (mut book, staff_id) = book_with_staff();

        let inactive = book.prepare_activation(staff_id, false).unwrap();
        assert!(!inactive.is_active());
        assert!(book.staff(staff_id).unwrap().is_active());

        book.commit_staff(inactive);
        assert!(!book.staff(staff_id).unwrap().is_active());
        assert!(matches!(
            book.prepare_activation(StaffId::new(AggregateId::new()), true),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn new_staff_check_rejects_registered_ids() {
        let (book, staff_id) = book_with_staff();
        assert!(matches!(book.check_new_staff(staff_id), Err(DomainError::StateConflict(_))));
        assert!(book.check_new_staff(StaffId::new(AggregateId::new())).is_ok());
    }
}
