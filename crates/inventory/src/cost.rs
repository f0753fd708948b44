use serde::{Deserialize, Serialize};

use tradeledger_core::{DomainError, DomainResult, ValueObject};

/// Optional cost information attached to an acquisition or production record.
///
/// Amounts are in smallest currency unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostInfo {
    pub unit_cost: Option<i64>,
    pub total_cost: Option<i64>,
}

impl CostInfo {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn unit(unit_cost: i64) -> Self {
        Self {
            unit_cost: Some(unit_cost),
            total_cost: None,
        }
    }

    pub fn total(total_cost: i64) -> Self {
        Self {
            unit_cost: None,
            total_cost: Some(total_cost),
        }
    }

    /// Resolve the cost for `quantity` units.
    ///
    /// An explicit total wins over `unit_cost * quantity`. `Ok(None)` means
    /// there is nothing to book (no cost given, or a cost of zero).
    pub fn resolve(&self, quantity: i64) -> DomainResult<Option<i64>> {
        if self.unit_cost.is_some_and(|c| c < 0) || self.total_cost.is_some_and(|c| c < 0) {
            return Err(DomainError::validation("cost cannot be negative"));
        }

        let cost = match (self.total_cost, self.unit_cost) {
            (Some(total), _) => total,
            (None, Some(unit)) => unit
                .checked_mul(quantity)
                .ok_or_else(|| DomainError::invariant("cost overflow"))?,
            (None, None) => return Ok(None),
        };

        Ok((cost > 0).then_some(cost))
    }
}

impl ValueObject for CostInfo {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cost_is_multiplied_by_quantity() {
        assert_eq!(CostInfo::unit(2).resolve(500).unwrap(), Some(1_000));
    }

    #[test]
    fn explicit_total_wins() {
        let cost = CostInfo {
            unit_cost: Some(2),
            total_cost: Some(750),
        };
        assert_eq!(cost.resolve(500).unwrap(), Some(750));
    }

    #[test]
    fn absent_or_zero_cost_books_nothing() {
        assert_eq!(CostInfo::none().resolve(500).unwrap(), None);
        assert_eq!(CostInfo::total(0).resolve(500).unwrap(), None);
        assert_eq!(CostInfo::unit(0).resolve(500).unwrap(), None);
    }

    #[test]
    fn negative_cost_is_rejected() {
        assert!(matches!(
            CostInfo::unit(-1).resolve(10),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            CostInfo::total(-1).resolve(10),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn overflow_is_an_invariant_error() {
        assert!(matches!(
            CostInfo::unit(i64::MAX).resolve(2),
            Err(DomainError::InvariantViolation(_))
        ));
    }
}
