use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_core::{Aggregate, AggregateId, AggregateRoot, DomainError};
use tradeledger_events::Event;

use crate::record::RecordId;

/// Stock lot identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(pub AggregateId);

impl LotId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for LotId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: StockLot.
///
/// A finite quantity of one product. `available` never goes negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLot {
    id: LotId,
    product: String,
    unit: String,
    source: Option<RecordId>,
    initial_quantity: i64,
    available: i64,
    version: u64,
    created: bool,
}

impl StockLot {
    /// Create an empty, not-yet-opened aggregate instance.
    pub fn empty(id: LotId) -> Self {
        Self {
            id,
            product: String::new(),
            unit: String::new(),
            source: None,
            initial_quantity: 0,
            available: 0,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> LotId {
        self.id
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Record that opened this lot, if any.
    pub fn source(&self) -> Option<RecordId> {
        self.source
    }

    pub fn initial_quantity(&self) -> i64 {
        self.initial_quantity
    }

    pub fn available(&self) -> i64 {
        self.available
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for StockLot {
    type Id = LotId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: OpenLot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLot {
    pub lot_id: LotId,
    pub product: String,
    pub unit: String,
    pub quantity: i64,
    pub source: Option<RecordId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Allocate (draw stock down for a sale document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocate {
    pub lot_id: LotId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LotCommand {
    Open(OpenLot),
    Allocate(Allocate),
}

/// Event: LotOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotOpened {
    pub lot_id: LotId,
    pub product: String,
    pub unit: String,
    pub quantity: i64,
    pub source: Option<RecordId>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAllocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAllocated {
    pub lot_id: LotId,
    pub quantity: i64,
    pub remaining: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LotEvent {
    LotOpened(LotOpened),
    StockAllocated(StockAllocated),
}

impl Event for LotEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LotEvent::LotOpened(_) => "inventory.lot.opened",
            LotEvent::StockAllocated(_) => "inventory.lot.stock_allocated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LotEvent::LotOpened(e) => e.occurred_at,
            LotEvent::StockAllocated(e) => e.occurred_at,
        }
    }
}

impl Aggregate for StockLot {
    type Command = LotCommand;
    type Event = LotEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LotEvent::LotOpened(e) => {
                self.id = e.lot_id;
                self.product = e.product.clone();
                self.unit = e.unit.clone();
                self.source = e.source;
                self.initial_quantity = e.quantity;
                self.available = e.quantity;
                self.created = true;
            }
            LotEvent::StockAllocated(e) => {
                self.available = e.remaining;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LotCommand::Open(cmd) => self.handle_open(cmd),
            LotCommand::Allocate(cmd) => self.handle_allocate(cmd),
        }
    }
}

impl StockLot {
    fn handle_open(&self, cmd: &OpenLot) -> Result<Vec<LotEvent>, DomainError> {
        if self.created {
            return Err(DomainError::state_conflict("lot already exists"));
        }
        if cmd.product.trim().is_empty() {
            return Err(DomainError::validation("product cannot be empty"));
        }
        if cmd.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }
        if cmd.quantity <= 0 {
            return Err(DomainError::validation("lot quantity must be positive"));
        }

        Ok(vec![LotEvent::LotOpened(LotOpened {
            lot_id: cmd.lot_id,
            product: cmd.product.trim().to_string(),
            unit: cmd.unit.trim().to_string(),
            quantity: cmd.quantity,
            source: cmd.source,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_allocate(&self, cmd: &Allocate) -> Result<Vec<LotEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("stock lot {}", cmd.lot_id)));
        }
        if self.id != cmd.lot_id {
            return Err(DomainError::invariant("lot_id mismatch"));
        }
        if cmd.quantity <= 0 {
            return Err(DomainError::validation("allocated quantity must be positive"));
        }
        if cmd.quantity > self.available {
            return Err(DomainError::insufficient_stock(cmd.quantity, self.available));
        }

        Ok(vec![LotEvent::StockAllocated(StockAllocated {
            lot_id: cmd.lot_id,
            quantity: cmd.quantity,
            remaining: self.available - cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use tradeledger_events::execute;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 7, 30, 0).unwrap()
    }

    fn open_lot(quantity: i64) -> StockLot {
        let id = LotId::new(AggregateId::new());
        let mut lot = StockLot::empty(id);
        execute(
            &mut lot,
            &LotCommand::Open(OpenLot {
                lot_id: id,
                product: "Green coffee".to_string(),
                unit: "kg".to_string(),
                quantity,
                source: None,
                occurred_at: test_time(),
            }),
        )
        .unwrap();
        lot
    }

    fn allocate(lot: &StockLot, quantity: i64) -> LotCommand {
        LotCommand::Allocate(Allocate {
            lot_id: lot.id_typed(),
            quantity,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn open_sets_available_quantity() {
        let lot = open_lot(500);
        assert_eq!(lot.available(), 500);
        assert_eq!(lot.initial_quantity(), 500);
        assert_eq!(lot.unit(), "kg");
        assert_eq!(lot.version(), 1);
    }

    #[test]
    fn allocation_decrements_stock() {
        let mut lot = open_lot(500);
        let cmd = allocate(&lot, 200);
        execute(&mut lot, &cmd).unwrap();
        assert_eq!(lot.available(), 300);
        let cmd = allocate(&lot, 300);
        execute(&mut lot, &cmd).unwrap();
        assert_eq!(lot.available(), 0);
    }

    #[test]
    fn over_allocation_reports_insufficient_stock() {
        let mut lot = open_lot(500);
        let before = lot.clone();

        let cmd = allocate(&lot, 600);

        let err = execute(&mut lot, &cmd).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                requested: 600,
                available: 500
            }
        );
        assert_eq!(lot, before);
    }

    #[test]
    fn allocating_from_unopened_lot_is_not_found() {
        let lot = StockLot::empty(LotId::new(AggregateId::new()));
        assert!(matches!(
            lot.handle(&allocate(&lot, 1)),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn open_rejects_non_positive_quantity() {
        let id = LotId::new(AggregateId::new());
        let lot = StockLot::empty(id);
        let cmd = LotCommand::Open(OpenLot {
            lot_id: id,
            product: "Maize".to_string(),
            unit: "bags".to_string(),
            quantity: 0,
            source: None,
            occurred_at: test_time(),
        });
        assert!(matches!(lot.handle(&cmd), Err(DomainError::Validation(_))));
    }

    proptest! {
        /// Property: no sequence of allocations drives the lot negative.
        #[test]
        fn available_never_negative(
            initial in 1i64..10_000i64,
            requests in prop::collection::vec(-100i64..3_000i64, 0..40)
        ) {
            let mut lot = open_lot(initial);
            let mut allocated = 0i64;
            for qty in requests {
                let cmd = allocate(&lot, qty);
                if execute(&mut lot, &cmd).is_ok() {
                    allocated += qty;
                }
                prop_assert!(lot.available() >= 0);
                prop_assert_eq!(lot.available(), initial - allocated);
            }
        }
    }
}
