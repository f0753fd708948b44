//! Inventory domain module.
//!
//! Stock lots (finite quantities that sale documents draw down) and the
//! cost-linked acquisition / production records that open them. Pure domain
//! logic: no IO, no storage.

pub mod cost;
pub mod lot;
pub mod record;

pub use cost::CostInfo;
pub use lot::{
    Allocate, LotCommand, LotEvent, LotId, LotOpened, OpenLot, StockAllocated, StockLot,
};
pub use record::{CostRecord, NewCostRecord, RecordId, RecordKind};
