use std::collections::BTreeMap;

use tradeledger_core::CurrencyCode;
use tradeledger_inventory::{CostRecord, LotId, StockLot};
use tradeledger_ledger::TransactionLog;
use tradeledger_payroll::PayrollBook;
use tradeledger_requisitions::{Requisition, RequisitionId};
use tradeledger_settlement::{DocumentId, SettlementDocument};

/// Everything the engine owns. Only ever touched under the engine's lock.
#[derive(Debug, Clone)]
pub(crate) struct EngineState {
    pub(crate) currency: CurrencyCode,
    pub(crate) ledger: TransactionLog,
    pub(crate) documents: BTreeMap<DocumentId, SettlementDocument>,
    pub(crate) lots: BTreeMap<LotId, StockLot>,
    pub(crate) cost_records: Vec<CostRecord>,
    pub(crate) payroll: PayrollBook,
    pub(crate) requisitions: BTreeMap<RequisitionId, Requisition>,
    pub(crate) commit_sequence: u64,
}

impl EngineState {
    pub(crate) fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            ledger: TransactionLog::new(),
            documents: BTreeMap::new(),
            lots: BTreeMap::new(),
            cost_records: Vec::new(),
            payroll: PayrollBook::new(),
            requisitions: BTreeMap::new(),
            commit_sequence: 0,
        }
    }
}
