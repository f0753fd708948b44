#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use tradeledger_auth::{Actor, ActorId};
use tradeledger_engine::{DocumentSnapshot, EngineConfig, NewDocument, SettlementEngine};
use tradeledger_ledger::PaymentMethod;
use tradeledger_settlement::{DocumentId, DocumentKind, LineItem, RecordPayment, StockAllocation};

pub fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap()
}

pub fn engine() -> SettlementEngine {
    SettlementEngine::new(EngineConfig::default()).unwrap()
}

pub fn admin() -> Actor {
    Actor::admin(ActorId::new())
}

pub fn staff() -> Actor {
    Actor::staff(ActorId::new())
}

pub fn new_document(kind: DocumentKind, lines: Vec<LineItem>, allocation: Option<StockAllocation>) -> NewDocument {
    NewDocument {
        kind,
        counterparty: "Hamburg Coffee Importers".to_string(),
        destination: Some("Hamburg".to_string()),
        shipping_reference: Some("MSKU-7781120".to_string()),
        lines,
        allocation,
        occurred_at: at(),
    }
}

/// An export worth 18000 (60 bags at 300).
pub fn export_18000(engine: &SettlementEngine, actor: &Actor) -> DocumentSnapshot {
    engine
        .create_document(
            actor,
            new_document(
                DocumentKind::Export,
                vec![LineItem::new("Arabica AA, 60kg bags", 60, 300)],
                None,
            ),
        )
        .unwrap()
}

pub fn payment(document_id: DocumentId, amount: i64) -> RecordPayment {
    RecordPayment {
        document_id,
        amount,
        method: PaymentMethod::BankTransfer,
        occurred_at: at(),
    }
}
