//! Commit notifications published on the engine's bus.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{admin, export_18000, payment};

use tradeledger_engine::{CommitEnvelope, EngineConfig, SettlementEngine};
use tradeledger_events::{EventBus, InMemoryEventBus, Subscription};

#[test]
fn every_commit_is_announced_in_order() {
    let engine = common::engine();
    let sub = engine.subscribe();
    let admin = admin();

    let doc = export_18000(&engine, &admin);
    engine.record_payment(&admin, payment(doc.id, 9_000)).unwrap();
    engine.record_payment(&admin, payment(doc.id, 9_000)).unwrap();

    let envelopes = sub.drain();
    assert_eq!(envelopes.len(), 3);
    let sequences: Vec<u64> = envelopes.iter().map(CommitEnvelope::commit_sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    let created = &envelopes[0];
    assert_eq!(created.aggregate_type(), "settlement.document");
    assert_eq!(created.aggregate_id(), doc.id.0);
    assert_eq!(created.payload().operation, "create_document");
    assert_eq!(created.payload().events[0].event_type, "settlement.document.created");
    assert!(created.payload().transaction.is_none());

    let paid = envelopes[2].payload();
    assert_eq!(paid.operation, "record_payment");
    assert_eq!(paid.transaction.as_ref().map(|tx| tx.amount()), Some(9_000));
    assert_eq!(paid.balance, 18_000);
}

#[test]
fn failed_commands_publish_nothing() {
    let engine = common::engine();
    let admin = admin();
    let doc = export_18000(&engine, &admin);
    let sub = engine.subscribe();

    assert!(engine.record_payment(&admin, payment(doc.id, 20_000)).is_err());
    assert!(sub.try_recv().is_err());
}

#[test]
fn background_mirror_receives_commits() {
    let bus: Arc<InMemoryEventBus<CommitEnvelope>> = Arc::new(InMemoryEventBus::new());
    let engine = SettlementEngine::with_bus(EngineConfig::default(), bus.clone()).unwrap();

    let sub: Subscription<CommitEnvelope> = bus.subscribe();
    let (done_tx, done_rx) = std::sync::mpsc::channel::<Vec<u64>>();
    let mirror = std::thread::spawn(move || {
        let mut seen = Vec::new();
        while let Ok(envelope) = sub.recv_timeout(Duration::from_secs(2)) {
            seen.push(envelope.commit_sequence());
            if seen.len() == 2 {
                break;
            }
        }
        let _ = done_tx.send(seen);
    });

    let admin = admin();
    let doc = engine
        .create_document(
            &admin,
            common::new_document(
                tradeledger_settlement::DocumentKind::Export,
                vec![tradeledger_settlement::LineItem::new("Tea, CTC grade", 100, 50)],
                None,
            ),
        )
        .unwrap();
    engine.record_payment(&admin, payment(doc.id, 1_000)).unwrap();

    let seen = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    mirror.join().unwrap();
    assert_eq!(seen, vec![1, 2]);
}

/// A bus whose publish always fails.
struct BrokenBus;

impl EventBus<CommitEnvelope> for BrokenBus {
    type Error = &'static str;

    fn publish(&self, _message: CommitEnvelope) -> Result<(), Self::Error> {
        Err("mirror offline")
    }

    fn subscribe(&self) -> Subscription<CommitEnvelope> {
        let (_tx, rx) = std::sync::mpsc::channel();
        Subscription::new(rx)
    }
}

#[test]
fn publish_failure_never_rolls_back_a_commit() {
    let engine = SettlementEngine::with_bus(EngineConfig::default(), BrokenBus).unwrap();
    let admin = admin();

    let doc = engine
        .create_document(
            &admin,
            common::new_document(
                tradeledger_settlement::DocumentKind::Export,
                vec![tradeledger_settlement::LineItem::new("Cashew", 10, 100)],
                None,
            ),
        )
        .unwrap();
    let receipt = engine.record_payment(&admin, payment(doc.id, 400)).unwrap();

    assert_eq!(receipt.balance, 400);
    assert_eq!(engine.balance().unwrap(), 400);
    assert_eq!(engine.document(doc.id).unwrap().amount_paid, 400);
}
