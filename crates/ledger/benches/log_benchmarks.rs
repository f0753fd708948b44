use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tradeledger_ledger::{HistoryFilter, PaymentMethod, TransactionDraft, TransactionKind, TransactionLog};

fn seeded_log(n: usize) -> TransactionLog {
    let mut log = TransactionLog::new();
    let now = Utc::now();
    for i in 0..n {
        let draft = if i % 3 == 0 {
            TransactionDraft::expense("Payroll", 100 + i as i64, PaymentMethod::Cash, now)
        } else {
            TransactionDraft::income("Export Sales", 250 + i as i64, PaymentMethod::BankTransfer, now)
        };
        log.append(draft).unwrap();
    }
    log
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("ledger_append_1000", |b| {
        b.iter(|| black_box(seeded_log(1_000)).len())
    });
}

fn bench_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_balance");
    for size in [1_000usize, 10_000] {
        let log = seeded_log(size);
        group.bench_with_input(BenchmarkId::new("incremental", size), &log, |b, log| {
            b.iter(|| black_box(log.balance()))
        });
        group.bench_with_input(BenchmarkId::new("fold", size), &log, |b, log| {
            b.iter(|| black_box(log.recompute_balance()))
        });
    }
    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let log = seeded_log(10_000);
    c.bench_function("ledger_history_expenses_10000", |b| {
        b.iter(|| {
            log.history(HistoryFilter::all().kind(TransactionKind::Expense))
                .map(|tx| tx.amount())
                .sum::<i64>()
        })
    });
}

criterion_group!(benches, bench_append, bench_balance, bench_history);
criterion_main!(benches);
