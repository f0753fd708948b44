/// Execute an aggregate command deterministically (no IO, no locking).
///
/// 1. **Decide**: `aggregate.handle(command)` produces events without mutating.
/// 2. **Evolve**: each event is applied via `aggregate.apply(event)`.
///
/// If `handle` fails nothing is applied, so the aggregate is left exactly as
/// it was. The engine uses the two halves separately because it must also
/// check the ledger and other aggregates before applying anything; this helper
/// is for tests and single-aggregate flows.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: tradeledger_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
