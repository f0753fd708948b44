//! `tradeledger [script.json]`
//!
//! Builds an engine from `TRADELEDGER_*` environment variables, replays the
//! optional JSON command script, and prints the resulting ledger snapshot.

use std::fs;

use anyhow::Context;

use tradeledger_engine::{EngineConfig, ScriptEntry, ScriptRunner, SettlementEngine};

fn main() -> anyhow::Result<()> {
    tradeledger_observability::init();

    let config = EngineConfig::from_env().context("invalid engine configuration")?;
    tracing::info!(
        account = %config.account_name,
        currency = %config.currency.as_str(),
        "starting engine"
    );
    let engine = SettlementEngine::new(config)?;

    if let Some(path) = std::env::args().nth(1) {
        let raw = fs::read_to_string(&path).with_context(|| format!("failed to read script {path}"))?;
        let entries: Vec<ScriptEntry> =
            serde_json::from_str(&raw).with_context(|| format!("failed to parse script {path}"))?;
        let applied = ScriptRunner::new(&engine).run_all(entries)?;
        tracing::info!(steps = applied, script = %path, "script replayed");
    }

    let snapshot = engine.ledger_snapshot()?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
