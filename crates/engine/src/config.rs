//! Engine configuration.

use serde::{Deserialize, Serialize};

use tradeledger_core::{CurrencyCode, DomainError, DomainResult};

pub const CURRENCY_ENV: &str = "TRADELEDGER_CURRENCY";
pub const OPENING_CAPITAL_ENV: &str = "TRADELEDGER_OPENING_CAPITAL";
pub const ACCOUNT_NAME_ENV: &str = "TRADELEDGER_ACCOUNT_NAME";

/// Configuration of the single account the engine manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Currency all amounts are denominated in.
    pub currency: CurrencyCode,
    /// Recorded as one INITIAL_CAPITAL transaction when the engine starts.
    pub opening_capital: Option<i64>,
    pub account_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            opening_capital: None,
            account_name: "Main Account".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load from `TRADELEDGER_*` environment variables, falling back to defaults.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (the environment, a map in tests, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DomainResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(CURRENCY_ENV).filter(|v| !v.trim().is_empty()) {
            config.currency = CurrencyCode::new(raw.trim())?;
        }

        if let Some(raw) = lookup(OPENING_CAPITAL_ENV).filter(|v| !v.trim().is_empty()) {
            let amount: i64 = raw.trim().parse().map_err(|_| {
                DomainError::validation(format!("{OPENING_CAPITAL_ENV} must be an integer, got '{raw}'"))
            })?;
            config.opening_capital = Some(amount);
        }

        if let Some(raw) = lookup(ACCOUNT_NAME_ENV).filter(|v| !v.trim().is_empty()) {
            config.account_name = raw.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(amount) = self.opening_capital {
            if amount <= 0 {
                return Err(DomainError::validation("opening capital must be positive"));
            }
        }
        if self.account_name.trim().is_empty() {
            return Err(DomainError::validation("account name cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.currency.as_str(), "USD");
    }

    #[test]
    fn reads_all_variables() {
        let config = EngineConfig::from_lookup(lookup(&[
            (CURRENCY_ENV, "kes"),
            (OPENING_CAPITAL_ENV, "5000000"),
            (ACCOUNT_NAME_ENV, "Kiambu Estate"),
        ]))
        .unwrap();
        assert_eq!(config.currency.as_str(), "KES");
        assert_eq!(config.opening_capital, Some(5_000_000));
        assert_eq!(config.account_name, "Kiambu Estate");
    }

    #[test]
    fn invalid_values_are_validation_errors() {
        for pairs in [
            vec![(OPENING_CAPITAL_ENV, "lots")],
            vec![(OPENING_CAPITAL_ENV, "-5")],
            vec![(CURRENCY_ENV, "dollars")],
        ] {
            assert!(matches!(
                EngineConfig::from_lookup(lookup(&pairs)),
                Err(DomainError::Validation(_))
            ));
        }
    }
}
