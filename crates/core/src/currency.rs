//! Currency code + pure amount formatter for report/UI consumers.
//!
//! Amounts are stored currency-agnostic, in the smallest currency unit; the
//! owning account carries a single `CurrencyCode`. Formatting never happens
//! inside the ledger itself.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// ISO 4217 currency code (upper-cased, three letters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Result<Self, DomainError> {
        let code = code.as_ref().trim().to_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation(format!(
                "currency code must be three letters, got '{code}'"
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of minor-unit digits (cents) for this currency.
    pub fn minor_digits(&self) -> u32 {
        match self.as_str() {
            "JPY" | "KRW" | "UGX" | "RWF" | "VND" => 0,
            _ => 2,
        }
    }

    fn symbol(&self) -> Option<&'static str> {
        match self.as_str() {
            "USD" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "INR" => Some("₹"),
            "JPY" => Some("¥"),
            "KES" => Some("KSh "),
            "UGX" => Some("USh "),
            "ETB" => Some("Br "),
            _ => None,
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self("USD".to_string())
    }
}

impl ValueObject for CurrencyCode {}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl core::str::FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Format an amount given in minor units, e.g. `format_amount(1_800_000, USD)`
/// yields `"$18,000.00"`.
///
/// Negative amounts get a leading minus before the symbol.
pub fn format_amount(amount: i64, currency: &CurrencyCode) -> String {
    let digits = currency.minor_digits();
    let scale = 10u128.pow(digits);
    let magnitude = (amount as i128).unsigned_abs();
    let whole = magnitude / scale;
    let fraction = magnitude % scale;

    let mut out = String::new();
    if amount < 0 {
        out.push('-');
    }
    match currency.symbol() {
        Some(symbol) => out.push_str(symbol),
        None => {
            out.push_str(currency.as_str());
            out.push(' ');
        }
    }
    out.push_str(&group_thousands(whole));
    if digits > 0 {
        out.push('.');
        out.push_str(&format!("{:0width$}", fraction, width = digits as usize));
    }
    out
}

fn group_thousands(value: u128) -> String {
    let raw = value.to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (idx, ch) in raw.chars().enumerate() {
        if idx > 0 && (raw.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
