//! # Configuration State
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`, `--no-overdraft`)
//! 2. Environment variables (`BIZLEDGER_*`)
//! 3. Defaults (this file)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use bizledger_core::invoice::EngineConfig;
use bizledger_core::Money;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Ledger file. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Commit sales larger than stock (stock goes negative).
    pub allow_overdraft: bool,

    /// Currency symbol for display
    pub currency_symbol: String,

    /// Company name printed on documents
    pub company_name: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            db_path: None,
            allow_overdraft: true,
            currency_symbol: "$".to_string(),
            company_name: "BizLedger".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BIZLEDGER_DB_PATH`: Ledger file path
    /// - `BIZLEDGER_ALLOW_OVERDRAFT`: `true`/`false` (also `1`/`0`, `yes`/`no`)
    /// - `BIZLEDGER_CURRENCY_SYMBOL`: e.g. `₹`
    /// - `BIZLEDGER_COMPANY_NAME`: Name on invoice documents
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("BIZLEDGER_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("BIZLEDGER_ALLOW_OVERDRAFT") {
            match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.allow_overdraft = true,
                "0" | "false" | "no" | "off" => config.allow_overdraft = false,
                other => tracing::warn!(value = other, "Ignoring BIZLEDGER_ALLOW_OVERDRAFT"),
            }
        }

        if let Some(symbol) = lookup("BIZLEDGER_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(name) = lookup("BIZLEDGER_COMPANY_NAME").filter(|n| !n.trim().is_empty()) {
            config.company_name = name;
        }

        config
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default().allow_overdraft(self.allow_overdraft)
    }

    /// Formats an amount with the configured symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        amount.display_with_symbol(&self.currency_symbol)
    }
}
