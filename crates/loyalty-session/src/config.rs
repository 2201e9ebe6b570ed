//! # Session Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LOYALTY_DEBOUNCE_MS=300                                            │
//! │     LOYALTY_CURRENCY_SYMBOL=R$                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $LOYALTY_CONFIG_PATH, or                                           │
//! │     ~/.config/loyalty-pos/loyalty.toml (Linux)                         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     500ms debounce, 2-char queries, R$, 5% cashback                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [search]
//! debounce_ms = 500
//! min_query_len = 2
//!
//! [currency]
//! symbol = "R$"
//! decimal_separator = ","
//!
//! [cashback]
//! earn_rate_bps = 500
//! ```

use std::path::PathBuf;
use std::time::Duration;

use loyalty_core::{CashbackRate, Money};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Search Settings
// =============================================================================

/// Behaviour of the two search boxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke (milliseconds).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this clear the results instead of searching.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

fn default_debounce_ms() -> u64 {
    loyalty_core::DEFAULT_SEARCH_DEBOUNCE_MS
}

fn default_min_query_len() -> usize {
    loyalty_core::MIN_SEARCH_QUERY_LEN
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

// =============================================================================
// Currency Settings
// =============================================================================

/// How amounts are shown on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettings {
    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

fn default_symbol() -> String {
    "R$".to_string()
}

fn default_decimal_separator() -> char {
    '.'
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            symbol: default_symbol(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

// =============================================================================
// Cashback Settings
// =============================================================================

/// Loyalty programme parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashbackSettings {
    /// Share of the final amount credited back, in basis points.
    #[serde(default = "default_earn_rate_bps")]
    pub earn_rate_bps: u32,
}

fn default_earn_rate_bps() -> u32 {
    loyalty_core::DEFAULT_CASHBACK_RATE_BPS
}

impl Default for CashbackSettings {
    fn default() -> Self {
        CashbackSettings {
            earn_rate_bps: default_earn_rate_bps(),
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Complete page-session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub cashback: CashbackSettings,
}

impl SessionConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`loyalty.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("LOYALTY_CONFIG_PATH").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading session config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> SessionResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        if self.search.min_query_len == 0 {
            return Err(SessionError::InvalidConfig(
                "min_query_len must be greater than 0".into(),
            ));
        }

        if self.cashback.earn_rate_bps > 10_000 {
            return Err(SessionError::InvalidConfig(format!(
                "earn_rate_bps must be at most 10000 (100%), got {}",
                self.cashback.earn_rate_bps
            )));
        }

        if self.currency.decimal_separator.is_ascii_digit() {
            return Err(SessionError::InvalidConfig(
                "decimal_separator cannot be a digit".into(),
            ));
        }

        Ok(())
    }

    /// Applies `LOYALTY_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("LOYALTY_DEBOUNCE_MS") {
            match value.parse::<u64>() {
                Ok(ms) => {
                    debug!(debounce_ms = ms, "Overriding debounce from environment");
                    self.search.debounce_ms = ms;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid LOYALTY_DEBOUNCE_MS"),
            }
        }

        if let Some(value) = lookup("LOYALTY_MIN_QUERY_LEN") {
            match value.parse::<usize>() {
                Ok(len) => self.search.min_query_len = len,
                Err(_) => warn!(value = %value, "Ignoring invalid LOYALTY_MIN_QUERY_LEN"),
            }
        }

        if let Some(symbol) = lookup("LOYALTY_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(value) = lookup("LOYALTY_EARN_RATE_BPS") {
            match value.parse::<u32>() {
                Ok(bps) => {
                    debug!(earn_rate_bps = bps, "Overriding cashback rate from environment");
                    self.cashback.earn_rate_bps = bps;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid LOYALTY_EARN_RATE_BPS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "loyalty", "pos")
            .map(|dirs| dirs.config_dir().join("loyalty.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Debounce delay as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Cashback earning rate.
    pub fn earn_rate(&self) -> CashbackRate {
        CashbackRate::from_bps(self.cashback.earn_rate_bps)
    }

    /// Formats an amount for display, e.g. `R$ 150.00`.
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", self.currency.symbol, self.format_amount(amount))
    }

    /// Formats an amount for an input box: configured separator, no symbol.
    pub fn format_amount(&self, amount: Money) -> String {
        let plain = amount.to_string();
        if self.currency.decimal_separator == '.' {
            plain
        } else {
            plain.replace('.', &self.currency.decimal_separator.to_string())
        }
    }
}
