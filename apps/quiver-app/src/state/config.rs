//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment Variables (highest priority)                           │
//! │     QUIVER_DB_PATH, QUIVER_CART_KEY,                                    │
//! │     QUIVER_CURRENCY_SYMBOL, QUIVER_DELIVERY_BASE_FEE                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/quiver/quiver.toml (Linux)                                │
//! │     ~/Library/Application Support/com.quiver.quiver/quiver.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! database_path = "/var/lib/quiver/quiver.db"
//! cart_key = "default"
//!
//! [pricing]
//! delivery_base_fee_cents = 5000
//! delivery_included_items = 2
//! delivery_additional_item_fee_cents = 1000
//!
//! [display]
//! currency_code = "USD"
//! currency_symbol = "$"
//! currency_decimals = 2
//! ```
//!
//! Configuration is read-only after startup.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use quiver_core::{DeliveryPolicy, Money};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

const CONFIG_FILE_NAME: &str = "quiver.toml";
const DATABASE_FILE_NAME: &str = "quiver.db";
/// Most minor-unit digits any currency uses.
const MAX_CURRENCY_DECIMALS: u8 = 4;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "quiver", "quiver")
}

// =============================================================================
// Sections
// =============================================================================

/// `[store]`: where carts and the catalog live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// SQLite file. Defaults to the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Key the renter's cart snapshot is saved under.
    pub cart_key: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            database_path: None,
            cart_key: "default".to_string(),
        }
    }
}

/// `[pricing]`: delivery fee tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    pub delivery_base_fee_cents: i64,
    pub delivery_included_items: usize,
    pub delivery_additional_item_fee_cents: i64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        let policy = DeliveryPolicy::default();
        PricingSettings {
            delivery_base_fee_cents: policy.base_fee.cents(),
            delivery_included_items: policy.included_items,
            delivery_additional_item_fee_cents: policy.additional_item_fee.cents(),
        }
    }
}

/// `[display]`: currency formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// ISO 4217 code
    pub currency_code: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub pricing: PricingSettings,
    pub display: DisplaySettings,
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Read `config_path` (or the platform default) if it exists
    /// 3. Apply `QUIVER_*` environment overrides
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Checks values the rest of the app relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.cart_key.trim().is_empty() {
            return Err(ConfigError::Invalid("store.cart_key must not be empty".into()));
        }

        if self.pricing.delivery_base_fee_cents < 0
            || self.pricing.delivery_additional_item_fee_cents < 0
        {
            return Err(ConfigError::Invalid(
                "delivery fees must not be negative".into(),
            ));
        }

        if self.display.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "display.currency_decimals must be at most {}, got {}",
                MAX_CURRENCY_DECIMALS, self.display.currency_decimals
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `QUIVER_*` overrides from `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("QUIVER_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.store.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("QUIVER_CART_KEY") {
            self.store.cart_key = key;
        }

        if let Some(symbol) = lookup("QUIVER_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        if let Some(fee) = lookup("QUIVER_DELIVERY_BASE_FEE") {
            match fee.parse::<i64>() {
                Ok(cents) => {
                    debug!(cents, "Overriding delivery base fee from environment");
                    self.pricing.delivery_base_fee_cents = cents;
                }
                Err(_) => warn!(value = %fee, "Ignoring non-numeric QUIVER_DELIVERY_BASE_FEE"),
            }
        }
    }

    /// `quiver.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Resolved SQLite path: configured, else platform data dir, else cwd.
    pub fn database_path(&self) -> PathBuf {
        self.store
            .database_path
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    /// Delivery fee tiers as a pricing policy.
    pub fn delivery_policy(&self) -> DeliveryPolicy {
        DeliveryPolicy {
            base_fee: Money::from_cents(self.pricing.delivery_base_fee_cents),
            included_items: self.pricing.delivery_included_items,
            additional_item_fee: Money::from_cents(self.pricing.delivery_additional_item_fee_cents),
        }
    }
}

// =============================================================================
// Config State
// =============================================================================

/// Read-only configuration shared by the commands.
#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    config: AppConfig,
}

impl ConfigState {
    /// Wraps `config`, clamping display settings that would break formatting.
    pub fn new(mut config: AppConfig) -> Self {
        if config.display.currency_decimals > MAX_CURRENCY_DECIMALS {
            warn!(
                decimals = config.display.currency_decimals,
                max = MAX_CURRENCY_DECIMALS,
                "Clamping display.currency_decimals"
            );
            config.display.currency_decimals = MAX_CURRENCY_DECIMALS;
        }
        ConfigState { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Key the cart snapshot is persisted under.
    pub fn cart_key(&self) -> &str {
        &self.config.store.cart_key
    }

    /// Formats an amount in minor units with the configured symbol.
    ///
    /// ## Example
    /// ```rust
    /// use quiver_app::state::ConfigState;
    /// use quiver_core::Money;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(35000)), "$350.00");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let display = &self.config.display;
        let cents = amount.cents();
        let divisor = 10_i64.pow(u32::from(display.currency_decimals));
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            display.currency_symbol,
            if display.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = display.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}
