use std::path::PathBuf;

use fintrack_domain::{CategoryOrder, NegativeAmountPolicy, ReportOptions};

use crate::ConfigError;
use serde::{Deserialize, Serialize};

const HOME_ENV: &str = "FINTRACK_HOME";
const DEFAULT_DIR_NAME: &str = ".fintrack";
const MAX_DECIMAL_PLACES: u8 = 6;

/// Keys accepted by [`Config::set`].
pub const CONFIG_KEYS: [&str; 6] = [
    "currency",
    "currency_symbol",
    "category_order",
    "negative_amounts",
    "ui_color_enabled",
    "decimal_places",
];

/// Stores user-configurable report preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub category_order: CategoryOrder,
    #[serde(default)]
    pub negative_amounts: NegativeAmountPolicy,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_decimal_places")]
    pub decimal_places: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            currency_symbol: Self::default_currency_symbol(),
            category_order: CategoryOrder::default(),
            negative_amounts: NegativeAmountPolicy::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            decimal_places: Self::default_decimal_places(),
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "INR".into()
    }

    pub fn default_currency_symbol() -> String {
        "₹".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_decimal_places() -> u8 {
        2
    }

    /// Options handed to the report pipeline.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            category_order: self.category_order,
            negative_amounts: self.negative_amounts,
        }
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "currency" if !value.is_empty() => self.currency = value.to_ascii_uppercase(),
            "currency_symbol" if !value.is_empty() => self.currency_symbol = value.to_string(),
            "category_order" => {
                self.category_order = canonical::<CategoryOrder>(value).ok_or_else(invalid)?
            }
            "negative_amounts" => {
                self.negative_amounts =
                    canonical::<NegativeAmountPolicy>(value).ok_or_else(invalid)?
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => return Err(invalid()),
                }
            }
            "decimal_places" => {
                self.decimal_places = value
                    .parse::<u8>()
                    .ok()
                    .filter(|places| *places <= MAX_DECIMAL_PLACES)
                    .ok_or_else(invalid)?
            }
            "currency" | "currency_symbol" => return Err(invalid()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Formats an amount with the configured symbol and precision.
    pub fn format_amount(&self, amount: f64) -> String {
        let precision = usize::from(self.decimal_places);
        if amount < 0.0 {
            format!("-{}{:.*}", self.currency_symbol, precision, -amount)
        } else {
            format!("{}{:.*}", self.currency_symbol, precision, amount)
        }
    }

    /// Application data directory: `$FINTRACK_HOME`, else `~/.fintrack`.
    pub fn resolve_home_dir() -> PathBuf {
        if let Some(custom) = std::env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }
}

/// Parses a policy value, accepting only its canonical spelling.
fn canonical<T>(value: &str) -> Option<T>
where
    T: std::str::FromStr + std::fmt::Display,
{
    let wanted = value.to_ascii_lowercase();
    value.parse::<T>().ok().filter(|parsed| parsed.to_string() == wanted)
}
