//! fintrack-config
//!
//! Persistent user preferences for reports and their on-disk storage.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, CONFIG_KEYS};
