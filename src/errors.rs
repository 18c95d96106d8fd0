use std::result::Result as StdResult;

use fintrack_config::ConfigError;
use fintrack_core::CoreError;
use thiserror::Error;

use crate::auth::AuthError;

/// Unified error type for the store, auth, session and CLI layers.
#[derive(Error, Debug)]
pub enum FinError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = StdResult<T, FinError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FinError),
    #[error("Cannot read `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for FinError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => FinError::Io(io),
            other => FinError::Config(other.to_string()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(FinError::from(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(FinError::from(err))
    }
}
