use std::result::Result as StdResult;

use envelope_config::ConfigError;
use envelope_core::{CoreError, StoreError};
use thiserror::Error;

/// Unified error type for the engine, persistence, and configuration layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<ConfigError> for BudgetError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => BudgetError::Store(StoreError::Io(io)),
            other => BudgetError::Config(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(BudgetError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}
