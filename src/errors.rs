use cashflow_config::ConfigError;
use cashflow_core::CoreError;
use cashflow_domain::{CadenceError, DateWindowError, MoneyError};
use thiserror::Error;

/// Unified error type for the layers below the shell.
#[derive(Error, Debug)]
pub enum CashflowError {
    #[error("Profile not loaded")]
    ProfileNotLoaded,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CashflowError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CashflowError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for CashflowError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProfileNotLoaded => CashflowError::ProfileNotLoaded,
            CoreError::ProfileNotFound(name) => CashflowError::NotFound(format!("profile `{name}`")),
            CoreError::SeriesNotFound(id) => CashflowError::NotFound(format!("series `{id}`")),
            CoreError::OneOffNotFound(id) => CashflowError::NotFound(format!("one-off `{id}`")),
            CoreError::BudgetNotFound(name) => CashflowError::NotFound(format!("budget `{name}`")),
            CoreError::InvalidOperation(message) | CoreError::Validation(message) => {
                CashflowError::InvalidInput(message)
            }
            CoreError::Window(err) => err.into(),
            CoreError::Money(err) => err.into(),
            CoreError::Cadence(err) => err.into(),
            CoreError::Storage(message) | CoreError::Serde(message) => {
                CashflowError::Storage(message)
            }
            CoreError::Io(err) => err.into(),
        }
    }
}

impl From<ConfigError> for CashflowError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(message) => CashflowError::InvalidInput(message),
            other => CashflowError::Config(other.to_string()),
        }
    }
}

impl From<DateWindowError> for CashflowError {
    fn from(err: DateWindowError) -> Self {
        CashflowError::InvalidInput(err.to_string())
    }
}

impl From<MoneyError> for CashflowError {
    fn from(err: MoneyError) -> Self {
        CashflowError::InvalidInput(err.to_string())
    }
}

impl From<CadenceError> for CashflowError {
    fn from(err: CadenceError) -> Self {
        CashflowError::InvalidInput(err.to_string())
    }
}

impl From<std::io::Error> for CashflowError {
    fn from(err: std::io::Error) -> Self {
        CashflowError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Core(err.into())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}
